//! Driver seam: the execution surface behind the command pipeline.
//!
//! The pipeline hands the driver a fully-substituted statement string (no
//! positional parameters) and awaits rows. Concrete network drivers live
//! outside this crate; tests and embedders implement [`Driver`] directly.

use crate::error::ChResult;
use crate::row::Row;
use async_trait::async_trait;

/// Executes a fully-formatted statement against the target database.
///
/// Implementations decide whether concurrent use of one handle is safe; the
/// pipeline imposes no serialization of its own.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Execute a formatted statement, returning result rows.
    async fn execute(&self, sql: &str) -> ChResult<Vec<Row>>;
}

/// Construct a driver from client options.
///
/// Used by the [`ChClient`](crate::client::ChClient) factory guard; any
/// failure here is reported to the caller as a generic configuration error.
pub trait Connect: Driver + Sized {
    /// Build a driver handle from validated options.
    fn connect(options: &ClientOptions) -> ChResult<Self>;
}

/// Connection options for driver construction.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Server endpoint, e.g. `http://localhost:8123`.
    pub url: String,
    /// Default database.
    pub database: Option<String>,
    /// Username.
    pub user: Option<String>,
    /// Password.
    pub password: Option<String>,
}

impl ClientOptions {
    /// Create options for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the default database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the username.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Whether the options carry no connection target.
    pub fn is_empty(&self) -> bool {
        self.url.trim().is_empty()
            && self.database.is_none()
            && self.user.is_none()
            && self.password.is_none()
    }
}
