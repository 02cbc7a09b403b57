//! The client: factory guard, configuration surface, builder entry points.

use crate::builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
use crate::command::{CommandPipeline, ExecutionContext, Statement};
use crate::config::{ConfigUpdate, Configuration, EventKind};
use crate::driver::{ClientOptions, Connect, Driver};
use crate::error::{ChError, ChResult};
use crate::ignore::Candidate;
use crate::row::Row;
use crate::value::SqlValue;
use std::sync::Arc;

/// A database client owning a driver handle and its configuration.
///
/// Configuration mutators take `&mut self`: populate rules and subscriptions
/// before the client starts serving `execute` calls.
pub struct ChClient {
    driver: Arc<dyn Driver>,
    config: Configuration,
}

impl std::fmt::Debug for ChClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChClient").finish_non_exhaustive()
    }
}

impl ChClient {
    /// Construct a client by validating options and building the driver.
    ///
    /// Fails with a configuration error when the options carry no connection
    /// target, or when driver construction fails for any reason. In the
    /// latter case the message is generic; the underlying cause is not
    /// preserved.
    pub fn connect<D>(options: ClientOptions) -> ChResult<Self>
    where
        D: Connect + 'static,
    {
        let driver = build_driver::<D>(&options)?;
        Ok(Self::with_driver(Arc::new(driver)))
    }

    /// Construct a client around an existing driver handle, bypassing the
    /// options guard.
    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            config: Configuration::new(),
        }
    }

    /// Shallow-merge a partial configuration; previously registered rules
    /// and subscriptions (including the built-in rules) are preserved.
    pub fn config(&mut self, update: ConfigUpdate) {
        self.config.merge(update);
    }

    /// Access the current configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Register an ignore rule, silently overwriting an existing name.
    pub fn register_ignore<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        self.config.register_ignore(name, predicate);
    }

    /// Subscribe a lifecycle event handler.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&ExecutionContext) + Send + Sync + 'static,
    {
        self.config.subscribe(kind, handler);
    }

    /// Subscribe a shared lifecycle event handler.
    pub fn subscribe_arc(&mut self, kind: EventKind, handler: crate::config::EventHandler) {
        self.config.subscribe_arc(kind, handler);
    }

    /// Evaluate a named ignore rule against a candidate.
    pub fn should_include(&self, name: &str, candidate: &Candidate) -> ChResult<bool> {
        self.config.should_include(name, candidate)
    }

    /// Start a SELECT builder seeded with a base query.
    pub fn select(&self, base_sql: impl Into<String>) -> SelectBuilder<'_> {
        SelectBuilder::new(self, base_sql)
    }

    /// Start an INSERT builder for a table.
    pub fn insert(&self, table: impl Into<String>) -> InsertBuilder<'_> {
        InsertBuilder::new(self, table)
    }

    /// Start an UPDATE builder for a table.
    pub fn update(&self, table: impl Into<String>) -> UpdateBuilder<'_> {
        UpdateBuilder::new(self, table)
    }

    /// Start a DELETE builder for a table.
    pub fn delete(&self, table: impl Into<String>) -> DeleteBuilder<'_> {
        DeleteBuilder::new(self, table)
    }

    /// Wrap a raw template and arguments as a statement.
    pub fn sql(&self, sql: impl Into<String>, args: Vec<SqlValue>) -> Statement {
        Statement::new(sql, args)
    }

    /// Execute a statement through the command pipeline.
    pub async fn execute(&self, statement: &Statement) -> ChResult<Vec<Row>> {
        CommandPipeline::new(&self.driver, &self.config)
            .execute(statement)
            .await
    }
}

/// Validate options and construct the driver handle.
fn build_driver<D: Connect>(options: &ClientOptions) -> ChResult<D> {
    if options.is_empty() {
        return Err(ChError::configuration(
            "initialization options must not be empty",
        ));
    }
    D::connect(options)
        .map_err(|_| ChError::configuration("initialization options are invalid"))
}
