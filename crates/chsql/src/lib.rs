//! # chsql
//!
//! A fluent SQL-construction layer for ClickHouse-dialect databases.
//!
//! ## Features
//!
//! - **Conditional clause assembly**: named "ignore rules" decide per
//!   fragment whether a candidate value participates in the final statement
//! - **Hook-driven execution**: a uniform command pipeline formats the
//!   statement, runs it once against the driver, and fires typed lifecycle
//!   events (`BeforeExecute`, `AfterExecute`, `ExecuteError`)
//! - **Errors stay yours**: the pipeline observes failures via the error
//!   event and re-raises them unchanged; it never wraps or retries
//! - **Driver-agnostic**: the execution surface is a small async trait;
//!   bring your own network driver
//!
//! ## Usage
//!
//! ```ignore
//! use chsql::{ChClient, ConfigUpdate, EventKind, RULE_IF_HAVE};
//!
//! let mut client = ChClient::connect::<HttpDriver>(options)?;
//!
//! client.config(
//!     ConfigUpdate::new()
//!         .register_ignore("ifPositive", |c| c.value.as_f64().is_some_and(|n| n > 0.0))
//!         .subscribe(EventKind::ExecuteError, |ctx| {
//!             eprintln!("failed: {} ({:?})", ctx.sql_text, ctx.error);
//!         }),
//! );
//!
//! let rows = client
//!     .select("SELECT id, name FROM users")
//!     .filter_if(RULE_IF_HAVE, "name = ?", name)
//!     .limit(20)
//!     .fetch_all()
//!     .await?;
//! ```

pub mod builder;
pub mod client;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod format;
pub mod ignore;
pub mod row;
pub mod value;

#[cfg(feature = "tracing")]
pub mod tracing_hook;

pub use builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
pub use client::ChClient;
pub use command::{CommandPipeline, ExecutionContext, Statement};
pub use config::{ConfigUpdate, Configuration, EventHandler, EventKind, Subscription};
pub use driver::{ClientOptions, Connect, Driver};
pub use error::{ChError, ChResult};
pub use format::format_sql;
pub use ignore::{
    Candidate, IgnorePredicate, IgnoreRuleRegistry, RULE_DEFAULT, RULE_IF_HAVE, RULE_IF_NUMBER,
};
pub use row::{Row, rows_as};
pub use value::SqlValue;

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;
