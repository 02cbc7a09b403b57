//! The command pipeline: format, execute, dispatch lifecycle events.
//!
//! One `execute` call performs a single attempt: the template is formatted
//! into a full statement, `BeforeExecute` handlers run, the driver executes
//! the statement, and `AfterExecute` handlers run on success. Any failure
//! inside that guarded region (formatting included) populates the context's
//! `error`, fires `ExecuteError` handlers, and re-raises the original error
//! unchanged. The pipeline never wraps, retries, or times out.

use crate::config::{Configuration, EventKind};
use crate::driver::Driver;
use crate::error::ChResult;
use crate::format::format_sql;
use crate::row::Row;
use crate::value::SqlValue;
use std::sync::Arc;

/// A statement template plus its bound arguments.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    /// SQL template with `?` placeholders.
    pub sql: String,
    /// Positional arguments.
    pub args: Vec<SqlValue>,
}

impl Statement {
    /// Create a statement from a template and arguments.
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Per-call mutable bundle passed to lifecycle handlers.
///
/// `sql` starts as the template and is overwritten with the formatted
/// statement before `BeforeExecute` fires; `sql_text` always remains the
/// original template, letting handlers distinguish what was requested from
/// what ran.
pub struct ExecutionContext {
    /// The statement as it evolves: template, then formatted SQL.
    pub sql: String,
    /// Bound parameters of the original statement.
    pub sql_data: Vec<SqlValue>,
    /// The original template, never overwritten.
    pub sql_text: String,
    /// The execution surface, shared with the pipeline for this one call.
    pub driver: Arc<dyn Driver>,
    /// Result rows, populated after a successful driver call.
    pub result: Option<Vec<Row>>,
    /// The failure, populated before `ExecuteError` handlers run.
    pub error: Option<crate::error::ChError>,
}

/// Executes statements against a driver, dispatching lifecycle events
/// through a [`Configuration`].
pub struct CommandPipeline<'a> {
    driver: &'a Arc<dyn Driver>,
    config: &'a Configuration,
}

impl<'a> CommandPipeline<'a> {
    /// Create a pipeline over a driver handle and configuration.
    pub fn new(driver: &'a Arc<dyn Driver>, config: &'a Configuration) -> Self {
        Self { driver, config }
    }

    /// Execute a statement: format, dispatch events, run the driver once.
    ///
    /// On failure the original error reaches the caller unchanged after
    /// `ExecuteError` handlers have observed it; handlers cannot suppress it.
    pub async fn execute(&self, statement: &Statement) -> ChResult<Vec<Row>> {
        let mut ctx = ExecutionContext {
            sql: statement.sql.clone(),
            sql_data: statement.args.clone(),
            sql_text: statement.sql.clone(),
            driver: Arc::clone(self.driver),
            result: None,
            error: None,
        };

        match self.run_guarded(&mut ctx).await {
            Ok(rows) => Ok(rows),
            Err(err) => {
                ctx.error = Some(err.clone());
                self.config.dispatch(EventKind::ExecuteError, &ctx);
                Err(err)
            }
        }
    }

    async fn run_guarded(&self, ctx: &mut ExecutionContext) -> ChResult<Vec<Row>> {
        ctx.sql = format_sql(&ctx.sql_text, &ctx.sql_data)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "chsql.sql", sql = %ctx.sql, "executing statement");

        self.config.dispatch(EventKind::BeforeExecute, ctx);

        let rows = ctx.driver.execute(&ctx.sql).await?;

        ctx.result = Some(rows);
        self.config.dispatch(EventKind::AfterExecute, ctx);

        // Handlers only borrow the context, so the rows are still in place.
        Ok(ctx.result.take().unwrap_or_default())
    }
}
