//! DELETE builder (ClickHouse mutation syntax).

use crate::builder::ConditionSet;
use crate::client::ChClient;
use crate::command::Statement;
use crate::error::{ChError, ChResult};
use crate::ignore::RULE_DEFAULT;
use crate::row::Row;
use crate::value::SqlValue;

/// DELETE statement builder.
///
/// Emits ClickHouse mutation syntax: `ALTER TABLE t DELETE WHERE ...`.
/// Refuses to build without at least one surviving WHERE condition, so a
/// fully-ignored condition set cannot silently delete everything.
pub struct DeleteBuilder<'a> {
    client: &'a ChClient,
    table: String,
    conditions: ConditionSet,
}

impl<'a> DeleteBuilder<'a> {
    pub(crate) fn new(client: &'a ChClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            conditions: ConditionSet::new(),
        }
    }

    /// Add a WHERE fragment under the `default` rule.
    pub fn filter(self, fragment: &str, value: impl Into<SqlValue>) -> Self {
        self.filter_if(RULE_DEFAULT, fragment, value)
    }

    /// Add a WHERE fragment gated by a named ignore rule.
    pub fn filter_if(
        mut self,
        rule: &str,
        fragment: &str,
        value: impl Into<SqlValue>,
    ) -> Self {
        self.conditions.push(rule, fragment, value);
        self
    }

    /// Assemble the final statement against the client's configuration.
    pub fn build(&self) -> ChResult<Statement> {
        let config = self.client.configuration();
        let (fragments, args) = self.conditions.build(config)?;
        if fragments.is_empty() {
            return Err(ChError::builder("DELETE requires at least one WHERE condition"));
        }

        let sql = format!(
            "ALTER TABLE {} DELETE WHERE {}",
            self.table,
            fragments.join(" AND ")
        );

        Ok(Statement::new(sql, args))
    }

    /// Build and execute the mutation.
    pub async fn execute(&self) -> ChResult<Vec<Row>> {
        let statement = self.build()?;
        self.client.execute(&statement).await
    }
}
