//! UPDATE builder (ClickHouse mutation syntax).

use crate::builder::ConditionSet;
use crate::client::ChClient;
use crate::command::Statement;
use crate::error::{ChError, ChResult};
use crate::ignore::RULE_DEFAULT;
use crate::row::Row;
use crate::value::SqlValue;

/// UPDATE statement builder.
///
/// Emits ClickHouse mutation syntax: `ALTER TABLE t UPDATE c = ? WHERE ...`.
/// Refuses to build without at least one surviving SET assignment and one
/// surviving WHERE condition.
pub struct UpdateBuilder<'a> {
    client: &'a ChClient,
    table: String,
    sets: ConditionSet,
    conditions: ConditionSet,
}

impl<'a> UpdateBuilder<'a> {
    pub(crate) fn new(client: &'a ChClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            sets: ConditionSet::new(),
            conditions: ConditionSet::new(),
        }
    }

    /// Set a column under the `default` rule (always included).
    pub fn set(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.set_if(RULE_DEFAULT, column, value)
    }

    /// Set a column gated by a named ignore rule.
    pub fn set_if(mut self, rule: &str, column: &str, value: impl Into<SqlValue>) -> Self {
        self.sets.push(rule, format!("{column} = ?"), value);
        self
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
        let (set_fragments, mut args) = self.sets.build(config)?;
        if set_fragments.is_empty() {
            return Err(ChError::builder("UPDATE requires at least one SET assignment"));
        }

        let (where_fragments, where_args) = self.conditions.build(config)?;
        if where_fragments.is_empty() {
            return Err(ChError::builder("UPDATE requires at least one WHERE condition"));
        }
        args.extend(where_args);

        let sql = format!(
            "ALTER TABLE {} UPDATE {} WHERE {}",
            self.table,
            set_fragments.join(", "),
            where_fragments.join(" AND ")
        );

        Ok(Statement::new(sql, args))
    }

    /// Build and execute the mutation.
    pub async fn execute(&self) -> ChResult<Vec<Row>> {
        let statement = self.build()?;
        self.client.execute(&statement).await
    }
}
