//! SELECT builder seeded with a base SQL string.

use crate::builder::ConditionSet;
use crate::client::ChClient;
use crate::command::Statement;
use crate::error::ChResult;
use crate::ignore::RULE_DEFAULT;
use crate::row::{Row, rows_as};
use crate::value::SqlValue;
use serde::de::DeserializeOwned;

/// SELECT statement builder.
///
/// Seeded with a base query (e.g. `SELECT id, name FROM users`); conditional
/// fragments are appended under `WHERE`, joined with `AND`. When every
/// fragment is dropped by its rule, no `WHERE` clause is emitted.
pub struct SelectBuilder<'a> {
    client: &'a ChClient,
    base_sql: String,
    conditions: ConditionSet,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<'a> SelectBuilder<'a> {
    pub(crate) fn new(client: &'a ChClient, base_sql: impl Into<String>) -> Self {
        Self {
            client,
            base_sql: base_sql.into(),
            conditions: ConditionSet::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Add a WHERE fragment under the `default` rule (always included).
    ///
    /// The fragment holds one `?` placeholder for `value`, e.g. `age > ?`.
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

    /// Add a GROUP BY expression.
    pub fn group_by(mut self, expr: &str) -> Self {
        self.group_by.push(expr.to_string());
        self
    }

    /// Add an ORDER BY expression.
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by.push(expr.to_string());
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Assemble the final statement against the client's configuration.
    pub fn build(&self) -> ChResult<Statement> {
        let config = self.client.configuration();
        let (fragments, args) = self.conditions.build(config)?;

        let mut sql = self.base_sql.clone();
        if !fragments.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&fragments.join(" AND "));
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(Statement::new(sql, args))
    }

    /// Build and execute, returning all rows.
    pub async fn fetch_all(&self) -> ChResult<Vec<Row>> {
        let statement = self.build()?;
        self.client.execute(&statement).await
    }

    /// Build and execute, mapping each row into `T`.
    pub async fn fetch_all_as<T: DeserializeOwned>(&self) -> ChResult<Vec<T>> {
        let rows = self.fetch_all().await?;
        rows_as(&rows)
    }

    /// Build and execute, returning the first row if any.
    pub async fn fetch_opt(&self) -> ChResult<Option<Row>> {
        let rows = self.fetch_all().await?;
        Ok(rows.into_iter().next())
    }
}
