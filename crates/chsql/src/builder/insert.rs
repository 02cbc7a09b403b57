//! INSERT builder.

use crate::client::ChClient;
use crate::command::Statement;
use crate::error::{ChError, ChResult};
use crate::row::Row;
use crate::value::SqlValue;

/// INSERT statement builder.
///
/// Emits `INSERT INTO t (c1, c2) VALUES (?, ?), (?, ?)`. Column order is
/// fixed by the `columns` call; every row must match its length.
pub struct InsertBuilder<'a> {
    client: &'a ChClient,
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl<'a> InsertBuilder<'a> {
    pub(crate) fn new(client: &'a ChClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set the column list.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Append one row of values, in column order.
    pub fn row(mut self, values: Vec<SqlValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Append multiple rows of values.
    pub fn rows(mut self, rows: Vec<Vec<SqlValue>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Assemble the final statement.
    pub fn build(&self) -> ChResult<Statement> {
        if self.columns.is_empty() {
            return Err(ChError::builder("INSERT requires a column list"));
        }
        if self.rows.is_empty() {
            return Err(ChError::builder("INSERT requires at least one row"));
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(ChError::builder(format!(
                    "INSERT row {} has {} value(s) but {} column(s) were declared",
                    i + 1,
                    row.len(),
                    self.columns.len()
                )));
            }
        }

        let placeholders = format!("({})", vec!["?"; self.columns.len()].join(", "));
        let values_clause = vec![placeholders; self.rows.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            self.columns.join(", "),
            values_clause
        );
        let args = self.rows.iter().flatten().cloned().collect();

        Ok(Statement::new(sql, args))
    }

    /// Build and execute the insert.
    pub async fn execute(&self) -> ChResult<Vec<Row>> {
        let statement = self.build()?;
        self.client.execute(&statement).await
    }
}
