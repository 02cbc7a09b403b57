//! Fluent statement builders for the ClickHouse dialect.
//!
//! Builders accumulate clause fragments, consulting the client's ignore-rule
//! registry per fragment, and produce a final [`Statement`] handed to the
//! command pipeline. They are single-use and mutated synchronously by
//! chained calls.
//!
//! # Usage
//!
//! ```ignore
//! use chsql::{RULE_IF_HAVE, RULE_IF_NUMBER};
//!
//! // SELECT: fragments with a rejected rule are dropped
//! let rows = client
//!     .select("SELECT id, name FROM users")
//!     .filter_if(RULE_IF_HAVE, "name = ?", name)       // skipped when empty
//!     .filter_if(RULE_IF_NUMBER, "age > ?", min_age)   // skipped when not numeric
//!     .order_by("id")
//!     .limit(20)
//!     .fetch_all()
//!     .await?;
//!
//! // INSERT
//! client
//!     .insert("users")
//!     .columns(&["id", "name"])
//!     .row(vec![1.into(), "alice".into()])
//!     .execute()
//!     .await?;
//!
//! // UPDATE (ClickHouse mutation)
//! client
//!     .update("users")
//!     .set("name", "bob")
//!     .filter("id = ?", 1)
//!     .execute()
//!     .await?;
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;


use crate::config::Configuration;
use crate::error::ChResult;
use crate::ignore::Candidate;
use crate::value::SqlValue;

/// A candidate clause fragment gated by a named ignore rule.
pub(crate) struct ConditionSpec {
    rule: String,
    fragment: String,
    value: SqlValue,
}

/// Ordered set of rule-gated fragments shared by SELECT/UPDATE/DELETE.
#[derive(Default)]
pub(crate) struct ConditionSet {
    items: Vec<ConditionSpec>,
}

impl ConditionSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &mut self,
        rule: impl Into<String>,
        fragment: impl Into<String>,
        value: impl Into<SqlValue>,
    ) {
        self.items.push(ConditionSpec {
            rule: rule.into(),
            fragment: fragment.into(),
            value: value.into(),
        });
    }

    /// Evaluate each fragment's rule against the configuration, returning
    /// the surviving fragments and their arguments in order.
    ///
    /// A fragment without a `?` placeholder contributes no argument even
    /// when kept (its value only feeds the rule).
    pub(crate) fn build(
        &self,
        config: &Configuration,
    ) -> ChResult<(Vec<String>, Vec<SqlValue>)> {
        let mut fragments = Vec::new();
        let mut args = Vec::new();
        for item in &self.items {
            let candidate = Candidate::new(item.value.clone());
            if config.should_include(&item.rule, &candidate)? {
                if item.fragment.contains('?') {
                    args.push(item.value.clone());
                }
                fragments.push(item.fragment.clone());
            }
        }
        Ok((fragments, args))
    }
}
