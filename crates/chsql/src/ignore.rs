//! Named ignore rules deciding whether a clause candidate is included.
//!
//! Builders consult the registry per candidate fragment: a rule returning
//! `true` keeps the fragment, `false` drops it. Rule names are stable
//! contracts; re-registering a name silently replaces its behavior.

use crate::error::{ChError, ChResult};
use crate::value::SqlValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the built-in rule that always includes the candidate.
pub const RULE_DEFAULT: &str = "default";

/// Name of the built-in rule that includes non-null, non-empty values.
pub const RULE_IF_HAVE: &str = "ifHave";

/// Name of the built-in rule that includes numeric values.
pub const RULE_IF_NUMBER: &str = "ifNumber";

/// Predicate deciding whether a candidate participates in the statement.
pub type IgnorePredicate = Arc<dyn Fn(&Candidate) -> bool + Send + Sync>;

/// The value/metadata bundle evaluated by an ignore rule.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The value under consideration for the clause.
    pub value: SqlValue,
    /// Optional column metadata for custom rules.
    pub column: Option<String>,
}

impl Candidate {
    /// Create a candidate from a bare value.
    pub fn new(value: impl Into<SqlValue>) -> Self {
        Self {
            value: value.into(),
            column: None,
        }
    }

    /// Attach column metadata.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl From<SqlValue> for Candidate {
    fn from(value: SqlValue) -> Self {
        Self::new(value)
    }
}

/// Registry of named inclusion predicates.
#[derive(Default)]
pub struct IgnoreRuleRegistry {
    rules: HashMap<String, IgnorePredicate>,
}

impl IgnoreRuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in rules installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Register a rule, silently overwriting any existing rule of the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        self.register_arc(name, Arc::new(predicate));
    }

    /// Register a rule from a shared predicate.
    pub fn register_arc(&mut self, name: impl Into<String>, predicate: IgnorePredicate) {
        self.rules.insert(name.into(), predicate);
    }

    /// Check whether a rule name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Evaluate the named rule against a candidate.
    ///
    /// Returns [`ChError::UnknownRule`] if the name was never registered.
    /// The predicate itself is not sandboxed; a panicking custom rule is a
    /// caller bug and propagates.
    pub fn should_include(&self, name: &str, candidate: &Candidate) -> ChResult<bool> {
        let predicate = self
            .rules
            .get(name)
            .ok_or_else(|| ChError::unknown_rule(name))?;
        Ok(predicate(candidate))
    }

    /// Install the built-in rules: `default`, `ifHave`, `ifNumber`.
    pub fn register_defaults(&mut self) {
        // Always include the candidate.
        self.register(RULE_DEFAULT, |_| true);

        // Include when the value is present: not null and its string
        // coercion is non-empty. `0` and `false` coerce to non-empty
        // strings and are included; `""` and `[]` are not.
        self.register(RULE_IF_HAVE, |c: &Candidate| {
            !c.value.is_null() && !c.value.display_string().is_empty()
        });

        // Include when the value coerces to a finite number.
        self.register(RULE_IF_NUMBER, |c: &Candidate| c.value.as_f64().is_some());
    }
}
