//! Per-client configuration: ignore rules, event subscriptions, settings.
//!
//! A [`Configuration`] is created with the built-in ignore rules installed
//! and mutated by explicit `register_ignore` / `subscribe` calls or by
//! shallow-merging a [`ConfigUpdate`]. It is expected to be fully populated
//! before the client begins serving `execute` calls.

use crate::command::ExecutionContext;
use crate::error::ChResult;
use crate::ignore::{Candidate, IgnorePredicate, IgnoreRuleRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lifecycle event kinds fired by the command pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Fired after formatting, before the driver call.
    BeforeExecute,
    /// Fired after a successful driver call, with `result` populated.
    AfterExecute,
    /// Fired on any failure in the guarded region, with `error` populated.
    ExecuteError,
}

/// A lifecycle event handler.
///
/// Invoked synchronously on the caller's task; side-effecting only.
pub type EventHandler = Arc<dyn Fn(&ExecutionContext) + Send + Sync>;

/// An event subscription: a handler bound to one event kind.
#[derive(Clone)]
pub struct Subscription {
    /// The event kind this handler receives.
    pub kind: EventKind,
    /// The handler closure.
    pub handler: EventHandler,
}

/// Per-client configuration holding the rule registry, ordered event
/// subscriptions, and a free-form settings payload.
pub struct Configuration {
    rules: IgnoreRuleRegistry,
    subscriptions: Vec<Subscription>,
    settings: BTreeMap<String, serde_json::Value>,
}

impl Configuration {
    /// Create a configuration with the built-in ignore rules registered.
    pub fn new() -> Self {
        Self {
            rules: IgnoreRuleRegistry::with_defaults(),
            subscriptions: Vec::new(),
            settings: BTreeMap::new(),
        }
    }

    /// Register an ignore rule, silently overwriting an existing name.
    pub fn register_ignore<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        self.rules.register(name, predicate);
    }

    /// Evaluate the named ignore rule against a candidate.
    pub fn should_include(&self, name: &str, candidate: &Candidate) -> ChResult<bool> {
        self.rules.should_include(name, candidate)
    }

    /// Access the underlying rule registry.
    pub fn rules(&self) -> &IgnoreRuleRegistry {
        &self.rules
    }

    /// Subscribe a handler to an event kind.
    ///
    /// Handlers run in registration order; subscribing the same handler
    /// twice invokes it twice.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&ExecutionContext) + Send + Sync + 'static,
    {
        self.subscribe_arc(kind, Arc::new(handler));
    }

    /// Subscribe a shared handler to an event kind.
    pub fn subscribe_arc(&mut self, kind: EventKind, handler: EventHandler) {
        self.subscriptions.push(Subscription { kind, handler });
    }

    /// Invoke all handlers subscribed to `kind`, in registration order.
    pub fn dispatch(&self, kind: EventKind, ctx: &ExecutionContext) {
        for sub in self.subscriptions.iter().filter(|s| s.kind == kind) {
            (sub.handler)(ctx);
        }
    }

    /// Number of subscriptions for an event kind.
    pub fn subscription_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }

    /// Get a settings value by key.
    pub fn setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }

    /// Access the settings payload.
    pub fn settings(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.settings
    }

    /// Shallow-merge a partial configuration.
    ///
    /// New rules are inserted (overwriting same-named ones), new
    /// subscriptions are appended after existing ones, and settings keys
    /// are overwritten individually. Everything not mentioned in `update`
    /// is preserved, including the built-in rules.
    pub fn merge(&mut self, update: ConfigUpdate) {
        for (name, predicate) in update.rules {
            self.rules.register_arc(name, predicate);
        }
        self.subscriptions.extend(update.subscriptions);
        for (key, value) in update.settings {
            self.settings.insert(key, value);
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial configuration applied via [`Configuration::merge`].
#[derive(Default)]
pub struct ConfigUpdate {
    rules: Vec<(String, IgnorePredicate)>,
    subscriptions: Vec<Subscription>,
    settings: BTreeMap<String, serde_json::Value>,
}

impl ConfigUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ignore rule to the update.
    pub fn register_ignore<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        self.rules.push((name.into(), Arc::new(predicate)));
        self
    }

    /// Add an event subscription to the update.
    pub fn subscribe<F>(mut self, kind: EventKind, handler: F) -> Self
    where
        F: Fn(&ExecutionContext) + Send + Sync + 'static,
    {
        self.subscriptions.push(Subscription {
            kind,
            handler: Arc::new(handler),
        });
        self
    }

    /// Set a settings key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}
