//! Semantic-action hooks for in-process grammars
//!
//! Hooks are registered per rule name. When a [`Grammar`](super::Grammar)
//! takes a [`Hooks`] registry it resolves one [`RuleHooks`] descriptor per
//! rule by walking the rule's typestack (the rule itself, then its `extends`
//! ancestors), so matching never looks hooks up by name.

use super::node::Node;
use hashbrown::HashMap;
use std::sync::Arc;

/// Hook run on a record when it is created or finalised
pub type NodeHook = Arc<dyn Fn(&mut Node) + Send + Sync>;

/// Hook run instead of the default store
pub type StoreHook = Arc<dyn Fn(&mut Node, Node) + Send + Sync>;

/// Hook answering a semantic-value lookup for a record
pub type AccessorHook = Arc<dyn Fn(&Node) -> Option<String> + Send + Sync>;

/// Hooks attached to one rule name
#[derive(Clone, Default)]
struct TypeHooks {
    construct: Option<NodeHook>,
    finalise: Option<NodeHook>,
    store: HashMap<String, StoreHook>,
    store_any: Option<StoreHook>,
    accessors: HashMap<String, AccessorHook>,
}

/// Registry of hooks keyed by rule name
#[derive(Clone, Default)]
pub struct Hooks {
    types: HashMap<String, TypeHooks>,
}

impl Hooks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, rule: &str) -> &mut TypeHooks {
        self.types.entry(rule.to_string()).or_default()
    }

    /// Run `hook` on every record created for `rule`, including its tag records
    pub fn construct<F>(mut self, rule: &str, hook: F) -> Self
    where
        F: Fn(&mut Node) + Send + Sync + 'static,
    {
        self.entry(rule).construct = Some(Arc::new(hook));
        self
    }

    /// Run `hook` on `rule`'s result once it has matched
    pub fn finalise<F>(mut self, rule: &str, hook: F) -> Self
    where
        F: Fn(&mut Node) + Send + Sync + 'static,
    {
        self.entry(rule).finalise = Some(Arc::new(hook));
        self
    }

    /// Replace the default store for sub-results keyed `key` (the tag, or
    /// the callee's name for untagged rule calls)
    pub fn store<F>(mut self, rule: &str, key: &str, hook: F) -> Self
    where
        F: Fn(&mut Node, Node) + Send + Sync + 'static,
    {
        self.entry(rule).store.insert(key.to_string(), Arc::new(hook));
        self
    }

    /// Replace the default store for every sub-result of `rule`
    pub fn store_any<F>(mut self, rule: &str, hook: F) -> Self
    where
        F: Fn(&mut Node, Node) + Send + Sync + 'static,
    {
        self.entry(rule).store_any = Some(Arc::new(hook));
        self
    }

    /// Answer `$name` lookups on records produced by `rule`
    pub fn accessor<F>(mut self, rule: &str, name: &str, hook: F) -> Self
    where
        F: Fn(&Node) -> Option<String> + Send + Sync + 'static,
    {
        self.entry(rule)
            .accessors
            .insert(name.to_string(), Arc::new(hook));
        self
    }

    /// Resolve the hooks for a rule with the given typestack
    pub fn resolve(&self, typestack: &[String]) -> RuleHooks {
        let mut resolved = RuleHooks::default();
        let types: Vec<&TypeHooks> = typestack
            .iter()
            .filter_map(|name| self.types.get(name))
            .collect();

        resolved.construct = types.iter().find_map(|t| t.construct.clone());
        resolved.finalise = types.iter().find_map(|t| t.finalise.clone());

        for t in &types {
            for (key, hook) in &t.store {
                resolved
                    .store
                    .entry(key.clone())
                    .or_insert_with(|| hook.clone());
            }
            if let Some(hook) = &t.store_any {
                resolved.store_any = Some(hook.clone());
                break;
            }
        }

        for t in &types {
            for (name, hook) in &t.accessors {
                resolved
                    .accessors
                    .entry(name.clone())
                    .or_insert_with(|| hook.clone());
            }
        }
        resolved
    }

    /// Whether no hooks are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Hooks of one rule, resolved along its typestack
#[derive(Clone, Default)]
pub struct RuleHooks {
    /// Runs on every new record of the rule
    pub construct: Option<NodeHook>,
    /// Runs on the rule's result when it matches
    pub finalise: Option<NodeHook>,
    /// Store overrides by key
    pub store: HashMap<String, StoreHook>,
    /// Store fallback for keys without a specific override
    pub store_any: Option<StoreHook>,
    /// Semantic-value accessors by name
    pub accessors: HashMap<String, AccessorHook>,
}

impl RuleHooks {
    /// The store override for `key`, if any
    pub fn store_for(&self, key: &str) -> Option<&StoreHook> {
        self.store.get(key).or(self.store_any.as_ref())
    }
}

impl std::fmt::Debug for RuleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleHooks")
            .field("construct", &self.construct.is_some())
            .field("finalise", &self.finalise.is_some())
            .field("store", &self.store.keys().collect::<Vec<_>>())
            .field("store_any", &self.store_any.is_some())
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .finish()
    }
}
