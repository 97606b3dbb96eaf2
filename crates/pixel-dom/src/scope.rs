//! Identifier resolution across the scope chain.
//!
//! Lookup order is fixed: global store (through the component's declared
//! key allowlist), then props, then state. A name present in several
//! scopes resolves by this priority, never by merging. This is distinct
//! from the dotted-path resolver in `pixel-core`; the two are never
//! combined.

use serde_json::{json, Value};

use pixel_core::Store;

use crate::node::{NodeId, VTree};

/// Borrowed resolution context: the tree, the global store, and the
/// nearest enclosing component instance (if any).
#[derive(Clone, Copy)]
pub struct ScopeRef<'a> {
    tree: &'a VTree,
    store: &'a Store,
    scope: Option<NodeId>,
}

impl<'a> ScopeRef<'a> {
    pub fn new(tree: &'a VTree, store: &'a Store, scope: Option<NodeId>) -> Self {
        Self { tree, store, scope }
    }

    /// Resolves a flat identifier through the scope chain. `None` means
    /// unresolved; callers render that as empty content.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        let id = self.scope?;
        let instance = self.tree.get(id).component.as_ref()?;

        if instance.store_keys.contains(name) {
            return self.store.get(name).cloned();
        }
        if let Some(value) = instance.props.get(name) {
            return Some(value.clone());
        }
        instance.state.get(name).cloned()
    }

    /// The object dotted paths run against: `{"props": .., "state": ..}`
    /// of the scope component, or null outside any component.
    pub fn as_value(&self) -> Value {
        let Some(id) = self.scope else {
            return Value::Null;
        };
        match self.tree.get(id).component.as_ref() {
            Some(instance) => json!({
                "props": &instance.props,
                "state": &instance.state,
            }),
            None => Value::Null,
        }
    }
}
