//! Virtual node tree.
//!
//! Nodes live in an arena owned by [`VTree`] and reference each other by
//! [`NodeId`]; the `parent` link is a plain non-owning id. Creation methods
//! never link; [`VTree::attach`] performs parent/child linking separately,
//! so the assembler controls document order explicitly.

use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use crate::dom::MountHandle;

pub type NodeId = usize;

/// Sentinel tag name carried by text nodes.
pub const TEXT_TAG: &str = "#text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Component,
}

/// A named event-handler reference. Dispatch happens in the embedding
/// application; the compiler only records what the template bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerRef {
    /// A method of the owning component, by name.
    Method(String),
    /// A `props.*` path handed down by the instantiating parent.
    Prop(String),
}

impl HandlerRef {
    pub fn from_expr(expr: &str) -> Self {
        if expr.starts_with("props.") {
            Self::Prop(expr.to_string())
        } else {
            Self::Method(expr.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventContext {
    pub value: Value,
    pub key: Value,
    pub prevent: bool,
}

impl Default for EventContext {
    fn default() -> Self {
        Self {
            value: Value::Null,
            key: Value::Null,
            prevent: false,
        }
    }
}

/// What a component method sees when invoked: its own mutable state, its
/// read-only props, and the triggering event if any.
pub struct MethodScope<'a> {
    pub state: &'a mut Map<String, Value>,
    pub props: &'a Map<String, Value>,
    pub event: Option<&'a EventContext>,
}

pub type Method = fn(&mut MethodScope);

pub type ComponentFactory = fn() -> ComponentModel;

/// A component declaration as returned by its factory.
#[derive(Clone, Default)]
pub struct ComponentModel {
    /// The component's markup. The first and last tags form the declared
    /// root element; everything between them is the inner template.
    pub template: String,
    /// Inline sub-component declarations, registered when the component is
    /// first instantiated.
    pub components: Vec<(String, ComponentFactory)>,
    pub state: Map<String, Value>,
    /// Prop names the component consumes; when non-empty, bindings on the
    /// root tag are filtered down to this set.
    pub used_props: Vec<String>,
    pub methods: HashMap<String, Method>,
    /// Global-store keys this component may read.
    pub store_keys: Vec<String>,
    /// Lifecycle hook, run once after the instance is mounted.
    pub on_mount: Option<Method>,
}

// Method tables hold fn pointers with borrowed arguments, which the std
// Debug impls do not cover; render them by name instead.
impl std::fmt::Debug for ComponentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentModel")
            .field("template", &self.template)
            .field(
                "components",
                &self.components.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("state", &self.state)
            .field("used_props", &self.used_props)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("store_keys", &self.store_keys)
            .field("on_mount", &self.on_mount.is_some())
            .finish()
    }
}

/// A live component instance inside the tree. Props are fixed at creation;
/// only state may mutate afterwards.
#[derive(Clone)]
pub struct ComponentInstance {
    pub name: String,
    pub props: Map<String, Value>,
    pub state: Map<String, Value>,
    pub used_props: Vec<String>,
    pub methods: HashMap<String, Method>,
    pub store_keys: HashSet<String>,
    /// The inner template, with the declared root tag already stripped.
    pub template: String,
    pub on_mount: Option<Method>,
}

impl std::fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("name", &self.name)
            .field("props", &self.props)
            .field("state", &self.state)
            .field("used_props", &self.used_props)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("store_keys", &self.store_keys)
            .field("template", &self.template)
            .field("on_mount", &self.on_mount.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct VNode {
    pub kind: NodeKind,
    pub tag_name: String,
    pub attrs: Map<String, Value>,
    pub events: HashMap<String, HandlerRef>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Set exactly once, when the mount sink accepts the node.
    pub handle: Option<MountHandle>,
    pub text: Option<String>,
    /// For bound text nodes: the source expression the text came from.
    pub binding: Option<String>,
    pub component: Option<ComponentInstance>,
}

impl VNode {
    pub fn is_component(&self) -> bool {
        self.kind == NodeKind::Component
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }
}

#[derive(Debug, Default)]
pub struct VTree {
    nodes: Vec<VNode>,
}

impl VTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: VNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    pub fn create_element(
        &mut self,
        tag_name: impl Into<String>,
        attrs: Map<String, Value>,
        events: HashMap<String, HandlerRef>,
    ) -> NodeId {
        self.push(VNode {
            kind: NodeKind::Element,
            tag_name: tag_name.into(),
            attrs,
            events,
            children: Vec::new(),
            parent: None,
            handle: None,
            text: None,
            binding: None,
            component: None,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>, binding: Option<String>) -> NodeId {
        self.push(VNode {
            kind: NodeKind::Text,
            tag_name: TEXT_TAG.to_string(),
            attrs: Map::new(),
            events: HashMap::new(),
            children: Vec::new(),
            parent: None,
            handle: None,
            text: Some(text.into()),
            binding,
            component: None,
        })
    }

    pub fn create_component(
        &mut self,
        tag_name: impl Into<String>,
        attrs: Map<String, Value>,
        events: HashMap<String, HandlerRef>,
        instance: ComponentInstance,
    ) -> NodeId {
        self.push(VNode {
            kind: NodeKind::Component,
            tag_name: tag_name.into(),
            attrs,
            events,
            children: Vec::new(),
            parent: None,
            handle: None,
            text: None,
            binding: None,
            component: Some(instance),
        })
    }

    /// Links `child` under `parent`, appending in document order.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    pub fn get(&self, id: NodeId) -> &VNode {
        &self.nodes[id]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut VNode {
        &mut self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
