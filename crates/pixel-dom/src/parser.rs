//! Tree assembly.
//!
//! One pass walks the tag stream and drives everything else: a stack of
//! open nodes enforces nesting, component tags recurse into their own
//! templates, loop directives splice one instance per collection element,
//! and free text between tags goes through the interpolator. Nodes are
//! mounted bottom-up, always before they are linked into their parent.

use serde_json::{Map, Value};

use pixel_core::Store;

use crate::dom::DomBackend;
use crate::engine::CompileConfig;
use crate::error::{CompileError, CompileResult, Diagnostic};
use crate::node::{ComponentInstance, ComponentModel, MethodScope, NodeId, NodeKind, VTree};
use crate::registry::{ComponentRegistry, EmojiTable};
use crate::scope::ScopeRef;
use crate::tag::{parse_tag, PREFIX_LOOP};
use crate::text::{Interpolator, TextSegment};
use crate::tokenizer::{TagKind, TagToken, Tokenizer};

pub struct Assembler<'a, D: DomBackend> {
    registry: &'a mut ComponentRegistry,
    emoji: &'a EmojiTable,
    store: &'a Store,
    config: &'a CompileConfig,
    dom: &'a mut D,
    tokenizer: Tokenizer,
    interpolator: Interpolator,
    tree: VTree,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

impl<'a, D: DomBackend> Assembler<'a, D> {
    pub fn new(
        registry: &'a mut ComponentRegistry,
        emoji: &'a EmojiTable,
        store: &'a Store,
        config: &'a CompileConfig,
        dom: &'a mut D,
    ) -> Self {
        Self {
            registry,
            emoji,
            store,
            config,
            dom,
            tokenizer: Tokenizer::new(),
            interpolator: Interpolator::new(),
            tree: VTree::new(),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    /// Compiles a whole template and returns the finished tree, its root,
    /// and the diagnostics gathered along the way.
    pub fn compile(mut self, template: &str) -> CompileResult<(VTree, NodeId, Vec<Diagnostic>)> {
        let root = self.parse_fragment(template, None)?;
        Ok((self.tree, root, self.diagnostics))
    }

    fn parse_fragment(&mut self, template: &str, parent: Option<NodeId>) -> CompileResult<NodeId> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(CompileError::DepthExceeded(self.config.max_depth));
        }
        let result = self.run_fragment(template, parent);
        self.depth -= 1;
        result
    }

    fn run_fragment(&mut self, template: &str, parent: Option<NodeId>) -> CompileResult<NodeId> {
        let mut stack: Vec<NodeId> = Vec::new();
        if let Some(parent) = parent {
            stack.push(parent);
        }
        // The fragment's parenting context is also its resolution scope.
        let scope = parent;

        let mut pos = 0usize;
        let mut matched = false;

        while let Some(token) = self.tokenizer.next_tag(template, pos) {
            pos = token.end;
            matched = true;

            match token.kind {
                TagKind::Component => {
                    let nodes = self.enter_component(&token, scope)?;
                    if let Some(&top) = stack.last() {
                        for id in nodes {
                            self.tree.attach(top, id);
                        }
                    } else {
                        stack.extend(nodes);
                    }
                }
                TagKind::Void => {
                    if stack.is_empty() && self.config.strict {
                        return Err(CompileError::VoidWithoutParent(token.text.to_string()));
                    }
                    let scope_ref = ScopeRef::new(&self.tree, self.store, scope);
                    let parsed =
                        parse_tag(token.text, &[], &scope_ref, None, &mut self.diagnostics);
                    let id =
                        self.tree
                            .create_element(parsed.tag_name, parsed.attrs, parsed.events);
                    self.mount(id);
                    if let Some(&top) = stack.last() {
                        self.tree.attach(top, id);
                    } else {
                        self.diagnostics.push(Diagnostic::warn(
                            "void_without_parent",
                            format!(
                                "void element {} has no enclosing open tag; kept as a root",
                                token.text
                            ),
                        ));
                        stack.push(id);
                    }
                }
                TagKind::Close => {
                    let closed = stack
                        .pop()
                        .ok_or_else(|| CompileError::UnbalancedTag(token.text.to_string()))?;
                    // A completed root is already mounted; closing it again
                    // means the template had an extra closing tag.
                    if self.tree.get(closed).handle.is_some() {
                        return Err(CompileError::UnbalancedTag(token.text.to_string()));
                    }
                    self.mount(closed);
                    if let Some(&top) = stack.last() {
                        self.tree.attach(top, closed);
                    } else {
                        stack.push(closed);
                    }
                }
                TagKind::Open => {
                    let scope_ref = ScopeRef::new(&self.tree, self.store, scope);
                    let parsed =
                        parse_tag(token.text, &[], &scope_ref, None, &mut self.diagnostics);
                    let id =
                        self.tree
                            .create_element(parsed.tag_name, parsed.attrs, parsed.events);

                    // A text run directly after the opening tag belongs to
                    // this element.
                    let rest = &template[token.end..];
                    if !rest.is_empty() && !rest.starts_with('<') {
                        let run = match rest.find('<') {
                            Some(idx) => &rest[..idx],
                            None => rest,
                        };
                        self.text_run(run.trim(), scope, id);
                    }
                    stack.push(id);
                }
            }
        }

        if !matched {
            let trimmed = template.trim();
            if is_bare_placeholder(trimmed) {
                // A template that is nothing but one interpolation becomes
                // a bare text node on its parenting context.
                let Some(parent) = parent else {
                    return Err(CompileError::EmptyTemplate(
                        "bare interpolation without a parent context".into(),
                    ));
                };
                self.text_run(trimmed, scope, parent);
                return Ok(parent);
            }
            // An inner fragment with nothing compilable (an empty component
            // body, or free text with no enclosing tag) keeps its parenting
            // context and produces no children.
            if let Some(parent) = parent {
                return Ok(parent);
            }
            return Err(CompileError::EmptyTemplate(
                "no tags or interpolation found".into(),
            ));
        }

        if stack.len() > 1 {
            let open = self.tree.get(stack[stack.len() - 1]).tag_name.clone();
            return Err(CompileError::UnbalancedTag(format!("<{open}> never closed")));
        }
        let root = stack.pop().ok_or_else(|| {
            CompileError::EmptyTemplate("template produced no root node".into())
        })?;
        // At the top level the root must have completed (and therefore
        // mounted); a bare singleton left from an unclosed open tag is an
        // unterminated template. Inner fragments return their parenting
        // context, which the caller mounts.
        if parent.is_none() && self.tree.get(root).handle.is_none() {
            let open = self.tree.get(root).tag_name.clone();
            return Err(CompileError::UnbalancedTag(format!("<{open}> never closed")));
        }
        Ok(root)
    }

    /// Handles one component tag: registry lookup, instantiation, and
    /// either a single instance or a loop expansion. Returned nodes are
    /// mounted and ready to be linked by the caller.
    fn enter_component(
        &mut self,
        token: &TagToken<'_>,
        scope: Option<NodeId>,
    ) -> CompileResult<Vec<NodeId>> {
        let name = self.tokenizer.tag_name(token.text).to_string();
        let factory = self
            .registry
            .lookup(&name)
            .ok_or_else(|| CompileError::UnknownComponent(name.clone()))?;
        let model = factory();
        if !model.components.is_empty() {
            self.registry.register_all(&model.components);
        }

        if let Some(source) = loop_source(token.text) {
            return self.expand_loop(token, &name, &model, &source, scope);
        }

        let id = self.instantiate(token.text, &name, &model, None, scope)?;
        self.mount(id);
        self.run_mount_hook(id);
        Ok(vec![id])
    }

    /// Builds one component instance: parses the declared root tag against
    /// the invocation tag, compiles the inner template with the new node
    /// as parenting context.
    fn instantiate(
        &mut self,
        origin: &str,
        name: &str,
        model: &ComponentModel,
        element_props: Option<&Map<String, Value>>,
        scope: Option<NodeId>,
    ) -> CompileResult<NodeId> {
        let (root_tag, inner) = self.split_template(name, &model.template)?;

        let scope_ref = ScopeRef::new(&self.tree, self.store, scope);
        let mut parsed = parse_tag(
            &root_tag,
            &model.used_props,
            &scope_ref,
            Some(origin),
            &mut self.diagnostics,
        );
        if let Some(element_props) = element_props {
            for (key, value) in element_props {
                parsed.props.insert(key.clone(), value.clone());
            }
        }

        let instance = ComponentInstance {
            name: name.to_string(),
            props: parsed.props,
            state: model.state.clone(),
            used_props: parsed.used_props,
            methods: model.methods.clone(),
            store_keys: model.store_keys.iter().cloned().collect(),
            template: inner.clone(),
            on_mount: model.on_mount,
        };
        let id = self
            .tree
            .create_component(parsed.tag_name, parsed.attrs, parsed.events, instance);
        self.parse_fragment(&inner, Some(id))?;
        Ok(id)
    }

    /// Expands `loop:source` into one instance per collection element, in
    /// collection order. An unresolved or non-list source expands to
    /// nothing and leaves a diagnostic.
    fn expand_loop(
        &mut self,
        token: &TagToken<'_>,
        name: &str,
        model: &ComponentModel,
        source: &str,
        scope: Option<NodeId>,
    ) -> CompileResult<Vec<NodeId>> {
        let scope_ref = ScopeRef::new(&self.tree, self.store, scope);
        let Some(resolved) = scope_ref.resolve(source) else {
            self.diagnostics.push(Diagnostic::warn(
                "loop_source_unresolved",
                format!("loop source '{source}' did not resolve; expanded to nothing"),
            ));
            return Ok(Vec::new());
        };
        let Value::Array(items) = resolved else {
            self.diagnostics.push(Diagnostic::warn(
                "loop_source_not_a_list",
                format!("loop source '{source}' is not a list; expanded to nothing"),
            ));
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            // Element fields override the statically parsed bindings.
            let element_props = item.as_object().cloned().unwrap_or_default();
            let id = self.instantiate(token.text, name, model, Some(&element_props), scope)?;
            self.mount(id);
            self.run_mount_hook(id);
            out.push(id);
        }
        Ok(out)
    }

    /// Splits a component template into its declared root tag and the
    /// inner template between the root's opening and closing tags.
    fn split_template(&self, name: &str, template: &str) -> CompileResult<(String, String)> {
        let trimmed = template.trim();
        let first = self.tokenizer.next_tag(trimmed, 0).ok_or_else(|| {
            CompileError::EmptyTemplate(format!("component '{name}' has no markup"))
        })?;

        let mut last = first.clone();
        let mut pos = first.end;
        while let Some(tag) = self.tokenizer.next_tag(trimmed, pos) {
            pos = tag.end;
            last = tag;
        }

        let inner = if last.start <= first.end {
            String::new()
        } else {
            trimmed[first.end..last.start].to_string()
        };
        Ok((first.text.to_string(), inner))
    }

    /// Runs the interpolator over one text run and links the resulting
    /// nodes under `target` in order.
    fn text_run(&mut self, text: &str, scope: Option<NodeId>, target: NodeId) {
        if text.is_empty() {
            return;
        }
        let scope_ref = ScopeRef::new(&self.tree, self.store, scope);
        let segments = self
            .interpolator
            .segments(text, |name| scope_ref.resolve(name), self.emoji);

        for segment in segments {
            match segment {
                TextSegment::Static(text) => {
                    let id = self.tree.create_text(text, None);
                    self.mount(id);
                    self.tree.attach(target, id);
                }
                TextSegment::Bound { text, binding } => {
                    let id = self.tree.create_text(text, Some(binding));
                    self.mount(id);
                    self.tree.attach(target, id);
                }
                TextSegment::Emoji { name } => {
                    let Some(markup) = self.emoji.get(&name) else {
                        continue;
                    };
                    let markup = markup.to_string();
                    let scope_ref = ScopeRef::new(&self.tree, self.store, scope);
                    let parsed =
                        parse_tag(&markup, &[], &scope_ref, None, &mut self.diagnostics);
                    let id =
                        self.tree
                            .create_element(parsed.tag_name, parsed.attrs, parsed.events);
                    self.mount(id);
                    self.tree.attach(target, id);
                }
            }
        }
    }

    /// Hands a finished node to the mount sink, at most once.
    fn mount(&mut self, id: NodeId) {
        if self.tree.get(id).handle.is_some() {
            return;
        }
        let handle = match self.tree.get(id).kind {
            NodeKind::Text => self.dom.mount_text(&self.tree, id),
            _ => self.dom.mount_element(&self.tree, id),
        };
        self.tree.get_mut(id).handle = Some(handle);
    }

    /// Runs a component's lifecycle hook once, right after its mount.
    fn run_mount_hook(&mut self, id: NodeId) {
        let Some(hook) = self
            .tree
            .get(id)
            .component
            .as_ref()
            .and_then(|instance| instance.on_mount)
        else {
            return;
        };
        let node = self.tree.get_mut(id);
        if let Some(instance) = node.component.as_mut() {
            let mut method_scope = MethodScope {
                state: &mut instance.state,
                props: &instance.props,
                event: None,
            };
            hook(&mut method_scope);
        }
    }
}

/// The collection name of a `loop:` directive, if the tag carries one.
fn loop_source(tag: &str) -> Option<String> {
    let idx = tag.find(PREFIX_LOOP)?;
    let rest = &tag[idx + PREFIX_LOOP.len()..];
    let name: String = rest
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>' && *c != '"')
        .collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Whether a trimmed template is nothing but one interpolation expression.
fn is_bare_placeholder(trimmed: &str) -> bool {
    trimmed.len() > 4 && trimmed.starts_with("{{") && trimmed.ends_with("}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_source_extraction() {
        assert_eq!(loop_source("<ListItem loop:chats />"), Some("chats".into()));
        assert_eq!(loop_source("<ListItem loop:chats/>"), Some("chats".into()));
        assert_eq!(loop_source("<ListItem loop:chats>"), Some("chats".into()));
        assert_eq!(loop_source("<ListItem />"), None);
        assert_eq!(loop_source("<ListItem loop: />"), None);
    }

    #[test]
    fn test_bare_placeholder_detection() {
        assert!(is_bare_placeholder("{{label}}"));
        assert!(!is_bare_placeholder("{{}}"));
        assert!(!is_bare_placeholder("label"));
        assert!(!is_bare_placeholder("{{a}} tail"));
    }
}
