//! HTML string rendering for compiled trees.
//!
//! This is a debug/snapshot surface, not a mount path: it walks the
//! finished tree and serializes it, escaping text content and attribute
//! values.

use pixel_core::display_string;

use crate::node::{NodeId, NodeKind, VTree};

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn render_html(tree: &VTree, root: NodeId) -> String {
    let mut out = String::new();
    render_node(tree, root, &mut out);
    out
}

fn render_node(tree: &VTree, id: NodeId, out: &mut String) {
    let node = tree.get(id);
    if node.kind == NodeKind::Text {
        out.push_str(&escape_html(node.text.as_deref().unwrap_or_default()));
        return;
    }

    out.push('<');
    out.push_str(&node.tag_name);
    for (name, value) in &node.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_html(&display_string(value)));
        out.push('"');
    }

    if node.children.is_empty() && VOID_TAGS.contains(&node.tag_name.as_str()) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for &child in &node.children {
        render_node(tree, child, out);
    }
    out.push_str("</");
    out.push_str(&node.tag_name);
    out.push('>');
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use std::collections::HashMap;

    #[test]
    fn test_render_nested_elements() {
        let mut tree = VTree::new();
        let mut attrs = Map::new();
        attrs.insert("class".into(), json!("wrap"));
        let root = tree.create_element("div", attrs, HashMap::new());
        let span = tree.create_element("span", Map::new(), HashMap::new());
        let text = tree.create_text("hello", None);
        tree.attach(root, span);
        tree.attach(span, text);

        assert_eq!(
            render_html(&tree, root),
            r#"<div class="wrap"><span>hello</span></div>"#
        );
    }

    #[test]
    fn test_render_void_element() {
        let mut tree = VTree::new();
        let mut attrs = Map::new();
        attrs.insert("type".into(), json!("text"));
        let input = tree.create_element("input", attrs, HashMap::new());
        assert_eq!(render_html(&tree, input), r#"<input type="text" />"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut tree = VTree::new();
        let root = tree.create_element("p", Map::new(), HashMap::new());
        let text = tree.create_text(r#"<b>&"bold"</b>"#, None);
        tree.attach(root, text);
        assert_eq!(
            render_html(&tree, root),
            "<p>&lt;b&gt;&amp;&quot;bold&quot;&lt;/b&gt;</p>"
        );
    }

    #[test]
    fn test_escape_html_table() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#"<x y="z">"#), "&lt;x y=&quot;z&quot;&gt;");
    }
}
