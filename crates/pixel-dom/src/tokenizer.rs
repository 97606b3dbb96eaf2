//! Tag scanner and classifier.
//!
//! The template grammar is deliberately pattern-matched, not parsed: a
//! single tag-shaped regex finds the next tag at or after a byte offset,
//! and free text is recovered by the caller from the gap between matches.
//! Scanning is left to right and never backtracks across consumed input.

use regex::Regex;

/// How a matched tag participates in tree assembly. Component detection
/// runs first: component tags may carry a trailing slash when used as loop
/// directives, so checking the void shape earlier would misclassify them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Component,
    Void,
    Close,
    Open,
}

/// One tag-shaped match with its offsets in the scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'t> {
    pub text: &'t str,
    pub start: usize,
    pub end: usize,
    pub kind: TagKind,
}

#[derive(Debug)]
pub struct Tokenizer {
    tag_re: Regex,
    name_re: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            // Quoted attribute values may contain `>`, so the tag body is
            // matched as quoted runs or single non-closing characters.
            tag_re: Regex::new(r#"<[a-zA-Z0-9!/-](?:"[^"]*"|'[^']*'|[^'">])*>"#)
                .expect("tag pattern is a valid regex"),
            name_re: Regex::new(r"^</?([^\s/>]+)").expect("tag name pattern is a valid regex"),
        }
    }

    /// Returns the next tag at or after `from`, or `None` when the rest of
    /// the template contains no tag-shaped substring.
    pub fn next_tag<'t>(&self, template: &'t str, from: usize) -> Option<TagToken<'t>> {
        if from > template.len() {
            return None;
        }
        let matched = self.tag_re.find_at(template, from)?;
        let text = matched.as_str();
        Some(TagToken {
            text,
            start: matched.start(),
            end: matched.end(),
            kind: classify(text),
        })
    }

    /// Extracts the tag name from a matched tag.
    pub fn tag_name<'t>(&self, tag: &'t str) -> &'t str {
        self.name_re
            .captures(tag)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or("")
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies one matched tag. Priority order matters; see [`TagKind`].
pub fn classify(tag: &str) -> TagKind {
    if is_component(tag) {
        return TagKind::Component;
    }
    if is_void(tag) {
        return TagKind::Void;
    }
    if tag.as_bytes().get(1) == Some(&b'/') {
        return TagKind::Close;
    }
    TagKind::Open
}

/// A component reference starts with an uppercase letter or one of the
/// marker characters, after `<` or `</`.
fn is_component(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    let mut idx = 1;
    if bytes.get(idx) == Some(&b'/') {
        idx += 1;
    }
    match bytes.get(idx) {
        Some(b) => b.is_ascii_uppercase() || *b == b'-' || *b == b'!',
        None => false,
    }
}

/// Void shape: the character immediately before the closing `>` is `/`.
fn is_void(tag: &str) -> bool {
    let bytes = tag.as_bytes();
    bytes.len() >= 2 && bytes[bytes.len() - 2] == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_is_lazy_and_offset_driven() {
        let tokenizer = Tokenizer::new();
        let template = "<div>hello<span>world</span></div>";

        let first = tokenizer.next_tag(template, 0).expect("first tag");
        assert_eq!(first.text, "<div>");
        assert_eq!(first.start, 0);
        assert_eq!(first.end, 5);

        let second = tokenizer.next_tag(template, first.end).expect("second tag");
        assert_eq!(second.text, "<span>");
        assert_eq!(second.start, 10);

        assert!(tokenizer.next_tag(template, template.len()).is_none());
    }

    #[test]
    fn test_no_tags_yields_nothing() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.next_tag("{{greeting}}", 0).is_none());
        assert!(tokenizer.next_tag("plain text", 0).is_none());
    }

    #[test]
    fn test_quoted_gt_stays_inside_tag() {
        let tokenizer = Tokenizer::new();
        let template = r#"<div title="a > b">x</div>"#;
        let tag = tokenizer.next_tag(template, 0).expect("tag");
        assert_eq!(tag.text, r#"<div title="a > b">"#);
    }

    #[test]
    fn test_classify_priority() {
        // Component detection wins over the void shape.
        assert_eq!(classify("<ListItem loop:chats />"), TagKind::Component);
        assert_eq!(classify("</SearchInput>"), TagKind::Component);
        assert_eq!(classify(r#"<input class="x"/>"#), TagKind::Void);
        assert_eq!(classify("</div>"), TagKind::Close);
        assert_eq!(classify("<div>"), TagKind::Open);
    }

    #[test]
    fn test_marker_characters_classify_as_component() {
        assert_eq!(classify("<!DOCTYPE html>"), TagKind::Component);
        assert_eq!(classify("<-marker>"), TagKind::Component);
    }

    #[test]
    fn test_tag_name_extraction() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tag_name("<div class=\"a\">"), "div");
        assert_eq!(tokenizer.tag_name("</div>"), "div");
        assert_eq!(tokenizer.tag_name("<ListItem loop:chats />"), "ListItem");
        assert_eq!(tokenizer.tag_name("<br/>"), "br");
    }

    #[test]
    fn test_multiline_tag_matches() {
        let tokenizer = Tokenizer::new();
        let template = "<button\n  p:type=\"kind\"\n  e:click=\"props.on_click\">{{label}}</button>";
        let tag = tokenizer.next_tag(template, 0).expect("tag");
        assert!(tag.text.starts_with("<button"));
        assert!(tag.text.ends_with('>'));
        assert_eq!(tag.kind, TagKind::Open);
    }
}
