//! Attribute sub-parser.
//!
//! Converts one raw tag into structured tag name, attributes, event
//! handlers and component props.
//!
//! Supported sugar:
//! - `p:name="expr"` -> bound attribute, resolved through the scope chain
//!   (or via dotted paths when the value embeds `{{ ... }}` placeholders)
//! - `s:name="value"` -> static value
//! - `e:event="ref"` -> event binding; `ref` is a component method name or
//!   a `props.*` path
//! - `name="value"` -> static attribute
//! - `p:for="prop"` -> label `for` binding; always resolves through the
//!   scope chain regardless of the declared-props filter
//! - `loop:source` -> directive for the assembler, not an attribute
//!
//! When the component's invocation tag is supplied alongside its declared
//! root tag, the invocation attributes are collected into the instance
//! props first and the root tag's bindings resolve against those props.

use serde_json::{Map, Value};
use std::collections::HashMap;

use pixel_core::{display_string, resolve_path, truthy};

use crate::error::Diagnostic;
use crate::node::HandlerRef;
use crate::scope::ScopeRef;

pub const PREFIX_PROP: &str = "p:";
pub const PREFIX_STATIC: &str = "s:";
pub const PREFIX_EVENT: &str = "e:";
pub const PREFIX_LOOP: &str = "loop:";

#[derive(Debug, Clone, Default)]
pub struct ParsedTag {
    pub tag_name: String,
    pub attrs: Map<String, Value>,
    pub events: HashMap<String, HandlerRef>,
    /// Component inputs collected from the invocation tag.
    pub props: Map<String, Value>,
    /// Prop names the tag actually consumed through `p:` bindings.
    pub used_props: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawAttr {
    name: String,
    value: Option<String>,
}

/// Parses one raw tag. `declared_props` filters `p:` bindings on component
/// root tags; `origin` is the component's invocation tag, when there is
/// one. Recoverable resolution misses are reported through `diagnostics`.
pub fn parse_tag(
    raw: &str,
    declared_props: &[String],
    scope: &ScopeRef<'_>,
    origin: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> ParsedTag {
    let (tag_name, attrs_text) = split_tag(raw);
    let mut parsed = ParsedTag {
        tag_name: tag_name.to_string(),
        ..Default::default()
    };

    if let Some(origin) = origin {
        collect_props(origin, scope, &mut parsed, diagnostics);
    }

    let dotted_root = if origin.is_some() {
        // Root-tag placeholders look into the instance being built.
        serde_json::json!({ "props": &parsed.props })
    } else {
        scope.as_value()
    };

    for attr in scan_attrs(attrs_text) {
        let value = attr.value.unwrap_or_default();
        if let Some(name) = attr.name.strip_prefix(PREFIX_PROP) {
            let resolved = resolve_binding_value(
                &value,
                name,
                declared_props,
                &parsed.props,
                origin.is_some(),
                scope,
                &dotted_root,
            );
            match resolved {
                Some(resolved) => {
                    if declared_props.iter().any(|p| p == &value) {
                        parsed.used_props.push(value.clone());
                    }
                    parsed.attrs.insert(name.to_string(), resolved);
                }
                None => {
                    diagnostics.push(Diagnostic::warn(
                        "binding_unresolved",
                        format!("attribute binding '{value}' on <{tag_name}> did not resolve"),
                    ));
                    parsed.attrs.insert(name.to_string(), Value::String(String::new()));
                }
            }
        } else if let Some(name) = attr.name.strip_prefix(PREFIX_STATIC) {
            parsed.attrs.insert(name.to_string(), Value::String(value));
        } else if let Some(event) = attr.name.strip_prefix(PREFIX_EVENT) {
            parsed.events.insert(event.to_string(), HandlerRef::from_expr(&value));
        } else if attr.name.starts_with(PREFIX_LOOP) {
            // handled by the assembler
        } else {
            parsed.attrs.insert(attr.name, Value::String(value));
        }
    }

    parsed
}

/// Collects the invocation tag's attributes into the component's props and
/// handlers, resolving bound values against the enclosing scope.
fn collect_props(
    origin: &str,
    scope: &ScopeRef<'_>,
    parsed: &mut ParsedTag,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (origin_name, origin_attrs) = split_tag(origin);
    let dotted_root = scope.as_value();

    for attr in scan_attrs(origin_attrs) {
        let value = attr.value.unwrap_or_default();
        if let Some(name) = attr.name.strip_prefix(PREFIX_PROP) {
            let resolved = if value.contains("{{") {
                Some(Value::String(substitute_paths(&value, &dotted_root)))
            } else {
                scope.resolve(&value)
            };
            match resolved {
                Some(resolved) => {
                    parsed.props.insert(name.to_string(), resolved);
                }
                None => {
                    diagnostics.push(Diagnostic::warn(
                        "binding_unresolved",
                        format!("prop binding '{value}' on <{origin_name}> did not resolve"),
                    ));
                    parsed.props.insert(name.to_string(), Value::String(String::new()));
                }
            }
        } else if let Some(name) = attr.name.strip_prefix(PREFIX_STATIC) {
            parsed.props.insert(name.to_string(), Value::String(value));
        } else if let Some(event) = attr.name.strip_prefix(PREFIX_EVENT) {
            parsed.events.insert(event.to_string(), HandlerRef::from_expr(&value));
        } else if attr.name.starts_with(PREFIX_LOOP) {
            // directive, not a prop
        } else {
            parsed.props.insert(attr.name, Value::String(value));
        }
    }
}

/// Resolution for one `p:` binding on the main tag: fresh instance props
/// (filtered by the declaration) first, then the scope chain. The label
/// `for` binding skips the filter.
#[allow(clippy::too_many_arguments)]
fn resolve_binding_value(
    expr: &str,
    attr_name: &str,
    declared_props: &[String],
    own_props: &Map<String, Value>,
    has_origin: bool,
    scope: &ScopeRef<'_>,
    dotted_root: &Value,
) -> Option<Value> {
    if expr.contains("{{") {
        return Some(Value::String(substitute_paths(expr, dotted_root)));
    }
    if has_origin && attr_name != "for" {
        let declared = declared_props.is_empty() || declared_props.iter().any(|p| p == expr);
        if declared {
            if let Some(value) = own_props.get(expr) {
                return Some(value.clone());
            }
        }
    } else if has_origin {
        // `for` reaches into the instance props without the filter.
        if let Some(value) = own_props.get(expr) {
            return Some(value.clone());
        }
    }
    scope.resolve(expr)
}

/// Replaces every `{{ path }}` span in a value with its dotted-path
/// resolution against `root`; misses and falsy values become empty.
fn substitute_paths(expr: &str, root: &Value) -> String {
    let mut out = String::new();
    let mut rest = expr;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let path = after[..end].trim();
        if let Some(value) = resolve_path(root, path) {
            if truthy(&value) {
                out.push_str(&display_string(&value));
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Splits a raw tag into its name and attribute text, dropping the angle
/// brackets and any trailing slash.
fn split_tag(raw: &str) -> (&str, &str) {
    let inner = raw
        .trim()
        .trim_start_matches('<')
        .trim_start_matches('/');
    let inner = inner.strip_suffix('>').unwrap_or(inner).trim();
    let inner = match inner.strip_suffix('/') {
        Some(stripped) => stripped.trim_end(),
        None => inner,
    };
    match inner.find(char::is_whitespace) {
        Some(idx) => (&inner[..idx], inner[idx..].trim_start()),
        None => (inner, ""),
    }
}

/// Byte-cursor attribute scanner: `name`, `name=value`, `name="value"`,
/// `name='value'`.
fn scan_attrs(input: &str) -> Vec<RawAttr> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        if i == name_start {
            i += 1;
            continue;
        }
        let name = input[name_start..i].to_string();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        if i >= bytes.len() || bytes[i] != b'=' {
            out.push(RawAttr { name, value: None });
            continue;
        }

        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        if i >= bytes.len() {
            out.push(RawAttr {
                name,
                value: Some(String::new()),
            });
            break;
        }

        let value = if bytes[i] == b'"' || bytes[i] == b'\'' {
            let quote = bytes[i];
            i += 1;
            let value_start = i;
            while i < bytes.len() && bytes[i] != quote {
                i += 1;
            }
            let value = input[value_start..i].to_string();
            if i < bytes.len() {
                i += 1;
            }
            value
        } else {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            input[value_start..i].to_string()
        };

        out.push(RawAttr {
            name,
            value: Some(value),
        });
    }

    out
}
