use serde_json::Value;

/// Strips a `{{ ... }}` wrapper from a placeholder span and trims the
/// inner expression. Returns `None` when the span is not a placeholder.
pub fn strip_placeholder(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix("{{")?.strip_suffix("}}")?;
    Some(inner.trim())
}

/// Resolves a dotted path (`a.b.c`) against a supplied value, descending
/// through objects by key and arrays by numeric index. Any missing
/// intermediate yields `None`; callers render that as empty content.
///
/// This resolver never consults the scope chain. Identifier lookup across
/// store/props/state is a separate operation with a different trust model.
pub fn resolve_path(root: &Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return Some(root.clone());
    }
    let mut current = root;
    for part in path.split('.') {
        match current {
            Value::Object(obj) => current = obj.get(part)?,
            Value::Array(arr) => {
                let idx = part.parse::<usize>().ok()?;
                current = arr.get(idx)?;
            }
            _ => return None,
        }
    }
    Some(current.clone())
}
