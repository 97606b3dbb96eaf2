//! Text and emoji interpolation.
//!
//! A text run is split into renderable segments: the first `{{ expr }}`
//! placeholder is resolved through the scope chain, and the resolved value
//! is scanned for `:shortcode:` emoji. Only shortcodes present in the
//! table split the run; unknown ones stay literal text.

use regex::Regex;
use serde_json::Value;

use pixel_core::{display_string, strip_placeholder, truthy};

use crate::registry::EmojiTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    /// Literal text with no live binding behind it.
    Static(String),
    /// Substituted text that remembers which expression produced it.
    Bound { text: String, binding: String },
    /// An emoji shortcode to be rendered from its registered markup.
    Emoji { name: String },
}

#[derive(Debug)]
pub struct Interpolator {
    placeholder_re: Regex,
    shortcode_re: Regex,
}

impl Interpolator {
    pub fn new() -> Self {
        Self {
            placeholder_re: Regex::new(r"\{\{([^{}]*)\}\}")
                .expect("placeholder pattern is a valid regex"),
            shortcode_re: Regex::new(r":([A-Za-z0-9_+-]+):")
                .expect("shortcode pattern is a valid regex"),
        }
    }

    /// Splits one text run into segments. Runs that are empty after
    /// trimming produce no segments at all.
    pub fn segments(
        &self,
        text: &str,
        resolve: impl Fn(&str) -> Option<Value>,
        emoji: &EmojiTable,
    ) -> Vec<TextSegment> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let Some(placeholder) = self.placeholder_re.find(text) else {
            return vec![TextSegment::Static(text.to_string())];
        };
        let expr = strip_placeholder(placeholder.as_str())
            .unwrap_or_default()
            .to_string();

        let resolved = match resolve(&expr) {
            Some(value) if truthy(&value) => display_string(&value),
            _ => String::new(),
        };

        let mut segments = Vec::new();
        let mut cursor = 0usize;
        let mut split_on_emoji = false;
        for matched in self.shortcode_re.find_iter(&resolved) {
            let name = &resolved[matched.start() + 1..matched.end() - 1];
            if !emoji.has(name) {
                continue;
            }
            if !split_on_emoji {
                split_on_emoji = true;
                // literal prefix of the run, before the placeholder
                if placeholder.start() > 0 {
                    segments.push(TextSegment::Static(text[..placeholder.start()].to_string()));
                }
            }
            if matched.start() > cursor {
                segments.push(TextSegment::Static(resolved[cursor..matched.start()].to_string()));
            }
            segments.push(TextSegment::Emoji {
                name: name.to_string(),
            });
            cursor = matched.end();
        }

        if split_on_emoji {
            if cursor < resolved.len() {
                segments.push(TextSegment::Static(resolved[cursor..].to_string()));
            }
            if placeholder.end() < text.len() {
                segments.push(TextSegment::Static(text[placeholder.end()..].to_string()));
            }
            return segments;
        }

        let replaced = format!(
            "{}{}{}",
            &text[..placeholder.start()],
            resolved,
            &text[placeholder.end()..]
        );
        vec![TextSegment::Bound {
            text: replaced,
            binding: expr,
        }]
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver<'a>(pairs: &'a [(&'a str, Value)]) -> impl Fn(&str) -> Option<Value> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        }
    }

    #[test]
    fn test_interpolation_round_trip() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments(
            "Hello {{name}}!",
            resolver(&[("name", json!("World"))]),
            &emoji,
        );
        assert_eq!(
            segments,
            vec![TextSegment::Bound {
                text: "Hello World!".into(),
                binding: "name".into()
            }]
        );
    }

    #[test]
    fn test_no_placeholder_is_static() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments("just text", resolver(&[]), &emoji);
        assert_eq!(segments, vec![TextSegment::Static("just text".into())]);
    }

    #[test]
    fn test_empty_run_produces_nothing() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        assert!(interpolator.segments("", resolver(&[]), &emoji).is_empty());
        assert!(interpolator.segments("   \n  ", resolver(&[]), &emoji).is_empty());
    }

    #[test]
    fn test_unresolved_binding_substitutes_empty() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments("Hi {{missing}}!", resolver(&[]), &emoji);
        assert_eq!(
            segments,
            vec![TextSegment::Bound {
                text: "Hi !".into(),
                binding: "missing".into()
            }]
        );
    }

    #[test]
    fn test_falsy_value_substitutes_empty() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments(
            "Count: {{count}}",
            resolver(&[("count", json!(0))]),
            &emoji,
        );
        assert_eq!(
            segments,
            vec![TextSegment::Bound {
                text: "Count: ".into(),
                binding: "count".into()
            }]
        );
    }

    #[test]
    fn test_emoji_splitting_five_segments() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments(
            "{{message}}",
            resolver(&[("message", json!("A :smile: B :smile: C"))]),
            &emoji,
        );
        assert_eq!(
            segments,
            vec![
                TextSegment::Static("A ".into()),
                TextSegment::Emoji {
                    name: "smile".into()
                },
                TextSegment::Static(" B ".into()),
                TextSegment::Emoji {
                    name: "smile".into()
                },
                TextSegment::Static(" C".into()),
            ]
        );
    }

    #[test]
    fn test_prefix_before_placeholder_kept_on_emoji_split() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments(
            "Mood: {{message}}",
            resolver(&[("message", json!(":heart:"))]),
            &emoji,
        );
        assert_eq!(
            segments,
            vec![
                TextSegment::Static("Mood: ".into()),
                TextSegment::Emoji {
                    name: "heart".into()
                },
            ]
        );
    }

    #[test]
    fn test_text_after_placeholder_kept_on_emoji_split() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments(
            "{{message}} sent",
            resolver(&[("message", json!("ok :wink:"))]),
            &emoji,
        );
        assert_eq!(
            segments,
            vec![
                TextSegment::Static("ok ".into()),
                TextSegment::Emoji {
                    name: "wink".into()
                },
                TextSegment::Static(" sent".into()),
            ]
        );
    }

    #[test]
    fn test_unknown_shortcode_stays_literal() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments(
            "{{message}}",
            resolver(&[("message", json!("see :unknown: here"))]),
            &emoji,
        );
        assert_eq!(
            segments,
            vec![TextSegment::Bound {
                text: "see :unknown: here".into(),
                binding: "message".into()
            }]
        );
    }

    #[test]
    fn test_only_first_placeholder_substitutes() {
        let interpolator = Interpolator::new();
        let emoji = EmojiTable::builtin();
        let segments = interpolator.segments(
            "{{a}} and {{b}}",
            resolver(&[("a", json!("one")), ("b", json!("two"))]),
            &emoji,
        );
        assert_eq!(
            segments,
            vec![TextSegment::Bound {
                text: "one and {{b}}".into(),
                binding: "a".into()
            }]
        );
    }
}
