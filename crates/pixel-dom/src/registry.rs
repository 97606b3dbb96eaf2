//! Explicit registries consulted during a compile pass.
//!
//! Both tables are plain objects owned by the engine and passed by
//! reference into each pass; there is no process-global mutable state, so
//! independent compiles never interfere.

use std::collections::HashMap;

use crate::node::ComponentFactory;

/// Component name -> factory table. Component references in templates are
/// authored configuration, so a missing entry is a fatal compile error at
/// the call site, not here.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<ComponentFactory> {
        self.factories.get(name).copied()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: ComponentFactory,
    ) -> Option<ComponentFactory> {
        self.factories.insert(name.into(), factory)
    }

    /// Registers sub-components a factory declared inline.
    pub fn register_all(&mut self, pairs: &[(String, ComponentFactory)]) {
        for (name, factory) in pairs {
            self.factories.insert(name.clone(), *factory);
        }
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Emoji shortcode -> inline markup snippet.
#[derive(Debug, Clone)]
pub struct EmojiTable {
    entries: HashMap<String, String>,
}

impl EmojiTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The default shortcode set.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (name, markup) in [
            ("smile", r#"<img class="emoji emoji_smile" alt="smile" src="/static/emoji/smile.png"/>"#),
            ("laugh", r#"<img class="emoji emoji_laugh" alt="laugh" src="/static/emoji/laugh.png"/>"#),
            ("wink", r#"<img class="emoji emoji_wink" alt="wink" src="/static/emoji/wink.png"/>"#),
            ("heart", r#"<img class="emoji emoji_heart" alt="heart" src="/static/emoji/heart.png"/>"#),
            ("thumbsup", r#"<img class="emoji emoji_thumbsup" alt="thumbsup" src="/static/emoji/thumbsup.png"/>"#),
            ("sad", r#"<img class="emoji emoji_sad" alt="sad" src="/static/emoji/sad.png"/>"#),
        ] {
            table.register(name, markup);
        }
        table
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn register(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        self.entries.insert(name.into(), markup.into());
    }
}

impl Default for EmojiTable {
    fn default() -> Self {
        Self::builtin()
    }
}
