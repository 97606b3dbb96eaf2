use serde::{Deserialize, Serialize};

use pixel_core::Store;

use crate::dom::DomBackend;
use crate::error::{CompileResult, Diagnostic};
use crate::node::{ComponentFactory, NodeId, VTree};
use crate::parser::Assembler;
use crate::registry::{ComponentRegistry, EmojiTable};

fn default_max_depth() -> usize {
    64
}

/// Knobs for a compile pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Bound on component template recursion; exceeding it is a compile
    /// error instead of a host stack overflow.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Strict mode rejects void elements outside any open tag instead of
    /// keeping them as extra roots.
    #[serde(default)]
    pub strict: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict: false,
        }
    }
}

/// The result of one compile pass: the finished tree, its root, and any
/// recoverable conditions observed on the way.
#[derive(Debug)]
pub struct CompiledView {
    pub tree: VTree,
    pub root: NodeId,
    pub diagnostics: Vec<Diagnostic>,
}

/// The engine facade. Owns the registries, the global store and the
/// configuration; every `compile` call builds a fresh tokenizer, assembler
/// and parse stack, so independent compiles share nothing but these
/// read-mostly tables.
#[derive(Debug, Default)]
pub struct Pixel {
    registry: ComponentRegistry,
    emoji: EmojiTable,
    store: Store,
    config: CompileConfig,
}

impl Pixel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompileConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn register_component(&mut self, name: impl Into<String>, factory: ComponentFactory) {
        self.registry.register(name, factory);
    }

    pub fn register_components(&mut self, pairs: &[(String, ComponentFactory)]) {
        self.registry.register_all(pairs);
    }

    pub fn register_emoji(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        self.emoji.register(name, markup);
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Store writes happen between compiles; a running pass holds the
    /// store immutably.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn compile<D: DomBackend>(
        &mut self,
        template: &str,
        dom: &mut D,
    ) -> CompileResult<CompiledView> {
        let assembler = Assembler::new(
            &mut self.registry,
            &self.emoji,
            &self.store,
            &self.config,
            dom,
        );
        let (tree, root, diagnostics) = assembler.compile(template)?;
        Ok(CompiledView {
            tree,
            root,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CompileConfig::default();
        assert_eq!(config.max_depth, 64);
        assert!(!config.strict);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: CompileConfig = serde_json::from_str("{}").expect("empty config");
        assert_eq!(config.max_depth, 64);
        assert!(!config.strict);

        let config: CompileConfig =
            serde_json::from_str(r#"{"max_depth": 8, "strict": true}"#).expect("full config");
        assert_eq!(config.max_depth, 8);
        assert!(config.strict);
    }
}
