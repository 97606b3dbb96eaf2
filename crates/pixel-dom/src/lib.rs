//! Pixel DOM crate: the template compiler and virtual-tree builder.
//!
//! This crate intentionally separates compilation concerns into layers:
//!
//! - `tokenizer`: regex-driven tag scanning and classification.
//! - `tag`: the attribute sub-parser (`p:`/`s:`/`e:` dialect).
//! - `scope` + `text`: identifier resolution and text/emoji interpolation.
//! - `parser`: the stack-based tree assembler, component descent and loop
//!   expansion.
//! - `node` + `dom`: the virtual tree arena and the mount seam.
//! - `registry` + `engine`: explicit component/emoji tables and the facade
//!   that owns them.
//!
//! The critical design rule is graceful degradation: only unbalanced
//! templates and unknown component references abort a compile. Everything
//! else (unresolved bindings, missing loop sources, dotted-path misses)
//! degrades to empty content at the smallest possible granularity and is
//! reported through the diagnostics channel.

pub mod dom;
pub mod engine;
pub mod error;
pub mod html;
pub mod node;
pub mod parser;
pub mod registry;
pub mod scope;
pub mod tag;
pub mod text;
pub mod tokenizer;

pub use dom::{DomBackend, MountHandle, RecordingDom};
pub use engine::{CompileConfig, CompiledView, Pixel};
pub use error::{CompileError, CompileResult, Diagnostic, DiagnosticLevel};
pub use html::{escape_html, render_html};
pub use node::{
    ComponentFactory, ComponentInstance, ComponentModel, EventContext, HandlerRef, Method,
    MethodScope, NodeId, NodeKind, VNode, VTree, TEXT_TAG,
};
pub use registry::{ComponentRegistry, EmojiTable};
pub use scope::ScopeRef;
pub use tag::{parse_tag, ParsedTag};
pub use text::{Interpolator, TextSegment};
pub use tokenizer::{classify, TagKind, TagToken, Tokenizer};
