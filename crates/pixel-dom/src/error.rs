use serde::{Deserialize, Serialize};
use std::fmt;

/// Fatal compile errors. A template that raises one produces no tree at
/// all; recoverable conditions go through [`Diagnostic`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A closing tag with nothing open, or open tags left at end of input.
    UnbalancedTag(String),
    /// A component tag named a factory absent from the registry.
    UnknownComponent(String),
    /// Component recursion exceeded the configured depth bound.
    DepthExceeded(usize),
    /// The template contained nothing compilable.
    EmptyTemplate(String),
    /// Strict mode only: a void element with no enclosing open tag.
    VoidWithoutParent(String),
}

pub type CompileResult<T> = Result<T, CompileError>;

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedTag(tag) => write!(f, "unbalanced tag: {tag}"),
            Self::UnknownComponent(name) => write!(f, "unknown component '{name}'"),
            Self::DepthExceeded(limit) => {
                write!(f, "component nesting exceeded the depth bound of {limit}")
            }
            Self::EmptyTemplate(context) => write!(f, "empty template: {context}"),
            Self::VoidWithoutParent(tag) => {
                write!(f, "void element {tag} has no enclosing open tag")
            }
        }
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warn,
    Error,
}

/// A recoverable condition observed during a compile pass. Diagnostics are
/// collected on the pass and returned with the output; they never abort
/// compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
}

impl Diagnostic {
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn warn(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            code: code.into(),
            message: message.into(),
        }
    }
}
