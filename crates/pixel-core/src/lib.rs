//! Pixel core crate.
//!
//! This crate holds the data layer shared by every part of the Pixel
//! templating engine:
//!
//! - `value`: helpers over the universal dynamic value (`serde_json::Value`)
//!   used for props, state, store entries and resolved bindings.
//! - `store`: the process-wide key/value store components may read from
//!   through their declared key allowlist.
//! - `path`: the dotted-path resolver (`a.b.c` against a supplied value),
//!   kept deliberately separate from the scope-chain resolver in the
//!   compiler crate. The two paths have different trust models and call
//!   sites and must never be merged.

pub mod path;
pub mod store;
pub mod value;

pub use path::{resolve_path, strip_placeholder};
pub use store::Store;
pub use value::{display_string, truthy};
