//! fixturefs definitions: the description of a directory tree.
//!
//! This layer knows nothing about the filesystem. It provides:
//! - `Node` / `Tree`: files (with optional content), directories, and
//!   symlinks that point at other nodes through a symbolic `ref`
//! - `validator`: shape checks for untyped candidates and naming checks for
//!   typed trees
//! - `Builder`: a nesting-aware DSL that produces valid trees
//!
//! # Example
//!
//! ```rust
//! use fixturefs_def::{validator, Builder, Tree};
//! use serde_json::json;
//!
//! let built = Builder::build(|b| {
//!     b.file("f1");
//!     b.directory("d1", |b| {
//!         b.symlink("s1", "f1");
//!     });
//! });
//!
//! let candidate = json!([
//!     {"type": "file", "name": "f1", "ref": "f1"},
//!     {"type": "directory", "name": "d1", "ref": "d1", "children": [
//!         {"type": "symlink", "name": "s1", "to": "f1"}
//!     ]}
//! ]);
//! assert!(validator::valid(&candidate));
//! assert_eq!(Tree::from_value(candidate).unwrap(), built);
//! ```

mod builder;
mod error;
mod node;
pub mod validator;

pub use builder::{Builder, FileOptions};
pub use error::{Error, NodeLocation, Result, ValidationError};
pub use node::{Node, NodeKind, Tree};
