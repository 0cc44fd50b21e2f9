//! fixturefs mount engine.
//!
//! Materializes a [`Tree`](fixturefs_def::Tree) below a directory and tears
//! it down again:
//!
//! 1. every file and directory ref is mapped to its future absolute path,
//! 2. the tree is written in order, symlinks pointing at mapped paths,
//! 3. a failed write removes whatever was already created.
//!
//! # Example
//!
//! ```rust
//! use fixturefs_mount::Mount;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut fixture = Mount::build(|b| {
//!     b.file("f1");
//!     b.directory("d1", |b| {
//!         b.symlink("s1", "f1");
//!     });
//! })
//! .unwrap();
//!
//! fixture.mount(dir.path()).unwrap();
//! assert!(fixture.path_for("d1/s1").unwrap().is_some());
//!
//! fixture.unmount().unwrap();
//! assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
//! ```

mod error;
mod mount;
mod options;
mod symlinks;
mod teardown;

pub use error::{Error, Result};
pub use mount::Mount;
pub use options::{MountOptions, SymlinkStyle};
