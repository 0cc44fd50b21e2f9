//! fixturefs: declarative, disposable directory trees.
//!
//! Describe files, directories and symlinks once, then mount that description
//! below a real directory for a test or sandbox and unmount it afterwards.
//! Symlinks name their target by a `ref` rather than by path, so the same
//! description can be mounted anywhere.
//!
//! ```rust
//! use fixturefs::{FileOptions, FileStructure};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut fixture = FileStructure::build(|b| {
//!     b.add_file("config.toml", FileOptions::new().content("debug = true").reference("config"));
//!     b.directory("app", |b| {
//!         b.symlink("config.toml", "config");
//!     });
//! })
//! .unwrap();
//!
//! fixture.mount(dir.path()).unwrap();
//! let linked = fixture.path_for("app/config.toml").unwrap().unwrap();
//! assert_eq!(std::fs::read_to_string(linked).unwrap(), "debug = true");
//! fixture.unmount().unwrap();
//! ```

pub use fixturefs_def::{
    validator, Builder, FileOptions, Node, NodeKind, NodeLocation, Tree, ValidationError,
};
pub use fixturefs_mount::{Error, Mount, MountOptions, Result, SymlinkStyle};

/// The name this type goes by in fixture-oriented code.
pub use fixturefs_mount::Mount as FileStructure;
