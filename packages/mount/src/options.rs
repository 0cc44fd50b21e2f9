//! Mount configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// How symlink targets are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkStyle {
    /// The link holds the absolute path of its target.
    #[default]
    Absolute,
    /// The link holds a path relative to the directory containing it, so the
    /// materialized tree can be moved as a whole.
    Relative,
}

/// Options for a [`Mount`](crate::Mount).
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```json
/// {"unmount_on_drop": true, "symlinks": "relative"}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MountOptions {
    /// Tear the materialized content down when a mounted `Mount` is dropped.
    pub unmount_on_drop: bool,
    pub symlinks: SymlinkStyle,
}

impl MountOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unmount_on_drop(mut self, enabled: bool) -> Self {
        self.unmount_on_drop = enabled;
        self
    }

    pub fn symlinks(mut self, style: SymlinkStyle) -> Self {
        self.symlinks = style;
        self
    }
}

/// A fixture file: options plus an untyped structure that still has to pass
/// validation.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Manifest {
    #[serde(default)]
    pub options: MountOptions,
    pub structure: JsonValue,
}
