//! The mount lifecycle: materialize a tree, query it, tear it down.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use fixturefs_def::{Builder, Node, NodeKind, Tree};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::options::{Manifest, MountOptions, SymlinkStyle};
use crate::symlinks::{self, Target};
use crate::teardown;

/// A tree definition together with the place it is materialized, if any.
///
/// A `Mount` starts unmounted. [`mount`](Mount::mount) writes the tree below
/// a directory and [`unmount`](Mount::unmount) deletes it again; a single
/// instance holds at most one mountpoint at a time.
#[derive(Debug)]
pub struct Mount {
    structure: Tree,
    mountpoint: Option<PathBuf>,
    options: MountOptions,
}

impl Mount {
    /// # Errors
    ///
    /// Returns [`Error::InvalidStructure`] if a name is unusable or repeated
    /// among siblings.
    pub fn new(structure: Tree) -> Result<Self> {
        Self::with_options(structure, MountOptions::default())
    }

    pub fn with_options(structure: Tree, options: MountOptions) -> Result<Self> {
        structure.validate()?;
        Ok(Mount {
            structure,
            mountpoint: None,
            options,
        })
    }

    /// Build the structure with the [`Builder`] DSL.
    pub fn build<F>(scope: F) -> Result<Self>
    where
        F: FnOnce(&mut Builder),
    {
        Self::new(Builder::build(scope))
    }

    /// Accept an untyped definition, such as one decoded from JSON.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        Self::new(Tree::from_value(value)?)
    }

    /// Load a fixture manifest: `{"options": {...}, "structure": [...]}`.
    pub fn from_manifest_str(s: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(s)?;
        Self::with_options(Tree::from_value(manifest.structure)?, manifest.options)
    }

    pub fn structure(&self) -> &Tree {
        &self.structure
    }

    pub fn options(&self) -> &MountOptions {
        &self.options
    }

    pub fn mountpoint(&self) -> Option<&Path> {
        self.mountpoint.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mountpoint.is_some()
    }

    /// Create the files, directories and symlinks of the structure below
    /// `dir`.
    ///
    /// `dir` is made absolute against the current directory and `..` is
    /// folded lexically, so only the named directory is ever created. It is created
    /// (with its parents) when missing, and must be empty when it exists.
    /// If any write fails, everything already written below `dir` is removed
    /// before the error is returned.
    pub fn mount(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        if let Some(mountpoint) = &self.mountpoint {
            return Err(Error::AlreadyMounted {
                mountpoint: mountpoint.clone(),
            });
        }

        let dir = dir.as_ref();
        let mountpoint = normalize(&std::path::absolute(dir).map_err(Error::io(dir))?);
        prepare_target(&mountpoint)?;

        let targets = symlinks::collect_targets(&mountpoint, &self.structure);
        let writer = TreeWriter {
            targets: &targets,
            style: self.options.symlinks,
        };
        if let Err(error) = writer.write(&mountpoint, &self.structure) {
            log::debug!(
                "Mount at {} failed, removing partial content: {}",
                mountpoint.display(),
                error
            );
            teardown::scrub_dir(&mountpoint);
            return Err(error);
        }

        log::info!("Mounted file structure at {}", mountpoint.display());
        self.mountpoint = Some(mountpoint);
        Ok(())
    }

    /// Delete everything below the mountpoint and forget it.
    ///
    /// The mountpoint directory itself is left in place. If a removal fails
    /// the instance stays mounted.
    pub fn unmount(&mut self) -> Result<()> {
        let Some(mountpoint) = &self.mountpoint else {
            return Err(Error::NotMounted);
        };

        teardown::clear_dir(mountpoint)?;
        log::info!("Unmounted file structure from {}", mountpoint.display());
        self.mountpoint = None;
        Ok(())
    }

    /// The absolute path of `target` below the mountpoint, if something
    /// exists there on disk.
    ///
    /// `target` is always taken as relative and cannot climb out of the
    /// mountpoint: a leading `/` and any `.` or `..` component are ignored.
    pub fn path_for(&self, target: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let mountpoint = self.mountpoint.as_ref().ok_or(Error::NotMounted)?;

        let relative: PathBuf = target
            .as_ref()
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        let path = mountpoint.join(relative);
        if path.try_exists().map_err(Error::io(&path))? {
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }

    /// The absolute path the structure declares for the node named by
    /// `names`, one name per level.
    ///
    /// Only the definition is consulted; the result is not checked against
    /// the filesystem.
    pub fn locate<I, S>(&self, names: I) -> Result<Option<PathBuf>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mountpoint = self.mountpoint.as_ref().ok_or(Error::NotMounted)?;
        Ok(self
            .structure
            .locate(names)
            .map(|relative| mountpoint.join(relative)))
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        if !self.options.unmount_on_drop || !self.is_mounted() {
            return;
        }
        if let Err(error) = self.unmount() {
            log::warn!("Failed to unmount file structure on drop: {}", error);
        }
    }
}

// `std::path::absolute` keeps `..` on unix.
fn normalize(path: &Path) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }
    normal
}

fn prepare_target(mountpoint: &Path) -> Result<()> {
    match fs::metadata(mountpoint) {
        Ok(attr) if attr.is_dir() => {
            if !teardown::is_empty_dir(mountpoint)? {
                return Err(Error::TargetNotEmpty {
                    path: mountpoint.to_path_buf(),
                });
            }
            Ok(())
        }
        Ok(_) => Err(Error::TargetNotADirectory {
            path: mountpoint.to_path_buf(),
        }),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            log::debug!("Creating mountpoint {}...", mountpoint.display());
            fs::create_dir_all(mountpoint).map_err(Error::io(mountpoint))
        }
        Err(error) => Err(Error::io(mountpoint)(error)),
    }
}

/// The write pass. Symlink targets are looked up in a map computed before
/// the first write and never modified afterwards.
struct TreeWriter<'a> {
    targets: &'a HashMap<String, Target>,
    style: SymlinkStyle,
}

impl TreeWriter<'_> {
    fn write(&self, dir: &Path, tree: &Tree) -> Result<()> {
        for node in tree {
            let path = dir.join(node.name());
            match node {
                Node::File { content, .. } => {
                    log::debug!("Writing {}...", path.display());
                    let bytes = content.as_deref().unwrap_or_default();
                    fs::write(&path, bytes).map_err(Error::io(&path))?;
                }
                Node::Symlink { to, .. } => {
                    let target = self.targets.get(to).ok_or_else(|| Error::UnresolvedSymlink {
                        path: path.clone(),
                        to: to.clone(),
                    })?;
                    let original = match self.style {
                        SymlinkStyle::Absolute => target.path.clone(),
                        SymlinkStyle::Relative => symlinks::relative_to(&target.path, dir),
                    };
                    log::debug!("Linking {} -> {}...", path.display(), original.display());
                    create_symlink(&original, &path, target.kind).map_err(Error::io(&path))?;
                }
                Node::Directory { children, .. } => {
                    log::debug!("Creating {}...", path.display());
                    fs::create_dir(&path).map_err(Error::io(&path))?;
                    self.write(&path, children)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path, _kind: NodeKind) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path, kind: NodeKind) -> io::Result<()> {
    match kind {
        NodeKind::Directory => std::os::windows::fs::symlink_dir(original, link),
        _ => std::os::windows::fs::symlink_file(original, link),
    }
}
