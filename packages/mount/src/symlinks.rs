//! Resolution of symlink refs to absolute target paths.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use fixturefs_def::{Node, NodeKind, Tree};

/// Where a ref points once the tree is materialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Target {
    pub path: PathBuf,
    pub kind: NodeKind,
}

/// Every file and directory ref in `tree`, mapped to where the node will
/// live below `root`.
///
/// Nodes are visited in pre-order (a directory before its children, siblings
/// top to bottom) and a later node replaces an earlier one with the same ref.
/// The map is complete before anything is written, so a symlink may point at
/// a node declared after it.
pub(crate) fn collect_targets(root: &Path, tree: &Tree) -> HashMap<String, Target> {
    let mut targets = HashMap::new();
    collect_into(root, tree, &mut targets);
    targets
}

fn collect_into(dir: &Path, tree: &Tree, targets: &mut HashMap<String, Target>) {
    for node in tree {
        let path = dir.join(node.name());
        if let Some(reference) = node.reference() {
            targets.insert(
                reference.to_string(),
                Target {
                    path: path.clone(),
                    kind: node.kind(),
                },
            );
        }
        if let Node::Directory { children, .. } = node {
            collect_into(&path, children, targets);
        }
    }
}

/// `target` expressed relative to `from_dir`. Both must be absolute.
pub(crate) fn relative_to(target: &Path, from_dir: &Path) -> PathBuf {
    let target: Vec<Component> = target.components().collect();
    let from: Vec<Component> = from_dir.components().collect();
    let common = target
        .iter()
        .zip(from.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push(Component::ParentDir);
    }
    for component in &target[common..] {
        relative.push(component);
    }
    relative
}
