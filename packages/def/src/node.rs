//! The definition model: nodes and trees of nodes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::validator;

/// Discriminator for the three node shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Symlink,
    Directory,
}

impl NodeKind {
    /// The `type` tag used in the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Symlink => "symlink",
            NodeKind::Directory => "directory",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a tree definition.
///
/// Serialized as a record tagged by `type`:
///
/// ```json
/// {"type": "file", "name": "a", "content": "hello", "ref": "A"}
/// {"type": "symlink", "name": "b", "to": "A"}
/// {"type": "directory", "name": "d", "children": []}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum Node {
    File {
        name: String,
        /// `None` is distinct from empty content; both produce an empty file.
        #[serde(default, skip_serializing_if = "Option::is_none", with = "content")]
        content: Option<Vec<u8>>,
        #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },
    Symlink {
        name: String,
        /// The ref of the file or directory this link points at.
        to: String,
    },
    Directory {
        name: String,
        #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
        children: Tree,
    },
}

impl Node {
    pub fn file(name: impl Into<String>) -> Self {
        Node::File {
            name: name.into(),
            content: None,
            reference: None,
        }
    }

    pub fn symlink(name: impl Into<String>, to: impl Into<String>) -> Self {
        Node::Symlink {
            name: name.into(),
            to: to.into(),
        }
    }

    pub fn directory(name: impl Into<String>, children: impl Into<Tree>) -> Self {
        Node::Directory {
            name: name.into(),
            reference: None,
            children: children.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File { name, .. } | Node::Symlink { name, .. } | Node::Directory { name, .. } => {
                name
            }
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File { .. } => NodeKind::File,
            Node::Symlink { .. } => NodeKind::Symlink,
            Node::Directory { .. } => NodeKind::Directory,
        }
    }

    /// The symbolic name symlinks use to target this node.
    ///
    /// Files and directories fall back to their name when no ref was given.
    /// Symlinks cannot be targeted and return `None`.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Node::File {
                name, reference, ..
            }
            | Node::Directory {
                name, reference, ..
            } => Some(reference.as_deref().unwrap_or(name)),
            Node::Symlink { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&Tree> {
        match self {
            Node::Directory { children, .. } => Some(children),
            _ => None,
        }
    }
}

/// An ordered sequence of sibling nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push(&mut self, node: Node) -> &mut Node {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Parse an untyped candidate, rejecting anything the validator refuses.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        validator::validate(&value)?;
        let tree: Tree = serde_json::from_value(value)?;
        tree.validate()?;
        Ok(tree)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Find a node by walking the definition one name per level.
    ///
    /// This consults the definition only; nothing on disk is inspected.
    pub fn find<I, S>(&self, names: I) -> Option<&Node>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut level = Some(self);
        let mut found = None;
        for name in names {
            let node = level?.iter().find(|node| node.name() == name.as_ref())?;
            found = Some(node);
            level = node.children();
        }
        found
    }

    /// The path, relative to a mountpoint, of the node named by `names`.
    pub fn locate<I, S>(&self, names: I) -> Option<PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owned: Vec<S> = names.into_iter().collect();
        let names: Vec<&str> = owned.iter().map(|name| name.as_ref()).collect();
        self.find(&names)?;
        Some(names.iter().collect())
    }
}

impl From<Vec<Node>> for Tree {
    fn from(nodes: Vec<Node>) -> Self {
        Tree { nodes }
    }
}

impl FromIterator<Node> for Tree {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Tree {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Tree {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// File content goes out as a string when it is UTF-8 and as an array of
/// byte values otherwise. Either form is accepted back.
mod content {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Bytes(Vec<u8>),
    }

    pub fn serialize<S>(content: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match content {
            None => serializer.serialize_none(),
            Some(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => serializer.serialize_str(text),
                Err(_) => serializer.collect_seq(bytes),
            },
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Repr>::deserialize(deserializer)?.map(|repr| match repr {
            Repr::Text(text) => text.into_bytes(),
            Repr::Bytes(bytes) => bytes,
        }))
    }
}
