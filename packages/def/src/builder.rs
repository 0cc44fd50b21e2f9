//! A scope-based builder for tree definitions.
//!
//! ```rust
//! use fixturefs_def::{Builder, FileOptions};
//!
//! let tree = Builder::build(|b| {
//!     b.directory("dir_a", |b| {
//!         b.file("file_a");
//!         b.symlink("point_to_file_c", "file_c_ref");
//!         b.directory("dir_b", |b| {
//!             b.file("file_b");
//!             b.add_file("file_c", FileOptions::new().reference("file_c_ref"));
//!         });
//!     });
//! });
//!
//! assert!(tree.find(["dir_a", "dir_b", "file_c"]).is_some());
//! ```

use crate::node::{Node, Tree};

/// Optional parts of a file record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileOptions {
    content: Option<Vec<u8>>,
    reference: Option<String>,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// The ref symlinks use to point at this file. Defaults to the name.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Accumulates sibling records for one directory level.
///
/// Each `directory` call hands a fresh child builder to its callback and
/// attaches whatever that builder collected as the directory's children once
/// the callback returns. Refs are always recorded explicitly, so a ref left
/// unset shows up as the node's name.
#[derive(Debug, Default)]
pub struct Builder {
    tree: Tree,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `scope` against a top-level builder and return what it built.
    pub fn build<F>(scope: F) -> Tree
    where
        F: FnOnce(&mut Builder),
    {
        let mut builder = Builder::new();
        scope(&mut builder);
        builder.into_tree()
    }

    /// Add a file with no content and a ref equal to its name.
    pub fn file(&mut self, name: impl Into<String>) -> &Node {
        self.add_file(name, FileOptions::default())
    }

    pub fn add_file(&mut self, name: impl Into<String>, options: FileOptions) -> &Node {
        let name = name.into();
        let reference = options.reference.unwrap_or_else(|| name.clone());
        self.tree.push(Node::File {
            name,
            content: options.content,
            reference: Some(reference),
        })
    }

    pub fn symlink(&mut self, name: impl Into<String>, to: impl Into<String>) -> &Node {
        self.tree.push(Node::symlink(name, to))
    }

    pub fn directory<F>(&mut self, name: impl Into<String>, scope: F) -> &Node
    where
        F: FnOnce(&mut Builder),
    {
        let name = name.into();
        let reference = name.clone();
        self.directory_with_ref(name, reference, scope)
    }

    pub fn directory_with_ref<F>(
        &mut self,
        name: impl Into<String>,
        reference: impl Into<String>,
        scope: F,
    ) -> &Node
    where
        F: FnOnce(&mut Builder),
    {
        let children = Builder::build(scope);
        self.tree.push(Node::Directory {
            name: name.into(),
            reference: Some(reference.into()),
            children,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator;
    use serde_json::json;

    fn to_json<T: serde::Serialize>(value: T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn build_returns_described_structure() {
        let tree = Builder::build(|b| {
            b.file("file_a");
            b.symlink("point_to_file_b", "file_b");
            b.directory("dir_a", |b| {
                b.add_file("file_b", FileOptions::new().content("hello"));
                b.add_file("file_c", FileOptions::new().reference("ref_file_c"));
                b.directory_with_ref("dir_b", "ref_dir_b", |b| {
                    b.symlink("i_point_to_file_c", "ref_file_c");
                });
            });
        });

        assert_eq!(
            to_json(&tree),
            json!([
                {"type": "file", "name": "file_a", "ref": "file_a"},
                {"type": "symlink", "name": "point_to_file_b", "to": "file_b"},
                {
                    "type": "directory",
                    "name": "dir_a",
                    "ref": "dir_a",
                    "children": [
                        {"type": "file", "name": "file_b", "content": "hello", "ref": "file_b"},
                        {"type": "file", "name": "file_c", "ref": "ref_file_c"},
                        {
                            "type": "directory",
                            "name": "dir_b",
                            "ref": "ref_dir_b",
                            "children": [
                                {"type": "symlink", "name": "i_point_to_file_c", "to": "ref_file_c"}
                            ]
                        }
                    ]
                }
            ])
        );
        assert!(validator::valid(&to_json(&tree)));
    }

    #[test]
    fn add_file_appends_and_returns_record() {
        let mut b = Builder::new();
        let created = b
            .add_file(
                "zarn",
                FileOptions::new().content("#00ff00").reference("Zarn"),
            )
            .clone();
        let expected = json!({"type": "file", "name": "zarn", "content": "#00ff00", "ref": "Zarn"});
        assert_eq!(to_json(&created), expected);
        assert_eq!(to_json(b.tree()), json!([expected]));
    }

    #[test]
    fn file_without_content_has_no_content_field() {
        let mut b = Builder::new();
        b.add_file("zarn", FileOptions::new().reference("Zarn"));
        assert_eq!(
            to_json(b.tree()),
            json!([{"type": "file", "name": "zarn", "ref": "Zarn"}])
        );
    }

    #[test]
    fn empty_content_is_kept_distinct_from_none() {
        let mut b = Builder::new();
        let created = b.add_file("empty", FileOptions::new().content(""));
        assert!(matches!(created, Node::File { content: Some(c), .. } if c.is_empty()));
    }

    #[test]
    fn file_ref_defaults_to_name() {
        let mut b = Builder::new();
        assert_eq!(
            to_json(b.add_file("zarn", FileOptions::new().content("#00ff00"))),
            json!({"type": "file", "name": "zarn", "content": "#00ff00", "ref": "zarn"})
        );
    }

    #[test]
    fn symlink_appends_and_returns_record() {
        let mut b = Builder::new();
        assert_eq!(b.symlink("i_am_zarn", "zarn"), &Node::symlink("i_am_zarn", "zarn"));
        assert_eq!(
            to_json(b.into_tree()),
            json!([{"type": "symlink", "name": "i_am_zarn", "to": "zarn"}])
        );
    }

    #[test]
    fn directory_collects_children() {
        let mut b = Builder::new();
        let created = to_json(b.directory("zarn", |b| {
            b.file("elaina");
        }));
        let expected = json!({
            "type": "directory",
            "name": "zarn",
            "ref": "zarn",
            "children": [{"type": "file", "name": "elaina", "ref": "elaina"}]
        });
        assert_eq!(created, expected);
        assert_eq!(to_json(b.tree()), json!([expected]));
    }

    #[test]
    fn empty_directory_scope() {
        let mut b = Builder::new();
        assert_eq!(
            to_json(b.directory("zarn", |_| {})),
            json!({"type": "directory", "name": "zarn", "ref": "zarn", "children": []})
        );
    }

    #[test]
    fn nested_scopes_are_independent() {
        let tree = Builder::build(|b| {
            b.directory("a", |b| {
                b.file("in_a");
                b.directory("b", |b| {
                    b.file("in_b");
                });
                b.file("also_in_a");
            });
            b.file("top");
        });

        let names = |tree: &Tree| tree.iter().map(|n| n.name().to_string()).collect::<Vec<_>>();
        assert_eq!(names(&tree), vec!["a", "top"]);
        let a = tree.find(["a"]).and_then(Node::children).unwrap();
        assert_eq!(names(a), vec!["in_a", "b", "also_in_a"]);
        let b = tree.find(["a", "b"]).and_then(Node::children).unwrap();
        assert_eq!(names(b), vec!["in_b"]);
    }
}
