//! Shape checks for tree definitions.
//!
//! Two levels of checking live here:
//!
//! - [`valid`] / [`validate`] accept any untyped candidate (typically JSON
//!   from a fixture file) and check it is a sequence of node records with the
//!   right keys for their `type`. This is purely structural: symlink targets
//!   are not resolved and sibling names are not compared.
//! - [`Tree::validate`] runs on a typed tree and enforces the naming rules
//!   the filesystem needs: every name is a single usable path component and
//!   siblings do not share a name.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::error::{NodeLocation, ValidationError};
use crate::node::{Node, Tree};

struct Shape {
    kind: &'static str,
    required: &'static [&'static str],
    allowed: &'static [&'static str],
}

const FILE: Shape = Shape {
    kind: "file",
    required: &["name"],
    allowed: &["type", "name", "ref", "content"],
};

const SYMLINK: Shape = Shape {
    kind: "symlink",
    required: &["name", "to"],
    allowed: &["type", "name", "to"],
};

const DIRECTORY: Shape = Shape {
    kind: "directory",
    required: &["name", "children"],
    allowed: &["type", "name", "ref", "children"],
};

/// Returns whether `candidate` is a well-formed tree definition.
pub fn valid(candidate: &JsonValue) -> bool {
    validate(candidate).is_ok()
}

/// Like [`valid`], but reports the first offending node.
pub fn validate(candidate: &JsonValue) -> Result<(), ValidationError> {
    validate_sequence(candidate, &NodeLocation::root())
}

fn validate_sequence(candidate: &JsonValue, at: &NodeLocation) -> Result<(), ValidationError> {
    let JsonValue::Array(nodes) = candidate else {
        return Err(ValidationError::NotASequence { at: at.clone() });
    };

    for (index, node) in nodes.iter().enumerate() {
        validate_node(node, &at.child(index))?;
    }
    Ok(())
}

fn validate_node(candidate: &JsonValue, at: &NodeLocation) -> Result<(), ValidationError> {
    let JsonValue::Object(record) = candidate else {
        return Err(ValidationError::NotARecord { at: at.clone() });
    };

    let shape = match record.get("type") {
        Some(JsonValue::String(tag)) => match tag.as_str() {
            "file" => &FILE,
            "symlink" => &SYMLINK,
            "directory" => &DIRECTORY,
            other => {
                return Err(ValidationError::UnknownType {
                    at: at.clone(),
                    found: Some(other.to_string()),
                })
            }
        },
        Some(other) => {
            return Err(ValidationError::UnknownType {
                at: at.clone(),
                found: Some(other.to_string()),
            })
        }
        None => {
            return Err(ValidationError::UnknownType {
                at: at.clone(),
                found: None,
            })
        }
    };

    for &field in shape.required {
        if !record.contains_key(field) {
            return Err(ValidationError::MissingField {
                at: at.clone(),
                field,
            });
        }
    }

    let unexpected = record
        .keys()
        .find(|key| !shape.allowed.iter().any(|allowed| *allowed == key.as_str()));
    if let Some(key) = unexpected {
        return Err(ValidationError::UnexpectedField {
            at: at.clone(),
            kind: shape.kind,
            field: key.clone(),
        });
    }

    for field in ["name", "ref", "to"] {
        if record.get(field).is_some_and(|value| !value.is_string()) {
            return Err(ValidationError::WrongFieldType {
                at: at.clone(),
                field,
                expected: "a string",
            });
        }
    }

    if record.get("content").is_some_and(|value| !is_content(value)) {
        return Err(ValidationError::WrongFieldType {
            at: at.clone(),
            field: "content",
            expected: "a string or an array of bytes",
        });
    }

    match record.get("children") {
        Some(children) => validate_sequence(children, at),
        None => Ok(()),
    }
}

fn is_content(value: &JsonValue) -> bool {
    match value {
        JsonValue::String(_) => true,
        JsonValue::Array(bytes) => bytes
            .iter()
            .all(|byte| byte.as_u64().is_some_and(|b| b <= u8::MAX as u64)),
        _ => false,
    }
}

/// Checks that `name` can be used as a single entry below a directory.
pub fn check_name(name: &str) -> Result<(), &'static str> {
    lazy_static! {
        static ref FORBIDDEN: Regex = Regex::new(r"[/\x00]").unwrap();
    }

    if name.is_empty() {
        return Err("name is empty");
    }
    if name == "." || name == ".." {
        return Err("name refers to a directory itself");
    }
    if FORBIDDEN.is_match(name) {
        return Err("name contains a path separator or NUL");
    }
    Ok(())
}

impl Tree {
    /// Enforces the naming rules on a typed tree.
    ///
    /// Refs are not compared: when two nodes share a ref, the one visited
    /// last in pre-order is the one symlinks resolve to.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_names(self, &NodeLocation::root())
    }
}

fn validate_names(tree: &Tree, at: &NodeLocation) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (index, node) in tree.iter().enumerate() {
        let here = at.child(index);
        check_name(node.name()).map_err(|message| ValidationError::InvalidName {
            at: here.clone(),
            name: node.name().to_string(),
            message,
        })?;
        if !seen.insert(node.name()) {
            return Err(ValidationError::DuplicateName {
                at: here,
                name: node.name().to_string(),
            });
        }
        if let Node::Directory { children, .. } = node {
            validate_names(children, &here)?;
        }
    }
    Ok(())
}
