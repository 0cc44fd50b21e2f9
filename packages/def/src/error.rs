//! Error types for the definition layer.

use std::fmt;
use std::path::PathBuf;

/// Where in a candidate tree a node sits, as the chain of sibling indices
/// from the top-level sequence down through `children`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeLocation {
    pub indices: Vec<usize>,
}

impl NodeLocation {
    pub fn root() -> Self {
        Self::default()
    }

    /// The location of the `index`th child below this one.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }

    pub fn is_root(&self) -> bool {
        self.indices.is_empty()
    }
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for (depth, index) in self.indices.iter().enumerate() {
            if depth == 0 {
                write!(f, "[{}]", index)?;
            } else {
                write!(f, ".children[{}]", index)?;
            }
        }
        Ok(())
    }
}

/// Reasons a candidate tree is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected a sequence of nodes at {at}")]
    NotASequence { at: NodeLocation },
    #[error("expected a node record at {at}")]
    NotARecord { at: NodeLocation },
    #[error("unknown node type {found:?} at {at}")]
    UnknownType { at: NodeLocation, found: Option<String> },
    #[error("missing required field '{field}' at {at}")]
    MissingField { at: NodeLocation, field: &'static str },
    #[error("field '{field}' is not allowed on a {kind} at {at}")]
    UnexpectedField {
        at: NodeLocation,
        kind: &'static str,
        field: String,
    },
    #[error("field '{field}' at {at} must be {expected}")]
    WrongFieldType {
        at: NodeLocation,
        field: &'static str,
        expected: &'static str,
    },
    #[error("invalid name {name:?} at {at}: {message}")]
    InvalidName {
        at: NodeLocation,
        name: String,
        message: &'static str,
    },
    #[error("duplicate sibling name {name:?} at {at}")]
    DuplicateName { at: NodeLocation, name: String },
}

impl ValidationError {
    /// Location of the node that failed validation.
    pub fn location(&self) -> &NodeLocation {
        match self {
            ValidationError::NotASequence { at }
            | ValidationError::NotARecord { at }
            | ValidationError::UnknownType { at, .. }
            | ValidationError::MissingField { at, .. }
            | ValidationError::UnexpectedField { at, .. }
            | ValidationError::WrongFieldType { at, .. }
            | ValidationError::InvalidName { at, .. }
            | ValidationError::DuplicateName { at, .. } => at,
        }
    }
}

/// Errors raised while loading a tree definition.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid file structure: {0}")]
    Invalid(#[from] ValidationError),
    #[error("failed to decode file structure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read file structure from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
