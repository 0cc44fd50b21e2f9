//! Error types for the mount layer.

use std::path::{Path, PathBuf};

use fixturefs_def::ValidationError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid file structure: {0}")]
    InvalidStructure(#[from] ValidationError),

    #[error("failed to decode file structure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file structure is already mounted at {mountpoint:?}")]
    AlreadyMounted { mountpoint: PathBuf },

    #[error("file structure is not mounted")]
    NotMounted,

    #[error("target directory {path:?} is not empty")]
    TargetNotEmpty { path: PathBuf },

    #[error("target {path:?} exists and is not a directory")]
    TargetNotADirectory { path: PathBuf },

    #[error("symlink {path:?} points to unknown ref {to:?}")]
    UnresolvedSymlink { path: PathBuf, to: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<fixturefs_def::Error> for Error {
    fn from(e: fixturefs_def::Error) -> Self {
        match e {
            fixturefs_def::Error::Invalid(e) => Error::InvalidStructure(e),
            fixturefs_def::Error::Json(e) => Error::Json(e),
            fixturefs_def::Error::Io { path, source } => Error::Io { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
