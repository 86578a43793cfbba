use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to walk project tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("duplicate path: {0}")]
    DuplicatePath(String),

    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("checksum cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("invalid listing: {0}")]
    Listing(#[from] serde_json::Error),

    #[error("scan cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
