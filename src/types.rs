use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    // None for paths-only listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default)]
    pub size: u64,
}

impl FileMeta {
    pub fn with_checksum(checksum: impl Into<String>, size: u64) -> Self {
        FileMeta {
            checksum: Some(checksum.into()),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMatch {
    pub path: PathBuf,
    pub score: u8,
}

pub type ProgressCallback<'a> = dyn Fn(usize, usize, &str) + Send + Sync + 'a;

#[derive(Debug, Clone, Default)]
pub struct ScanArgs {
    pub project: String,
    pub output: Option<String>,
    pub ignore: Vec<String>,
    pub no_checksums: bool,
    pub cache: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DiffArgs {
    pub base: String,
    pub target: String,
    pub partial: bool,
    pub ignore: Vec<String>,
    pub cache: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchArgs {
    pub remote: String,
    pub candidates: Vec<String>,
    pub threshold: u8,
    pub ignore: Vec<String>,
    pub cache: Option<String>,
}
