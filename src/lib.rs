pub mod commands;
pub mod core;
pub mod error;
pub mod types;
pub mod utils;

pub use crate::core::cache::ChecksumCache;
pub use crate::core::diff::{diff, FileListDiff};
pub use crate::core::file_list::{FileList, FileListBuilder};
pub use crate::core::ignore::{IgnoreRules, IGNORE_FILE};
pub use crate::core::listing::{read_listing, write_listing};
pub use crate::core::matcher::{
    best_scan_match, compute_match, score, MatchOptions, DEFAULT_MATCH_THRESHOLD,
};
pub use crate::core::scanner::{scan, CancelToken, ScanOptions};
pub use error::{Error, Result};
pub use types::{FileMeta, ScanMatch};
