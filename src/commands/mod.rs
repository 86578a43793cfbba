pub mod diff;
pub mod matching;
pub mod scan;

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::cache::ChecksumCache;
use crate::core::file_list::FileList;
use crate::core::listing::read_listing;
use crate::core::scanner::{scan, ScanOptions};

pub(crate) fn open_cache(path: Option<&str>) -> Result<Option<ChecksumCache>> {
    match path {
        Some(path) => {
            let cache = ChecksumCache::open(Path::new(path))
                .with_context(|| format!("failed to open checksum cache {}", path))?;
            Ok(Some(cache))
        }
        None => Ok(None),
    }
}

// Directories are scanned, anything else is read as a listing.
pub(crate) fn load_file_list(path: &Path, options: &ScanOptions) -> Result<FileList> {
    if path.is_dir() {
        Ok(scan(path, options)?)
    } else {
        read_listing(path).with_context(|| format!("failed to load {}", path.display()))
    }
}
