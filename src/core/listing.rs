use std::fs;
use std::path::Path;

use crate::core::file_list::FileList;
use crate::error::{Error, Result};
use crate::utils::compression::{compress, decompress};

const COMPRESSION_LEVEL: u32 = 6;

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn encode(list: &FileList, compressed: bool) -> Result<Vec<u8>> {
    let json = serde_json::to_vec_pretty(list)?;
    if compressed {
        Ok(compress(&json, COMPRESSION_LEVEL)?)
    } else {
        Ok(json)
    }
}

pub fn decode(data: &[u8], compressed: bool) -> Result<FileList> {
    if compressed {
        Ok(serde_json::from_slice(&decompress(data)?)?)
    } else {
        Ok(serde_json::from_slice(data)?)
    }
}

pub fn read_listing(path: &Path) -> Result<FileList> {
    let data = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let list = decode(&data, is_compressed(path))?;
    log::debug!(
        "Read listing {} ({} files)",
        path.display(),
        list.len()
    );
    Ok(list)
}

pub fn write_listing(list: &FileList, path: &Path) -> Result<()> {
    let data = encode(list, is_compressed(path))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data)?;
    Ok(())
}
