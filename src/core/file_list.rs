use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::types::FileMeta;

/// Relative file and folder paths of one project, with optional checksums.
///
/// Paths use `/` as separator, never start at a filesystem root and never
/// contain `.` or `..` components. A path appears at most once, either as a
/// file or as a folder. Iteration is in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFileList", into = "RawFileList")]
pub struct FileList {
    project_id: String,
    files: BTreeMap<String, FileMeta>,
    folders: BTreeSet<String>,
}

impl FileList {
    pub fn builder(project_id: impl Into<String>) -> FileListBuilder {
        FileListBuilder {
            list: FileList {
                project_id: project_id.into(),
                files: BTreeMap::new(),
                folders: BTreeSet::new(),
            },
        }
    }

    pub fn from_checksums<'a, I>(project_id: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut builder = FileList::builder(project_id);
        for (path, checksum) in entries {
            builder.add_file(path, FileMeta::with_checksum(checksum, 0))?;
        }
        Ok(builder.build())
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.files.keys().map(String::as_str)
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> + '_ {
        self.folders.iter().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FileMeta)> + '_ {
        self.files.iter().map(|(path, meta)| (path.as_str(), meta))
    }

    pub fn get(&self, path: &str) -> Option<&FileMeta> {
        self.files.get(path)
    }

    pub fn checksum(&self, path: &str) -> Option<&str> {
        self.files.get(path).and_then(|m| m.checksum.as_deref())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn contains_folder(&self, path: &str) -> bool {
        self.folders.contains(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.files.values().map(|m| m.size).sum()
    }
}

pub struct FileListBuilder {
    list: FileList,
}

impl FileListBuilder {
    pub fn add_file(&mut self, path: &str, meta: FileMeta) -> Result<&mut Self> {
        let path = normalize_path(path)?;
        if self.list.files.contains_key(&path) || self.list.folders.contains(&path) {
            return Err(Error::DuplicatePath(path));
        }
        self.list.files.insert(path, meta);
        Ok(self)
    }

    pub fn add_folder(&mut self, path: &str) -> Result<&mut Self> {
        let path = normalize_path(path)?;
        if self.list.files.contains_key(&path) || !self.list.folders.insert(path.clone()) {
            return Err(Error::DuplicatePath(path));
        }
        Ok(self)
    }

    pub fn build(self) -> FileList {
        self.list
    }
}

pub fn normalize_path(path: &str) -> Result<String> {
    let invalid = |reason| Error::InvalidPath {
        path: path.to_string(),
        reason,
    };

    let normalized = path.replace('\\', "/");
    if normalized.is_empty() {
        return Err(invalid("empty path"));
    }
    if normalized.starts_with('/') {
        return Err(invalid("absolute path"));
    }
    let bytes = normalized.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return Err(invalid("absolute path"));
    }

    for component in normalized.split('/') {
        match component {
            "" => return Err(invalid("empty component")),
            "." | ".." => return Err(invalid("relative component")),
            _ => {}
        }
    }

    Ok(normalized)
}

#[derive(Serialize, Deserialize)]
struct RawFileList {
    project_id: String,
    #[serde(default)]
    files: Vec<RawEntry>,
    #[serde(default)]
    folders: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct RawEntry {
    path: String,
    #[serde(flatten)]
    meta: FileMeta,
}

impl TryFrom<RawFileList> for FileList {
    type Error = Error;

    fn try_from(raw: RawFileList) -> Result<Self> {
        let mut builder = FileList::builder(raw.project_id);
        for folder in &raw.folders {
            builder.add_folder(folder)?;
        }
        for entry in raw.files {
            builder.add_file(&entry.path, entry.meta)?;
        }
        Ok(builder.build())
    }
}

impl From<FileList> for RawFileList {
    fn from(list: FileList) -> Self {
        RawFileList {
            project_id: list.project_id,
            files: list
                .files
                .into_iter()
                .map(|(path, meta)| RawEntry { path, meta })
                .collect(),
            folders: list.folders.into_iter().collect(),
        }
    }
}
