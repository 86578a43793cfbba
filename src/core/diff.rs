use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::file_list::FileList;

/// Difference between a base and a target [`FileList`].
///
/// Every file path of either list lands in exactly one of `added`,
/// `removed`, `altered` or `unaltered`. Folders are classified the same way,
/// minus `altered`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileListDiff {
    added: BTreeSet<String>,
    removed: BTreeSet<String>,
    altered: BTreeSet<String>,
    unaltered: BTreeSet<String>,
    added_folders: BTreeSet<String>,
    removed_folders: BTreeSet<String>,
    unaltered_folders: BTreeSet<String>,
}

/// Two missing checksums compare equal; a missing one against a present one
/// counts as altered.
pub fn diff(base: &FileList, target: &FileList) -> FileListDiff {
    let mut result = FileListDiff::default();

    for (path, meta) in target.entries() {
        match base.get(path) {
            None => {
                result.added.insert(path.to_string());
            }
            Some(base_meta) if base_meta.checksum != meta.checksum => {
                result.altered.insert(path.to_string());
            }
            Some(_) => {
                result.unaltered.insert(path.to_string());
            }
        }
    }

    result.removed = base
        .paths()
        .filter(|path| !target.contains(path))
        .map(str::to_string)
        .collect();

    for folder in target.folders() {
        if base.contains_folder(folder) {
            result.unaltered_folders.insert(folder.to_string());
        } else {
            result.added_folders.insert(folder.to_string());
        }
    }

    result.removed_folders = base
        .folders()
        .filter(|folder| !target.contains_folder(folder))
        .map(str::to_string)
        .collect();

    result
}

impl FileListDiff {
    pub fn added(&self) -> &BTreeSet<String> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn altered(&self) -> &BTreeSet<String> {
        &self.altered
    }

    pub fn unaltered(&self) -> &BTreeSet<String> {
        &self.unaltered
    }

    pub fn added_folders(&self) -> &BTreeSet<String> {
        &self.added_folders
    }

    pub fn removed_folders(&self) -> &BTreeSet<String> {
        &self.removed_folders
    }

    pub fn unaltered_folders(&self) -> &BTreeSet<String> {
        &self.unaltered_folders
    }

    pub fn clear_removed_paths(&mut self) {
        self.removed.clear();
        self.removed_folders.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.altered.is_empty()
            && self.added_folders.is_empty()
            && self.removed_folders.is_empty()
    }

    pub fn files_to_fetch(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .added
            .iter()
            .chain(self.altered.iter())
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths
    }
}
