use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::core::cache::{CachedChecksum, ChecksumCache};
use crate::core::file_list::FileList;
use crate::core::hasher::hash_file;
use crate::core::ignore::{IgnoreRules, IGNORE_FILE};
use crate::error::{Error, Result};
use crate::types::{FileMeta, ProgressCallback};

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

pub struct ScanOptions<'a> {
    pub ignore: IgnoreRules,
    pub checksums: bool,
    pub cache: Option<&'a ChecksumCache>,
    pub cancel: CancelToken,
    pub progress: Option<&'a ProgressCallback<'a>>,
    pub project_id: Option<String>,
}

impl Default for ScanOptions<'_> {
    fn default() -> Self {
        ScanOptions {
            ignore: IgnoreRules::default(),
            checksums: true,
            cache: None,
            cancel: CancelToken::default(),
            progress: None,
            project_id: None,
        }
    }
}

#[derive(Debug)]
struct ScannedFile {
    relative_path: String,
    absolute_path: PathBuf,
    size: u64,
    mtime: i64,
}

/// Any unreadable entry aborts the scan; no partial list is returned.
pub fn scan(project_root: &Path, options: &ScanOptions) -> Result<FileList> {
    if !project_root.exists() {
        return Err(Error::ProjectNotFound(project_root.to_path_buf()));
    }
    if !project_root.is_dir() {
        return Err(Error::NotADirectory(project_root.to_path_buf()));
    }

    // Cache keys are built from walked paths, so they must not depend on cwd.
    let root = project_root.canonicalize().map_err(|source| Error::Read {
        path: project_root.to_path_buf(),
        source,
    })?;

    let mut rules = options.ignore.clone();
    rules.extend_from_file(&root.join(IGNORE_FILE))?;

    let project_id = options
        .project_id
        .clone()
        .unwrap_or_else(|| default_project_id(&root));

    log::debug!("Scanning {} ({} ignore patterns)", root.display(), rules.len());

    let mut folders = Vec::new();
    let mut files = Vec::new();

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            relative_path(&root, entry.path())
                .map(|rel| rel != IGNORE_FILE && !rules.is_ignored(&rel))
                .unwrap_or(true)
        });

    for entry in walker {
        options.cancel.check()?;
        let entry = entry?;
        let Some(rel) = relative_path(&root, entry.path()) else {
            continue;
        };

        if entry.file_type().is_dir() {
            folders.push(rel);
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry.metadata()?;
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        files.push(ScannedFile {
            relative_path: rel,
            absolute_path: entry.path().to_path_buf(),
            size: metadata.len(),
            mtime,
        });
    }

    let checksums = if options.checksums {
        compute_checksums(&files, options)?
    } else {
        vec![None; files.len()]
    };

    let mut builder = FileList::builder(project_id);
    for folder in &folders {
        builder.add_folder(folder)?;
    }
    for (file, checksum) in files.iter().zip(checksums) {
        builder.add_file(
            &file.relative_path,
            FileMeta {
                checksum,
                size: file.size,
            },
        )?;
    }
    let list = builder.build();

    log::debug!(
        "Scanned {}: {} files, {} folders",
        root.display(),
        list.len(),
        folders.len()
    );

    Ok(list)
}

fn compute_checksums(files: &[ScannedFile], options: &ScanOptions) -> Result<Vec<Option<String>>> {
    let total = files.len();
    let mut checksums: Vec<Option<String>> = Vec::with_capacity(total);

    if let Some(cache) = options.cache {
        for file in files {
            options.cancel.check()?;
            checksums.push(cache.get(&cache_key(file), file.size, file.mtime)?);
        }
    } else {
        checksums.resize(total, None);
    }

    let misses: Vec<usize> = (0..total).filter(|&i| checksums[i].is_none()).collect();
    let hits = total - misses.len();
    if options.cache.is_some() {
        log::debug!("Checksum cache: {} hits, {} misses", hits, misses.len());
    }

    let processed = AtomicUsize::new(hits);
    if let Some(progress) = options.progress {
        progress(hits, total, "Hashing files...");
    }

    let hashed: Vec<(usize, String)> = misses
        .par_iter()
        .map(|&i| -> Result<(usize, String)> {
            options.cancel.check()?;
            let file = &files[i];
            let checksum = hash_file(&file.absolute_path)?;

            let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(progress) = options.progress {
                progress(count, total, &file.relative_path);
            }
            Ok((i, checksum))
        })
        .collect::<Result<_>>()?;

    if let Some(cache) = options.cache {
        let fresh: Vec<CachedChecksum> = hashed
            .iter()
            .map(|(i, checksum)| CachedChecksum {
                path: cache_key(&files[*i]),
                size: files[*i].size,
                mtime: files[*i].mtime,
                checksum: checksum.clone(),
            })
            .collect();
        cache.put_all(&fresh)?;
    }

    for (i, checksum) in hashed {
        checksums[i] = Some(checksum);
    }

    Ok(checksums)
}

fn cache_key(file: &ScannedFile) -> String {
    file.absolute_path.to_string_lossy().to_string()
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = rel.to_string_lossy().replace('\\', "/");
    if rel.is_empty() {
        None
    } else {
        Some(rel)
    }
}

fn default_project_id(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::hash_buffer;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_scan_records_paths_and_checksums() {
        let dir = project(&[("a.txt", "alpha"), ("src/lib.rs", "fn x() {}")]);
        fs::create_dir(dir.path().join("empty")).unwrap();

        let list = scan(dir.path(), &ScanOptions::default()).unwrap();

        assert_eq!(list.paths().collect::<Vec<_>>(), vec!["a.txt", "src/lib.rs"]);
        assert_eq!(list.folders().collect::<Vec<_>>(), vec!["empty", "src"]);
        assert_eq!(list.checksum("a.txt"), Some(hash_buffer(b"alpha").as_str()));
        assert_eq!(list.get("a.txt").unwrap().size, 5);
        assert_eq!(list.total_size(), 5 + 9);
    }

    #[test]
    fn test_project_id() {
        let dir = project(&[("a", "1")]);
        let expected = dir
            .path()
            .canonicalize()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        let list = scan(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(list.project_id(), expected);

        let options = ScanOptions {
            project_id: Some("shared".to_string()),
            ..Default::default()
        };
        assert_eq!(scan(dir.path(), &options).unwrap().project_id(), "shared");
    }

    #[test]
    fn test_without_checksums() {
        let dir = project(&[("a", "1")]);
        let options = ScanOptions {
            checksums: false,
            ..Default::default()
        };
        let list = scan(dir.path(), &options).unwrap();
        assert!(list.contains("a"));
        assert_eq!(list.checksum("a"), None);
    }

    #[test]
    fn test_ignore_patterns_and_ignore_file() {
        let dir = project(&[
            ("src/main.rs", "main"),
            ("target/debug/app", "bin"),
            ("bin/Main.class", "class"),
            ("notes.tmp", "tmp"),
            (IGNORE_FILE, "*.tmp\n"),
        ]);
        let options = ScanOptions {
            ignore: IgnoreRules::new(["target", "*.class"]).unwrap(),
            ..Default::default()
        };
        let list = scan(dir.path(), &options).unwrap();

        assert_eq!(list.paths().collect::<Vec<_>>(), vec!["src/main.rs"]);
        assert!(!list.contains_folder("target"));
        assert!(list.contains_folder("bin"));
    }

    #[test]
    fn test_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan(&dir.path().join("missing"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));
    }

    #[test]
    fn test_not_a_directory() {
        let dir = project(&[("file", "x")]);
        let err = scan(&dir.path().join("file"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NotADirectory(_)));
    }

    #[test]
    fn test_cancelled_scan_returns_no_list() {
        let dir = project(&[("a", "1"), ("b", "2")]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let options = ScanOptions {
            cancel: cancel.clone(),
            ..Default::default()
        };
        let err = scan(dir.path(), &options).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_cache_is_filled_and_reused() {
        let dir = project(&[("a", "one"), ("b", "two")]);
        let cache = ChecksumCache::in_memory().unwrap();
        let options = ScanOptions {
            cache: Some(&cache),
            ..Default::default()
        };

        let first = scan(dir.path(), &options).unwrap();
        assert_eq!(cache.len().unwrap(), 2);

        let second = scan(dir.path(), &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_hit_is_trusted() {
        let dir = project(&[("a", "one")]);
        let cache = ChecksumCache::in_memory().unwrap();
        let options = ScanOptions {
            cache: Some(&cache),
            ..Default::default()
        };
        scan(dir.path(), &options).unwrap();

        let file = dir.path().canonicalize().unwrap().join("a");
        let metadata = fs::metadata(&file).unwrap();
        let mtime = metadata
            .modified()
            .unwrap()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        cache
            .put_all(&[CachedChecksum {
                path: file.to_string_lossy().to_string(),
                size: metadata.len(),
                mtime,
                checksum: "from-cache".to_string(),
            }])
            .unwrap();

        let list = scan(dir.path(), &options).unwrap();
        assert_eq!(list.checksum("a"), Some("from-cache"));
    }

    #[test]
    fn test_progress_reaches_total() {
        let dir = project(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let seen = std::sync::Mutex::new(Vec::new());
        {
            let progress = |current: usize, total: usize, _msg: &str| {
                seen.lock().unwrap().push((current, total));
            };
            let options = ScanOptions {
                progress: Some(&progress),
                ..Default::default()
            };
            scan(dir.path(), &options).unwrap();
        }

        let seen = seen.into_inner().unwrap();
        assert!(seen.contains(&(3, 3)));
        assert!(seen.iter().all(|&(_, total)| total == 3));
    }
}
