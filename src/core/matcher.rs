use rayon::prelude::*;
use std::path::Path;

use crate::core::file_list::FileList;
use crate::core::scanner::{scan, ScanOptions};
use crate::error::Result;
use crate::types::ScanMatch;

pub const DEFAULT_MATCH_THRESHOLD: u8 = 80;

pub struct MatchOptions<'a> {
    pub threshold: u8,
    pub scan: ScanOptions<'a>,
}

impl Default for MatchOptions<'_> {
    fn default() -> Self {
        MatchOptions {
            threshold: DEFAULT_MATCH_THRESHOLD,
            scan: ScanOptions::default(),
        }
    }
}

pub fn score(remote: &FileList, local: &FileList) -> u8 {
    let total = remote.len() as u64;
    if total == 0 {
        return 0;
    }

    let matching = remote
        .entries()
        .filter(|(path, meta)| {
            local
                .get(path)
                .is_some_and(|local_meta| local_meta.checksum == meta.checksum)
        })
        .count() as u64;

    (matching * 100 / total) as u8
}

pub fn compute_match(remote: &FileList, local_project: &Path, options: &ScanOptions) -> Result<u8> {
    let local = scan(local_project, options)?;
    let result = score(remote, &local);
    log::debug!("{} matches {}%", local_project.display(), result);
    Ok(result)
}

pub fn rank_candidates<P>(
    candidates: &[P],
    remote: &FileList,
    options: &ScanOptions,
) -> Result<Vec<ScanMatch>>
where
    P: AsRef<Path> + Sync,
{
    candidates
        .par_iter()
        .map(|candidate| {
            let path = candidate.as_ref();
            compute_match(remote, path, options).map(|score| ScanMatch {
                path: path.to_path_buf(),
                score,
            })
        })
        .collect()
}

/// Highest score strictly above `threshold`. Ties go to the earliest candidate.
pub fn select_best(scored: &[ScanMatch], threshold: u8) -> Option<&ScanMatch> {
    scored
        .iter()
        .filter(|m| m.score > threshold)
        .fold(None, |best: Option<&ScanMatch>, m| match best {
            Some(b) if b.score >= m.score => Some(b),
            _ => Some(m),
        })
}

pub fn best_scan_match<P>(
    candidates: &[P],
    remote: &FileList,
    options: &MatchOptions,
) -> Result<Option<ScanMatch>>
where
    P: AsRef<Path> + Sync,
{
    let scored = rank_candidates(candidates, remote, &options.scan)?;
    let best = select_best(&scored, options.threshold).cloned();

    match &best {
        Some(m) => log::info!("Best match: {} ({}%)", m.path.display(), m.score),
        None => log::info!(
            "No candidate exceeds {}%, starting from scratch",
            options.threshold
        ),
    }

    Ok(best)
}
