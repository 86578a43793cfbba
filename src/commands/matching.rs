use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::commands::open_cache;
use crate::core::ignore::IgnoreRules;
use crate::core::listing::read_listing;
use crate::core::matcher::{rank_candidates, select_best};
use crate::core::scanner::ScanOptions;
use crate::types::{MatchArgs, ScanMatch};
use crate::utils::display::{print_box, CYAN, GREEN};

pub fn matching(args: &MatchArgs) -> Result<Option<ScanMatch>> {
    if args.candidates.is_empty() {
        bail!("No candidate projects given");
    }
    if args.threshold > 100 {
        bail!("Threshold must be between 0 and 100, got {}", args.threshold);
    }

    let remote_path = Path::new(&args.remote);
    let remote = read_listing(remote_path)
        .with_context(|| format!("failed to load remote listing {}", remote_path.display()))?;

    let cache = open_cache(args.cache.as_deref())?;
    let options = ScanOptions {
        ignore: IgnoreRules::new(&args.ignore)?,
        cache: cache.as_ref(),
        ..Default::default()
    };

    eprintln!(
        "Matching {} candidates against {} ({} files)...",
        args.candidates.len(),
        remote.project_id(),
        remote.len()
    );

    let scored = rank_candidates(&args.candidates, &remote, &options)?;
    for m in &scored {
        println!("{:>3}% {}", m.score, m.path.display());
    }

    let best = select_best(&scored, args.threshold).cloned();
    match &best {
        Some(m) => print_box(
            "Best Match",
            &[
                &format!("Project: {}", m.path.display()),
                &format!("Score: {}%", m.score),
                &format!("Threshold: {}%", args.threshold),
            ],
            GREEN,
        ),
        None => print_box(
            "No Match",
            &[
                &format!("No candidate exceeds {}%", args.threshold),
                "The project will be fetched from scratch.",
            ],
            CYAN,
        ),
    }

    Ok(best)
}
