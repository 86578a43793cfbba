use anyhow::{bail, Result};
use std::path::Path;

use crate::commands::open_cache;
use crate::core::file_list::FileList;
use crate::core::ignore::IgnoreRules;
use crate::core::listing::{encode, write_listing};
use crate::core::scanner::{scan as scan_project, ScanOptions};
use crate::types::ScanArgs;
use crate::utils::display::{print_box, GREEN};
use crate::utils::fs::format_bytes;
use crate::utils::progress::{bar_callback, create_progress_bar};

pub fn scan(args: &ScanArgs) -> Result<FileList> {
    let project = Path::new(&args.project);
    if !project.exists() {
        bail!("Project not found: {}", project.display());
    }

    let cache = open_cache(args.cache.as_deref())?;

    eprintln!("Scanning {}...", project.display());

    let pb = create_progress_bar(0);
    let on_progress = bar_callback(&pb);
    let options = ScanOptions {
        ignore: IgnoreRules::new(&args.ignore)?,
        checksums: !args.no_checksums,
        cache: cache.as_ref(),
        progress: Some(&on_progress),
        project_id: args.project_id.clone(),
        ..Default::default()
    };
    let list = scan_project(project, &options)?;
    pb.finish_and_clear();

    let destination = match &args.output {
        Some(output) => {
            write_listing(&list, Path::new(output))?;
            output.clone()
        }
        None => {
            println!("{}", String::from_utf8_lossy(&encode(&list, false)?));
            "stdout".to_string()
        }
    };

    print_box(
        "Scan Complete",
        &[
            &format!("Project: {}", list.project_id()),
            &format!("Files: {}", list.len()),
            &format!("Folders: {}", list.folders().count()),
            &format!("Size: {}", format_bytes(list.total_size())),
            &format!("Listing: {}", destination),
        ],
        GREEN,
    );

    Ok(list)
}
