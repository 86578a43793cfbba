use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

use crate::commands::{load_file_list, open_cache};
use crate::core::diff::{diff as diff_lists, FileListDiff};
use crate::core::ignore::IgnoreRules;
use crate::core::scanner::ScanOptions;
use crate::types::DiffArgs;
use crate::utils::display::{print_box, GREEN, YELLOW};

const LISTED_PER_SECTION: usize = 10;

pub fn diff(args: &DiffArgs) -> Result<FileListDiff> {
    let base_path = Path::new(&args.base);
    let target_path = Path::new(&args.target);

    let cache = open_cache(args.cache.as_deref())?;
    let options = ScanOptions {
        ignore: IgnoreRules::new(&args.ignore)?,
        cache: cache.as_ref(),
        ..Default::default()
    };

    eprintln!("Comparing...");
    eprintln!("Base: {}", base_path.display());
    eprintln!("Target: {}", target_path.display());

    let base = load_file_list(base_path, &options)?;
    let target = load_file_list(target_path, &options)?;

    let mut result = diff_lists(&base, &target);
    if args.partial {
        result.clear_removed_paths();
    }

    for path in result.added() {
        println!("A {}", path);
    }
    for path in result.altered() {
        println!("M {}", path);
    }
    for path in result.removed() {
        println!("D {}", path);
    }
    for folder in result.added_folders() {
        println!("A {}/", folder);
    }
    for folder in result.removed_folders() {
        println!("D {}/", folder);
    }

    let mut summary_lines = vec![
        format!("Unchanged: {}", result.unaltered().len()),
        format!("Added: {}", result.added().len()),
        format!("Modified: {}", result.altered().len()),
        format!("Removed: {}", result.removed().len()),
        format!("To fetch: {}", result.files_to_fetch().len()),
    ];
    if args.partial {
        summary_lines.push("(partial sharing: removals ignored)".to_string());
    }

    push_section(&mut summary_lines, "Added files:", "A", result.added());
    push_section(&mut summary_lines, "Modified files:", "M", result.altered());
    push_section(&mut summary_lines, "Removed files:", "D", result.removed());

    let is_clean = result.is_empty();
    let color = if is_clean { GREEN } else { YELLOW };

    let line_refs: Vec<&str> = summary_lines.iter().map(|s| s.as_str()).collect();
    print_box("Diff", &line_refs, color);

    if is_clean {
        eprintln!("All files match!");
    }

    Ok(result)
}

fn push_section(lines: &mut Vec<String>, heading: &str, marker: &str, paths: &BTreeSet<String>) {
    if paths.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_string());
    for path in paths.iter().take(LISTED_PER_SECTION) {
        lines.push(format!("  {} {}", marker, path));
    }
    if paths.len() > LISTED_PER_SECTION {
        lines.push(format!("  ... and {} more", paths.len() - LISTED_PER_SECTION));
    }
}
