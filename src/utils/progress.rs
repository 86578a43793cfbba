use indicatif::{ProgressBar, ProgressStyle};

pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "[{bar:30.cyan/dim}] {percent}% ({pos}/{len}) {elapsed_precise} - {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█░░");
    pb.set_style(style);
    pb
}

pub fn bar_callback(pb: &ProgressBar) -> impl Fn(usize, usize, &str) + Send + Sync + '_ {
    move |current, total, msg| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
        pb.set_message(truncate(msg, 40).to_string());
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
