pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

pub fn print_box(title: &str, lines: &[&str], color: &str) {
    let reset = "\x1b[0m";
    let max_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title.len() + 4);
    let width = max_width + 2;

    eprintln!(
        "{}┌─ {} {}─┐{}",
        color,
        title,
        "─".repeat(width.saturating_sub(title.len() + 4)),
        reset
    );
    for line in lines {
        eprintln!(
            "{}│{} {}{:<pad$} {}│{}",
            color,
            reset,
            line,
            "",
            color,
            reset,
            pad = width.saturating_sub(line.chars().count() + 1)
        );
    }
    eprintln!("{}└{}┘{}", color, "─".repeat(width), reset);
}
