/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Diff color:
/// \>0 → green
/// \<0 → red
/// 0 or undefined → reset
pub fn color_for_diff(value: Option<i64>) -> &'static str {
    match value {
        Some(v) if v > 0 => GREEN,
        Some(v) if v < 0 => RED,
        _ => RESET,
    }
}

/// Grey out placeholders (`--:--`, `--`), leave real values untouched.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--:--" || v == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
