//! ANSI styling helpers for the text frames.
//!
//! Kept deliberately dumb: pure string-in string-out wrappers so that
//! rendering stays deterministic and testable.

const RESET: &str = "\x1b[0m";

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}{}", s, RESET)
}

pub fn faint(s: &str) -> String {
    format!("\x1b[2m{}{}", s, RESET)
}

pub fn green(s: &str) -> String {
    format!("\x1b[32m{}{}", s, RESET)
}

pub fn red(s: &str) -> String {
    format!("\x1b[31m{}{}", s, RESET)
}

pub fn header(s: &str) -> String {
    format!("\x1b[1;32m{}{}", s, RESET)
}

/// Render one list row with a `>` cursor marker and inverse video when
/// selected.
pub fn list_line(selected: bool, text: &str) -> String {
    if selected {
        format!("\x1b[7m> {}{}", text, RESET)
    } else {
        format!("  {}", text)
    }
}
