//! Output helpers for the CLI
//!
//! Colored status lines. Color is only used when the stream is a terminal,
//! so piped output stays plain text.

use std::io::{IsTerminal, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

fn print_prefixed<W: Write + IsTerminal>(mut out: W, color: Color, prefix: &str, msg: &str) {
    if out.is_terminal() {
        let _ = crossterm::execute!(
            out,
            SetForegroundColor(color),
            Print(prefix),
            ResetColor,
            Print(" "),
            Print(msg),
            Print("\n")
        );
    } else {
        let _ = writeln!(out, "{} {}", prefix, msg);
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    print_prefixed(std::io::stdout(), Color::Green, "✓", msg);
}

/// Print `error: <msg>` to stderr, the prefix in red
pub fn print_error(msg: &str) {
    print_prefixed(std::io::stderr(), Color::Red, "error:", msg);
}

/// Print a warning message in yellow to stderr
pub fn print_warning(msg: &str) {
    print_prefixed(std::io::stderr(), Color::Yellow, "⚠", msg);
}

/// Print an informational message in cyan
pub fn print_info(msg: &str) {
    print_prefixed(std::io::stdout(), Color::Cyan, "ℹ", msg);
}
