//! Status lines printed between prompts

use crate::theme::Theme;
use std::io::{self, Write};

/// Below this width the text moves to its own indented line
const NARROW_COLUMNS: usize = 80;

/// Print an informational status line, e.g. `◼  Nice! Git has already been initialized`
pub fn info<W: Write>(
    out: &mut W,
    theme: &Theme,
    columns: usize,
    prefix: &str,
    text: &str,
) -> io::Result<()> {
    let marker = theme.cyan(theme.info_marker());
    let prefix = theme.cyan(prefix);
    let text = theme.dim(text);
    status_line(out, columns, &marker, &prefix, &text)
}

/// Print an error status line
pub fn error<W: Write>(
    out: &mut W,
    theme: &Theme,
    columns: usize,
    prefix: &str,
    text: &str,
) -> io::Result<()> {
    let marker = theme.red(theme.error_marker());
    let prefix = theme.red(prefix);
    status_line(out, columns, &marker, &prefix, text)
}

fn status_line<W: Write>(
    out: &mut W,
    columns: usize,
    marker: &str,
    prefix: &str,
    text: &str,
) -> io::Result<()> {
    if columns < NARROW_COLUMNS {
        writeln!(out, "{} {}  {}", " ".repeat(5), marker, prefix)?;
        writeln!(out, "{}{}", " ".repeat(9), text)
    } else {
        writeln!(out, "{} {}  {} {}", " ".repeat(5), marker, prefix, text)
    }
}
