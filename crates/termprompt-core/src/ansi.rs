//! Visible-width accounting for strings carrying control sequences
//!
//! Rendered frames mix plain text with color/formatting codes. Erasing a
//! frame means knowing how many terminal rows it covered, which depends only
//! on the visible characters.

use std::borrow::Cow;

/// Remove every control/escape sequence from `s`.
///
/// Stripping is idempotent: `strip(&strip(s)) == strip(s)`.
pub fn strip(s: &str) -> Cow<'_, str> {
    console::strip_ansi_codes(s)
}

/// Number of visible characters in `s`.
pub fn visible_length(s: &str) -> usize {
    strip(s).chars().count()
}

/// Number of terminal rows `s` occupies when printed at `columns` width.
///
/// A `columns` of zero means the width is unknown; the text is then treated
/// as a single row.
pub fn rows_for(s: &str, columns: usize) -> usize {
    if columns == 0 {
        return 1;
    }

    s.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| 1 + visible_length(line).saturating_sub(1) / columns)
        .sum()
}
