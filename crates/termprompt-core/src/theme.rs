//! Color and glyph capabilities for rendering
//!
//! Styling is decided per [`Theme`] instead of per process, so one binary
//! can render plain frames into a log file and colored frames to a terminal.

use console::Style;

/// Width that [`Theme::tag`] right-aligns its tag to
pub const TAG_WIDTH: usize = 7;

/// Rendering capabilities of the output terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Emit color/formatting codes
    pub color: bool,
    /// Restrict glyphs to ASCII
    pub ascii: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}

impl Theme {
    /// Plain ASCII output without color codes
    pub const PLAIN: Theme = Theme {
        color: false,
        ascii: true,
    };

    /// Detect capabilities from the environment.
    ///
    /// Color follows the terminal and `NO_COLOR`; glyphs fall back to ASCII on
    /// Windows consoles.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            color: console::colors_enabled() && !no_color,
            ascii: cfg!(windows),
        }
    }

    fn style(&self) -> Style {
        Style::new().force_styling(self.color)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        style.apply_to(text).to_string()
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(self.style().dim(), text)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(self.style().green(), text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(self.style().cyan(), text)
    }

    pub fn bright_cyan(&self, text: &str) -> String {
        self.paint(self.style().cyan().bright(), text)
    }

    pub fn bright_white(&self, text: &str) -> String {
        self.paint(self.style().white().bright(), text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(self.style().red(), text)
    }

    pub fn bright_red(&self, text: &str) -> String {
        self.paint(self.style().red().bright(), text)
    }

    pub fn underline(&self, text: &str) -> String {
        self.paint(self.style().underlined(), text)
    }

    pub fn inverse(&self, text: &str) -> String {
        self.paint(self.style().reverse(), text)
    }

    /// A short label set off as a bright-blue tag, right-aligned to
    /// [`TAG_WIDTH`] columns and followed by a space.
    pub fn tag(&self, text: &str) -> String {
        let boxed = format!(" {} ", text);
        let pad = TAG_WIDTH.saturating_sub(crate::ansi::visible_length(&boxed));
        let style = self.style().white().bright().on_blue().on_bright();
        format!("{}{} ", " ".repeat(pad), self.paint(style, &boxed))
    }

    /// Marker for the highlighted choice of a select or confirm prompt
    pub fn active(&self) -> &'static str {
        if self.ascii {
            ">"
        } else {
            "●"
        }
    }

    pub fn inactive(&self) -> &'static str {
        if self.ascii {
            "-"
        } else {
            "○"
        }
    }

    /// Row pointer in a multiselect list, and the error-line marker
    pub fn pointer(&self) -> &'static str {
        if self.ascii {
            ">"
        } else {
            "▶"
        }
    }

    pub fn checked(&self) -> &'static str {
        if self.ascii {
            "[x]"
        } else {
            "■"
        }
    }

    pub fn unchecked(&self) -> &'static str {
        if self.ascii {
            "[ ]"
        } else {
            "□"
        }
    }

    /// Finished-step mark
    pub fn tick(&self) -> &'static str {
        if self.ascii {
            "v"
        } else {
            "✔"
        }
    }

    pub fn info_marker(&self) -> &'static str {
        if self.ascii {
            "*"
        } else {
            "◼"
        }
    }

    pub fn error_marker(&self) -> &'static str {
        if self.ascii {
            "!"
        } else {
            "▲"
        }
    }
}
