//! Prompt state machines
//!
//! Every prompt kind implements [`Prompt`]: it consumes [`Action`]s, reports
//! its [`Status`], and renders its current state as a [`Frame`]. The runner
//! owns the single loop that drives any of them.

mod confirm;
mod multiselect;
mod select;
mod text;

pub use confirm::ConfirmPrompt;
pub use multiselect::MultiSelectPrompt;
pub use select::SelectPrompt;
pub use text::TextPrompt;

use crate::action::Action;
use crate::ansi;
use crate::render::Frame;
use crate::spec::{PromptKind, PromptSpec, Value};
use crate::theme::Theme;
use tokio::time::Instant;

/// Below this width hints move to their own line
const NARROW_COLUMNS: usize = 80;

/// Lifecycle state of a prompt instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Done,
    Aborted,
}

/// What the driver has to do after an action was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing visible changed
    None,
    Redraw,
    /// The action was not valid here
    Bell,
    /// Check this value before finishing. Report back through [`Prompt::validated`].
    Validate(String),
}

/// How a prompt instance ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Submitted(Value),
    Aborted,
    /// Input ended before the prompt finished
    Exited,
}

/// State emitted to observers after every change
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub value: Value,
    pub aborted: bool,
    pub exited: bool,
}

/// Behaviour shared by all prompt kinds
pub trait Prompt {
    fn kind(&self) -> PromptKind;

    /// Apply one action. Once the prompt has finished, actions are ignored.
    fn update(&mut self, action: Action) -> Effect;

    fn frame(&self, theme: &Theme, columns: usize) -> Frame;

    fn status(&self) -> Status;

    /// The value this prompt currently resolves to
    fn value(&self) -> Value;

    /// Result of the check requested with [`Effect::Validate`]
    fn validated(&mut self, _result: Result<(), String>) {}

    /// When a pending timer fires, if any
    fn deadline(&self) -> Option<Instant> {
        None
    }

    /// Called once [`Prompt::deadline`] has passed
    fn expire(&mut self) {}

    fn is_terminal(&self) -> bool {
        self.status() != Status::Active
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            value: self.value(),
            aborted: self.status() == Status::Aborted,
            exited: false,
        }
    }
}

/// The message line every prompt starts with
#[derive(Debug, Clone)]
struct Header {
    label: String,
    message: String,
    hint: Option<String>,
}

impl Header {
    fn from_spec(spec: &PromptSpec) -> Self {
        Self {
            label: spec.label.clone(),
            message: spec.message.clone(),
            hint: spec.hint.clone(),
        }
    }

    /// `\n<label> <message> (hint)\n`; the hint is dropped once the prompt is done.
    fn render(&self, theme: &Theme, columns: usize, done: bool) -> String {
        let hint = match (&self.hint, done) {
            (Some(hint), false) => {
                let wrap = if columns < NARROW_COLUMNS {
                    format!("\n{}", " ".repeat(8))
                } else {
                    String::new()
                };
                format!("{}{}", wrap, theme.dim(&format!(" ({})", hint)))
            }
            _ => String::new(),
        };
        format!("\n{} {}{}\n", self.label, self.message, hint)
    }

    /// Blank space as wide as the label, aligning answers under the message
    fn indent(&self) -> String {
        " ".repeat(ansi::visible_length(&self.label))
    }
}

/// Step a list cursor by one with wrap-around
fn wrap_up(cursor: usize, len: usize) -> usize {
    if cursor == 0 {
        len - 1
    } else {
        cursor - 1
    }
}

fn wrap_down(cursor: usize, len: usize) -> usize {
    if cursor + 1 >= len {
        0
    } else {
        cursor + 1
    }
}

/// Position of `initial` among `values`, falling back to the first entry
fn initial_index<'a>(mut values: impl Iterator<Item = &'a Value>, initial: Option<&Value>) -> usize {
    initial
        .and_then(|initial| values.position(|v| v == initial))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_around() {
        assert_eq!(wrap_up(0, 3), 2);
        assert_eq!(wrap_up(2, 3), 1);
        assert_eq!(wrap_down(2, 3), 0);
        assert_eq!(wrap_down(0, 1), 0);
    }

    #[test]
    fn test_header_hint_wraps_when_narrow() {
        let spec = PromptSpec::text("dir", "Where?").label("dir").hint("relative");
        let header = Header::from_spec(&spec);
        assert_eq!(
            header.render(&Theme::PLAIN, 120, false),
            "\ndir Where? (relative)\n"
        );
        assert_eq!(
            header.render(&Theme::PLAIN, 60, false),
            "\ndir Where?\n         (relative)\n"
        );
        assert_eq!(header.render(&Theme::PLAIN, 120, true), "\ndir Where?\n");
    }
}
