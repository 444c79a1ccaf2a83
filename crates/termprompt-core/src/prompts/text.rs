//! Free-text input with a caret, placeholder default and validation

use super::{Effect, Header, Prompt, Status};
use crate::action::Action;
use crate::render::Frame;
use crate::spec::{PromptKind, PromptSpec, Value};
use crate::theme::Theme;

/// Shown when a validator rejects without saying why
const DEFAULT_ERROR: &str = "Please enter a valid value";

pub struct TextPrompt {
    header: Header,
    initial: String,
    value: Vec<char>,
    /// Caret position, in characters, within `0..=value.len()`
    cursor: usize,
    error: Option<String>,
    validating: bool,
    status: Status,
}

impl TextPrompt {
    pub fn new(spec: &PromptSpec) -> Self {
        Self {
            header: Header::from_spec(spec),
            initial: spec
                .initial
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            value: Vec::new(),
            cursor: 0,
            error: None,
            validating: false,
            status: Status::Active,
        }
    }

    /// The initial value stands in, dimmed, while nothing has been typed
    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty() && !self.initial.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn text(&self) -> String {
        self.value.iter().collect()
    }

    fn set_text(&mut self, text: &str) {
        self.value = text.chars().collect();
        self.cursor = self.value.len();
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}

impl Prompt for TextPrompt {
    fn kind(&self) -> PromptKind {
        PromptKind::Text
    }

    fn update(&mut self, action: Action) -> Effect {
        if self.status != Status::Active {
            return Effect::None;
        }
        if self.validating && action != Action::Abort {
            return Effect::None;
        }

        match action {
            Action::CharInput(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += 1;
                self.clear_error();
                Effect::Redraw
            }
            Action::Delete => {
                if self.cursor == 0 {
                    return Effect::Bell;
                }
                self.value.remove(self.cursor - 1);
                self.cursor -= 1;
                self.clear_error();
                Effect::Redraw
            }
            Action::DeleteForward => {
                if self.is_placeholder() || self.cursor >= self.value.len() {
                    return Effect::Bell;
                }
                self.value.remove(self.cursor);
                self.clear_error();
                Effect::Redraw
            }
            Action::MoveLeft => {
                if self.is_placeholder() || self.cursor == 0 {
                    return Effect::Bell;
                }
                self.cursor -= 1;
                Effect::Redraw
            }
            Action::MoveRight => {
                if self.is_placeholder() || self.cursor >= self.value.len() {
                    return Effect::Bell;
                }
                self.cursor += 1;
                Effect::Redraw
            }
            Action::First => {
                self.cursor = 0;
                Effect::Redraw
            }
            Action::Last => {
                self.cursor = self.value.len();
                Effect::Redraw
            }
            Action::Reset => {
                self.value.clear();
                self.cursor = 0;
                self.clear_error();
                Effect::Redraw
            }
            Action::Next => {
                // Tab accepts the placeholder as typed text
                if !self.is_placeholder() {
                    return Effect::Bell;
                }
                let initial = self.initial.clone();
                self.set_text(&initial);
                Effect::Redraw
            }
            Action::Submit => {
                if self.value.is_empty() {
                    let initial = self.initial.clone();
                    self.set_text(&initial);
                }
                self.cursor = self.value.len();
                self.validating = true;
                Effect::Validate(self.text())
            }
            Action::Abort => {
                if self.value.is_empty() {
                    let initial = self.initial.clone();
                    self.set_text(&initial);
                }
                self.validating = false;
                self.clear_error();
                self.status = Status::Aborted;
                Effect::Redraw
            }
            Action::MoveUp | Action::MoveDown | Action::NoOp => Effect::None,
        }
    }

    fn validated(&mut self, result: Result<(), String>) {
        if !self.validating || self.status != Status::Active {
            return;
        }
        self.validating = false;
        match result {
            Ok(()) => {
                self.clear_error();
                self.status = Status::Done;
            }
            Err(message) if message.is_empty() => self.error = Some(DEFAULT_ERROR.to_string()),
            Err(message) => self.error = Some(message),
        }
    }

    fn frame(&self, theme: &Theme, columns: usize) -> Frame {
        let done = self.status != Status::Active;
        let shown = if self.is_placeholder() {
            theme.dim(&self.initial)
        } else if done {
            theme.dim(&self.text())
        } else {
            self.text()
        };

        let body = format!(
            "{}{} {}",
            self.header.render(theme, columns, done),
            self.header.indent(),
            shown
        );

        let below = match &self.error {
            Some(message) => format!(
                "\n  {}",
                theme.bright_red(&format!("{} {}", theme.pointer(), message))
            ),
            None => String::new(),
        };

        let caret = if done {
            0
        } else if self.is_placeholder() {
            -(self.initial.chars().count() as isize)
        } else {
            -((self.value.len() - self.cursor) as isize)
        };

        Frame {
            body,
            below,
            caret,
            hide_cursor: false,
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn value(&self) -> Value {
        Value::Text(self.text())
    }
}
