//! Single choice from a list, with type-ahead search

use super::{initial_index, wrap_down, wrap_up, Effect, Header, Prompt, Status};
use crate::action::Action;
use crate::error::{PromptError, Result};
use crate::render::Frame;
use crate::spec::{Choice, PromptKind, PromptSpec, Value};
use crate::theme::Theme;
use std::time::Duration;
use tokio::time::Instant;

/// Inactivity after which the type-ahead buffer is forgotten
pub const SEARCH_TIMEOUT: Duration = Duration::from_millis(500);

pub struct SelectPrompt {
    header: Header,
    choices: Vec<Choice>,
    initial: usize,
    cursor: usize,
    search: Option<String>,
    search_deadline: Option<Instant>,
    status: Status,
}

impl SelectPrompt {
    pub fn new(spec: &PromptSpec) -> Result<Self> {
        if spec.choices.is_empty() {
            return Err(PromptError::NoChoices {
                name: spec.name.clone(),
            });
        }

        let initial = initial_index(spec.choices.iter().map(|c| &c.value), spec.initial.as_ref());
        Ok(Self {
            header: Header::from_spec(spec),
            choices: spec.choices.clone(),
            initial,
            cursor: initial,
            search: None,
            search_deadline: None,
            status: Status::Active,
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn clear_search(&mut self) {
        self.search = None;
        self.search_deadline = None;
    }

    fn finish(&mut self, status: Status) -> Effect {
        self.clear_search();
        self.status = status;
        Effect::Redraw
    }

    /// Extend the search buffer and jump to the first matching label.
    ///
    /// A fresh search starts at the highlighted choice; a continued one scans
    /// the whole list.
    fn type_ahead(&mut self, c: char) -> Effect {
        let fresh = self.search.is_none();
        let search = self.search.get_or_insert_with(String::new);
        search.extend(c.to_lowercase());

        let start = if fresh { self.cursor } else { 0 };
        let found = self.choices[start..]
            .iter()
            .position(|choice| choice.label.to_lowercase().contains(search.as_str()))
            .map(|n| n + start);
        if let Some(index) = found {
            self.cursor = index;
        }

        self.search_deadline = Some(Instant::now() + SEARCH_TIMEOUT);
        Effect::Redraw
    }

    /// Underline the part of `label` matched by the search buffer
    fn highlight(&self, theme: &Theme, label: &str) -> String {
        let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) else {
            return label.to_string();
        };
        let lower = label.to_lowercase();
        // Lowercasing can change byte lengths; only underline when offsets line up
        if lower.len() != label.len() {
            return label.to_string();
        }
        match lower.find(search) {
            Some(start) => {
                let end = start + search.len();
                format!(
                    "{}{}{}",
                    &label[..start],
                    theme.underline(&label[start..end]),
                    &label[end..]
                )
            }
            None => label.to_string(),
        }
    }
}

impl Prompt for SelectPrompt {
    fn kind(&self) -> PromptKind {
        PromptKind::Select
    }

    fn update(&mut self, action: Action) -> Effect {
        if self.status != Status::Active {
            return Effect::None;
        }

        let len = self.choices.len();
        match action {
            Action::MoveUp => {
                self.cursor = wrap_up(self.cursor, len);
                Effect::Redraw
            }
            Action::MoveDown => {
                self.cursor = wrap_down(self.cursor, len);
                Effect::Redraw
            }
            Action::First | Action::Reset => {
                self.cursor = 0;
                Effect::Redraw
            }
            Action::Last => {
                self.cursor = len - 1;
                Effect::Redraw
            }
            Action::Delete => {
                self.clear_search();
                Effect::Redraw
            }
            Action::CharInput(c) => match c.to_digit(10) {
                Some(n) => {
                    self.clear_search();
                    let n = n as usize;
                    if n == 0 || n > len {
                        return Effect::Bell;
                    }
                    self.cursor = n - 1;
                    self.finish(Status::Done)
                }
                None => self.type_ahead(c),
            },
            Action::Submit => self.finish(Status::Done),
            Action::Abort => {
                self.cursor = self.initial;
                self.finish(Status::Aborted)
            }
            _ => Effect::None,
        }
    }

    fn frame(&self, theme: &Theme, columns: usize) -> Frame {
        let done = self.status != Status::Active;
        let mut body = self.header.render(theme, columns, done);
        let indent = self.header.indent();

        if done {
            body.push_str(&format!(
                "{} {}",
                indent,
                theme.dim(&self.choices[self.cursor].label)
            ));
        } else {
            let rows: Vec<String> = self
                .choices
                .iter()
                .enumerate()
                .map(|(i, choice)| {
                    if i == self.cursor {
                        format!(
                            "{} {} {} {}",
                            indent,
                            theme.green(theme.active()),
                            self.highlight(theme, &choice.label),
                            choice.hint.as_deref().map(|h| theme.dim(h)).unwrap_or_default()
                        )
                    } else {
                        theme.dim(&format!("{} {} {} ", indent, theme.inactive(), choice.label))
                    }
                })
                .collect();
            body.push_str(&rows.join("\n"));
        }

        Frame {
            body,
            hide_cursor: true,
            ..Frame::default()
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn value(&self) -> Value {
        self.choices[self.cursor].value.clone()
    }

    fn deadline(&self) -> Option<Instant> {
        self.search_deadline
    }

    fn expire(&mut self) {
        self.clear_search();
    }
}
