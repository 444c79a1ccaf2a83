//! Any number of choices from a list
//!
//! Space and Enter both toggle the highlighted choice; only `c` finishes.

use super::{initial_index, wrap_down, wrap_up, Effect, Header, Prompt, Status};
use crate::action::Action;
use crate::error::{PromptError, Result};
use crate::render::Frame;
use crate::spec::{Choice, PromptKind, PromptSpec, Value};
use crate::theme::Theme;

#[derive(Debug, Clone)]
struct Item {
    choice: Choice,
    selected: bool,
}

pub struct MultiSelectPrompt {
    header: Header,
    items: Vec<Item>,
    initial: usize,
    cursor: usize,
    status: Status,
}

impl MultiSelectPrompt {
    pub fn new(spec: &PromptSpec) -> Result<Self> {
        if spec.choices.is_empty() {
            return Err(PromptError::NoChoices {
                name: spec.name.clone(),
            });
        }

        let initial = initial_index(spec.choices.iter().map(|c| &c.value), spec.initial.as_ref());
        Ok(Self {
            header: Header::from_spec(spec),
            items: spec
                .choices
                .iter()
                .map(|choice| Item {
                    choice: choice.clone(),
                    selected: false,
                })
                .collect(),
            initial,
            cursor: initial,
            status: Status::Active,
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|item| item.selected)
    }

    fn toggle(&mut self) -> Effect {
        let item = &mut self.items[self.cursor];
        item.selected = !item.selected;
        Effect::Redraw
    }

    fn finished_frame(&self, indent: &str, theme: &Theme) -> String {
        self.items
            .iter()
            .filter(|item| item.selected)
            .map(|item| format!("{} {}", indent, theme.dim(&item.choice.label)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn active_frame(&self, indent: &str, theme: &Theme) -> String {
        let pointer_indent = &indent[..indent.len().saturating_sub(2)];
        let mut rows: Vec<String> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let label = &item.choice.label;
                if i == self.cursor {
                    let mark = if item.selected {
                        theme.green(theme.checked())
                    } else {
                        theme.bright_white(theme.unchecked())
                    };
                    format!(
                        "{}{}  {} {} {}",
                        pointer_indent,
                        theme.bright_cyan(theme.pointer()),
                        mark,
                        theme.underline(label),
                        item.choice.hint.as_deref().map(|h| theme.dim(h)).unwrap_or_default()
                    )
                } else if item.selected {
                    format!("{} {} {} ", indent, theme.green(theme.checked()), label)
                } else {
                    theme.dim(&format!("{} {} {} ", indent, theme.unchecked(), label))
                }
            })
            .collect();

        rows.push(format!(
            "\n{} Press {} to continue",
            indent,
            theme.inverse(" C ")
        ));
        rows.join("\n")
    }
}

impl Prompt for MultiSelectPrompt {
    fn kind(&self) -> PromptKind {
        PromptKind::MultiSelect
    }

    fn update(&mut self, action: Action) -> Effect {
        if self.status != Status::Active {
            return Effect::None;
        }

        let len = self.items.len();
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
            // Enter toggles here; finishing takes an explicit `c`
            Action::Submit | Action::CharInput(' ') => self.toggle(),
            Action::CharInput('c') | Action::CharInput('C') => {
                self.status = Status::Done;
                Effect::Redraw
            }
            Action::Abort => {
                self.cursor = self.initial;
                self.status = Status::Aborted;
                Effect::Redraw
            }
            _ => Effect::None,
        }
    }

    fn frame(&self, theme: &Theme, columns: usize) -> Frame {
        let done = self.status != Status::Active;
        let indent = self.header.indent();
        let mut body = self.header.render(theme, columns, done);
        if done {
            body.push_str(&self.finished_frame(&indent, theme));
        } else {
            body.push_str(&self.active_frame(&indent, theme));
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

    /// Selected values, in list order
    fn value(&self) -> Value {
        Value::List(
            self.items
                .iter()
                .filter(|item| item.selected)
                .map(|item| item.choice.value.clone())
                .collect(),
        )
    }
}
