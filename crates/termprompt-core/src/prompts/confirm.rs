//! Yes/no question

use super::{Effect, Header, Prompt, Status};
use crate::action::Action;
use crate::render::Frame;
use crate::spec::{PromptKind, PromptSpec, Value};
use crate::theme::Theme;

const CHOICES: [(bool, &str); 2] = [(true, "Yes"), (false, "No")];

pub struct ConfirmPrompt {
    header: Header,
    value: Option<bool>,
    cursor: usize,
    status: Status,
}

impl ConfirmPrompt {
    pub fn new(spec: &PromptSpec) -> Self {
        let value = spec.initial.as_ref().and_then(Value::as_bool);
        Self {
            header: Header::from_spec(spec),
            value,
            cursor: index_of(value.unwrap_or(false)),
            status: Status::Active,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn move_to(&mut self, index: usize) {
        self.cursor = index;
        self.value = Some(CHOICES[index].0);
    }

    fn submit(&mut self) -> Effect {
        let value = self.value.unwrap_or(false);
        self.value = Some(value);
        self.cursor = index_of(value);
        self.status = Status::Done;
        Effect::Redraw
    }
}

fn index_of(value: bool) -> usize {
    if value {
        0
    } else {
        1
    }
}

impl Prompt for ConfirmPrompt {
    fn kind(&self) -> PromptKind {
        PromptKind::Confirm
    }

    fn update(&mut self, action: Action) -> Effect {
        if self.status != Status::Active {
            return Effect::None;
        }

        match action {
            // Two choices, so stepping either way with wrap-around flips the highlight
            Action::MoveLeft | Action::MoveRight => {
                self.move_to(1 - self.cursor);
                Effect::Redraw
            }
            Action::First | Action::Reset => {
                self.move_to(0);
                Effect::Redraw
            }
            Action::Last => {
                self.move_to(CHOICES.len() - 1);
                Effect::Redraw
            }
            Action::CharInput(c) => match c {
                '1' | '2' => {
                    self.move_to(if c == '1' { 0 } else { 1 });
                    self.submit()
                }
                c if c.is_ascii_digit() => Effect::Bell,
                'y' | 'Y' => {
                    self.value = Some(true);
                    self.submit()
                }
                'n' | 'N' => {
                    self.value = Some(false);
                    self.submit()
                }
                _ => Effect::None,
            },
            Action::Submit => self.submit(),
            Action::Abort => {
                self.status = Status::Aborted;
                Effect::Redraw
            }
            _ => Effect::None,
        }
    }

    fn frame(&self, theme: &Theme, columns: usize) -> Frame {
        let done = self.status != Status::Active;
        let mut body = self.header.render(theme, columns, done);
        body.push_str(&self.header.indent());
        body.push(' ');

        if done {
            body.push_str(&theme.dim(CHOICES[self.cursor].1));
        } else {
            let choices: Vec<String> = CHOICES
                .iter()
                .enumerate()
                .map(|(i, (_, label))| {
                    if i == self.cursor {
                        format!("{} {} ", theme.green(theme.active()), label)
                    } else {
                        theme.dim(&format!("{} {} ", theme.inactive(), label))
                    }
                })
                .collect();
            body.push_str(&choices.join(&theme.dim(" ")));
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
        Value::Bool(self.value.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(initial: Option<bool>) -> ConfirmPrompt {
        let mut spec = PromptSpec::confirm("deps", "Install dependencies?").label("deps");
        if let Some(initial) = initial {
            spec = spec.initial(initial);
        }
        ConfirmPrompt::new(&spec)
    }

    #[test]
    fn test_n_resolves_false_immediately() {
        let mut p = prompt(Some(true));
        assert_eq!(p.cursor(), 0);
        p.update(Action::CharInput('n'));
        assert_eq!(p.status(), Status::Done);
        assert_eq!(p.value(), Value::Bool(false));
    }

    #[test]
    fn test_y_resolves_true_immediately() {
        let mut p = prompt(None);
        p.update(Action::CharInput('Y'));
        assert_eq!(p.status(), Status::Done);
        assert_eq!(p.value(), Value::Bool(true));
    }

    #[test]
    fn test_submit_without_value_is_false() {
        let mut p = prompt(None);
        assert_eq!(p.cursor(), 1);
        p.update(Action::Submit);
        assert_eq!(p.value(), Value::Bool(false));
    }

    #[test]
    fn test_arrows_wrap_and_submit_highlighted() {
        let mut p = prompt(Some(true));
        p.update(Action::MoveRight);
        assert_eq!(p.cursor(), 1);
        p.update(Action::MoveRight);
        assert_eq!(p.cursor(), 0);
        p.update(Action::MoveLeft);
        p.update(Action::Submit);
        assert_eq!(p.value(), Value::Bool(false));
    }

    #[test]
    fn test_digits_select_and_submit() {
        let mut p = prompt(Some(false));
        assert_eq!(p.update(Action::CharInput('3')), Effect::Bell);
        assert_eq!(p.status(), Status::Active);
        p.update(Action::CharInput('1'));
        assert_eq!(p.status(), Status::Done);
        assert_eq!(p.value(), Value::Bool(true));
    }

    #[test]
    fn test_frames() {
        let mut p = prompt(Some(true));
        let frame = p.frame(&Theme::PLAIN, 80);
        assert_eq!(frame.body, "\ndeps Install dependencies?\n     > Yes  - No ");
        assert!(frame.hide_cursor);

        p.update(Action::Submit);
        let frame = p.frame(&Theme::PLAIN, 80);
        assert_eq!(frame.body, "\ndeps Install dependencies?\n     Yes");
    }

    #[test]
    fn test_abort_ignores_later_input() {
        let mut p = prompt(Some(true));
        p.update(Action::Abort);
        assert_eq!(p.status(), Status::Aborted);
        assert_eq!(p.update(Action::CharInput('y')), Effect::None);
    }
}
