//! Mapping key events to semantic prompt actions

use crate::key::{Key, KeyEvent};

/// What a keystroke means to a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    First,
    Last,
    Next,
    Reset,
    Submit,
    Abort,
    Delete,
    DeleteForward,
    CharInput(char),
    NoOp,
}

/// Map a key event to an action.
///
/// `list` is true for select-style prompts, where `j`/`k` navigate instead
/// of typing.
pub fn action_for(event: &KeyEvent, list: bool) -> Action {
    if event.meta && event.key != Key::Escape {
        return Action::NoOp;
    }

    if event.ctrl {
        match event.key {
            Key::Char('a') => return Action::First,
            Key::Char('c') | Key::Char('d') => return Action::Abort,
            Key::Char('e') => return Action::Last,
            Key::Char('g') => return Action::Reset,
            _ => {}
        }
    }

    if list {
        match event.key {
            Key::Char('j') => return Action::MoveDown,
            Key::Char('k') => return Action::MoveUp,
            _ => {}
        }
    }

    match event.key {
        Key::Return | Key::Enter => Action::Submit,
        Key::Backspace => Action::Delete,
        Key::Delete => Action::DeleteForward,
        Key::Escape => Action::Abort,
        Key::Tab => Action::Next,
        // Paging and home/end are reserved; no prompt kind defines them
        Key::PageUp | Key::PageDown | Key::Home | Key::End => Action::NoOp,
        Key::Up => Action::MoveUp,
        Key::Down => Action::MoveDown,
        Key::Right => Action::MoveRight,
        Key::Left => Action::MoveLeft,
        _ => match event.ch {
            Some(c) => Action::CharInput(c),
            None => Action::NoOp,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_keys_are_ignored() {
        let event = KeyEvent::char('x').with_meta();
        assert_eq!(action_for(&event, false), Action::NoOp);

        let escape = KeyEvent::new(Key::Escape).with_meta();
        assert_eq!(action_for(&escape, false), Action::Abort);
    }

    #[test]
    fn test_ctrl_bindings() {
        assert_eq!(action_for(&KeyEvent::ctrl('a'), false), Action::First);
        assert_eq!(action_for(&KeyEvent::ctrl('c'), false), Action::Abort);
        assert_eq!(action_for(&KeyEvent::ctrl('d'), true), Action::Abort);
        assert_eq!(action_for(&KeyEvent::ctrl('e'), false), Action::Last);
        assert_eq!(action_for(&KeyEvent::ctrl('g'), false), Action::Reset);
        // Unbound ctrl letters never type anything
        assert_eq!(action_for(&KeyEvent::ctrl('b'), false), Action::NoOp);
    }

    #[test]
    fn test_vim_keys_only_in_lists() {
        assert_eq!(action_for(&KeyEvent::char('j'), true), Action::MoveDown);
        assert_eq!(action_for(&KeyEvent::char('k'), true), Action::MoveUp);
        assert_eq!(action_for(&KeyEvent::char('j'), false), Action::CharInput('j'));
    }

    #[test]
    fn test_named_keys() {
        let cases = [
            (Key::Return, Action::Submit),
            (Key::Enter, Action::Submit),
            (Key::Backspace, Action::Delete),
            (Key::Delete, Action::DeleteForward),
            (Key::Escape, Action::Abort),
            (Key::Tab, Action::Next),
            (Key::PageDown, Action::NoOp),
            (Key::Home, Action::NoOp),
            (Key::Up, Action::MoveUp),
            (Key::Down, Action::MoveDown),
            (Key::Left, Action::MoveLeft),
            (Key::Right, Action::MoveRight),
            (Key::Unknown, Action::NoOp),
        ];
        for (key, expected) in cases {
            assert_eq!(action_for(&KeyEvent::new(key), false), expected, "{:?}", key);
        }
    }

    #[test]
    fn test_printable_input() {
        assert_eq!(action_for(&KeyEvent::char(' '), true), Action::CharInput(' '));
        assert_eq!(action_for(&KeyEvent::char('Y'), false), Action::CharInput('Y'));
    }
}
