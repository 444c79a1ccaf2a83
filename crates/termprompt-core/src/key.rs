//! Decoding raw terminal input into key events
//!
//! Terminals in raw mode deliver one keystroke as a short burst of bytes:
//! a single byte for printable ASCII and control letters, a UTF-8 sequence
//! for other characters, and `ESC [ ...` / `ESC O ...` sequences for
//! navigation keys. [`KeyDecoder`] turns those bursts into [`KeyEvent`]s.

/// Named keys a prompt can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key, normalized to lowercase (`A` arrives as `Char('a')` with shift)
    Char(char),
    Space,
    Return,
    /// Line feed, also produced by ctrl-j
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Unknown,
}

/// One physical keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// The character this keystroke types, if any
    pub ch: Option<char>,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ch: None,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    /// A printable character keystroke
    pub fn char(c: char) -> Self {
        let key = match c {
            ' ' => Key::Space,
            c if c.is_alphabetic() => Key::Char(c.to_lowercase().next().unwrap_or(c)),
            c => Key::Char(c),
        };
        Self {
            key,
            ch: Some(c),
            ctrl: false,
            meta: false,
            shift: c.is_uppercase(),
        }
    }

    /// A ctrl-modified letter such as ctrl-c
    pub fn ctrl(c: char) -> Self {
        Self {
            ctrl: true,
            ..Self::new(Key::Char(c))
        }
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self.ch = None;
        self
    }
}

/// Incremental decoder from input bytes to key events.
///
/// A lone `ESC` at the end of a chunk is the escape key. An escape sequence
/// or UTF-8 character split across chunks is held until the rest arrives.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

enum Step {
    Key(KeyEvent, usize),
    Skip(usize),
    Incomplete,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk of input, as delivered by a single read.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        self.pending.extend_from_slice(bytes);
        let buf = std::mem::take(&mut self.pending);

        let mut events = Vec::new();
        let mut pos = 0;
        while pos < buf.len() {
            match decode_one(&buf[pos..]) {
                Step::Key(event, used) => {
                    events.push(event);
                    pos += used;
                }
                Step::Skip(used) => pos += used,
                Step::Incomplete => break,
            }
        }

        self.pending = buf[pos..].to_vec();
        events
    }

    /// Flush whatever is still pending once the input has ended.
    pub fn finish(&mut self) -> Vec<KeyEvent> {
        let rest = std::mem::take(&mut self.pending);
        match rest.first() {
            Some(0x1b) => vec![KeyEvent::new(Key::Escape)],
            _ => Vec::new(),
        }
    }
}

fn decode_one(buf: &[u8]) -> Step {
    let b = buf[0];
    match b {
        0x1b => decode_escape(buf),
        b'\r' => Step::Key(KeyEvent::new(Key::Return), 1),
        b'\n' => Step::Key(KeyEvent::new(Key::Enter), 1),
        b'\t' => Step::Key(KeyEvent::new(Key::Tab), 1),
        0x7f | 0x08 => Step::Key(KeyEvent::new(Key::Backspace), 1),
        0x00 => Step::Key(
            KeyEvent {
                ctrl: true,
                ..KeyEvent::new(Key::Space)
            },
            1,
        ),
        0x01..=0x1a => Step::Key(KeyEvent::ctrl((b'a' + b - 1) as char), 1),
        0x1c..=0x1f => Step::Key(
            KeyEvent {
                ctrl: true,
                ..KeyEvent::new(Key::Unknown)
            },
            1,
        ),
        _ => decode_char(buf),
    }
}

fn decode_char(buf: &[u8]) -> Step {
    let width = match buf[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Step::Skip(1),
    };
    if buf.len() < width {
        return Step::Incomplete;
    }
    match std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|s| s.chars().next())
    {
        Some(c) => Step::Key(KeyEvent::char(c), width),
        None => Step::Skip(1),
    }
}

fn decode_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::Key(KeyEvent::new(Key::Escape), 1);
    };

    match next {
        b'[' => decode_csi(buf),
        b'O' => match buf.get(2) {
            Some(&fin) => Step::Key(KeyEvent::new(final_key(fin)), 3),
            None => Step::Incomplete,
        },
        0x1b => Step::Key(KeyEvent::new(Key::Escape).with_meta(), 2),
        _ => match decode_one(&buf[1..]) {
            Step::Key(event, used) => Step::Key(event.with_meta(), used + 1),
            Step::Skip(used) => Step::Skip(used + 1),
            Step::Incomplete => Step::Incomplete,
        },
    }
}

/// `ESC [ params intermediates final`
fn decode_csi(buf: &[u8]) -> Step {
    let mut end = 2;
    while end < buf.len() && (0x20..=0x3f).contains(&buf[end]) {
        end += 1;
    }
    let Some(&fin) = buf.get(end) else {
        return Step::Incomplete;
    };
    if !(0x40..=0x7e).contains(&fin) {
        return Step::Skip(end);
    }

    let params = String::from_utf8_lossy(&buf[2..end]);
    let mut fields = params.split(';');
    let first = fields.next().and_then(|p| p.parse::<u32>().ok());
    let modifier = fields.next().and_then(|p| p.parse::<u32>().ok());

    let mut event = match fin {
        b'~' => KeyEvent::new(match first {
            Some(1) | Some(7) => Key::Home,
            Some(2) => Key::Insert,
            Some(3) => Key::Delete,
            Some(4) | Some(8) => Key::End,
            Some(5) => Key::PageUp,
            Some(6) => Key::PageDown,
            _ => Key::Unknown,
        }),
        b'Z' => KeyEvent {
            shift: true,
            ..KeyEvent::new(Key::Tab)
        },
        _ => KeyEvent::new(final_key(fin)),
    };

    if let Some(m) = modifier.filter(|m| *m > 1) {
        let bits = m - 1;
        event.shift |= bits & 1 != 0;
        event.meta |= bits & (2 | 8) != 0;
        event.ctrl |= bits & 4 != 0;
    }

    Step::Key(event, end + 1)
}

fn final_key(fin: u8) -> Key {
    match fin {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Unknown,
    }
}
