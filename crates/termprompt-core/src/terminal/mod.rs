//! Terminal plumbing: raw input mode and the keystroke reader

mod input;
mod mode;

pub use input::KeyReader;
pub use mode::{CrosstermMode, NoRawMode, RawModeGuard, TerminalMode};
