//! Raw input mode as a scoped resource

use std::io;
use std::io::IsTerminal;
use std::sync::Arc;

/// Switches the input terminal between raw and cooked mode
pub trait TerminalMode: Send + Sync {
    fn enable_raw(&self) -> io::Result<()>;

    fn disable_raw(&self) -> io::Result<()>;
}

/// Raw mode for the process's controlling terminal, via crossterm.
///
/// Does nothing when stdin is not a terminal (piped input).
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermMode;

impl TerminalMode for CrosstermMode {
    fn enable_raw(&self) -> io::Result<()> {
        if io::stdin().is_terminal() {
            crossterm::terminal::enable_raw_mode()?;
        }
        Ok(())
    }

    fn disable_raw(&self) -> io::Result<()> {
        if io::stdin().is_terminal() {
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

/// For inputs that are not terminals
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRawMode;

impl TerminalMode for NoRawMode {
    fn enable_raw(&self) -> io::Result<()> {
        Ok(())
    }

    fn disable_raw(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Holds raw mode for as long as it lives.
///
/// The prior mode is restored when the guard is released or dropped,
/// including while unwinding.
pub struct RawModeGuard {
    mode: Arc<dyn TerminalMode>,
    held: bool,
}

impl RawModeGuard {
    pub fn acquire(mode: Arc<dyn TerminalMode>) -> io::Result<Self> {
        mode.enable_raw()?;
        Ok(Self { mode, held: true })
    }

    /// Restore the prior mode now, reporting any failure.
    pub fn release(mut self) -> io::Result<()> {
        self.held = false;
        self.mode.disable_raw()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.held {
            let _ = self.mode.disable_raw();
        }
    }
}
