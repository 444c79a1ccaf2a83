//! Loading indicator for slow work between prompts
//!
//! Work that settles within [`TOO_SLOW`] only prints the closing line. Slower
//! work gets an animated gradient bar, redrawn in place through a
//! [`Renderer`] until the work is done or the user presses Ctrl+C.

use crate::error::Result;
use crate::key::{Key, KeyEvent};
use crate::render::{Frame, Renderer};
use crate::terminal::{KeyReader, NoRawMode, RawModeGuard, TerminalMode};
use crate::theme::Theme;
use crossterm::style::{Color, Stylize};
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Work finishing sooner than this never shows the indicator
pub const TOO_SLOW: Duration = Duration::from_millis(500);

const FRAME_INTERVAL: Duration = Duration::from_millis(90);

/// Colored cells in one frame
const CELLS: usize = 6;
/// A frame is a leading space plus its cells
const FRAME_WIDTH: usize = CELLS + 1;
/// Cells of the first and last color on either side of the sweep
const HOLD: usize = 8;

type Rgb = (u8, u8, u8);

const GRADIENT: [Rgb; 13] = [
    (0xF4, 0x42, 0x50),
    (0xE5, 0x3F, 0x9A),
    (0xD8, 0x3B, 0xD2),
    (0x9A, 0x5E, 0xE4),
    (0x5A, 0x81, 0xF7),
    (0x39, 0x92, 0xFF),
    (0x57, 0xBC, 0xA8),
    (0x6B, 0xD9, 0x68),
    (0xA9, 0xD4, 0x48),
    (0xFE, 0xCC, 0x1B),
    (0xFC, 0xA5, 0x2B),
    (0xF9, 0x7F, 0x3A),
    (0xF7, 0x5E, 0x46),
];

const COLORLESS: [&str; 3] = [".. .. ", " .. ..", ". .. ."];

/// How the work behind an indicator ended
#[derive(Debug, PartialEq, Eq)]
pub enum Loaded<T> {
    Done(T),
    /// Ctrl+C was pressed; the work was dropped unfinished
    Interrupted,
}

/// Shows progress for a future and a closing line once it resolves.
pub struct LoadingIndicator {
    start: String,
    end: String,
    theme: Theme,
    columns: usize,
    motion: bool,
    mode: Arc<dyn TerminalMode>,
}

impl LoadingIndicator {
    /// `start` is shown while waiting, `end` once the work is done
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            theme: Theme::PLAIN,
            columns: 0,
            motion: true,
            mode: Arc::new(NoRawMode),
        }
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// With motion off the bar is left blank instead of animating
    pub fn motion(mut self, motion: bool) -> Self {
        self.motion = motion;
        self
    }

    pub fn mode<M: TerminalMode + 'static>(mut self, mode: M) -> Self {
        self.mode = Arc::new(mode);
        self
    }

    pub fn shared_mode(mut self, mode: Arc<dyn TerminalMode>) -> Self {
        self.mode = mode;
        self
    }

    /// Await `work`, animating on `out` if it is slow.
    ///
    /// While the bar is up the terminal is held in raw mode and `keys` is
    /// watched: Ctrl+C stops the indicator and drops `work`, other keys are
    /// swallowed. Without `keys` only the work can end the wait.
    pub async fn run<W, F>(
        &self,
        out: &mut W,
        keys: Option<&KeyReader>,
        work: F,
    ) -> Result<Loaded<F::Output>>
    where
        W: Write + ?Sized,
        F: Future,
    {
        tokio::pin!(work);

        let quick = tokio::select! {
            biased;
            value = &mut work => Some(value),
            _ = tokio::time::sleep(TOO_SLOW) => None,
        };
        if let Some(value) = quick {
            self.write_end(out)?;
            return Ok(Loaded::Done(value));
        }

        let guard = RawModeGuard::acquire(self.mode.clone())?;
        let frames = gradient_frames();
        let mut renderer = Renderer::new(self.columns);
        let mut index = 0;
        renderer.draw(out, self.frame(&frames, index))?;

        let mut ticks = interval_at(Instant::now() + FRAME_INTERVAL, FRAME_INTERVAL);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut watching = keys.is_some();

        let loaded = loop {
            tokio::select! {
                biased;
                value = &mut work => break Loaded::Done(value),
                key = next_key(keys), if watching => match key {
                    Some(key) if is_interrupt(&key) => break Loaded::Interrupted,
                    Some(_) => {}
                    None => watching = false,
                },
                _ = ticks.tick() => {
                    if self.motion {
                        index += 1;
                        renderer.draw(out, self.frame(&frames, index))?;
                    }
                }
            }
        };

        renderer.clear(out)?;
        guard.release()?;
        if matches!(loaded, Loaded::Done(_)) {
            self.write_end(out)?;
        }
        Ok(loaded)
    }

    fn frame(&self, frames: &[[Rgb; CELLS]], index: usize) -> Frame {
        let bar = if !self.motion {
            " ".repeat(FRAME_WIDTH)
        } else if self.theme.color {
            let block = if self.theme.ascii { "#" } else { "█" };
            let cells: String = frames[index % frames.len()]
                .iter()
                .map(|&(r, g, b)| block.with(Color::Rgb { r, g, b }).to_string())
                .collect();
            format!(" {}", cells)
        } else {
            format!("{:<width$}", COLORLESS[index % COLORLESS.len()], width = FRAME_WIDTH)
        };

        Frame {
            body: format!("{}  {}", bar, self.theme.green(&self.start)),
            hide_cursor: true,
            ..Frame::default()
        }
    }

    fn write_end<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write!(
            out,
            "{}{}  {}\r\n",
            " ".repeat(FRAME_WIDTH - 1),
            self.theme.green(self.theme.tick()),
            self.theme.green(&self.end)
        )?;
        out.flush()?;
        Ok(())
    }
}

async fn next_key(keys: Option<&KeyReader>) -> Option<KeyEvent> {
    match keys {
        Some(keys) => keys.next().await,
        None => std::future::pending().await,
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.ctrl && key.key == Key::Char('c')
}

/// Color sweep, one entry per animation step.
///
/// The first color holds, the gradient sweeps through, the last color
/// holds, then the gradient sweeps back. Each frame shows [`CELLS`]
/// consecutive entries of that strip, padded with the first color.
fn gradient_frames() -> Vec<[Rgb; CELLS]> {
    let first = GRADIENT[0];
    let last = GRADIENT[GRADIENT.len() - 1];

    let mut strip = vec![first; HOLD];
    strip.extend(GRADIENT);
    strip.extend(std::iter::repeat(last).take(HOLD));
    strip.extend(GRADIENT.iter().rev());

    let mut frames: Vec<[Rgb; CELLS]> = (0..strip.len())
        .map(|offset| {
            let mut cells = [first; CELLS];
            for (cell, color) in cells.iter_mut().zip(&strip[offset..]) {
                *cell = *color;
            }
            cells
        })
        .collect();
    frames.reverse();
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicIsize, Ordering};

    #[derive(Default)]
    struct DepthMode(AtomicIsize);

    impl TerminalMode for DepthMode {
        fn enable_raw(&self) -> io::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn disable_raw(&self) -> io::Result<()> {
            self.0.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn text(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }

    #[test]
    fn test_gradient_frames() {
        let frames = gradient_frames();
        assert_eq!(frames.len(), HOLD * 2 + GRADIENT.len() * 2);
        // Reversed, so the sweep runs from the tail of the strip
        assert_eq!(frames[0], [GRADIENT[0]; CELLS]);
        assert_eq!(frames[frames.len() - 1], [GRADIENT[0]; CELLS]);
        let (r, g, b) = GRADIENT[12];
        assert!(frames.iter().any(|f| f.contains(&(r, g, b))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_work_only_prints_end_line() {
        let mode = Arc::new(DepthMode::default());
        let indicator =
            LoadingIndicator::new("Copying...", "Copied").shared_mode(mode.clone());
        let mut out = Vec::new();
        let loaded = indicator
            .run(&mut out, None, async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                7
            })
            .await
            .unwrap();
        assert_eq!(loaded, Loaded::Done(7));
        assert_eq!(text(&out), "      v  Copied\r\n");
        assert_eq!(mode.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_work_animates_then_clears() {
        let mode = Arc::new(DepthMode::default());
        let indicator = LoadingIndicator::new("Installing...", "Installed")
            .columns(80)
            .shared_mode(mode.clone());
        let mut out = Vec::new();
        let loaded = indicator
            .run(&mut out, None, async {
                tokio::time::sleep(Duration::from_millis(800)).await;
            })
            .await
            .unwrap();
        assert_eq!(loaded, Loaded::Done(()));

        let written = text(&out);
        assert!(written.starts_with("\x1b[?25l"));
        for pattern in COLORLESS {
            assert!(written.contains(&format!("{}   Installing...", pattern)));
        }
        assert!(written.ends_with("\x1b[?25h      v  Installed\r\n"));
        assert_eq!(mode.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_motionless_bar_is_blank() {
        let indicator = LoadingIndicator::new("Waiting...", "Ready").motion(false);
        let mut out = Vec::new();
        indicator
            .run(&mut out, None, tokio::time::sleep(Duration::from_secs(2)))
            .await
            .unwrap();
        let written = text(&out);
        assert!(written.contains(&format!("{}  Waiting...", " ".repeat(FRAME_WIDTH))));
        // Drawn once, never redrawn
        assert_eq!(written.matches("Waiting...").count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_color_frames_use_gradient() {
        let theme = Theme {
            color: true,
            ascii: false,
        };
        let indicator = LoadingIndicator::new("Working...", "Done").theme(theme);
        let mut out = Vec::new();
        indicator
            .run(&mut out, None, tokio::time::sleep(Duration::from_millis(700)))
            .await
            .unwrap();
        let written = text(&out);
        // First frame plus two redraws before the work settles
        assert_eq!(written.matches("█").count(), CELLS * 3);
    }

    #[tokio::test]
    async fn test_ctrl_c_interrupts_slow_work() {
        let mode = Arc::new(DepthMode::default());
        let keys = KeyReader::spawn(Cursor::new(b"x\x03".to_vec()));
        let indicator = LoadingIndicator::new("Cloning...", "Cloned")
            .columns(80)
            .shared_mode(mode.clone());
        let mut out = Vec::new();
        let loaded = indicator
            .run(
                &mut out,
                Some(&keys),
                tokio::time::sleep(Duration::from_secs(3600)),
            )
            .await
            .unwrap();
        assert_eq!(loaded, Loaded::Interrupted);
        let written = text(&out);
        assert!(written.ends_with("\x1b[?25h"));
        assert!(!written.contains("Cloned"));
        assert_eq!(mode.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_quick_work_leaves_keys_for_the_next_prompt() {
        let keys = KeyReader::spawn(Cursor::new(b"y".to_vec()));
        let indicator = LoadingIndicator::new("Checking...", "Checked");
        let mut out = Vec::new();
        let loaded = indicator
            .run(&mut out, Some(&keys), async { "ok" })
            .await
            .unwrap();
        assert_eq!(loaded, Loaded::Done("ok"));
        assert_eq!(keys.next().await.map(|e| e.key), Some(Key::Char('y')));
    }
}
