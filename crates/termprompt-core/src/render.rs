//! In-place redrawing of prompt frames
//!
//! Each frame is drawn below the previous output. Before the next frame the
//! renderer erases exactly the rows the last one covered, counted with
//! [`ansi::rows_for`], so redraws never eat into text printed earlier.

use crate::ansi;
use crossterm::cursor::{
    Hide, MoveDown, MoveLeft, MoveToColumn, MoveUp, RestorePosition, SavePosition, Show,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// One rendered state of a prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Main text; the edit point is measured from its end
    pub body: String,
    /// Text drawn beneath the body without moving the edit point, e.g. a
    /// validation error. Starts with a line break when non-empty.
    pub below: String,
    /// Caret offset, in characters, back from the end of `body`'s last
    /// line. Zero or positive leaves the caret at the end.
    pub caret: isize,
    /// Hide the caret while this prompt is active
    pub hide_cursor: bool,
}

/// Draws the frames of a single prompt instance
#[derive(Debug)]
pub struct Renderer {
    columns: usize,
    previous: Option<Frame>,
    /// Rows the caret was moved above the last row of the body
    caret_up: usize,
}

impl Renderer {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            previous: None,
            caret_up: 0,
        }
    }

    /// Replace the previous frame with `frame`.
    pub fn draw<W: Write + ?Sized>(&mut self, out: &mut W, frame: Frame) -> io::Result<()> {
        let mut buf: Vec<u8> = Vec::new();

        match &self.previous {
            Some(previous) => self.erase(&mut buf, previous)?,
            None if frame.hide_cursor => {
                buf.queue(Hide)?;
            }
            None => {}
        }
        self.caret_up = 0;

        buf.queue(Clear(ClearType::CurrentLine))?
            .queue(MoveToColumn(0))?;
        buf.write_all(crlf(&frame.body).as_bytes())?;

        if !frame.below.is_empty() {
            buf.queue(SavePosition)?;
            buf.write_all(crlf(&frame.below).as_bytes())?;
            buf.queue(RestorePosition)?;
        }

        self.place_caret(&mut buf, &frame)?;

        out.write_all(&buf)?;
        out.flush()?;
        self.previous = Some(frame);
        Ok(())
    }

    /// Audible cue for an action that made no sense here
    pub fn bell<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        out.write_all(b"\x07")?;
        out.flush()
    }

    /// Leave the final frame on screen and hand the line back to the caller.
    pub fn finish<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        let mut buf: Vec<u8> = Vec::new();
        if let Some(previous) = &self.previous {
            // Step past any text drawn beneath the body
            let down = self.caret_up + self.rows_below(previous);
            if down > 0 {
                buf.queue(MoveDown(down as u16))?;
            }
        }
        buf.write_all(b"\r\n")?;
        buf.queue(Show)?;
        out.write_all(&buf)?;
        out.flush()
    }

    /// Remove the last frame, leaving the cursor at the start of the row it began on.
    pub fn clear<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        let mut buf: Vec<u8> = Vec::new();
        if let Some(previous) = &self.previous {
            self.erase(&mut buf, previous)?;
            if previous.hide_cursor {
                buf.queue(Show)?;
            }
        }
        self.previous = None;
        self.caret_up = 0;
        out.write_all(&buf)?;
        out.flush()
    }

    /// Move from the end of the body back to the caret, across wrapped rows.
    fn place_caret(&mut self, buf: &mut Vec<u8>, frame: &Frame) -> io::Result<()> {
        if frame.caret >= 0 {
            return Ok(());
        }
        let back = frame.caret.unsigned_abs();

        if self.columns == 0 {
            buf.queue(MoveLeft(back.min(u16::MAX as usize) as u16))?;
            return Ok(());
        }

        let last = frame.body.rsplit('\n').next().unwrap_or_default();
        let length = ansi::visible_length(last.strip_suffix('\r').unwrap_or(last));
        let target = length.saturating_sub(back);
        let end_row = length.saturating_sub(1) / self.columns;
        let up = end_row.saturating_sub(target / self.columns);

        if up > 0 {
            buf.queue(MoveUp(up as u16))?;
        }
        buf.queue(MoveToColumn((target % self.columns) as u16))?;
        self.caret_up = up;
        Ok(())
    }

    fn rows_below(&self, frame: &Frame) -> usize {
        if frame.below.is_empty() || self.columns == 0 {
            0
        } else {
            ansi::rows_for(&frame.below, self.columns) - 1
        }
    }

    fn erase(&self, buf: &mut Vec<u8>, previous: &Frame) -> io::Result<()> {
        if self.columns == 0 {
            buf.queue(Clear(ClearType::CurrentLine))?
                .queue(MoveToColumn(0))?;
            return Ok(());
        }

        let extra = self.rows_below(previous);
        let down = self.caret_up + extra;
        if down > 0 {
            buf.queue(MoveDown(down as u16))?;
        }
        let rows = ansi::rows_for(&previous.body, self.columns) + extra;
        erase_lines(buf, rows)
    }
}

/// Erase `count` rows, from the cursor row upwards, leaving the cursor in column 0.
fn erase_lines(buf: &mut Vec<u8>, count: usize) -> io::Result<()> {
    for i in 0..count {
        buf.queue(Clear(ClearType::CurrentLine))?;
        if i + 1 < count {
            buf.queue(MoveUp(1))?;
        }
    }
    if count > 0 {
        buf.queue(MoveToColumn(0))?;
    }
    Ok(())
}

/// Raw mode turns off output post-processing, so line feeds need an explicit return.
fn crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERASE_LINE: &str = "\x1b[2K";
    const UP: &str = "\x1b[1A";

    fn frame(body: &str) -> Frame {
        Frame {
            body: body.to_string(),
            ..Frame::default()
        }
    }

    fn text(out: &[u8]) -> String {
        String::from_utf8(out.to_vec()).unwrap()
    }

    #[test]
    fn test_first_frame_erases_nothing() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(80);
        renderer.draw(&mut out, frame("\nhello\n  world")).unwrap();
        let written = text(&out);
        assert_eq!(written.matches(ERASE_LINE).count(), 1);
        assert!(written.ends_with("\r\nhello\r\n  world"));
    }

    #[test]
    fn test_redraw_erases_previous_rows() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(80);
        renderer.draw(&mut out, frame("\nhello\n  world")).unwrap();
        out.clear();
        renderer.draw(&mut out, frame("\nhello\n  there")).unwrap();
        let written = text(&out);
        // Three rows erased, then the line-reset prefix of the new frame
        assert!(written.starts_with(&format!(
            "{e}{u}{e}{u}{e}\x1b[1G{e}\x1b[1G",
            e = ERASE_LINE,
            u = UP
        )));
        assert!(written.ends_with("there"));
    }

    #[test]
    fn test_wrapped_rows_are_erased() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(10);
        renderer.draw(&mut out, frame(&"x".repeat(25))).unwrap();
        out.clear();
        renderer.draw(&mut out, frame("y")).unwrap();
        assert_eq!(text(&out).matches(UP).count(), 2);
    }

    #[test]
    fn test_unknown_width_clears_single_line() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(0);
        renderer.draw(&mut out, frame("\na\nb")).unwrap();
        out.clear();
        renderer.draw(&mut out, frame("c")).unwrap();
        assert_eq!(text(&out).matches(UP).count(), 0);
    }

    #[test]
    fn test_list_frame_hides_cursor_and_finish_shows_it() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(80);
        let list = Frame {
            hide_cursor: true,
            ..frame("\npick\n > a")
        };
        renderer.draw(&mut out, list).unwrap();
        assert!(text(&out).starts_with("\x1b[?25l"));
        out.clear();
        renderer.finish(&mut out).unwrap();
        assert_eq!(text(&out), "\r\n\x1b[?25h");
    }

    #[test]
    fn test_caret_and_error_below() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(80);
        let with_error = Frame {
            body: "\nname\n  abc".to_string(),
            below: "\n  > Required".to_string(),
            caret: -2,
            hide_cursor: false,
        };
        renderer.draw(&mut out, with_error).unwrap();
        let written = text(&out);
        assert!(written.ends_with("\x1b7\r\n  > Required\x1b8\x1b[4G"));

        out.clear();
        renderer.draw(&mut out, frame("\nname\n  abcd")).unwrap();
        let written = text(&out);
        // Step down onto the error row, then erase body and error rows
        assert!(written.starts_with("\x1b[1B"));
        assert_eq!(written.matches(UP).count(), 3);
    }

    #[test]
    fn test_caret_crosses_wrapped_rows() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(10);
        let wrapped = Frame {
            caret: -20,
            ..frame(&"x".repeat(25))
        };
        renderer.draw(&mut out, wrapped).unwrap();
        // Character 5 of 25 sits two rows up, in column 5
        assert!(text(&out).ends_with("\x1b[2A\x1b[6G"));

        out.clear();
        renderer.draw(&mut out, frame("y")).unwrap();
        let written = text(&out);
        assert!(written.starts_with("\x1b[2B"));
        assert_eq!(written.matches(UP).count(), 2);

        out.clear();
        renderer.finish(&mut out).unwrap();
        assert_eq!(text(&out), "\r\n\x1b[?25h");
    }

    #[test]
    fn test_caret_at_row_boundary() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(10);
        let boundary = Frame {
            caret: -10,
            ..frame(&"x".repeat(20))
        };
        renderer.draw(&mut out, boundary).unwrap();
        assert!(text(&out).ends_with("x\x1b[1G"));

        out.clear();
        renderer.finish(&mut out).unwrap();
        assert_eq!(text(&out), "\r\n\x1b[?25h");
    }

    #[test]
    fn test_unknown_width_moves_caret_left() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(0);
        let frame = Frame {
            caret: -3,
            ..frame("abcdef")
        };
        renderer.draw(&mut out, frame).unwrap();
        assert!(text(&out).ends_with("abcdef\x1b[3D"));
    }

    #[test]
    fn test_clear_removes_frame_and_shows_cursor() {
        let mut out = Vec::new();
        let mut renderer = Renderer::new(80);
        let spinner = Frame {
            hide_cursor: true,
            ..frame("  working")
        };
        renderer.draw(&mut out, spinner).unwrap();
        out.clear();
        renderer.clear(&mut out).unwrap();
        assert_eq!(text(&out), format!("{}\x1b[1G\x1b[?25h", ERASE_LINE));

        // Nothing left to erase
        out.clear();
        renderer.draw(&mut out, frame("done")).unwrap();
        assert_eq!(text(&out).matches(ERASE_LINE).count(), 1);
    }

    #[test]
    fn test_bell() {
        let mut out = Vec::new();
        Renderer::new(80).bell(&mut out).unwrap();
        assert_eq!(out, b"\x07");
    }
}
