//! The single terminal writer.
//!
//! Every byte the dashboard prints goes through [`Screen`], which fits each
//! line to the current render width before writing it.

use std::io::Write;

use crossterm::{
    cursor::{MoveToColumn, MoveToRow, MoveUp},
    queue,
    terminal::{Clear, ClearType},
};

use super::layout::fit;
use crate::error::Result;

/// Line-oriented writer over any `Write` sink.
#[derive(Debug)]
pub struct Screen<W: Write> {
    out: W,
    width: usize,
    clear_between_frames: bool,
}

impl Screen<std::io::Stdout> {
    /// Screen over stdout.
    #[must_use]
    pub fn stdout(width: usize, clear_between_frames: bool) -> Self {
        Self::new(std::io::stdout(), width, clear_between_frames)
    }
}

impl<W: Write> Screen<W> {
    /// Wrap `out`. With `clear_between_frames` off, frames are appended
    /// instead of repainted (used when stdout is not a terminal).
    pub const fn new(out: W, width: usize, clear_between_frames: bool) -> Self {
        Self {
            out,
            width,
            clear_between_frames,
        }
    }

    /// Current render width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Update the render width for the next frame.
    pub const fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Write lines as-is (fitted), without touching the rest of the screen.
    ///
    /// # Errors
    /// Returns an error if the sink fails.
    pub fn print(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{}", fit(line, self.width))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Clear the screen, home the cursor and write a whole frame.
    ///
    /// # Errors
    /// Returns an error if the sink fails.
    pub fn redraw(&mut self, lines: &[String]) -> Result<()> {
        if self.clear_between_frames {
            queue!(
                self.out,
                Clear(ClearType::All),
                Clear(ClearType::Purge),
                MoveToRow(0),
                MoveToColumn(0)
            )?;
        }
        self.print(lines)
    }

    /// Replace the last written line in place.
    ///
    /// Without terminal control the line is skipped, since appending a
    /// countdown every second would flood a log file.
    ///
    /// # Errors
    /// Returns an error if the sink fails.
    pub fn repaint_last_line(&mut self, line: &str) -> Result<()> {
        if !self.clear_between_frames {
            return Ok(());
        }
        queue!(
            self.out,
            MoveUp(1),
            Clear(ClearType::CurrentLine),
            MoveToColumn(0)
        )?;
        writeln!(self.out, "{}", fit(line, self.width))?;
        self.out.flush()?;
        Ok(())
    }

    /// Write the goodbye line shown after an interrupt.
    ///
    /// # Errors
    /// Returns an error if the sink fails.
    pub fn farewell(&mut self, line: &str) -> Result<()> {
        writeln!(self.out)?;
        self.print(&[line.to_string()])
    }

    /// Consume the screen, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(screen: Screen<Vec<u8>>) -> String {
        String::from_utf8(screen.into_inner()).unwrap()
    }

    #[test]
    fn print_fits_lines_to_width() {
        let mut screen = Screen::new(Vec::new(), 20, false);
        screen
            .print(&["a".repeat(40), "short".to_string()])
            .unwrap();
        let text = written(screen);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("{}...", "a".repeat(17)));
        assert_eq!(lines[1], "short");
    }

    #[test]
    fn redraw_without_terminal_only_appends() {
        let mut screen = Screen::new(Vec::new(), 40, false);
        screen.redraw(&["frame".to_string()]).unwrap();
        assert_eq!(written(screen), "frame\n");
    }

    #[test]
    fn redraw_with_terminal_clears_first() {
        let mut screen = Screen::new(Vec::new(), 40, true);
        screen.redraw(&["frame".to_string()]).unwrap();
        let text = written(screen);
        assert!(text.starts_with('\x1b'));
        assert!(text.ends_with("frame\n"));
    }

    #[test]
    fn repaint_moves_up_and_clears_line() {
        let mut screen = Screen::new(Vec::new(), 40, true);
        screen.repaint_last_line("Next update in 4m 59s").unwrap();
        let text = written(screen);
        assert!(text.contains("\x1b[1A"));
        assert!(text.contains("\x1b[2K"));
        assert!(text.ends_with("Next update in 4m 59s\n"));
    }

    #[test]
    fn repaint_is_skipped_without_terminal() {
        let mut screen = Screen::new(Vec::new(), 40, false);
        screen.repaint_last_line("tick").unwrap();
        assert_eq!(written(screen), "");
    }

    #[test]
    fn farewell_starts_on_fresh_line() {
        let mut screen = Screen::new(Vec::new(), 40, false);
        screen.farewell("bye").unwrap();
        assert_eq!(written(screen), "\nbye\n");
    }
}
