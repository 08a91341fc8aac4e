//! Terminal display sink and input handling
//!
//! Owns raw mode and the alternate screen; frames are written line by line
//! with explicit cursor positioning so a resize mid-frame cannot corrupt
//! the layout. The renderer hands this module finished frames and never
//! touches the terminal itself.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, stdout, BufWriter, Stdout, Write};
use std::time::{Duration, Instant};

/// Terminal display handler with buffered output
pub struct TerminalDisplay {
    width: u16,
    height: u16,
    last_resize_check: Instant,
    buffer: BufWriter<Stdout>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;

        let (width, height) = terminal::size()?;
        // leave room for the status line
        let adjusted_height = height.saturating_sub(2);

        Ok(Self {
            width,
            height: adjusted_height,
            last_resize_check: Instant::now(),
            buffer: BufWriter::new(stdout),
        })
    }

    pub fn get_size(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    /// Check whether the terminal has been resized. Throttled so the size
    /// query does not run every loop iteration.
    pub fn check_resize(&mut self) -> bool {
        if self.last_resize_check.elapsed() < Duration::from_millis(100) {
            return false;
        }
        self.last_resize_check = Instant::now();

        if let Ok((new_width, new_height)) = terminal::size() {
            let new_height = new_height.saturating_sub(2);
            if new_width != self.width || new_height != self.height {
                self.width = new_width;
                self.height = new_height;
                return true;
            }
        }
        false
    }

    /// Write one frame plus a status line.
    ///
    /// Each row is placed with an explicit cursor move, the cursor is
    /// hidden and line wrap disabled while drawing to avoid flicker.
    pub fn render(&mut self, frame: &str, status: &str) -> io::Result<()> {
        write!(self.buffer, "\x1b[?25l\x1b[?7l")?;

        for (i, line) in frame.lines().enumerate() {
            write!(self.buffer, "\x1b[{};1H{}", i + 1, line)?;
        }

        // clear anything left over from a larger previous frame
        write!(self.buffer, "\x1b[J")?;

        let status_row = frame.lines().count() + 1;
        write!(self.buffer, "\x1b[{};1H\x1b[K{}", status_row, status)?;

        write!(self.buffer, "\x1b[?25h\x1b[?7h")?;
        self.buffer.flush()
    }

    /// Poll for one keyboard event.
    pub fn poll_input(&self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                return Ok(Some(key_event));
            }
        }
        Ok(None)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = self.buffer.flush();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

/// Key actions for the animation loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    Quit,
    Pause,
    Reset,
    ToggleCameraOrbit,
    ToggleLightOrbit,
    ZoomIn,
    ZoomOut,
}

/// Parse keyboard input into actions
pub fn parse_key_event(event: KeyEvent) -> Action {
    match event.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') => Action::Pause,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Char('c') => Action::ToggleCameraOrbit,
        KeyCode::Char('l') => Action::ToggleLightOrbit,
        KeyCode::Char(']') => Action::ZoomIn,
        KeyCode::Char('[') => Action::ZoomOut,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_parse_key_event_quit() {
        let event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::Quit);
    }

    #[test]
    fn test_parse_key_event_escape() {
        let event = KeyEvent::new(KeyCode::Esc, KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::Quit);
    }

    #[test]
    fn test_parse_key_event_toggle_camera_orbit() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::ToggleCameraOrbit);
    }

    #[test]
    fn test_parse_key_event_toggle_light_orbit() {
        let event = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::ToggleLightOrbit);
    }

    #[test]
    fn test_parse_key_event_zoom() {
        let zoom_in = KeyEvent::new(KeyCode::Char(']'), KeyModifiers::empty());
        let zoom_out = KeyEvent::new(KeyCode::Char('['), KeyModifiers::empty());
        assert_eq!(parse_key_event(zoom_in), Action::ZoomIn);
        assert_eq!(parse_key_event(zoom_out), Action::ZoomOut);
    }

    #[test]
    fn test_parse_key_event_none() {
        let event = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::empty());
        assert_eq!(parse_key_event(event), Action::None);
    }
}
