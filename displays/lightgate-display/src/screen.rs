//! Screen buffer
//!
//! A character buffer matching the 16x2 LCD.

use heapless::String;

/// Number of character rows
pub const SCREEN_ROWS: usize = 2;

/// Number of character columns
pub const SCREEN_COLS: usize = 16;

/// One line of text, at most `SCREEN_COLS` characters
pub type Line = String<SCREEN_COLS>;

/// Screen buffer for text-mode displays
///
/// Tracks whether any line changed since the last time it was drawn, so
/// periodic re-renders of an unchanged screen cost no bus traffic.
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    lines: [Line; SCREEN_ROWS],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub const fn new() -> Self {
        Self {
            lines: [String::new(), String::new()],
            dirty: true,
        }
    }

    /// Blank both rows
    pub fn clear(&mut self) {
        for row in 0..SCREEN_ROWS {
            self.set_line(row, "");
        }
    }

    /// Set the content of a row
    ///
    /// Text longer than a row is truncated. Rows out of range are ignored.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };

        let end = text
            .char_indices()
            .nth(SCREEN_COLS)
            .map_or(text.len(), |(i, _)| i);
        let text = &text[..end];

        if line.as_str() != text {
            line.clear();
            let _ = line.push_str(text);
            self.dirty = true;
        }
    }

    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Check if the screen changed since it was last drawn
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after drawing)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Force the next draw, e.g. after the display was reset
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[{} | {}]", self.lines[0].as_str(), self.lines[1].as_str());
    }
}
