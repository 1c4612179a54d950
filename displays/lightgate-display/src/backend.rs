//! Character display trait
//!
//! Defines the interface the firmware draws screens through.

use crate::screen::{Screen, SCREEN_COLS};

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Row outside the display
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// Text-mode display
///
/// Methods are async so bus transfers can yield to other tasks.
#[allow(async_fn_in_trait)]
pub trait CharDisplay {
    /// Clear the entire display
    async fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write `text` at the start of `row`, blanking the rest of the row
    async fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError>;

    /// Display dimensions as (columns, rows)
    fn dimensions(&self) -> (u8, u8);

    /// Draw every row of a screen buffer and mark it clean
    async fn draw(&mut self, screen: &mut Screen) -> Result<(), DisplayError> {
        for (row, line) in screen.lines().enumerate() {
            self.write_line(row as u8, line).await?;
        }
        screen.mark_clean();
        Ok(())
    }
}

/// Pad `text` with spaces to a full row
pub fn padded(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.bytes()
        .chain(core::iter::repeat(b' '))
        .take(SCREEN_COLS)
}
