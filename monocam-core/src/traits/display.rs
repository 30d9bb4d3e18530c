//! Monochrome display trait

use core::fmt;

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// No device acknowledged at the bus address
    NotFound,
    /// Bus transfer failed
    Communication,
    /// Flush before a successful init
    NotInitialized,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DisplayError::NotFound => "not found",
            DisplayError::Communication => "bus error",
            DisplayError::NotInitialized => "not initialized",
        };
        f.write_str(msg)
    }
}

/// Trait for buffered 1-bit displays
///
/// Drawing operates on the driver's frame buffer and cannot fail; only
/// bus traffic (`probe`, `init`, `flush`) reports errors.
#[allow(async_fn_in_trait)]
pub trait MonoDisplay {
    /// Bus address the driver talks to
    fn bus_address(&self) -> u8;

    /// Check that a device acknowledges at the bus address
    async fn probe(&mut self) -> Result<(), DisplayError>;

    /// Run the controller initialization sequence
    async fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the frame buffer
    fn clear(&mut self);

    /// Draw a packed MSB-first bitmap with its top-left corner at (x, y)
    ///
    /// Set bits are drawn lit, clear bits dark.
    fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &[u8], width: u32, height: u32);

    /// Draw a line of text on a character row
    fn draw_text(&mut self, row: u8, text: &str);

    /// Send the frame buffer to the panel
    async fn flush(&mut self) -> Result<(), DisplayError>;
}
