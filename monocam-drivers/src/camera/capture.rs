//! Pixel data transport
//!
//! Sensor control (I2C) and pixel data (parallel bus) travel separately.
//! Drivers own the control side and hand the pixel side to a
//! [`PixelCapture`] provided by the board.

use core::fmt;

/// Pixel transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureError {
    /// No complete frame within the capture deadline
    Timeout,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Timeout => f.write_str("capture timeout"),
        }
    }
}

/// Frame-synchronized pixel capture
#[allow(async_fn_in_trait)]
pub trait PixelCapture {
    /// Wait for the next frame start and fill `buf` with exactly
    /// `buf.len()` pixel bytes
    async fn capture(&mut self, buf: &mut [u8]) -> Result<(), CaptureError>;
}

impl<T: PixelCapture + ?Sized> PixelCapture for &mut T {
    async fn capture(&mut self, buf: &mut [u8]) -> Result<(), CaptureError> {
        (**self).capture(buf).await
    }
}
