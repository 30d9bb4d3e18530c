//! Raw sensor frames

use core::fmt;

use crate::config::Resolution;

/// Pixel encoding of a sensor frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 8-bit luminance, one byte per pixel
    Grayscale,
    /// 16-bit RGB
    Rgb565,
    /// Compressed stream
    Jpeg,
}

impl PixelFormat {
    /// Bytes per pixel, or `None` for compressed formats
    pub const fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Grayscale => Some(1),
            PixelFormat::Rgb565 => Some(2),
            PixelFormat::Jpeg => None,
        }
    }
}

/// Reasons an acquired frame is rejected before conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame is not 8-bit grayscale
    FormatMismatch,
    /// Frame dimensions differ from the configured source resolution
    ResolutionMismatch,
    /// Buffer is shorter than width * height
    Truncated,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FrameError::FormatMismatch => "pixel format mismatch",
            FrameError::ResolutionMismatch => "resolution mismatch",
            FrameError::Truncated => "truncated buffer",
        };
        f.write_str(msg)
    }
}

/// Borrowed view of one sensor frame
///
/// Row-major, owned by the sensor driver. The view lives no longer than
/// the acquisition guard it was taken from.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    data: &'a [u8],
    resolution: Resolution,
    format: PixelFormat,
}

impl<'a> RawFrame<'a> {
    pub const fn new(data: &'a [u8], resolution: Resolution, format: PixelFormat) -> Self {
        Self {
            data,
            resolution,
            format,
        }
    }

    /// Pixel data
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Declared frame dimensions
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Declared pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Check the frame against the expected source resolution
    ///
    /// Only 8-bit grayscale frames of exactly `expected` size pass.
    pub fn validate(&self, expected: Resolution) -> Result<(), FrameError> {
        if self.format != PixelFormat::Grayscale {
            return Err(FrameError::FormatMismatch);
        }
        if self.resolution != expected {
            return Err(FrameError::ResolutionMismatch);
        }
        if self.data.len() < expected.pixels() {
            return Err(FrameError::Truncated);
        }
        Ok(())
    }
}
