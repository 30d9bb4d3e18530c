//! Frame buffers and the grayscale to 1-bit converter
//!
//! A [`RawFrame`] is a borrowed view of one sensor frame (one byte per
//! pixel). The converter downsamples it into the display-sized [`Bitmap`]
//! with nearest-neighbor sampling and a fixed brightness threshold.

pub mod bitmap;
pub mod convert;
pub mod raw;

pub use bitmap::{Bitmap, BITMAP_LEN, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use convert::{convert, nearest_source_index};
pub use raw::{FrameError, PixelFormat, RawFrame};
