//! Nearest-neighbor downscale and threshold
//!
//! No interpolation or dithering: each destination pixel samples exactly
//! one source pixel, so the cost per frame is fixed at one comparison per
//! display pixel.

use super::bitmap::{Bitmap, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use super::raw::RawFrame;

/// Source index sampled for destination index `dst`
///
/// `floor(dst * src_len / dst_len)`, clamped to the last source index.
#[inline]
pub const fn nearest_source_index(dst: usize, dst_len: usize, src_len: usize) -> usize {
    let index = dst * src_len / dst_len;
    let last = src_len.saturating_sub(1);
    if index > last {
        last
    } else {
        index
    }
}

/// Convert a grayscale frame into the display bitmap
///
/// A destination bit is lit when the sampled source intensity is strictly
/// greater than `threshold`. `dst` is zeroed first, so nothing from the
/// previous frame survives.
///
/// The frame must already be validated: one byte per pixel and at least
/// `width * height` bytes.
pub fn convert(src: &RawFrame<'_>, threshold: u8, dst: &mut Bitmap) {
    let src_w = src.resolution().width as usize;
    let src_h = src.resolution().height as usize;
    let pixels = src.data();

    // Column lookup is the same for every row
    let mut columns = [0u16; DISPLAY_WIDTH];
    for (x, column) in columns.iter_mut().enumerate() {
        *column = nearest_source_index(x, DISPLAY_WIDTH, src_w) as u16;
    }

    let bytes = dst.bytes_mut();
    bytes.fill(0);

    for y in 0..DISPLAY_HEIGHT {
        let row = &pixels[nearest_source_index(y, DISPLAY_HEIGHT, src_h) * src_w..];
        let out = &mut bytes[y * DISPLAY_WIDTH / 8..(y + 1) * DISPLAY_WIDTH / 8];

        for (x, &column) in columns.iter().enumerate() {
            if row[column as usize] > threshold {
                out[x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
}
