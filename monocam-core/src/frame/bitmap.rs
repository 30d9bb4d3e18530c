//! Packed 1-bit display bitmap

/// Panel width in pixels
pub const DISPLAY_WIDTH: usize = 128;

/// Panel height in pixels
pub const DISPLAY_HEIGHT: usize = 64;

/// Bitmap size in bytes (1 bit per pixel)
pub const BITMAP_LEN: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT / 8;

// Rows must start on a byte boundary for the packed layout
const _: () = assert!(DISPLAY_WIDTH % 8 == 0);

/// Display-sized 1-bit image
///
/// Row-major, most significant bit first, 8 pixels per byte. A set bit is
/// a lit pixel. The backing array is inline and never reallocated; the
/// pipeline keeps one instance and overwrites it every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    bytes: [u8; BITMAP_LEN],
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitmap {
    pub const WIDTH: usize = DISPLAY_WIDTH;
    pub const HEIGHT: usize = DISPLAY_HEIGHT;

    /// Create an all-dark bitmap
    pub const fn new() -> Self {
        Self {
            bytes: [0; BITMAP_LEN],
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Set every pixel to the same state
    pub fn fill(&mut self, lit: bool) {
        self.bytes.fill(if lit { 0xFF } else { 0x00 });
    }

    /// Set a single pixel; out-of-range coordinates are ignored
    pub fn set(&mut self, x: usize, y: usize, lit: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }
        let (index, mask) = locate(x, y);
        if lit {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
    }

    /// Read a single pixel; out-of-range coordinates read as dark
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let (index, mask) = locate(x, y);
        self.bytes[index] & mask != 0
    }

    /// Packed bytes in display order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8; BITMAP_LEN] {
        &mut self.bytes
    }

    /// Number of lit pixels
    pub fn lit_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }
}

/// Byte index and bit mask of pixel (x, y)
#[inline]
pub(crate) const fn locate(x: usize, y: usize) -> (usize, u8) {
    let bit = y * DISPLAY_WIDTH + x;
    (bit / 8, 0x80 >> (bit % 8))
}
