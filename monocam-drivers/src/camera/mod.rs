//! Camera sensor drivers

pub mod capture;
pub mod hm01b0;

pub use capture::{CaptureError, PixelCapture};
pub use hm01b0::{Hm01b0, Hm01b0Frame, HM01B0_ADDRESS, HM01B0_CHIP_ID, NATIVE_RESOLUTION};
