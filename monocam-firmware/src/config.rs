//! Build-time configuration and board wiring

use monocam_core::config::{PipelineConfig, Resolution};
use monocam_oled::Controller;

include!(concat!(env!("OUT_DIR"), "/camera_config.rs"));

/// Panel controller fitted to the board
pub const DISPLAY_CONTROLLER: Controller = Controller::Ssd1306;

/// I2C clock for both buses (Hz)
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Heap size, enough for the native and cropped frame buffers
pub const HEAP_SIZE: usize = 64 * 1024;
