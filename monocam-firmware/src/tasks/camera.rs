//! Camera pipeline task
//!
//! Owns every peripheral the pipeline touches and hands them to the
//! board-agnostic core.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::{DMA_CH0, I2C0, I2C1, PIO0};
use embassy_time::Delay;
use monocam_core::Board;
use monocam_drivers::camera::Hm01b0;
use monocam_oled::Oled;

use crate::capture::DvpCapture;
use crate::clock::EmbassyClock;
use crate::config::CAMERA_CONFIG;
use crate::diag::DefmtSink;
use crate::memory::HeapProbe;

pub type Display = Oled<I2c<'static, I2C0, Async>>;
pub type Camera = Hm01b0<I2c<'static, I2C1, Async>, DvpCapture<'static, PIO0, 0, DMA_CH0>>;

/// Board wiring used by the firmware
pub type FirmwareBoard =
    Board<Display, Camera, Output<'static>, Delay, EmbassyClock, DefmtSink, HeapProbe>;

/// Camera task - bring-up, then stream forever
#[embassy_executor::task]
pub async fn camera_task(mut board: FirmwareBoard) {
    info!("Camera task started");
    monocam_core::system::run(&CAMERA_CONFIG, &mut board).await;
}
