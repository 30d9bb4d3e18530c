//! Monocam - Camera to OLED Firmware
//!
//! Main firmware binary for RP2040 boards with an HM01B0 camera and a
//! 128x64 I2C OLED. Frames are thresholded to black and white and shown
//! live on the panel.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, I2C1, PIO0};
use embassy_rp::pio::Pio;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use monocam_core::Board;
use monocam_drivers::camera::Hm01b0;
use monocam_oled::{Oled, DEFAULT_ADDRESS};

use crate::capture::DvpCapture;
use crate::clock::EmbassyClock;
use crate::config::{DISPLAY_CONTROLLER, I2C_FREQUENCY_HZ};
use crate::diag::DefmtSink;
use crate::memory::HeapProbe;

mod capture;
mod clock;
mod config;
mod diag;
mod memory;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

fn i2c_config() -> i2c::Config {
    let mut cfg = i2c::Config::default();
    cfg.frequency = I2C_FREQUENCY_HZ;
    cfg
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Monocam firmware starting...");

    // Initialize heap allocator (frame buffers)
    memory::init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Hold the sensor in power-down until bring-up power-cycles it
    let camera_power = Output::new(p.PIN_17, Level::High);

    // OLED on I2C0 (SDA=GPIO4, SCL=GPIO5)
    let display_bus = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config());
    let display = Oled::new(display_bus, DEFAULT_ADDRESS, DISPLAY_CONTROLLER);

    // Camera control on I2C1 (SDA=GPIO2, SCL=GPIO3)
    let camera_bus = I2c::new_async(p.I2C1, p.PIN_3, p.PIN_2, Irqs, i2c_config());

    // Camera pixel bus on PIO0
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let pins = [
        common.make_pio_pin(p.PIN_6),
        common.make_pio_pin(p.PIN_7),
        common.make_pio_pin(p.PIN_8),
        common.make_pio_pin(p.PIN_9),
        common.make_pio_pin(p.PIN_10),
        common.make_pio_pin(p.PIN_11),
        common.make_pio_pin(p.PIN_12),
        common.make_pio_pin(p.PIN_13),
        common.make_pio_pin(p.PIN_14),
        common.make_pio_pin(p.PIN_15),
        common.make_pio_pin(p.PIN_16),
    ];
    let capture = DvpCapture::new(&mut common, sm0, p.DMA_CH0, pins);
    let camera = Hm01b0::new(camera_bus, capture);

    info!("Camera bus and PIO capture initialized");

    let board = Board {
        display,
        camera,
        camera_power,
        delay: Delay,
        clock: EmbassyClock,
        sink: DefmtSink,
        memory: HeapProbe,
    };

    spawner.spawn(tasks::camera_task(board)).unwrap();

    info!("Camera task spawned, firmware running");

    // Keeps the PIO common block (and its loaded program) alive
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
