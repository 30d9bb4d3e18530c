//! 128x64 monochrome OLED driver
//!
//! Async I2C driver for SSD1306 and SH1106 panels. Drawing goes into a
//! page-organized frame buffer through `embedded-graphics`; `flush`
//! pushes the buffer to the panel one page at a time.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

mod command;
mod driver;

pub use driver::{Controller, Oled, DEFAULT_ADDRESS, HEIGHT, PAGES, WIDTH};
