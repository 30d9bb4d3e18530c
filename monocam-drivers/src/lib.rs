//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the sensor traits
//! defined in monocam-core:
//!
//! - HM01B0 monochrome camera (I2C control, parallel pixel capture)
//!
//! Frame buffers are heap allocated at configure time, so the crate needs
//! `alloc` and a global allocator on the target.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod camera;
