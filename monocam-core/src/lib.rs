//! Board-agnostic core logic for the camera viewfinder firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (display, camera sensor, diagnostics, clock, memory)
//! - Frame types and the grayscale to 1-bit converter
//! - Health monitoring (frame error rate, memory pressure)
//! - Device initialization state machine with bounded camera retries
//! - The steady-state capture/convert/render pipeline
//! - Status screens shown outside of streaming

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod board;
pub mod config;
pub mod frame;
pub mod health;
pub mod init;
pub mod pipeline;
pub mod state;
pub mod status;
pub mod system;
pub mod traits;

#[cfg(test)]
mod testing;

pub use board::Board;
