//! Steady-state capture loop
//!
//! Acquire, validate, convert, release, render, record, report, pace,
//! yield; one frame per iteration, forever.

pub mod runner;

pub use runner::{pacing_delay_ms, FrameOutcome, Pipeline};
