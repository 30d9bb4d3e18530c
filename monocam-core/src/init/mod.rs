//! Device bring-up
//!
//! Drives [`crate::state::DeviceState`] from power-on to either streaming
//! or one of the fatal states, and owns the fatal status cycle.

pub mod fatal;
pub mod initializer;

pub use fatal::{fatal_cycle_once, run_fatal_cycle, FatalReport, FATAL_SCREEN_HOLD_MS};
pub use initializer::{
    power_cycle, retry_backoff_ms, DeviceInitializer, POWER_SETTLE_MS, RETRY_BACKOFF_STEP_MS,
};
