//! Health monitoring
//!
//! Tracks frame/error counters and memory pressure, and formats both for
//! the diagnostic channel.

pub mod counters;
pub mod memory;
pub mod monitor;

pub use counters::HealthCounters;
pub use memory::{report_memory, sample_memory, PsramStatus};
pub use monitor::HealthMonitor;
