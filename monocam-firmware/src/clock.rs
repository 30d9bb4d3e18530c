//! Monotonic clock backed by the embassy time driver

use embassy_time::Instant;
use monocam_core::traits::Clock;

pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
