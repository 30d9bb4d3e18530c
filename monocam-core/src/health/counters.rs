//! Frame and error counters

/// Cumulative frame counters
///
/// `frames_processed` only grows. `error_count` is reset to zero once it
/// exceeds the saturation limit, which keeps the displayed rate tied to a
/// recent window at the cost of a visible drop when the reset happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HealthCounters {
    pub frames_processed: u32,
    pub error_count: u32,
}

impl HealthCounters {
    pub const fn new() -> Self {
        Self {
            frames_processed: 0,
            error_count: 0,
        }
    }

    /// Count one frame
    ///
    /// Every frame is counted as processed; failed frames also count as
    /// errors. Returns true if the error counter was reset.
    pub fn record(&mut self, success: bool, saturation_limit: u32) -> bool {
        self.frames_processed = self.frames_processed.saturating_add(1);
        if success {
            return false;
        }

        self.error_count = self.error_count.saturating_add(1);
        if self.error_count > saturation_limit {
            self.error_count = 0;
            return true;
        }
        false
    }

    /// Error rate in percent: `errors / (frames + errors) * 100`
    ///
    /// Zero when nothing has been counted.
    pub fn error_rate_percent(&self) -> f32 {
        let frames = self.frames_processed as f32;
        let errors = self.error_count as f32;
        if frames + errors == 0.0 {
            return 0.0;
        }
        errors / (frames + errors) * 100.0
    }
}
