//! Health monitor

use super::counters::HealthCounters;
use crate::config::PipelineConfig;
use crate::traits::{DiagnosticSink, MemorySnapshot, Severity};

/// Runtime health tracking for the pipeline
///
/// Owned by the pipeline, which is the only writer.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    counters: HealthCounters,
    saturation_limit: u32,
    stats_interval: u32,
}

impl HealthMonitor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            counters: HealthCounters::new(),
            saturation_limit: config.error_saturation_limit,
            stats_interval: config.stats_interval.max(1),
        }
    }

    /// Count one frame
    pub fn record_frame(&mut self, success: bool) {
        self.counters.record(success, self.saturation_limit);
    }

    /// Current error rate in percent
    pub fn error_rate_percent(&self) -> f32 {
        self.counters.error_rate_percent()
    }

    pub fn counters(&self) -> &HealthCounters {
        &self.counters
    }

    /// True right after every `stats_interval`-th frame
    pub fn stats_due(&self) -> bool {
        let frames = self.counters.frames_processed;
        frames != 0 && frames % self.stats_interval == 0
    }

    /// Emit the periodic statistics line
    pub fn report_stats<S: DiagnosticSink + ?Sized>(&self, memory: &MemorySnapshot, sink: &mut S) {
        sink.emit_fmt(
            Severity::Info,
            format_args!(
                "stats: frames={} errors={} rate={:.2}% heap={}",
                self.counters.frames_processed,
                self.counters.error_count,
                self.error_rate_percent(),
                memory.free_heap
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSink;

    fn config(limit: u32, interval: u32) -> PipelineConfig {
        PipelineConfig {
            error_saturation_limit: limit,
            stats_interval: interval,
            ..PipelineConfig::DEFAULT
        }
    }

    #[test]
    fn test_stats_due_every_interval() {
        let mut monitor = HealthMonitor::new(&config(1000, 100));
        assert!(!monitor.stats_due());

        for _ in 0..99 {
            monitor.record_frame(true);
            assert!(!monitor.stats_due());
        }
        monitor.record_frame(false);
        assert!(monitor.stats_due());

        monitor.record_frame(true);
        assert!(!monitor.stats_due());
    }

    #[test]
    fn test_saturation_uses_config_limit() {
        let mut monitor = HealthMonitor::new(&config(2, 100));
        monitor.record_frame(false);
        monitor.record_frame(false);
        assert_eq!(monitor.counters().error_count, 2);
        monitor.record_frame(false);
        assert_eq!(monitor.counters().error_count, 0);
        assert_eq!(monitor.counters().frames_processed, 3);
    }

    #[test]
    fn test_report_stats_line() {
        let mut monitor = HealthMonitor::new(&config(1000, 100));
        for i in 0..1000 {
            monitor.record_frame(i % 20 != 0);
        }
        let mut sink = MockSink::new();
        let memory = MemorySnapshot {
            free_heap: 4096,
            ..Default::default()
        };
        monitor.report_stats(&memory, &mut sink);
        assert!(sink.contains("stats: frames=1000 errors=50 rate=4.76% heap=4096"));
    }
}
