//! Pipeline loop

use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;

use crate::board::Board;
use crate::config::PipelineConfig;
use crate::frame::{convert, Bitmap, FrameError, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::health::{sample_memory, HealthMonitor};
use crate::traits::{
    AcquiredFrame, CameraSensor, Clock, DiagnosticSink, DisplayError, MemoryProbe, MonoDisplay,
    Severity,
};

/// Result of one pipeline iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Frame converted and flushed to the panel
    Rendered,
    /// Sensor had no frame
    NoFrame,
    /// Frame failed validation and was released unconverted
    Rejected(FrameError),
    /// Frame converted but the flush failed
    DisplayError(DisplayError),
}

impl FrameOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FrameOutcome::Rendered)
    }
}

/// Remaining time in the frame interval, zero when over budget
pub fn pacing_delay_ms(elapsed_ms: u64, interval_ms: u32) -> u32 {
    (interval_ms as u64).saturating_sub(elapsed_ms) as u32
}

/// Capture pipeline
///
/// Owns the single bitmap and the health counters; both live as long as
/// the pipeline and are never reallocated.
pub struct Pipeline<'c> {
    config: &'c PipelineConfig,
    bitmap: Bitmap,
    health: HealthMonitor,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c PipelineConfig) -> Self {
        Self {
            config,
            bitmap: Bitmap::new(),
            health: HealthMonitor::new(config),
        }
    }

    /// Most recently converted frame
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn health(&self) -> &HealthMonitor {
        &self.health
    }

    /// Run one iteration
    pub async fn step<D, C, P, Dl, K, S, M>(
        &mut self,
        board: &mut Board<D, C, P, Dl, K, S, M>,
    ) -> FrameOutcome
    where
        D: MonoDisplay,
        C: CameraSensor,
        Dl: DelayNs,
        K: Clock,
        S: DiagnosticSink,
        M: MemoryProbe,
    {
        let start = board.clock.now_ms();

        let outcome = match self.capture(&mut board.camera).await {
            Ok(()) => self.render(&mut board.display).await,
            Err(outcome) => outcome,
        };

        match outcome {
            FrameOutcome::Rendered => {}
            FrameOutcome::NoFrame => board.sink.emit(Severity::Warn, "frame: capture failed"),
            FrameOutcome::Rejected(e) => board
                .sink
                .emit_fmt(Severity::Warn, format_args!("frame: rejected ({})", e)),
            FrameOutcome::DisplayError(e) => board
                .sink
                .emit_fmt(Severity::Warn, format_args!("frame: flush failed ({})", e)),
        }
        self.health.record_frame(outcome.is_success());

        if self.health.stats_due() {
            let snapshot = sample_memory(&board.memory);
            self.health.report_stats(&snapshot, &mut board.sink);
        }

        let elapsed = board.clock.now_ms().saturating_sub(start);
        let pause = pacing_delay_ms(elapsed, self.config.frame_delay_ms);
        if pause > 0 {
            board.delay.delay_ms(pause).await;
        }

        yield_now().await;
        outcome
    }

    /// Run forever
    pub async fn run<D, C, P, Dl, K, S, M>(&mut self, board: &mut Board<D, C, P, Dl, K, S, M>)
    where
        D: MonoDisplay,
        C: CameraSensor,
        Dl: DelayNs,
        K: Clock,
        S: DiagnosticSink,
        M: MemoryProbe,
    {
        board.sink.emit(Severity::Info, "pipeline: streaming");
        loop {
            self.step(board).await;
        }
    }

    /// Acquire, validate and convert one frame
    ///
    /// The frame guard is released on every path before this returns.
    async fn capture<C: CameraSensor>(&mut self, camera: &mut C) -> Result<(), FrameOutcome> {
        let Some(frame) = camera.acquire().await else {
            return Err(FrameOutcome::NoFrame);
        };

        let raw = frame.raw();
        if let Err(e) = raw.validate(self.config.source) {
            frame.release();
            return Err(FrameOutcome::Rejected(e));
        }

        convert(&raw, self.config.brightness_threshold, &mut self.bitmap);
        frame.release();
        Ok(())
    }

    async fn render<D: MonoDisplay>(&self, display: &mut D) -> FrameOutcome {
        display.clear();
        display.draw_bitmap(
            0,
            0,
            self.bitmap.as_bytes(),
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        );
        match display.flush().await {
            Ok(()) => FrameOutcome::Rendered,
            Err(e) => FrameOutcome::DisplayError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Resolution;
    use crate::frame::{PixelFormat, BITMAP_LEN};
    use crate::testing::{mock_board, FrameScript, MockCamera, MockClock};
    use embassy_futures::block_on;
    use std::vec;

    fn config(threshold: u8) -> PipelineConfig {
        PipelineConfig {
            brightness_threshold: threshold,
            ..PipelineConfig::DEFAULT
        }
    }

    #[test]
    fn test_bright_frame_fills_panel() {
        let config = config(64);
        let mut pipeline = Pipeline::new(&config);
        let mut board = mock_board(MockCamera::streaming());

        assert_eq!(block_on(pipeline.step(&mut board)), FrameOutcome::Rendered);
        assert_eq!(board.display.last_bitmap.len(), BITMAP_LEN);
        assert!(board.display.last_bitmap.iter().all(|&b| b == 0xFF));
        assert_eq!(board.camera.outstanding(), 0);
        assert_eq!(pipeline.health().counters().frames_processed, 1);
        assert_eq!(pipeline.health().counters().error_count, 0);
    }

    #[test]
    fn test_dark_frame_clears_panel() {
        let config = config(64);
        let mut pipeline = Pipeline::new(&config);
        let mut camera = MockCamera::streaming();
        camera.default_frame = FrameScript::gray(Resolution::SQUARE_96, 10);
        let mut board = mock_board(camera);

        block_on(pipeline.step(&mut board));
        assert!(board.display.last_bitmap.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_left_half_bright() {
        let config = config(128);
        let mut pipeline = Pipeline::new(&config);
        let mut camera = MockCamera::streaming();
        let mut data = vec![0u8; 96 * 96];
        for row in data.chunks_mut(96) {
            row[..48].fill(255);
        }
        camera.frames.push_back(FrameScript::Pixels {
            resolution: Resolution::SQUARE_96,
            data,
        });
        let mut board = mock_board(camera);

        block_on(pipeline.step(&mut board));
        let bitmap = pipeline.bitmap();
        assert!(bitmap.get(0, 0));
        assert!(bitmap.get(63, 63));
        assert!(!bitmap.get(64, 0));
        assert!(!bitmap.get(127, 63));
    }

    #[test]
    fn test_every_frame_released() {
        let config = config(128);
        let mut pipeline = Pipeline::new(&config);
        let mut camera = MockCamera::streaming();
        camera.frames.extend([
            FrameScript::Uniform {
                resolution: Resolution::SQUARE_96,
                format: PixelFormat::Rgb565,
                value: 0,
            },
            FrameScript::gray(Resolution::new(160, 120), 0),
            FrameScript::Missing,
        ]);
        let mut board = mock_board(camera);

        let outcomes: std::vec::Vec<_> = (0..4).map(|_| block_on(pipeline.step(&mut board))).collect();
        assert_eq!(
            outcomes,
            [
                FrameOutcome::Rejected(FrameError::FormatMismatch),
                FrameOutcome::Rejected(FrameError::ResolutionMismatch),
                FrameOutcome::NoFrame,
                FrameOutcome::Rendered,
            ]
        );
        assert_eq!(board.camera.acquired, 3);
        assert_eq!(board.camera.released, 3);
        // Rejected frames never reach the panel
        assert_eq!(board.display.flushes, 1);
        assert_eq!(pipeline.health().counters().frames_processed, 4);
        assert_eq!(pipeline.health().counters().error_count, 3);
        assert!(board.sink.contains("frame: rejected (pixel format mismatch)"));
    }

    #[test]
    fn test_flush_failure_counts_as_error() {
        let config = config(128);
        let mut pipeline = Pipeline::new(&config);
        let mut board = mock_board(MockCamera::streaming());
        board.display.flush_failures = 1;

        assert_eq!(
            block_on(pipeline.step(&mut board)),
            FrameOutcome::DisplayError(DisplayError::Communication)
        );
        assert_eq!(pipeline.health().counters().error_count, 1);
        assert_eq!(board.camera.outstanding(), 0);
    }

    #[test]
    fn test_pacing_fills_interval() {
        assert_eq!(pacing_delay_ms(30, 100), 70);
        assert_eq!(pacing_delay_ms(100, 100), 0);
        assert_eq!(pacing_delay_ms(250, 100), 0);

        let config = config(128);
        let mut pipeline = Pipeline::new(&config);
        let mut board = mock_board(MockCamera::streaming());
        block_on(pipeline.step(&mut board));
        // Mock clock advances 5 ms per read
        assert_eq!(board.delay.delays_ms.as_slice(), &[95]);

        board.clock = MockClock::new(150);
        board.delay.delays_ms.clear();
        block_on(pipeline.step(&mut board));
        assert!(board.delay.delays_ms.is_empty());
    }

    #[test]
    fn test_stats_every_interval() {
        let config = PipelineConfig {
            stats_interval: 3,
            ..PipelineConfig::DEFAULT
        };
        let mut pipeline = Pipeline::new(&config);
        let mut board = mock_board(MockCamera::streaming());

        for _ in 0..7 {
            block_on(pipeline.step(&mut board));
        }
        assert_eq!(board.sink.count_matching("stats:"), 2);
        assert!(board.sink.contains("stats: frames=6 errors=0 rate=0.00% heap=40000"));
    }

    #[test]
    fn test_unconfigured_camera_yields_no_frame() {
        let config = config(128);
        let mut pipeline = Pipeline::new(&config);
        let mut board = mock_board(MockCamera::new());

        assert_eq!(block_on(pipeline.step(&mut board)), FrameOutcome::NoFrame);
        assert!(board.sink.contains("frame: capture failed"));
    }
}
