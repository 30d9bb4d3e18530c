//! Device initializer

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use super::fatal::FatalReport;
use crate::board::Board;
use crate::config::{PipelineConfig, SensorTuning};
use crate::health::{report_memory, sample_memory};
use crate::state::{DeviceState, DisplayFault, InitEvent};
use crate::status::{run_self_test, StatusScreen};
use crate::traits::{CameraSensor, DiagnosticSink, MemoryProbe, MonoDisplay, SensorFailure, Severity};

/// Backoff grows by this much per failed attempt (ms)
pub const RETRY_BACKOFF_STEP_MS: u32 = 1000;

/// Settle time after each power-down pin edge (ms)
pub const POWER_SETTLE_MS: u32 = 10;

/// Wait after failed attempt `attempt` (1-based) before the next one
pub const fn retry_backoff_ms(attempt: u8) -> u32 {
    attempt as u32 * RETRY_BACKOFF_STEP_MS
}

/// Power-cycle the sensor through its power-down pin
///
/// The pin is active high: high holds the sensor in power-down.
pub async fn power_cycle<P, Dl>(pin: &mut P, delay: &mut Dl) -> Result<(), SensorFailure>
where
    P: OutputPin,
    Dl: DelayNs,
{
    pin.set_high().map_err(|_| SensorFailure::Hardware)?;
    delay.delay_ms(POWER_SETTLE_MS).await;
    pin.set_low().map_err(|_| SensorFailure::Hardware)?;
    delay.delay_ms(POWER_SETTLE_MS).await;
    Ok(())
}

/// Brings the display and camera up, in that order
///
/// Owns the single [`DeviceState`] instance. Display failures are fatal
/// immediately; camera failures are retried up to `max_retries` times.
#[derive(Debug, Clone)]
pub struct DeviceInitializer<'c> {
    config: &'c PipelineConfig,
    state: DeviceState,
    last_failure: Option<SensorFailure>,
    attempts_made: u8,
}

impl<'c> DeviceInitializer<'c> {
    pub fn new(config: &'c PipelineConfig) -> Self {
        Self {
            config,
            state: DeviceState::Uninitialized,
            last_failure: None,
            attempts_made: 0,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Cause of the most recent failed camera attempt
    pub fn last_failure(&self) -> Option<SensorFailure> {
        self.last_failure
    }

    /// Camera attempts started so far
    pub fn attempts_made(&self) -> u8 {
        self.attempts_made
    }

    /// Summary for the fatal status cycle
    pub fn fatal_report(&self) -> FatalReport {
        FatalReport {
            state: self.state,
            last_failure: self.last_failure,
            attempts: self.attempts_made,
        }
    }

    fn apply(&mut self, event: InitEvent) {
        self.state = self.state.transition(event);
    }

    /// Run the whole bring-up sequence
    ///
    /// Returns the terminal state: `Streaming`, `CameraFailedFatal` or
    /// `DisplayFailedFatal`.
    pub async fn run<D, C, P, Dl, K, S, M>(
        &mut self,
        board: &mut Board<D, C, P, Dl, K, S, M>,
    ) -> DeviceState
    where
        D: MonoDisplay,
        C: CameraSensor,
        P: OutputPin,
        Dl: DelayNs,
        S: DiagnosticSink,
        M: MemoryProbe,
    {
        // Let the rails settle before touching either bus
        board.delay.delay_ms(self.config.startup_delay_ms).await;

        board.sink.emit_fmt(
            Severity::Info,
            format_args!("monocam v{} starting", env!("CARGO_PKG_VERSION")),
        );
        board.sink.emit_fmt(
            Severity::Info,
            format_args!(
                "config: source={} threshold={} interval={}ms retries={}",
                self.config.source,
                self.config.brightness_threshold,
                self.config.frame_delay_ms,
                self.config.max_retries
            ),
        );
        let snapshot = sample_memory(&board.memory);
        report_memory(&snapshot, &mut board.sink);

        if self
            .bring_up_display(&mut board.display, &mut board.sink)
            .await
            .is_err()
        {
            return self.state;
        }

        if self.config.self_test {
            board.sink.emit(Severity::Info, "display: self-test");
            if let Err(e) = run_self_test(&mut board.display, &mut board.delay).await {
                board
                    .sink
                    .emit_fmt(Severity::Warn, format_args!("display: self-test flush failed ({})", e));
            }
        }

        self.bring_up_camera(board).await;
        self.state
    }

    /// Probe and initialize the display
    pub async fn bring_up_display<D, S>(
        &mut self,
        display: &mut D,
        sink: &mut S,
    ) -> Result<(), DisplayFault>
    where
        D: MonoDisplay,
        S: DiagnosticSink,
    {
        let address = display.bus_address();

        if let Err(e) = display.probe().await {
            sink.emit_fmt(
                Severity::Error,
                format_args!("display: not found at 0x{:02X} ({})", address, e),
            );
            self.apply(InitEvent::DisplayFailed(DisplayFault::ProbeFailed));
            return Err(DisplayFault::ProbeFailed);
        }
        sink.emit_fmt(
            Severity::Info,
            format_args!("display: found at 0x{:02X}", address),
        );

        if let Err(e) = display.init().await {
            sink.emit_fmt(Severity::Error, format_args!("display: init failed ({})", e));
            self.apply(InitEvent::DisplayFailed(DisplayFault::InitFailed));
            return Err(DisplayFault::InitFailed);
        }

        sink.emit(Severity::Info, "display: ready");
        self.apply(InitEvent::DisplayReady);
        Ok(())
    }

    /// Attempt camera bring-up until it succeeds or the budget runs out
    pub async fn bring_up_camera<D, C, P, Dl, K, S, M>(
        &mut self,
        board: &mut Board<D, C, P, Dl, K, S, M>,
    ) where
        D: MonoDisplay,
        C: CameraSensor,
        P: OutputPin,
        Dl: DelayNs,
        S: DiagnosticSink,
    {
        self.apply(InitEvent::StartCamera {
            max_attempts: self.config.max_retries,
        });

        while let DeviceState::CameraInitializing {
            attempt,
            max_attempts,
        } = self.state
        {
            self.attempts_made = attempt;
            board.sink.emit_fmt(
                Severity::Info,
                format_args!("camera: attempt {}/{}", attempt, max_attempts),
            );

            let screen = StatusScreen::camera_starting(attempt, max_attempts, self.last_failure);
            if let Err(e) = screen.render(&mut board.display).await {
                board
                    .sink
                    .emit_fmt(Severity::Warn, format_args!("display: status failed ({})", e));
            }

            match self.attempt_camera(board).await {
                Ok(()) => {
                    board.sink.emit_fmt(
                        Severity::Info,
                        format_args!("camera: ready, {} grayscale", self.config.source),
                    );
                    self.apply(InitEvent::CameraReady);
                }
                Err(failure) => {
                    self.last_failure = Some(failure);
                    board.sink.emit_fmt(
                        Severity::Error,
                        format_args!("camera: attempt {} failed: {}", attempt, failure),
                    );
                    board
                        .sink
                        .emit_fmt(Severity::Warn, format_args!("camera: hint: {}", failure.hint()));

                    board.camera.deinit().await;
                    self.apply(InitEvent::CameraFailed);

                    if !self.state.is_fatal() {
                        let backoff = retry_backoff_ms(attempt);
                        board
                            .sink
                            .emit_fmt(Severity::Info, format_args!("camera: retry in {} ms", backoff));
                        board.delay.delay_ms(backoff).await;
                    }
                }
            }
        }

        if self.state == DeviceState::CameraFailedFatal {
            board.sink.emit_fmt(
                Severity::Error,
                format_args!("camera: giving up after {} attempts", self.attempts_made),
            );
        }
    }

    /// One power-cycle, configure and tune sequence
    async fn attempt_camera<D, C, P, Dl, K, S, M>(
        &self,
        board: &mut Board<D, C, P, Dl, K, S, M>,
    ) -> Result<(), SensorFailure>
    where
        C: CameraSensor,
        P: OutputPin,
        Dl: DelayNs,
    {
        power_cycle(&mut board.camera_power, &mut board.delay).await?;
        board
            .camera
            .configure(&self.config.sensor_settings())
            .await?;
        board.camera.apply_tuning(&SensorTuning::CONSERVATIVE).await?;
        Ok(())
    }
}
