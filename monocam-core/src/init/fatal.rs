//! Fatal status cycle
//!
//! Entered once bring-up ends in a fatal state. Nothing here retries or
//! returns; the device needs a power cycle.

use embedded_hal_async::delay::DelayNs;

use crate::board::Board;
use crate::health::sample_memory;
use crate::state::DeviceState;
use crate::status::StatusScreen;
use crate::traits::{DiagnosticSink, MemoryProbe, MonoDisplay, SensorFailure, Severity};

/// How long each fatal screen is held (ms)
pub const FATAL_SCREEN_HOLD_MS: u32 = 3000;

/// What went wrong during bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FatalReport {
    pub state: DeviceState,
    pub last_failure: Option<SensorFailure>,
    pub attempts: u8,
}

/// One pass of the fatal cycle
///
/// Without a usable display only the diagnostic line is emitted; otherwise the
/// short and the detailed screen are shown in turn.
pub async fn fatal_cycle_once<D, C, P, Dl, K, S, M>(
    report: &FatalReport,
    board: &mut Board<D, C, P, Dl, K, S, M>,
) where
    D: MonoDisplay,
    Dl: DelayNs,
    S: DiagnosticSink,
    M: MemoryProbe,
{
    if !report.state.display_available() {
        match report.state {
            DeviceState::DisplayFailedFatal(fault) => board.sink.emit_fmt(
                Severity::Error,
                format_args!("fatal: display {}, restart required", fault),
            ),
            _ => board
                .sink
                .emit(Severity::Error, "fatal: display never initialized, restart required"),
        }
        board.delay.delay_ms(FATAL_SCREEN_HOLD_MS).await;
        return;
    }

    let cause = report.last_failure.unwrap_or(SensorFailure::Unknown);
    let snapshot = sample_memory(&board.memory);
    board.sink.emit_fmt(
        Severity::Error,
        format_args!(
            "fatal: camera failed after {} attempts: {} (heap {})",
            report.attempts, cause, snapshot.free_heap
        ),
    );
    board
        .sink
        .emit_fmt(Severity::Error, format_args!("fatal: hint: {}", cause.hint()));

    // Render errors are ignored; the diagnostic line above already went out
    let _ = StatusScreen::camera_fatal_short()
        .render(&mut board.display)
        .await;
    board.delay.delay_ms(FATAL_SCREEN_HOLD_MS).await;

    let _ = StatusScreen::camera_fatal_detail(report.last_failure, report.attempts, snapshot.free_heap)
        .render(&mut board.display)
        .await;
    board.delay.delay_ms(FATAL_SCREEN_HOLD_MS).await;
}

/// Repeat the fatal cycle forever
pub async fn run_fatal_cycle<D, C, P, Dl, K, S, M>(
    report: FatalReport,
    board: &mut Board<D, C, P, Dl, K, S, M>,
) where
    D: MonoDisplay,
    Dl: DelayNs,
    S: DiagnosticSink,
    M: MemoryProbe,
{
    loop {
        fatal_cycle_once(&report, board).await;
    }
}
