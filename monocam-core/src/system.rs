//! Top-level firmware flow

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::board::Board;
use crate::config::PipelineConfig;
use crate::init::{run_fatal_cycle, DeviceInitializer};
use crate::pipeline::Pipeline;
use crate::state::DeviceState;
use crate::traits::{CameraSensor, Clock, DiagnosticSink, MemoryProbe, MonoDisplay};

/// Bring the device up, then stream or show the fatal cycle
///
/// Never returns.
pub async fn run<D, C, P, Dl, K, S, M>(config: &PipelineConfig, board: &mut Board<D, C, P, Dl, K, S, M>)
where
    D: MonoDisplay,
    C: CameraSensor,
    P: OutputPin,
    Dl: DelayNs,
    K: Clock,
    S: DiagnosticSink,
    M: MemoryProbe,
{
    let mut initializer = DeviceInitializer::new(config);

    match initializer.run(board).await {
        DeviceState::Streaming => Pipeline::new(config).run(board).await,
        _ => run_fatal_cycle(initializer.fatal_report(), board).await,
    }
}
