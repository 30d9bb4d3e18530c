//! Initialization events
//!
//! Events produced by the device initializer as bring-up progresses.

use super::machine::DisplayFault;

/// Initialization events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitEvent {
    /// Display probed and initialized
    DisplayReady,
    /// Display probe or init failed
    DisplayFailed(DisplayFault),
    /// Begin camera bring-up with the given attempt budget
    StartCamera { max_attempts: u8 },
    /// Current camera attempt succeeded
    CameraReady,
    /// Current camera attempt failed
    CameraFailed,
}
