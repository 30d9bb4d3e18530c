//! Camera sensor trait

use core::fmt;

use crate::config::{SensorSettings, SensorTuning};
use crate::frame::RawFrame;

/// Classified cause of a failed sensor bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFailure {
    /// Frame buffer allocation failed
    OutOfMemory,
    /// Sensor or driver rejected the requested mode
    InvalidConfiguration,
    /// Sensor did not respond or reported the wrong identity
    Hardware,
    /// Anything the driver could not classify
    Unknown,
}

impl SensorFailure {
    /// One-line troubleshooting hint for the fatal screen and log
    pub const fn hint(&self) -> &'static str {
        match self {
            SensorFailure::OutOfMemory => "frame buffer alloc failed, check heap size",
            SensorFailure::InvalidConfiguration => "sensor rejected mode, check camera.toml",
            SensorFailure::Hardware => "sensor not responding, check cable and power",
            SensorFailure::Unknown => "unclassified driver error",
        }
    }

    /// Short label that fits on one status row
    pub const fn label(&self) -> &'static str {
        match self {
            SensorFailure::OutOfMemory => "out of memory",
            SensorFailure::InvalidConfiguration => "invalid config",
            SensorFailure::Hardware => "hardware fault",
            SensorFailure::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SensorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A frame on loan from the sensor driver
///
/// The driver's buffer is returned when the guard is dropped or
/// explicitly released.
pub trait AcquiredFrame {
    /// View of the frame data
    fn raw(&self) -> RawFrame<'_>;

    /// Hand the buffer back to the driver
    fn release(self)
    where
        Self: Sized,
    {
        drop(self)
    }
}

/// Trait for frame-producing camera sensors
///
/// `acquire` borrows the sensor mutably for the lifetime of the returned
/// frame, so only one frame can be outstanding at a time.
#[allow(async_fn_in_trait)]
pub trait CameraSensor {
    /// Guard type for an acquired frame
    type Frame<'a>: AcquiredFrame
    where
        Self: 'a;

    /// Configure capture mode and allocate frame buffers
    async fn configure(&mut self, settings: &SensorSettings) -> Result<(), SensorFailure>;

    /// Apply runtime tuning after a successful configure
    async fn apply_tuning(&mut self, tuning: &SensorTuning) -> Result<(), SensorFailure>;

    /// Stop the sensor and free everything `configure` allocated
    async fn deinit(&mut self);

    /// Acquire the next frame
    ///
    /// Returns `None` when no frame is available (not configured, capture
    /// timeout, transfer error).
    async fn acquire(&mut self) -> Option<Self::Frame<'_>>;
}
