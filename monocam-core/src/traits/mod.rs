//! Collaborator traits
//!
//! These traits define the interface between the pipeline logic and the
//! hardware-specific implementations. Any driver satisfying them can be
//! substituted, including the simulated ones used in tests.

pub mod camera;
pub mod clock;
pub mod diag;
pub mod display;
pub mod memory;

pub use camera::{AcquiredFrame, CameraSensor, SensorFailure};
pub use clock::Clock;
pub use diag::{write_truncated, DiagnosticSink, Severity, LINE_CAPACITY};
pub use display::{DisplayError, MonoDisplay};
pub use memory::{MemoryProbe, MemorySnapshot};
