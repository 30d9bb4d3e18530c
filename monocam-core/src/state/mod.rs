//! Device initialization state machine
//!
//! One `DeviceState` exists for the lifetime of the firmware. It is
//! explicit, finite and deterministic: every transition goes through
//! [`DeviceState::transition`], and the terminal states ignore all events.

pub mod events;
pub mod machine;

pub use events::InitEvent;
pub use machine::{DeviceState, DisplayFault};
