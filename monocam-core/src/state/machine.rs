//! State machine definition

use core::fmt;

use super::events::InitEvent;

/// Device bring-up states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Power-on, nothing touched yet
    Uninitialized,
    /// Display is up, camera not yet attempted
    DisplayReady,
    /// Camera bring-up in progress (`attempt` is 1-based)
    CameraInitializing { attempt: u8, max_attempts: u8 },
    /// Camera configured, pipeline running
    Streaming,
    /// Camera attempts exhausted
    CameraFailedFatal,
    /// Display could not be brought up; nothing can be shown
    DisplayFailedFatal(DisplayFault),
}

/// Why the display bring-up failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayFault {
    /// No device acknowledged at the bus address
    ProbeFailed,
    /// Device present but the init sequence failed
    InitFailed,
}

impl fmt::Display for DisplayFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFault::ProbeFailed => f.write_str("probe failed"),
            DisplayFault::InitFailed => f.write_str("init failed"),
        }
    }
}

impl DeviceState {
    /// Check if this is a fatal state
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DeviceState::CameraFailedFatal | DeviceState::DisplayFailedFatal(_)
        )
    }

    /// Check if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        self.is_fatal() || matches!(self, DeviceState::Streaming)
    }

    /// Check if the display can show status screens
    pub fn display_available(&self) -> bool {
        !matches!(
            self,
            DeviceState::Uninitialized | DeviceState::DisplayFailedFatal(_)
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: InitEvent) -> Self {
        use DeviceState::*;
        use InitEvent as E;

        match (self, event) {
            // Display bring-up has no retry
            (Uninitialized, E::DisplayReady) => DisplayReady,
            (Uninitialized, E::DisplayFailed(fault)) => DisplayFailedFatal(fault),

            (DisplayReady, E::StartCamera { max_attempts: 0 }) => CameraFailedFatal,
            (DisplayReady, E::StartCamera { max_attempts }) => CameraInitializing {
                attempt: 1,
                max_attempts,
            },

            (CameraInitializing { .. }, E::CameraReady) => Streaming,
            (
                CameraInitializing {
                    attempt,
                    max_attempts,
                },
                E::CameraFailed,
            ) => {
                if attempt >= max_attempts {
                    CameraFailedFatal
                } else {
                    CameraInitializing {
                        attempt: attempt + 1,
                        max_attempts,
                    }
                }
            }

            // Terminal states and out-of-order events: stay put
            _ => self,
        }
    }
}
