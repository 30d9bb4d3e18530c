//! Status overlay
//!
//! Text screens and test patterns shown while the camera is not
//! streaming. Status screens and live frames never share the panel.

pub mod screen;

pub use screen::{StatusScreen, STATUS_COLS, STATUS_ROWS};
pub use self_test::{run_self_test, SelfTestPattern, SELF_TEST_HOLD_MS};
