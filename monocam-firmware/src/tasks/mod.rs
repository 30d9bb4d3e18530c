//! Embassy async tasks
//!
//! The whole pipeline runs in a single task; nothing else competes for
//! the buses.

pub mod camera;

pub use camera::camera_task;
