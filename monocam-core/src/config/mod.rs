//! Configuration types
//!
//! Pipeline settings are fixed at build time. The firmware build script
//! deserializes `camera.toml` into [`PipelineConfig`], validates it and
//! embeds the result as a constant.

pub mod sensor;
pub mod types;

pub use sensor::*;
pub use types::*;
