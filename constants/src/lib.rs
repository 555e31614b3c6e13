//! Shared tuning constants for the city renderer.
//!
//! Every value here is a compiled-in default. Runtime overrides come from the
//! engine's interaction settings file.

pub mod camera;
pub mod input;
pub mod render_settings;
pub mod simulation;
