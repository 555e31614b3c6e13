//! Core application setup and state management.
//!
//! Handles the app lifecycle, window configuration, runtime settings and
//! plugin initialisation for both native and WASM targets.

/// Plugin registration, system scheduling and the startup scene.
pub mod app_setup;

/// `AwaitingCity` to `Running` lifecycle, pause flag and city start.
pub mod app_state;

/// Runtime tuning loaded from `assets/config/interaction.json`.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Binds to the `#bevy` canvas on the web and lets the page keep its own
/// scrolling out of the way of touch gestures.
pub mod window_config;
