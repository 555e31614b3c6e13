//! Orbit camera for city navigation.
//!
//! Keeps a target/azimuth/elevation/radius pose and derives an orthographic
//! view from it. Pointer gestures rotate, pan and zoom the pose; a bevy system
//! mirrors the result onto the render camera every frame.

/// Orbit camera resource, pose mutators and the transform sync system.
pub mod orbit_camera;

pub use orbit_camera::{OrbitCamera, sync_camera_transform};
