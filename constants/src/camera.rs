/// World-space height of the orthographic view volume at zoom 1.0
pub const CAMERA_SIZE: f32 = 5.0;

/// Distance from the target used to place the camera eye. Orthographic, so
/// only the direction matters for apparent size.
pub const CAMERA_DISTANCE: f32 = 100.0;

pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 1000.0;

/// Zoom factor clamp. Larger radius = closer view.
pub const MIN_CAMERA_RADIUS: f32 = 0.1;
pub const MAX_CAMERA_RADIUS: f32 = 5.0;

/// Elevation band in degrees. Min and max coincide, which locks vertical tilt.
pub const MIN_CAMERA_ELEVATION: f32 = 45.0;
pub const MAX_CAMERA_ELEVATION: f32 = 45.0;

/// Default pose
pub const DEFAULT_CAMERA_TARGET: [f32; 3] = [8.0, 0.0, 8.0];
pub const DEFAULT_CAMERA_RADIUS: f32 = 0.5;
pub const DEFAULT_CAMERA_AZIMUTH: f32 = 225.0;
pub const DEFAULT_CAMERA_ELEVATION: f32 = 45.0;
