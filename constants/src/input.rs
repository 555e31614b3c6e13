/// Degrees of azimuth per pixel of horizontal drag
pub const AZIMUTH_SENSITIVITY: f32 = 0.2;

/// Degrees of elevation per pixel of vertical drag
pub const ELEVATION_SENSITIVITY: f32 = 0.2;

/// Radius scale per wheel-delta unit
pub const ZOOM_SENSITIVITY: f32 = 0.002;

/// Pinch multiplier applied on top of `ZOOM_SENSITIVITY`. Negative so that
/// spreading two fingers zooms in while a positive wheel delta zooms out.
pub const PINCH_ZOOM_MULTIPLIER: f32 = -5.0;

/// World units of target movement per pixel of pan drag
pub const PAN_SENSITIVITY: f32 = -0.01;

/// Wheel deltas reported in lines are converted to pixels with this factor.
pub const WHEEL_LINE_TO_PIXELS: f32 = 100.0;
