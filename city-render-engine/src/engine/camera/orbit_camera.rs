use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

use crate::engine::core::settings::CameraSettings;
use crate::engine::input::{ButtonMask, PointerGesture};

/// Camera pose plus the matrices derived from it. Every mutator recomputes the
/// matrices before returning, so readers never see a stale projection.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Horizontal angle in degrees. Unbounded; trig wraps it.
    pub azimuth: f32,
    /// Vertical angle in degrees, clamped to the configured band.
    pub elevation: f32,
    /// Orthographic zoom factor, clamped to the configured band.
    pub radius: f32,
    aspect: f32,
    settings: CameraSettings,
    position: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraSettings::default(), 16.0 / 9.0)
    }
}

impl OrbitCamera {
    pub fn new(settings: CameraSettings, aspect: f32) -> Self {
        let mut camera = Self {
            target: Vec3::from_array(settings.default_target),
            azimuth: settings.default_azimuth,
            elevation: settings.default_elevation,
            radius: settings.default_radius,
            aspect: sanitize_aspect(aspect),
            settings,
            position: Vec3::ZERO,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.elevation = camera.clamp_elevation(camera.elevation);
        camera.radius = camera.clamp_radius(camera.radius);
        camera.update_matrices();
        camera
    }

    /// Swap tuning values, keeping the current pose within the new bands.
    pub fn apply_settings(&mut self, settings: CameraSettings) {
        self.settings = settings;
        self.elevation = self.clamp_elevation(self.elevation);
        self.radius = self.clamp_radius(self.radius);
        self.update_matrices();
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Orbit around the target. Drag deltas are in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.settings.azimuth_sensitivity;
        self.elevation += dy * self.settings.elevation_sensitivity;
        self.elevation = self.clamp_elevation(self.elevation);
        self.update_matrices();
    }

    /// Move the target along the ground, relative to the current azimuth so a
    /// drag always follows the screen.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let heading = Quat::from_rotation_y(self.azimuth.to_radians());
        let forward = heading * Vec3::Z;
        let left = heading * Vec3::X;
        self.target += forward * (self.settings.pan_sensitivity * dy);
        self.target += left * (self.settings.pan_sensitivity * dx);
        self.update_matrices();
    }

    /// Wheel zoom. Positive deltas (scrolling down) zoom out.
    pub fn zoom(&mut self, delta_scroll: f32) {
        self.radius *= 1.0 - delta_scroll * self.settings.zoom_sensitivity;
        self.radius = self.clamp_radius(self.radius);
        self.update_matrices();
    }

    /// Pinch zoom. `delta` is the growth in finger distance; spreading fingers
    /// zooms in.
    pub fn zoom_by_pinch(&mut self, delta: f32) {
        self.radius *=
            1.0 - delta * self.settings.zoom_sensitivity * self.settings.pinch_zoom_multiplier;
        self.radius = self.clamp_radius(self.radius);
        self.update_matrices();
    }

    /// Refit the frustum to a new viewport aspect ratio. Pose is untouched.
    pub fn resize(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
        self.update_matrices();
    }

    /// Route one normalised pointer gesture. Orbiting only happens while the
    /// active tool allows it, panning always does.
    pub fn apply_gesture(&mut self, gesture: &PointerGesture, orbit_enabled: bool) {
        match *gesture {
            PointerGesture::Drag { delta, buttons } => {
                if orbit_enabled && buttons.contains(ButtonMask::PRIMARY) {
                    self.rotate(delta.x, delta.y);
                }
                if buttons.contains(ButtonMask::MIDDLE) {
                    self.pan(delta.x, delta.y);
                }
            }
            PointerGesture::Scroll { delta } => self.zoom(delta),
            PointerGesture::Pinch { delta } => self.zoom_by_pinch(delta),
            PointerGesture::Resize { aspect } => self.resize(aspect),
        }
    }

    /// Unit vector from the target towards the eye.
    pub fn direction(&self) -> Vec3 {
        let az = self.azimuth.to_radians();
        let el = self.elevation.to_radians();
        Vec3::new(az.sin() * el.cos(), el.sin(), az.cos() * el.cos())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Half extents of the orthographic frustum after zoom, as (width, height).
    pub fn half_extents(&self) -> Vec2 {
        let half_height = self.settings.size * 0.5 / self.radius;
        Vec2::new(half_height * self.aspect, half_height)
    }

    /// Build a world-space ray through a point in normalised device
    /// coordinates (x right, y up, both in [-1, 1]).
    pub fn ndc_to_ray(&self, ndc: Vec2) -> Option<Ray3d> {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = Dir3::new(far - near).ok()?;
        Some(Ray3d::new(near, direction))
    }

    fn clamp_elevation(&self, elevation: f32) -> f32 {
        elevation.clamp(self.settings.min_elevation, self.settings.max_elevation)
    }

    fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.settings.min_radius, self.settings.max_radius)
    }

    fn update_matrices(&mut self) {
        self.position = self.target + self.direction() * self.settings.distance;
        self.view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let half = self.half_extents();
        self.projection = Mat4::orthographic_rh(
            -half.x,
            half.x,
            -half.y,
            half.y,
            self.settings.near,
            self.settings.far,
        );
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Mirror the orbit pose onto the bevy render camera.
pub fn sync_camera_transform(
    orbit: Res<OrbitCamera>,
    mut cameras: Query<(&mut Transform, &mut Projection), With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }

    let half = orbit.half_extents();
    for (mut transform, mut projection) in &mut cameras {
        *transform = Transform::from_translation(orbit.position()).looking_at(orbit.target, Vec3::Y);
        *projection = Projection::Orthographic(OrthographicProjection {
            near: orbit.settings().near,
            far: orbit.settings().far,
            scaling_mode: ScalingMode::Fixed {
                width: half.x * 2.0,
                height: half.y * 2.0,
            },
            ..OrthographicProjection::default_3d()
        });
    }
}
