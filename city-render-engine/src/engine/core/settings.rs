use std::time::Duration;

use bevy::prelude::*;
use constants::{camera, input, render_settings, simulation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset path of the runtime tuning file, relative to the asset root.
pub const INTERACTION_SETTINGS_PATH: &str = "config/interaction.json";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Orbit camera tuning. Angles in degrees, sensitivities per pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub size: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub azimuth_sensitivity: f32,
    pub elevation_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub pinch_zoom_multiplier: f32,
    pub pan_sensitivity: f32,
    pub default_target: [f32; 3],
    pub default_radius: f32,
    pub default_azimuth: f32,
    pub default_elevation: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            size: camera::CAMERA_SIZE,
            distance: camera::CAMERA_DISTANCE,
            near: camera::CAMERA_NEAR,
            far: camera::CAMERA_FAR,
            min_radius: camera::MIN_CAMERA_RADIUS,
            max_radius: camera::MAX_CAMERA_RADIUS,
            min_elevation: camera::MIN_CAMERA_ELEVATION,
            max_elevation: camera::MAX_CAMERA_ELEVATION,
            azimuth_sensitivity: input::AZIMUTH_SENSITIVITY,
            elevation_sensitivity: input::ELEVATION_SENSITIVITY,
            zoom_sensitivity: input::ZOOM_SENSITIVITY,
            pinch_zoom_multiplier: input::PINCH_ZOOM_MULTIPLIER,
            pan_sensitivity: input::PAN_SENSITIVITY,
            default_target: camera::DEFAULT_CAMERA_TARGET,
            default_radius: camera::DEFAULT_CAMERA_RADIUS,
            default_azimuth: camera::DEFAULT_CAMERA_AZIMUTH,
            default_elevation: camera::DEFAULT_CAMERA_ELEVATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_ms: u64,
    pub city_size: u32,
    pub default_city_name: String,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_ms: simulation::SIMULATION_TICK_MS,
            city_size: simulation::DEFAULT_CITY_SIZE,
            default_city_name: simulation::DEFAULT_CITY_NAME.to_string(),
        }
    }
}

impl SimulationSettings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostSettings {
    pub restore_delay_ms: u64,
}

impl Default for GhostSettings {
    fn default() -> Self {
        Self {
            restore_delay_ms: render_settings::GHOST_RESTORE_DELAY_MS,
        }
    }
}

impl GhostSettings {
    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }
}

/// Runtime tuning loaded from JSON. Missing fields keep compiled defaults.
#[derive(Asset, TypePath, Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub camera: CameraSettings,
    pub simulation: SimulationSettings,
    pub ghost: GhostSettings,
}

impl InteractionSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let camera = &self.camera;
        if camera.min_radius > camera.max_radius {
            return Err(SettingsError::InvertedRange {
                field: "camera.radius",
                min: camera.min_radius,
                max: camera.max_radius,
            });
        }
        if camera.min_elevation > camera.max_elevation {
            return Err(SettingsError::InvertedRange {
                field: "camera.elevation",
                min: camera.min_elevation,
                max: camera.max_elevation,
            });
        }
        for (field, value) in [
            ("camera.size", camera.size),
            ("camera.distance", camera.distance),
            ("camera.min_radius", camera.min_radius),
        ] {
            if value <= 0.0 {
                return Err(SettingsError::NonPositive {
                    field,
                    value: f64::from(value),
                });
            }
        }
        if camera.near >= camera.far {
            return Err(SettingsError::InvertedRange {
                field: "camera.clip",
                min: camera.near,
                max: camera.far,
            });
        }
        if self.simulation.tick_ms == 0 {
            return Err(SettingsError::NonPositive {
                field: "simulation.tick_ms",
                value: 0.0,
            });
        }
        if self.simulation.city_size == 0 {
            return Err(SettingsError::NonPositive {
                field: "simulation.city_size",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Handle to the settings file while it loads.
#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<InteractionSettings>>,
    applied: bool,
}

impl SettingsLoader {
    /// True once the file has been applied or given up on.
    pub fn is_settled(&self) -> bool {
        self.applied
    }
}

// Start loading the settings file
pub fn start_loading_settings(mut loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    loader.handle = Some(asset_server.load(INTERACTION_SETTINGS_PATH));
}

/// Swap in loaded settings once, falling back to defaults when invalid.
pub fn apply_loaded_settings(
    mut loader: ResMut<SettingsLoader>,
    assets: Res<Assets<InteractionSettings>>,
    asset_server: Res<AssetServer>,
    mut settings: ResMut<InteractionSettings>,
) {
    if loader.applied {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };

    if let Some(loaded) = assets.get(&handle) {
        match loaded.validate() {
            Ok(()) => {
                info!("Interaction settings loaded from {}", INTERACTION_SETTINGS_PATH);
                *settings = loaded.clone();
            }
            Err(err) => warn!("Ignoring {}: {}", INTERACTION_SETTINGS_PATH, err),
        }
        loader.applied = true;
    } else if asset_server.load_state(&handle).is_failed() {
        warn!(
            "Could not load {}, using built-in defaults",
            INTERACTION_SETTINGS_PATH
        );
        loader.applied = true;
    }
}
