use bevy::prelude::*;

use super::settings::InteractionSettings;
#[cfg(not(target_arch = "wasm32"))]
use super::settings::SettingsLoader;
use crate::city::{City, CityModel};
use crate::engine::camera::OrbitCamera;
use crate::engine::systems::{HudPresentation, PresentationSink, SimulationDriver, TitleBar};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::{TogglePauseEvent, ToolController};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for a city name.
    #[default]
    AwaitingCity,
    Running,
}

/// Flags the frontend toggles.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub paused: bool,
    pub city_started: bool,
}

/// Request to found a city with the given name.
#[derive(Event, Debug, Clone)]
pub struct StartCityEvent {
    pub name: String,
}

/// Trimmed city name, or `None` if nothing is left.
pub fn validate_city_name(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Found the city, reset interaction state and enter `Running`.
#[allow(clippy::too_many_arguments)]
pub fn handle_start_city(
    mut commands: Commands,
    mut events: EventReader<StartCityEvent>,
    settings: Res<InteractionSettings>,
    mut ui: ResMut<UiState>,
    mut camera: ResMut<OrbitCamera>,
    mut tools: ResMut<ToolController>,
    mut rpc: ResMut<WebRpcInterface>,
    mut hud: ResMut<HudPresentation>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for event in events.read() {
        if ui.city_started {
            warn!("A city is already running, ignoring start of '{}'", event.name);
            continue;
        }
        let Some(name) = validate_city_name(&event.name) else {
            warn!("Refusing to start a city without a name");
            continue;
        };

        let city = City::new(settings.simulation.city_size, name);
        let title = TitleBar::from_summary(&city.summary());
        let mut sink = (rpc.as_mut(), hud.as_mut());
        sink.update_title_bar(&title);
        sink.update_info_panel(None);
        sink.tool_changed(tools.tool());

        let aspect = camera.aspect();
        *camera = OrbitCamera::new(settings.camera.clone(), aspect);
        tools.reset();
        commands.insert_resource(city);

        ui.city_started = true;
        next_state.set(AppState::Running);
        info!(
            "Starting city '{}' ({}x{})",
            name, settings.simulation.city_size, settings.simulation.city_size
        );
    }
}

/// Native builds have no name prompt; start with the configured default
/// once settings are in.
#[cfg(not(target_arch = "wasm32"))]
pub fn auto_start_city(
    loader: Res<SettingsLoader>,
    settings: Res<InteractionSettings>,
    mut events: EventWriter<StartCityEvent>,
    mut sent: Local<bool>,
) {
    if *sent || !loader.is_settled() {
        return;
    }
    events.write(StartCityEvent {
        name: settings.simulation.default_city_name.clone(),
    });
    *sent = true;
}

pub fn handle_toggle_pause(mut events: EventReader<TogglePauseEvent>, mut ui: ResMut<UiState>) {
    for _ in events.read() {
        ui.paused = !ui.paused;
        info!("Simulation {}", if ui.paused { "paused" } else { "resumed" });
    }
}

/// Push changed settings into the live components.
pub fn apply_interaction_settings(
    settings: Res<InteractionSettings>,
    mut camera: ResMut<OrbitCamera>,
    mut tools: ResMut<ToolController>,
    mut simulation: ResMut<SimulationDriver>,
) {
    if !settings.is_changed() {
        return;
    }
    camera.apply_settings(settings.camera.clone());
    tools.set_restore_delay(settings.ghost.restore_delay());
    simulation.set_period(settings.simulation.tick_period());
}
