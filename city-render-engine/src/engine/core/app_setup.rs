use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::{GHOST_RENDER_LAYER, PICKABLE_RENDER_LAYER};

// Crate engine modules
use crate::engine::camera::{OrbitCamera, sync_camera_transform};
use crate::engine::core::app_state::{
    AppState, StartCityEvent, UiState, apply_interaction_settings, handle_start_city,
    handle_toggle_pause,
};
use crate::engine::core::settings::{
    InteractionSettings, SettingsLoader, apply_loaded_settings, start_loading_settings,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::input::{
    InputQueue, InputState, collect_input_events, seed_viewport, sync_viewport_rect,
};
use crate::engine::picking::RenderIndex;
use crate::engine::scene::{
    SceneRevision, spawn_city_scene, sync_city_structures, sync_ghost_node, sync_highlights,
};
use crate::engine::systems::{HudPresentation, SimulationDriver, run_city_frame};
// Crate tools modules
use crate::tools::{
    TogglePauseEvent, ToolController, ToolSelectionEvent, handle_tool_keyboard_shortcuts,
};
// Web RPC modules
use crate::rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::auto_start_city;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::hud::{spawn_hud, update_hud_text};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers InteractionSettings as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<InteractionSettings>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(Color::srgb(0.53, 0.75, 0.92)))
        .insert_resource(AmbientLight {
            brightness: 400.0,
            ..default()
        });

    // Initialise resources early
    app.init_resource::<InteractionSettings>()
        .init_resource::<SettingsLoader>()
        .init_resource::<UiState>()
        .init_resource::<InputQueue>()
        .init_resource::<InputState>()
        .init_resource::<OrbitCamera>()
        .init_resource::<ToolController>()
        .init_resource::<SimulationDriver>()
        .init_resource::<RenderIndex>()
        .init_resource::<SceneRevision>()
        .init_resource::<HudPresentation>()
        .add_event::<ToolSelectionEvent>()
        .add_event::<TogglePauseEvent>()
        .add_event::<StartCityEvent>();

    app.add_systems(Startup, (setup, start_loading_settings))
        .add_systems(
            Update,
            (
                apply_loaded_settings,
                apply_interaction_settings,
                handle_tool_keyboard_shortcuts,
                handle_toggle_pause,
            )
                .chain(),
        )
        .add_systems(
            Update,
            handle_start_city.run_if(in_state(AppState::AwaitingCity)),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (spawn_city_scene, seed_viewport),
        );

    // Input is captured before the frame driver consumes it, and the scene
    // mirrors the result afterwards.
    app.add_systems(
        Update,
        (
            collect_input_events,
            sync_viewport_rect,
            run_city_frame,
            sync_city_structures,
            sync_highlights,
            sync_ghost_node,
            sync_camera_transform,
        )
            .chain()
            .after(handle_toggle_pause)
            .run_if(in_state(AppState::Running)),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_hud)
            .add_systems(
                Update,
                auto_start_city
                    .before(handle_start_city)
                    .run_if(in_state(AppState::AwaitingCity)),
            )
            .add_systems(Update, update_hud_text.after(run_city_frame));
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-10.0, 20.0, 0.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Orthographic city camera drawing both the pickable and the ghost layer.
fn spawn_city_camera(commands: &mut Commands, orbit: &OrbitCamera) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(OrthographicProjection::default_3d()),
        Transform::from_translation(orbit.position()).looking_at(orbit.target, Vec3::Y),
        RenderLayers::from_layers(&[PICKABLE_RENDER_LAYER, GHOST_RENDER_LAYER]),
    ));
}

fn setup(mut commands: Commands, orbit: Res<OrbitCamera>) {
    spawn_lighting(&mut commands);
    spawn_city_camera(&mut commands, &orbit);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
