use bevy::prelude::*;
use serde::Serialize;

use crate::city::BuildingType;

/// The one active interaction tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum ToolState {
    #[default]
    Select,
    Bulldoze,
    Build(BuildingType),
}

impl ToolState {
    /// Parse a toolbar identifier: `select`, `bulldoze` or a building id.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "select" => Some(Self::Select),
            "bulldoze" => Some(Self::Bulldoze),
            other => BuildingType::from_string(other).map(Self::Build),
        }
    }

    /// Identifier sent back to the frontend.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Bulldoze => "bulldoze",
            Self::Build(kind) => kind.as_str(),
        }
    }

    pub fn building_type(&self) -> Option<BuildingType> {
        match self {
            Self::Build(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Primary drags orbit the camera only while selecting.
    pub fn allows_orbit(&self) -> bool {
        matches!(self, Self::Select)
    }
}

impl From<ToolState> for String {
    fn from(tool: ToolState) -> Self {
        tool.id().to_string()
    }
}

/// Source of a tool change, kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelectionSource {
    Rpc,
    Keyboard,
}

/// Request to switch the active tool.
#[derive(Event, Debug, Clone, Copy)]
pub struct ToolSelectionEvent {
    pub tool: ToolState,
    pub source: ToolSelectionSource,
}

/// Request to flip the simulation pause flag.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct TogglePauseEvent;

/// Native keyboard shortcuts: `S` select, `B` bulldoze, `1`-`6` build,
/// `Escape` back to select, `Space` pause.
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_tool_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut pause_events: EventWriter<TogglePauseEvent>,
) {
    const BUILD_KEYS: [KeyCode; 6] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
    ];

    let mut send = |tool| {
        tool_events.write(ToolSelectionEvent {
            tool,
            source: ToolSelectionSource::Keyboard,
        });
    };

    if keyboard.just_pressed(KeyCode::KeyS) || keyboard.just_pressed(KeyCode::Escape) {
        send(ToolState::Select);
    }
    if keyboard.just_pressed(KeyCode::KeyB) {
        send(ToolState::Bulldoze);
    }
    for (key, kind) in BUILD_KEYS.iter().zip(BuildingType::ALL) {
        if keyboard.just_pressed(*key) {
            send(ToolState::Build(kind));
        }
    }

    if keyboard.just_pressed(KeyCode::Space) {
        pause_events.write(TogglePauseEvent);
    }
}

/// Tools and pause are driven by RPC in the browser.
#[cfg(target_arch = "wasm32")]
pub fn handle_tool_keyboard_shortcuts() {}
