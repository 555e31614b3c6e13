use bevy::prelude::*;

use super::presentation::HudPresentation;
use crate::engine::core::app_state::UiState;

#[derive(Component)]
pub struct HudText;

/// Text shown by the native overlay.
pub fn hud_text(hud: &HudPresentation, ui: &UiState) -> String {
    let mut lines = Vec::new();
    if let Some(title) = &hud.title {
        lines.push(format!(
            "{}  |  Population: {}  |  {}",
            title.name, title.population, title.date
        ));
    }
    let paused = if ui.paused { "  (paused)" } else { "" };
    lines.push(format!("Tool: {}{}", hud.tool.id(), paused));
    if let Some(info) = &hud.info {
        lines.push(String::new());
        lines.push(info.to_text());
    }
    lines.join("\n")
}

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudText,
    ));
}

pub fn update_hud_text(
    hud: Res<HudPresentation>,
    ui: Res<UiState>,
    mut query: Query<&mut Text, With<HudText>>,
) {
    if !hud.is_changed() && !ui.is_changed() {
        return;
    }
    let content = hud_text(&hud, &ui);
    for mut text in &mut query {
        text.0.clone_from(&content);
    }
}
