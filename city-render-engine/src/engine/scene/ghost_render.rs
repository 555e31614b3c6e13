use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::{
    GHOST_INVALID_COLOUR, GHOST_OPACITY, GHOST_RENDER_LAYER, GHOST_VALID_COLOUR,
};

use super::city_scene::cell_transform;
use crate::tools::{GhostPreview, GhostValidity, ToolController};

/// Render node of the ghost preview. Lives on the ghost layer and carries no
/// pick bounds.
#[derive(Component, Debug)]
pub struct GhostNode {
    pub token: u64,
}

/// Translucent tint for a placement validity.
pub fn ghost_colour(validity: GhostValidity) -> Color {
    let [r, g, b] = match validity {
        GhostValidity::Valid => GHOST_VALID_COLOUR,
        GhostValidity::Invalid => GHOST_INVALID_COLOUR,
    };
    Color::srgba(r, g, b, GHOST_OPACITY)
}

fn ghost_size(ghost: &GhostPreview) -> Vec3 {
    Vec3::from_array(ghost.building_type.model_size())
}

/// Mirror the controller's ghost onto a render node. A new ghost token means
/// a new node; no ghost means no node.
pub fn sync_ghost_node(
    mut commands: Commands,
    tools: Res<ToolController>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut nodes: Query<(
        Entity,
        &GhostNode,
        &mut Transform,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let ghost = tools.ghost();
    let mut current = false;

    for (entity, node, mut transform, mut visibility, material) in &mut nodes {
        let Some(ghost) = ghost.filter(|g| g.token() == node.token) else {
            commands.entity(entity).despawn();
            continue;
        };
        current = true;

        let (x, y) = ghost.position;
        *transform = cell_transform(x, y, ghost_size(ghost));
        visibility.set_if_neq(if ghost.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        });

        let colour = ghost_colour(ghost.validity);
        if materials.get(&material.0).is_some_and(|m| m.base_color != colour) {
            if let Some(m) = materials.get_mut(&material.0) {
                m.base_color = colour;
            }
        }
    }

    let Some(ghost) = ghost.filter(|_| !current) else {
        return;
    };
    let size = ghost_size(ghost);
    let (x, y) = ghost.position;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: ghost_colour(ghost.validity),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        cell_transform(x, y, size),
        if ghost.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        },
        RenderLayers::layer(GHOST_RENDER_LAYER),
        GhostNode {
            token: ghost.token(),
        },
        Name::new(format!("ghost {}", ghost.building_type.as_str())),
    ));
    debug!("Spawned ghost node {}", ghost.token());
}
