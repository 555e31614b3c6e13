use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::{
    PICKABLE_RENDER_LAYER, TILE_BASE_COLOUR, TILE_FOCUSED_COLOUR, TILE_HEIGHT,
    TILE_SELECTED_COLOUR,
};

use crate::city::{City, CityModel, SimEntity, SimObjectId};
use crate::engine::picking::{PickBounds, RenderIndex};

const TREE_SIZE: Vec3 = Vec3::new(0.3, 0.8, 0.3);
const TREE_COLOUR: [f32; 3] = [0.15, 0.45, 0.15];
const GROUND_DEPTH: f32 = 0.2;

/// Rendered node standing for one simulation object.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneNode {
    pub object: SimObjectId,
}

#[derive(Component)]
pub struct TileNode;

/// Building or scenery; respawned whenever the city changes.
#[derive(Component)]
pub struct StructureNode;

#[derive(Component)]
pub struct GroundSlab;

/// City revision the structure nodes were built from.
#[derive(Resource, Default, Debug)]
pub struct SceneRevision(pub Option<u64>);

fn srgb(rgb: [f32; 3]) -> Color {
    Color::srgb(rgb[0], rgb[1], rgb[2])
}

/// Tile colour for the given highlight flags. Selection wins over focus.
pub fn tile_colour(focused: bool, selected: bool) -> Color {
    if selected {
        srgb(TILE_SELECTED_COLOUR)
    } else if focused {
        srgb(TILE_FOCUSED_COLOUR)
    } else {
        srgb(TILE_BASE_COLOUR)
    }
}

/// Glow applied to structures under focus or selection.
pub fn structure_emissive(focused: bool, selected: bool) -> LinearRgba {
    if selected {
        LinearRgba::rgb(0.35, 0.3, 0.05)
    } else if focused {
        LinearRgba::rgb(0.15, 0.15, 0.15)
    } else {
        LinearRgba::BLACK
    }
}

/// World transform of a box of `size` resting on grid cell `(x, y)`.
pub fn cell_transform(x: i32, y: i32, size: Vec3) -> Transform {
    Transform::from_xyz(x as f32, size.y * 0.5, y as f32)
}

/// Geometry of a building or scenery object standing on its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureBox {
    pub x: i32,
    pub y: i32,
    pub size: Vec3,
    pub colour: [f32; 3],
    pub name: &'static str,
}

/// Box drawn for a non-tile object. Tiles are spawned separately.
pub fn structure_box(entity: &SimEntity) -> Option<StructureBox> {
    match entity {
        SimEntity::Tile(_) => None,
        SimEntity::Building(building) => Some(StructureBox {
            x: building.x,
            y: building.y,
            size: Vec3::from_array(building.kind.model_size()),
            colour: building.kind.colour(),
            name: building.kind.as_str(),
        }),
        SimEntity::Decoration(decoration) => Some(StructureBox {
            x: decoration.x,
            y: decoration.y,
            size: TREE_SIZE,
            colour: TREE_COLOUR,
            name: decoration.name,
        }),
    }
}

/// Spawn the ground slab and one node per tile.
pub fn spawn_city_scene(
    mut commands: Commands,
    city: Res<City>,
    mut index: ResMut<RenderIndex>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = city.size() as f32;
    let layer = RenderLayers::layer(PICKABLE_RENDER_LAYER);

    // Unregistered, so rays that miss every tile resolve to nothing.
    let ground_size = Vec3::new(size + 2.0, GROUND_DEPTH, size + 2.0);
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(ground_size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.12, 0.2, 0.1),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(
            size * 0.5 - 0.5,
            -TILE_HEIGHT - GROUND_DEPTH * 0.5,
            size * 0.5 - 0.5,
        ),
        PickBounds(ground_size),
        layer.clone(),
        GroundSlab,
        Name::new("ground"),
    ));

    let tile_size = Vec3::new(1.0, TILE_HEIGHT, 1.0);
    let tile_mesh = meshes.add(Cuboid::from_size(tile_size));
    let mut spawned = 0;
    for (id, entity) in city.objects() {
        let SimEntity::Tile(tile) = entity else {
            continue;
        };
        let node = commands
            .spawn((
                Mesh3d(tile_mesh.clone()),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: tile_colour(false, false),
                    perceptual_roughness: 1.0,
                    ..default()
                })),
                Transform::from_xyz(tile.x as f32, -TILE_HEIGHT * 0.5, tile.y as f32),
                PickBounds(tile_size),
                layer.clone(),
                SceneNode { object: id },
                TileNode,
            ))
            .id();
        index.insert(node, id);
        spawned += 1;
    }
    info!("Spawned {} tiles for '{}'", spawned, city.name());
}

/// Rebuild building and scenery nodes after the city changes.
pub fn sync_city_structures(
    mut commands: Commands,
    city: Res<City>,
    mut revision: ResMut<SceneRevision>,
    mut index: ResMut<RenderIndex>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if revision.0 == Some(city.revision()) {
        return;
    }

    let stale = index.take_where(|id| !matches!(city.entity(id), Some(SimEntity::Tile(_))));
    for node in &stale {
        commands.entity(*node).despawn();
    }

    let layer = RenderLayers::layer(PICKABLE_RENDER_LAYER);
    let mut spawned = 0;
    for (id, entity) in city.objects() {
        let Some(StructureBox {
            x,
            y,
            size,
            colour,
            name,
        }) = structure_box(entity)
        else {
            continue;
        };
        let node = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::from_size(size))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: srgb(colour),
                    ..default()
                })),
                cell_transform(x, y, size),
                PickBounds(size),
                layer.clone(),
                SceneNode { object: id },
                StructureNode,
                Name::new(format!("{name} ({x}, {y})")),
            ))
            .id();
        index.insert(node, id);
        spawned += 1;
    }

    debug!(
        "City revision {} -> {}: replaced {} structures with {}",
        revision.0.map_or(-1, |r| r as i64),
        city.revision(),
        stale.len(),
        spawned
    );
    revision.0 = Some(city.revision());
}

/// Recolour nodes whose object's focus or selection flag changed.
pub fn sync_highlights(
    city: Res<City>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    nodes: Query<(&SceneNode, &MeshMaterial3d<StandardMaterial>, Has<TileNode>)>,
) {
    for (node, material, is_tile) in &nodes {
        let Some(object) = city.object(node.object) else {
            continue;
        };
        let (focused, selected) = (object.is_focused(), object.is_selected());
        let Some(current) = materials.get(&material.0) else {
            continue;
        };

        if is_tile {
            let colour = tile_colour(focused, selected);
            if current.base_color != colour {
                if let Some(current) = materials.get_mut(&material.0) {
                    current.base_color = colour;
                }
            }
        } else {
            let emissive = structure_emissive(focused, selected);
            if current.emissive != emissive {
                if let Some(current) = materials.get_mut(&material.0) {
                    current.emissive = emissive;
                }
            }
        }
    }
}
