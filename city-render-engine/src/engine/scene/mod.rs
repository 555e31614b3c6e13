//! City scene: tile, structure and ghost render nodes.
//!
//! Pickable nodes live on render layer 0 with a `PickBounds` box and an
//! entry in the `RenderIndex`. The ghost preview lives on layer 1, which the
//! camera draws but the picker never queries.

/// Tile, building and scenery nodes plus highlight colours.
pub mod city_scene;

/// Render node mirroring the ghost preview.
pub mod ghost_render;

pub use city_scene::{
    SceneNode, SceneRevision, StructureBox, cell_transform, spawn_city_scene, structure_box,
    sync_city_structures, sync_highlights,
};
pub use ghost_render::{GhostNode, sync_ghost_node};
