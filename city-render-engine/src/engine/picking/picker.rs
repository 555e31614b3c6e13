use bevy::prelude::*;

use super::ray::ray_hits_obb;
use super::render_index::RenderIndex;
use crate::city::SimObjectId;
use crate::engine::camera::OrbitCamera;

/// Box extents used for picking a rendered node.
#[derive(Component, Debug, Clone, Copy)]
pub struct PickBounds(pub Vec3);

/// One pickable node as seen by the picker.
#[derive(Debug, Clone, Copy)]
pub struct PickCandidate {
    pub node: Entity,
    pub world: Mat4,
    pub size: Vec3,
}

/// Viewport pixels (y down) to normalised device coordinates (y up).
pub fn cursor_to_ndc(cursor: Vec2, viewport_size: Vec2) -> Option<Vec2> {
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        (cursor.x / viewport_size.x) * 2.0 - 1.0,
        -(cursor.y / viewport_size.y) * 2.0 + 1.0,
    ))
}

/// Stateless cursor picker.
pub struct Picker;

impl Picker {
    /// Nearest node hit by the cursor ray, resolved to its simulation object.
    /// A nearest hit without an index entry is a miss; farther hits are not
    /// consulted.
    pub fn pick(
        cursor: Vec2,
        viewport_size: Vec2,
        camera: &OrbitCamera,
        candidates: impl IntoIterator<Item = PickCandidate>,
        index: &RenderIndex,
    ) -> Option<SimObjectId> {
        let ndc = cursor_to_ndc(cursor, viewport_size)?;
        let ray = camera.ndc_to_ray(ndc)?;
        let nearest = Self::nearest_hit(ray, candidates)?;
        index.get(nearest)
    }

    pub fn nearest_hit(
        ray: Ray3d,
        candidates: impl IntoIterator<Item = PickCandidate>,
    ) -> Option<Entity> {
        let dir = *ray.direction;
        let mut best: Option<(Entity, f32)> = None;
        for candidate in candidates {
            let Some(t) = ray_hits_obb(ray.origin, dir, &candidate.world, candidate.size) else {
                continue;
            };
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((candidate.node, t));
            }
        }
        best.map(|(node, _)| node)
    }
}
