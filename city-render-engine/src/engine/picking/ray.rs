use bevy::prelude::*;

/// Ray against a box of `size` centred on the origin of `world`'s local
/// space. Returns the hit distance in ray units.
pub fn ray_hits_obb(origin: Vec3, dir: Vec3, world: &Mat4, size: Vec3) -> Option<f32> {
    let inv = world.inverse();
    let o_local = inv.transform_point3(origin);
    let d_local = inv.transform_vector3(dir);
    let he = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, lo, hi) = (ray_origin[axis], ray_direction[axis], min[axis], max[axis]);
        if d == 0.0 {
            // Parallel to this slab: miss unless the origin lies inside it.
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (lo - o) * inv;
        let mut t1 = (hi - o) * inv;
        if t0 > t1 { std::mem::swap(&mut t0, &mut t1); }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far { return None; }
    }

    if t_far < 0.0 { return None; }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}
