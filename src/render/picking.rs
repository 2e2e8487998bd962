//! Pointer picking math: ray/box intersection and nearest-first target
//! selection, kept free of ECS types so focus resolution is testable.

use bevy_math::{Vec2, Vec3};

/// A ray cast from the camera through the pointer.
#[derive(Clone, Copy, Debug)]
pub struct PickRay {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Slab test against an axis-aligned box given by center and half extents.
/// Returns the entry distance along the ray, `0.0` when the origin is
/// inside the box.
pub fn ray_box_distance(ray: &PickRay, center: Vec3, half: Vec3) -> Option<f32> {
    let mut t_enter = 0.0f32;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.dir[axis];
        let lo = center[axis] - half[axis];
        let hi = center[axis] + half[axis];

        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
            if t_exit < t_enter {
                return None;
            }
        }
    }
    Some(t_enter)
}

/// Intersect the ray against every candidate box and return the nearest
/// hit. Candidates are (id, center, half extents); only entities that carry
/// an info record are ever offered here, which is what keeps walls, floor
/// and labels unpickable.
pub fn pick_nearest<I: Copy>(ray: &PickRay, targets: &[(I, Vec3, Vec3)]) -> Option<(I, f32)> {
    let mut best: Option<(I, f32)> = None;
    for &(id, center, half) in targets {
        if let Some(t) = ray_box_distance(ray, center, half) {
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((id, t));
            }
        }
    }
    best
}

/// Viewport pixels -> overlay-scene coordinates (origin at canvas center,
/// y up), where the orthographic tooltip camera lives.
pub fn screen_to_overlay(cursor: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(cursor.x - canvas.x * 0.5, canvas.y * 0.5 - cursor.y)
}
