//! Growth animation: the pure per-tick state update. Scheduling lives with
//! the renderer (the system stops being run once no bar is `Growing`), so
//! termination is decided by state, not by the loop itself.

/// Vertical scale added per tick, in absolute scene units.
pub const GROWTH_STEP: f32 = 0.05;

/// Advance one bar by a single tick. Returns the new vertical scale and
/// whether the bar has reached its target. Never overshoots and never
/// moves backwards; a bar at or past its target is clamped to it.
pub fn grow(scale_y: f32, target: f32) -> (f32, bool) {
    if scale_y >= target {
        return (target, true);
    }
    let next = scale_y + GROWTH_STEP;
    if next >= target {
        (target, true)
    } else {
        (next, false)
    }
}

/// Vertical center for a bar of the given scale, so growth rises from the
/// floor plane.
pub fn recenter(scale_y: f32) -> f32 {
    scale_y / 2.0
}
