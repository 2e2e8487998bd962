use crate::core::BarInfo;
use bevy::prelude::*;

/// Root of every chart entity; disposal despawns this subtree.
#[derive(Component)]
pub struct ChartRoot;

/// A bar mesh plus the info record that makes it a pickable target.
/// Walls, floor, labels and gridlines never carry this component.
#[derive(Component, Clone)]
pub struct Bar(pub BarInfo);

/// Present while a bar is still animating toward its target height;
/// removed the moment it gets there.
#[derive(Component)]
pub struct Growing {
    pub target_height: f32,
}

/// The edge outline attached to the focused bar.
#[derive(Component)]
pub struct HighlightFrame;

/// Marker for the perspective world camera.
#[derive(Component)]
pub struct WorldCamera;

/// Marker for the orthographic overlay camera (tooltip, projected labels).
#[derive(Component)]
pub struct OverlayCamera;

/// Tooltip container on the overlay layer, repositioned to the pointer.
#[derive(Component)]
pub struct TooltipRoot;

#[derive(Component)]
pub struct TooltipText;

#[derive(Component)]
pub struct TooltipFill;

/// A screen-space label pinned to a point of the 3-D scene; re-projected
/// through the world camera whenever it moves.
#[derive(Component)]
pub struct SceneLabel {
    pub anchor: Vec3,
}

/// Orbit camera state: spherical coordinates around a target point.
#[derive(Component, Clone, Copy, Debug)]
pub struct OrbitView {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    /// Elevation above the horizon, clamped so the camera never dives
    /// below the floor or flips over the top.
    pub pitch: f32,
}

impl OrbitView {
    /// Keeps the camera above the floor plane (polar angle <= pi/2.5).
    pub const MIN_PITCH: f32 = std::f32::consts::PI / 2.0 - std::f32::consts::PI / 2.5;
    pub const MAX_PITCH: f32 = 1.50;
    pub const MIN_RADIUS: f32 = 1.12;
    pub const MAX_RADIUS: f32 = 10.0;

    pub fn eye(&self) -> Vec3 {
        self.target
            + self.radius
                * Vec3::new(
                    self.pitch.cos() * self.yaw.cos(),
                    self.pitch.sin(),
                    self.pitch.cos() * self.yaw.sin(),
                )
    }
}

impl Default for OrbitView {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 7.5,
            yaw: 2.0,  // initial horizontal rotation, back-left quadrant
            pitch: 0.72, // looking down at the floor
        }
    }
}
