use super::lifecycle::{OutlineRecord, OutlineTable};
use crate::chart::{BarHook, CancelHook, ChartSpec};
use crate::core::{BarInfo, ColorMode};
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Resource, Clone)]
pub struct ChartRes(pub ChartSpec);

/// Caller-facing hooks, fired on focus change, click selection and
/// selection cancellation.
#[derive(Resource, Default)]
pub struct ChartHooks {
    pub on_hover: Option<BarHook>,
    pub on_click: Option<BarHook>,
    pub on_cancel: Option<CancelHook>,
}

/// Where the chart is in its build cycle. Assembly runs only in `Loading`;
/// picking and label projection only in `Built`.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScenePhase {
    #[default]
    Loading,
    Built,
    Disposed,
}

/// Pool key for shared bar materials: by category in ordinal mode, by
/// distinct value (bit pattern) in continuous mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKey {
    Category(String),
    Level(u64),
}

impl MaterialKey {
    pub fn for_bar(mode: ColorMode, info: &BarInfo) -> Self {
        match mode {
            ColorMode::Ordinal => MaterialKey::Category(info.key_x.clone()),
            ColorMode::Continuous => MaterialKey::Level(info.value.to_bits()),
        }
    }
}

/// Shared geometry/material pool. Every bar references the single unit cube
/// and one of these materials; rendering a bar never allocates. Lifetime is
/// the chart's lifetime, released exactly once at teardown.
#[derive(Resource)]
pub struct BarAssets {
    pub unit_cube: Handle<Mesh>,
    /// Unit quad behind the tooltip text on the overlay layer.
    pub quad: Handle<Mesh>,
    pub bar_materials: HashMap<MaterialKey, Handle<StandardMaterial>>,
    pub line_material: Handle<StandardMaterial>,
    pub tooltip_material: Handle<ColorMaterial>,
}

impl BarAssets {
    pub fn material_for(&self, mode: ColorMode, info: &BarInfo) -> Option<Handle<StandardMaterial>> {
        self.bar_materials
            .get(&MaterialKey::for_bar(mode, info))
            .cloned()
    }

    /// Remove every pooled asset; returns how many were released.
    pub fn release(
        &self,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        color_materials: &mut Assets<ColorMaterial>,
    ) -> usize {
        let mut released = 0;
        for handle in [&self.unit_cube, &self.quad] {
            if meshes.remove(handle).is_some() {
                released += 1;
            }
        }
        for handle in self.bar_materials.values() {
            if materials.remove(handle).is_some() {
                released += 1;
            }
        }
        if materials.remove(&self.line_material).is_some() {
            released += 1;
        }
        if color_materials.remove(&self.tooltip_material).is_some() {
            released += 1;
        }
        released
    }
}

/// Pointer input channel: the last reported cursor position in physical
/// viewport pixels.
#[derive(Resource, Default)]
pub struct PointerState {
    pub screen: Option<Vec2>,
}

/// At most one bar is focused at a time. The outline table owns the
/// highlight resources, keyed by the focused bar.
#[derive(Resource, Default)]
pub struct FocusState {
    pub focused: Option<Entity>,
    pub outlines: OutlineTable<Entity, OutlineRecord>,
}

/// Glyph font status. Scene assembly waits for `Ready` or `Fallback`;
/// nothing is drawn while `Pending`.
#[derive(Resource, Default)]
pub struct FontState {
    pub handle: Option<Handle<Font>>,
    pub status: FontStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontStatus {
    #[default]
    Pending,
    Ready,
    /// The configured font failed to load; the default font is used instead.
    Fallback,
}

impl FontState {
    pub fn ready(&self) -> bool {
        self.status != FontStatus::Pending
    }

    /// The font for text entities: the loaded handle, or the default font.
    pub fn font(&self) -> Handle<Font> {
        match self.status {
            FontStatus::Ready => self.handle.clone().unwrap_or_default(),
            _ => Handle::default(),
        }
    }
}
