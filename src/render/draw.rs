//! Scene assembly: build the shared pool, then emit bars, reference planes,
//! gridlines, tick labels and the tooltip into the scene graph. Runs once
//! per build cycle, after the glyph font is ready.

use super::components::{Bar, ChartRoot, Growing, SceneLabel, TooltipFill, TooltipRoot, TooltipText};
use super::resources::{BarAssets, ChartRes, FontState, MaterialKey, ScenePhase};
use crate::chart::ChartSpec;
use crate::core::{Color, ColorMode};
use crate::layout;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_camera::visibility::RenderLayers;
use bevy_mesh::PrimitiveTopology;
use std::collections::HashMap;

/// Layer for the perspective scene; bars, walls, gridlines.
pub const WORLD_LAYER: usize = 0;
/// Layer for the orthographic overlay; tooltip and projected labels.
pub const OVERLAY_LAYER: usize = 1;

pub const CATEGORY_FONT_SIZE: f32 = 14.0;
pub const TICK_FONT_SIZE: f32 = 12.0;
/// Tooltip text is authored at 36px and shrunk by the tooltip scale option.
pub const TOOLTIP_BASE_FONT_SIZE: f32 = 36.0;

fn unlit(color: Color, opacity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: bevy::prelude::Color::from(color.with_a(opacity)),
        unlit: true,
        alpha_mode: if opacity < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    }
}

/// Allocate the shared pool: one unit cube, one overlay quad, one material
/// per coloring key, one line material, one tooltip fill material.
pub fn build_pool(
    spec: &ChartSpec,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    color_materials: &mut Assets<ColorMaterial>,
) -> BarAssets {
    let mut bar_materials = HashMap::new();
    match spec.bar.color_mode {
        ColorMode::Ordinal => {
            for key in spec.x.domain() {
                bar_materials.insert(
                    MaterialKey::Category(key.clone()),
                    materials.add(unlit(spec.color.key_color(key), spec.bar.opacity)),
                );
            }
        }
        ColorMode::Continuous => {
            for value in spec.table.values() {
                bar_materials
                    .entry(MaterialKey::Level(value.to_bits()))
                    .or_insert_with(|| {
                        materials.add(unlit(spec.color.value_color(value), spec.bar.opacity))
                    });
            }
        }
    }

    BarAssets {
        unit_cube: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
        quad: meshes.add(Rectangle::new(1.0, 1.0)),
        bar_materials,
        line_material: materials.add(unlit(spec.options.line_color, 1.0)),
        tooltip_material: color_materials.add(ColorMaterial::from(bevy::prelude::Color::from(
            spec.tooltip.fill_color,
        ))),
    }
}

/// A line-list mesh from world-space segments.
pub fn line_mesh(segments: &[(Vec3, Vec3)]) -> Mesh {
    let positions: Vec<[f32; 3]> = segments
        .iter()
        .flat_map(|(a, b)| [[a.x, a.y, a.z], [b.x, b.y, b.z]])
        .collect();
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

/// The 12 edges of a unit cube centered at the origin, for the highlight
/// outline. A child of the focused bar inherits its nonuniform scale, so
/// the edges hug the bar exactly.
pub fn cube_edge_mesh() -> Mesh {
    let h = 0.5f32;
    let corners = [
        [-h, -h, -h],
        [h, -h, -h],
        [h, -h, h],
        [-h, -h, h],
        [-h, h, -h],
        [h, h, -h],
        [h, h, h],
        [-h, h, h],
    ];
    let edges: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];
    let positions: Vec<[f32; 3]> = edges
        .iter()
        .flat_map(|&(a, b)| [corners[a], corners[b]])
        .collect();
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

/// Build the whole scene once the font is ready: pool, bars (at zero height
/// when animating), floor and walls, wall gridlines, overlay labels and the
/// tooltip. Flips the phase to `Built`.
pub fn assemble_scene(
    mut commands: Commands,
    chart: Res<ChartRes>,
    font: Res<FontState>,
    mut phase: ResMut<ScenePhase>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut color_materials: ResMut<Assets<ColorMaterial>>,
) {
    if !font.ready() {
        return;
    }
    let spec = &chart.0;
    let pool = build_pool(spec, &mut meshes, &mut materials, &mut color_materials);
    let world = RenderLayers::layer(WORLD_LAYER);
    let overlay = RenderLayers::layer(OVERLAY_LAYER);
    let offset = layout::root_offset(spec);

    let root = commands
        .spawn((
            ChartRoot,
            Transform::from_translation(offset),
            Visibility::default(),
        ))
        .id();

    let placements = layout::bar_placements(spec);
    let bar_count = placements.len();
    for placement in placements {
        let Some(material) = pool.material_for(spec.bar.color_mode, &placement.info) else {
            continue;
        };
        let mut transform = Transform {
            translation: placement.center,
            scale: placement.size,
            ..default()
        };
        let mut entity = commands.spawn((
            Bar(placement.info),
            Mesh3d(pool.unit_cube.clone()),
            MeshMaterial3d(material),
            world.clone(),
        ));
        if spec.options.animation {
            transform.scale.y = 0.0;
            transform.translation.y = 0.0;
            entity.insert(Growing {
                target_height: placement.size.y,
            });
        }
        entity.insert(transform);
        let entity = entity.id();
        commands.entity(root).add_child(entity);
    }

    if let Some(floor) = layout::floor_slab(spec) {
        let material = materials.add(unlit(spec.floor.color, spec.floor.opacity));
        let entity = commands
            .spawn((
                Mesh3d(pool.unit_cube.clone()),
                MeshMaterial3d(material),
                Transform {
                    translation: floor.center,
                    scale: floor.size,
                    ..default()
                },
                world.clone(),
            ))
            .id();
        commands.entity(root).add_child(entity);
    }
    for wall in layout::wall_slabs(spec) {
        let material = materials.add(unlit(spec.wall.color, spec.wall.opacity));
        let entity = commands
            .spawn((
                Mesh3d(pool.unit_cube.clone()),
                MeshMaterial3d(material),
                Transform {
                    translation: wall.center,
                    scale: wall.size,
                    ..default()
                },
                world.clone(),
            ))
            .id();
        commands.entity(root).add_child(entity);
    }

    let (tick_labels, gridlines) = layout::wall_ticks(spec);
    if !gridlines.is_empty() {
        let entity = commands
            .spawn((
                Mesh3d(meshes.add(line_mesh(&gridlines))),
                MeshMaterial3d(pool.line_material.clone()),
                Transform::default(),
                world,
            ))
            .id();
        commands.entity(root).add_child(entity);
    }

    // Labels live on the overlay under their own root: they are positioned
    // in screen space by re-projection, not by the scene transform.
    let overlay_root = commands
        .spawn((ChartRoot, Transform::default(), Visibility::default()))
        .id();
    for (label, size) in layout::category_labels(spec)
        .into_iter()
        .map(|l| (l, CATEGORY_FONT_SIZE))
        .chain(tick_labels.into_iter().map(|l| (l, TICK_FONT_SIZE)))
    {
        let entity = commands
            .spawn((
                Text2d::new(label.text),
                TextFont {
                    font: font.font(),
                    font_size: size,
                    ..default()
                },
                TextColor(spec.options.text_color.into()),
                SceneLabel {
                    anchor: offset + label.anchor,
                },
                Transform::default(),
                Visibility::Hidden,
                overlay.clone(),
            ))
            .id();
        commands.entity(overlay_root).add_child(entity);
    }

    spawn_tooltip(&mut commands, spec, &pool, &font, overlay_root, overlay);

    commands.insert_resource(pool);
    *phase = ScenePhase::Built;
    info!(bars = bar_count, "chart scene assembled");
}

fn spawn_tooltip(
    commands: &mut Commands,
    spec: &ChartSpec,
    pool: &BarAssets,
    font: &FontState,
    overlay_root: Entity,
    overlay: RenderLayers,
) {
    let scale = spec.tooltip.scale;
    let tooltip = commands
        .spawn((
            TooltipRoot,
            Transform::default(),
            Visibility::Hidden,
            overlay.clone(),
        ))
        .id();
    let fill = commands
        .spawn((
            TooltipFill,
            Mesh2d(pool.quad.clone()),
            MeshMaterial2d(pool.tooltip_material.clone()),
            Transform {
                translation: Vec3::new(0.0, 0.0, 1.0),
                scale: Vec3::new(300.0 * scale, 200.0 * scale, 1.0),
                ..default()
            },
            overlay.clone(),
        ))
        .id();
    let text = commands
        .spawn((
            TooltipText,
            Text2d::new(""),
            TextFont {
                font: font.font(),
                font_size: TOOLTIP_BASE_FONT_SIZE * scale,
                ..default()
            },
            TextColor(spec.tooltip.text_color.into()),
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            overlay,
        ))
        .id();
    commands.entity(tooltip).add_child(fill);
    commands.entity(tooltip).add_child(text);
    commands.entity(overlay_root).add_child(tooltip);
}
