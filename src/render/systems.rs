use super::animate;
use super::components::{
    Bar, Growing, HighlightFrame, OrbitView, OverlayCamera, SceneLabel, TooltipRoot, TooltipText,
    WorldCamera,
};
use super::draw::{OVERLAY_LAYER, WORLD_LAYER, cube_edge_mesh};
use super::lifecycle::OutlineRecord;
use super::picking::{PickRay, pick_nearest, screen_to_overlay};
use super::resources::{ChartHooks, ChartRes, FocusState, FontState, FontStatus, PointerState};
use crate::core::TickFormat;
use bevy::asset::LoadState;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use bevy_camera::visibility::RenderLayers;
use bevy_camera::{PerspectiveProjection, Projection};

/// Spawn the perspective world camera and the orthographic overlay camera,
/// and start loading the configured font.
pub fn setup_chart(mut commands: Commands, chart: Res<ChartRes>, asset_server: Res<AssetServer>) {
    let view = OrbitView::default();
    commands.spawn((
        WorldCamera,
        view,
        Camera3d::default(),
        Camera {
            order: 0,
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.5,
            far: 500.0,
            ..default()
        }),
        Transform::from_translation(view.eye()).looking_at(view.target, Vec3::Y),
        RenderLayers::layer(WORLD_LAYER),
    ));
    // The overlay composites over the world render, so the tooltip is
    // immune to camera rotation.
    commands.spawn((
        OverlayCamera,
        Camera2d::default(),
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        RenderLayers::layer(OVERLAY_LAYER),
    ));

    let handle = chart
        .0
        .options
        .font
        .as_ref()
        .map(|path| asset_server.load::<Font>(path.clone()));
    let status = if handle.is_none() {
        FontStatus::Ready
    } else {
        FontStatus::Pending
    };
    commands.insert_resource(FontState { handle, status });
}

/// Resolve the pending font load. A failed load is reported, not hung on:
/// the chart falls back to the default font.
pub fn poll_font(asset_server: Res<AssetServer>, mut font: ResMut<FontState>) {
    if font.status != FontStatus::Pending {
        return;
    }
    let Some(handle) = font.handle.clone() else {
        font.status = FontStatus::Ready;
        return;
    };
    match asset_server.load_state(handle.id()) {
        LoadState::Loaded => font.status = FontStatus::Ready,
        LoadState::Failed(err) => {
            error!("chart font failed to load, using the default font: {err}");
            font.status = FontStatus::Fallback;
        }
        _ => {}
    }
}

/// Pointer input channel: record the last cursor position.
pub fn track_pointer(mut moved: MessageReader<CursorMoved>, mut pointer: ResMut<PointerState>) {
    for event in moved.read() {
        pointer.screen = Some(event.position);
    }
}

/// Left-drag orbits, wheel zooms. Distance and polar angle are clamped so
/// the camera stays above the floor and outside the chart box.
pub fn orbit_camera(
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel: MessageReader<MouseWheel>,
    mut motion: MessageReader<MouseMotion>,
    mut views: Query<&mut OrbitView, With<WorldCamera>>,
) {
    let mut zoom = 0.0;
    for event in wheel.read() {
        zoom += event.y;
    }
    let mut drag = Vec2::ZERO;
    if mouse.pressed(MouseButton::Left) {
        for event in motion.read() {
            drag += event.delta;
        }
    } else {
        motion.clear();
    }
    if zoom == 0.0 && drag == Vec2::ZERO {
        return;
    }

    for mut view in views.iter_mut() {
        if drag != Vec2::ZERO {
            view.yaw += drag.x * 0.01;
            view.pitch =
                (view.pitch + drag.y * 0.01).clamp(OrbitView::MIN_PITCH, OrbitView::MAX_PITCH);
        }
        if zoom != 0.0 {
            view.radius =
                (view.radius * (1.0 - zoom * 0.05)).clamp(OrbitView::MIN_RADIUS, OrbitView::MAX_RADIUS);
        }
    }
}

/// Apply orbit state to the camera transform on change.
pub fn sync_camera(
    mut cameras: Query<(&OrbitView, &mut Transform), (With<WorldCamera>, Changed<OrbitView>)>,
) {
    for (view, mut transform) in cameras.iter_mut() {
        *transform = Transform::from_translation(view.eye()).looking_at(view.target, Vec3::Y);
    }
}

/// Pin overlay labels to their 3-D anchors by projecting through the world
/// camera. Anchors behind the camera are hidden.
pub fn project_labels(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<WorldCamera>>,
    mut labels: Query<(&SceneLabel, &mut Transform, &mut Visibility)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let canvas = Vec2::new(window.width(), window.height());

    for (label, mut transform, mut visibility) in labels.iter_mut() {
        match camera.world_to_viewport(camera_transform, label.anchor) {
            Ok(screen) => {
                let p = screen_to_overlay(screen, canvas);
                transform.translation.x = p.x;
                transform.translation.y = p.y;
                *visibility = Visibility::Visible;
            }
            Err(_) => *visibility = Visibility::Hidden,
        }
    }
}

/// Cast a ray through the pointer on every pointer move and resolve the
/// nearest bar. Focus changes release the previous outline and tooltip,
/// attach a fresh outline to the new target and fire the hover hook; the
/// scene is left untouched while the target is unchanged.
#[allow(clippy::too_many_arguments)]
pub fn pick_hover(
    mut commands: Commands,
    pointer: Res<PointerState>,
    mut last: Local<Option<Vec2>>,
    cameras: Query<(&Camera, &GlobalTransform), With<WorldCamera>>,
    camera_moved: Query<(), (Changed<GlobalTransform>, With<WorldCamera>)>,
    bars: Query<(Entity, &GlobalTransform, &Bar)>,
    mut focus: ResMut<FocusState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    hooks: Res<ChartHooks>,
    mut tooltip: Query<&mut Visibility, With<TooltipRoot>>,
    mut tooltip_text: Query<&mut Text2d, With<TooltipText>>,
) {
    let Some(cursor) = pointer.screen else {
        return;
    };
    // Re-resolve on pointer movement or an orbit change; a still pointer
    // under a still camera cannot change the focus.
    if *last == Some(cursor) && camera_moved.is_empty() {
        return;
    }
    *last = Some(cursor);

    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    let ray = PickRay {
        origin: ray.origin,
        dir: *ray.direction,
    };

    let targets: Vec<(Entity, Vec3, Vec3)> = bars
        .iter()
        .map(|(entity, global, _)| {
            let t = global.compute_transform();
            (entity, t.translation, t.scale * 0.5)
        })
        .collect();
    let hit = pick_nearest(&ray, &targets).map(|(entity, _)| entity);

    if hit == focus.focused {
        return;
    }

    // Release the previous focus: outline entity, its assets, the tooltip.
    if let Some(previous) = focus.focused.take() {
        if let Some(record) = focus.outlines.release(&previous) {
            commands.entity(record.outline).try_despawn();
            meshes.remove(&record.mesh);
            materials.remove(&record.material);
        }
        for mut text in tooltip_text.iter_mut() {
            text.clear();
        }
        for mut visibility in tooltip.iter_mut() {
            *visibility = Visibility::Hidden;
        }
    }

    let Some(target) = hit else {
        return;
    };
    let Ok((_, _, bar)) = bars.get(target) else {
        return;
    };

    let mesh = meshes.add(cube_edge_mesh());
    let material = materials.add(StandardMaterial {
        base_color: bevy::prelude::Color::BLACK,
        unlit: true,
        ..default()
    });
    let outline = commands
        .spawn((
            HighlightFrame,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_scale(Vec3::splat(1.001)),
            RenderLayers::layer(WORLD_LAYER),
        ))
        .id();
    commands.entity(target).add_child(outline);
    if let Some(displaced) = focus.outlines.attach(
        target,
        OutlineRecord {
            outline,
            mesh,
            material,
        },
    ) {
        commands.entity(displaced.outline).try_despawn();
        meshes.remove(&displaced.mesh);
        materials.remove(&displaced.material);
    }
    focus.focused = Some(target);

    let info = &bar.0;
    for mut text in tooltip_text.iter_mut() {
        **text = format!(
            "{}\n{}\n{}",
            info.key_x,
            info.key_z,
            TickFormat::Plain.format(info.value)
        );
    }
    for mut visibility in tooltip.iter_mut() {
        *visibility = Visibility::Visible;
    }
    if let Some(hook) = &hooks.on_hover {
        hook(info);
    }
}

/// Keep the tooltip under the pointer while something is focused.
pub fn tooltip_follow(
    pointer: Res<PointerState>,
    focus: Res<FocusState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut tooltips: Query<&mut Transform, With<TooltipRoot>>,
) {
    if focus.focused.is_none() {
        return;
    }
    let Some(cursor) = pointer.screen else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let p = screen_to_overlay(cursor, Vec2::new(window.width(), window.height()));
    for mut transform in tooltips.iter_mut() {
        transform.translation.x = p.x;
        transform.translation.y = p.y;
    }
}

/// Confirm or cancel a selection on click.
pub fn click_select(
    mouse: Res<ButtonInput<MouseButton>>,
    focus: Res<FocusState>,
    bars: Query<&Bar>,
    hooks: Res<ChartHooks>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    match focus.focused.and_then(|entity| bars.get(entity).ok()) {
        Some(bar) => {
            if let Some(hook) = &hooks.on_click {
                hook(&bar.0);
            }
        }
        None => {
            if let Some(hook) = &hooks.on_cancel {
                hook();
            }
        }
    }
}

/// One growth tick for every bar still in the active set. The run condition
/// on this system is the scheduler: once no bar carries `Growing`, ticking
/// stops until a rebuild adds new bars.
pub fn grow_bars(mut commands: Commands, mut bars: Query<(Entity, &Growing, &mut Transform)>) {
    for (entity, growing, mut transform) in bars.iter_mut() {
        let (scale_y, done) = animate::grow(transform.scale.y, growing.target_height);
        transform.scale.y = scale_y;
        transform.translation.y = animate::recenter(scale_y);
        if done {
            commands.entity(entity).remove::<Growing>();
        }
    }
}
