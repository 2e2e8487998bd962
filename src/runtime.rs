use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::chart::ChartSpec;
use crate::render::{ChartHooks, ChartRenderPlugin, ChartRes};

#[cfg(not(target_arch = "wasm32"))]
pub fn run_chart(spec: ChartSpec, hooks: ChartHooks) {
    let bg = spec.options.background_color;
    let size = spec.size;
    App::new()
        .insert_resource(ClearColor(Color::from(bg)))
        .insert_resource(ChartRes(spec))
        .insert_resource(hooks)
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    resolution: WindowResolution::new(size.x, size.y),
                    title: "clusterbar".into(),
                    ..default()
                }),
                ..default()
            }),
            ChartRenderPlugin,
        ))
        .run();
}

#[cfg(target_arch = "wasm32")]
pub fn run_chart(spec: ChartSpec, hooks: ChartHooks, canvas_id: &str) {
    let bg = spec.options.background_color;
    App::new()
        .insert_resource(ClearColor(Color::from(bg)))
        .insert_resource(ChartRes(spec))
        .insert_resource(hooks)
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    canvas: Some(format!("#{}", canvas_id)),
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            }),
            ChartRenderPlugin,
        ))
        .run();
}
