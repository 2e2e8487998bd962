pub mod animate;
pub mod components;
pub mod draw;
pub mod lifecycle;
pub mod picking;
pub mod resources;
pub mod systems;

pub use components::*;
pub use lifecycle::{DisposeChart, OutlineTable, RebuildChart};
pub use resources::*;

use draw::assemble_scene;
use systems::*;

use bevy::prelude::*;

#[derive(Default)]
pub struct ChartRenderPlugin;

impl Plugin for ChartRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .init_resource::<FocusState>()
            .init_resource::<ScenePhase>()
            .init_resource::<ChartHooks>()
            .add_message::<DisposeChart>()
            .add_message::<RebuildChart>()
            .add_systems(Startup, setup_chart)
            .add_systems(
                Update,
                (
                    (poll_font, assemble_scene)
                        .chain()
                        .run_if(resource_equals(ScenePhase::Loading)),
                    track_pointer,
                    orbit_camera,
                    sync_camera,
                    (project_labels, pick_hover, tooltip_follow, click_select)
                        .run_if(resource_equals(ScenePhase::Built)),
                    grow_bars.run_if(any_with_component::<Growing>),
                    lifecycle::lifecycle,
                )
                    .chain(),
            );
    }
}
