//! Creation/teardown ordering for GPU-backed chart resources. Disposal
//! releases per-focus outline assets first, then the scene subtree, and the
//! shared pool last, once no live bar can reference it.

use super::components::{ChartRoot, Growing, TooltipText};
use super::resources::{BarAssets, FocusState, ScenePhase};
use bevy::prelude::*;
use std::collections::HashMap;

/// Tear the chart down and release every resource exactly once.
#[derive(Message)]
pub struct DisposeChart;

/// Tear down, then rebuild the scene from the chart spec.
#[derive(Message)]
pub struct RebuildChart;

/// Explicit ownership table mapping an entity to its highlight record, so
/// release order never depends on scene-graph traversal. At most one entry
/// exists at a time in practice, but the table keeps the invariant honest:
/// attaching over an existing entry hands the displaced record back to the
/// caller for disposal, and nothing can dangle.
#[derive(Debug)]
pub struct OutlineTable<K, R> {
    map: HashMap<K, R>,
}

impl<K, R> Default for OutlineTable<K, R> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<K: std::hash::Hash + Eq, R> OutlineTable<K, R> {
    pub fn attach(&mut self, owner: K, record: R) -> Option<R> {
        self.map.insert(owner, record)
    }

    pub fn release(&mut self, owner: &K) -> Option<R> {
        self.map.remove(owner)
    }

    pub fn drain(&mut self) -> Vec<R> {
        self.map.drain().map(|(_, r)| r).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// Per-focus resources owned through the outline table.
pub struct OutlineRecord {
    pub outline: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Handles `DisposeChart` and `RebuildChart`. Order: stop the growth
/// animator, release outlines and their assets, clear the tooltip, despawn
/// the chart subtree, release the shared pool.
#[allow(clippy::too_many_arguments)]
pub fn lifecycle(
    mut commands: Commands,
    mut dispose: MessageReader<DisposeChart>,
    mut rebuild: MessageReader<RebuildChart>,
    mut phase: ResMut<ScenePhase>,
    mut focus: ResMut<FocusState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut color_materials: ResMut<Assets<ColorMaterial>>,
    pool: Option<Res<BarAssets>>,
    roots: Query<Entity, With<ChartRoot>>,
    growing: Query<Entity, With<Growing>>,
    mut tooltip: Query<(&mut Text2d, &mut Visibility), With<TooltipText>>,
) {
    let disposing = dispose.read().count() > 0;
    let rebuilding = rebuild.read().count() > 0;
    if !disposing && !rebuilding {
        return;
    }

    // Stop scheduling further growth ticks.
    for entity in growing.iter() {
        commands.entity(entity).remove::<Growing>();
    }

    // Outlines go before the bars that own them.
    let records = focus.outlines.drain();
    let outline_count = records.len();
    for record in records {
        commands.entity(record.outline).try_despawn();
        meshes.remove(&record.mesh);
        materials.remove(&record.material);
    }
    focus.focused = None;

    for (mut text, mut visibility) in tooltip.iter_mut() {
        text.clear();
        *visibility = Visibility::Hidden;
    }

    // The subtree despawn releases per-entity materials through their last
    // handle; only the pool below is held beyond the scene graph.
    for root in roots.iter() {
        commands.entity(root).try_despawn();
    }

    if let Some(pool) = pool {
        let released = pool.release(&mut meshes, &mut materials, &mut color_materials);
        commands.remove_resource::<BarAssets>();
        info!(
            outlines = outline_count,
            pooled = released,
            "chart disposed"
        );
    }

    *phase = if rebuilding {
        ScenePhase::Loading
    } else {
        ScenePhase::Disposed
    };
}
