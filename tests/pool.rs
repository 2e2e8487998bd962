use bevy::prelude::*;
use clusterbar::chart::{ChartSpec, chart};
use clusterbar::core::{BarStyle, ColorMode, RawRow};
use clusterbar::layout;
use clusterbar::render::components::{Bar, ChartRoot};
use clusterbar::render::draw::build_pool;
use clusterbar::render::lifecycle::{DisposeChart, OutlineRecord, RebuildChart, lifecycle};
use clusterbar::render::resources::{BarAssets, FocusState, MaterialKey, ScenePhase};

fn sample_rows() -> Vec<RawRow> {
    serde_json::from_str(
        r#"[{"region":"A","year":"2020","sales":10},
            {"region":"A","year":"2021","sales":20},
            {"region":"B","year":"2020","sales":5},
            {"region":"B","year":"2021","sales":10}]"#,
    )
    .unwrap()
}

fn sample_spec(mode: ColorMode) -> ChartSpec {
    chart()
        .data(sample_rows())
        .columns("region", "sales", "year")
        .bar(|b| BarStyle {
            color_mode: mode,
            ..b
        })
        .build()
        .unwrap()
        .0
}

fn build(spec: &ChartSpec) -> (BarAssets, Assets<Mesh>, Assets<StandardMaterial>, Assets<ColorMaterial>) {
    let mut meshes = Assets::default();
    let mut materials = Assets::default();
    let mut color_materials = Assets::default();
    let pool = build_pool(spec, &mut meshes, &mut materials, &mut color_materials);
    (pool, meshes, materials, color_materials)
}

#[test]
fn ordinal_pool_holds_one_material_per_category() {
    let spec = sample_spec(ColorMode::Ordinal);
    let (pool, _, materials, _) = build(&spec);

    assert_eq!(pool.bar_materials.len(), 2);
    for key in ["A", "B"] {
        assert!(
            pool.bar_materials
                .contains_key(&MaterialKey::Category(key.into()))
        );
    }
    // Pool materials plus the shared line material, nothing per bar.
    assert_eq!(materials.len(), 3);
}

#[test]
fn continuous_pool_holds_one_material_per_distinct_value() {
    let spec = sample_spec(ColorMode::Continuous);
    let (pool, _, _, _) = build(&spec);

    // Values 10, 20, 5, 10: the duplicate collapses onto one entry.
    assert_eq!(pool.bar_materials.len(), 3);
    for value in [10.0f64, 20.0, 5.0] {
        assert!(
            pool.bar_materials
                .contains_key(&MaterialKey::Level(value.to_bits()))
        );
    }
}

#[test]
fn bars_with_the_same_key_share_a_material() {
    let spec = sample_spec(ColorMode::Ordinal);
    let (pool, _, _, _) = build(&spec);

    let bars = layout::bar_placements(&spec);
    let handles: Vec<Handle<StandardMaterial>> = bars
        .iter()
        .filter(|b| b.info.key_x == "A")
        .map(|b| pool.material_for(spec.bar.color_mode, &b.info).unwrap())
        .collect();
    assert_eq!(handles.len(), 2);
    assert_eq!(handles[0], handles[1]);

    let other = bars.iter().find(|b| b.info.key_x == "B").unwrap();
    let other_handle = pool.material_for(spec.bar.color_mode, &other.info).unwrap();
    assert_ne!(handles[0], other_handle);
}

fn teardown_app(spec: &ChartSpec) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<ScenePhase>()
        .init_resource::<FocusState>()
        .add_message::<DisposeChart>()
        .add_message::<RebuildChart>()
        .add_systems(Update, lifecycle);

    let (pool, meshes, materials, color_materials) = build(spec);
    app.insert_resource(meshes);
    app.insert_resource(materials);
    app.insert_resource(color_materials);

    // A minimal scene: one root holding one bar that references the pool.
    let placements = layout::bar_placements(spec);
    let placement = &placements[0];
    let material = pool
        .material_for(spec.bar.color_mode, &placement.info)
        .unwrap();
    let root = app
        .world_mut()
        .spawn((ChartRoot, Transform::default(), Visibility::default()))
        .id();
    let bar = app
        .world_mut()
        .spawn((
            Bar(placement.info.clone()),
            Mesh3d(pool.unit_cube.clone()),
            MeshMaterial3d(material),
            Transform::default(),
        ))
        .id();
    app.world_mut().entity_mut(root).add_child(bar);

    app.insert_resource(pool);
    app
}

#[test]
fn dispose_releases_every_pooled_asset() {
    let spec = sample_spec(ColorMode::Ordinal);
    let mut app = teardown_app(&spec);

    // Give the focus state a live outline so teardown has one to drain.
    let outline_mesh = app.world_mut().resource_mut::<Assets<Mesh>>().add(Cuboid::default());
    let outline_material = app
        .world_mut()
        .resource_mut::<Assets<StandardMaterial>>()
        .add(StandardMaterial::default());
    let outline = app.world_mut().spawn(Transform::default()).id();
    {
        let mut focus = app.world_mut().resource_mut::<FocusState>();
        focus.focused = Some(outline);
        focus.outlines.attach(
            outline,
            OutlineRecord {
                outline,
                mesh: outline_mesh,
                material: outline_material,
            },
        );
    }

    app.world_mut().write_message(DisposeChart);
    app.update();

    assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
    assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 0);
    assert_eq!(app.world().resource::<Assets<ColorMaterial>>().len(), 0);
    assert!(app.world().get_resource::<BarAssets>().is_none());
    assert_eq!(*app.world().resource::<ScenePhase>(), ScenePhase::Disposed);

    // The chart subtree and the outline are gone, and nothing dangles.
    let mut roots = app.world_mut().query_filtered::<Entity, With<ChartRoot>>();
    assert_eq!(roots.iter(app.world()).count(), 0);
    assert!(app.world().get_entity(outline).is_err());
    let focus = app.world().resource::<FocusState>();
    assert!(focus.focused.is_none());
    assert!(focus.outlines.is_empty());
}

#[test]
fn second_dispose_is_a_no_op() {
    let spec = sample_spec(ColorMode::Ordinal);
    let mut app = teardown_app(&spec);

    app.world_mut().write_message(DisposeChart);
    app.update();
    app.world_mut().write_message(DisposeChart);
    app.update();

    assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
    assert!(app.world().get_resource::<BarAssets>().is_none());
}

#[test]
fn rebuild_returns_the_phase_to_loading() {
    let spec = sample_spec(ColorMode::Ordinal);
    let mut app = teardown_app(&spec);

    app.world_mut().write_message(RebuildChart);
    app.update();

    assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
    assert!(app.world().get_resource::<BarAssets>().is_none());
    assert_eq!(*app.world().resource::<ScenePhase>(), ScenePhase::Loading);
}
