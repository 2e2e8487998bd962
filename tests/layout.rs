use bevy_math::{Vec2, Vec3};
use clusterbar::chart::{ChartSpec, chart};
use clusterbar::core::RawRow;
use clusterbar::layout;
use clusterbar::render::OutlineTable;
use clusterbar::render::animate::{GROWTH_STEP, grow, recenter};
use clusterbar::render::picking::{PickRay, pick_nearest, ray_box_distance, screen_to_overlay};

fn sample_spec() -> ChartSpec {
    let rows: Vec<RawRow> = serde_json::from_str(
        r#"[{"region":"A","year":"2020","sales":10},
            {"region":"A","year":"2021","sales":20},
            {"region":"B","year":"2020","sales":5}]"#,
    )
    .unwrap();
    chart()
        .data(rows)
        .columns("region", "sales", "year")
        .build()
        .unwrap()
        .0
}

#[test]
fn missing_cells_produce_no_bar() {
    let spec = sample_spec();
    let bars = layout::bar_placements(&spec);
    // 2 categories x 2 years minus the absent (B, 2021) cell.
    assert_eq!(bars.len(), 3);
    assert!(
        !bars
            .iter()
            .any(|b| b.info.key_x == "B" && b.info.key_z == "2021")
    );
}

#[test]
fn bars_stay_inside_the_chart_box() {
    let spec = sample_spec();
    let (mx, mz) = layout::floor_margin(&spec);
    for bar in layout::bar_placements(&spec) {
        let min = bar.center - bar.size / 2.0;
        let max = bar.center + bar.size / 2.0;
        assert!(min.x >= 0.0 && max.x <= spec.dims.width + mx);
        assert!(min.y >= 0.0 && max.y <= spec.dims.height + 1e-5);
        assert!(min.z >= 0.0 && max.z <= spec.dims.depth + mz);
    }
}

#[test]
fn bars_never_overlap() {
    let spec = sample_spec();
    let bars = layout::bar_placements(&spec);
    for (i, a) in bars.iter().enumerate() {
        for b in &bars[i + 1..] {
            let gap_x = (a.center.x - b.center.x).abs() >= (a.size.x + b.size.x) / 2.0;
            let gap_z = (a.center.z - b.center.z).abs() >= (a.size.z + b.size.z) / 2.0;
            assert!(gap_x || gap_z, "{:?} intersects {:?}", a.info, b.info);
        }
    }
}

#[test]
fn bar_heights_follow_the_value_scale() {
    let spec = sample_spec();
    let bars = layout::bar_placements(&spec);
    let max = bars
        .iter()
        .find(|b| b.info.value == 20.0)
        .expect("largest bar");
    let min = bars
        .iter()
        .find(|b| b.info.value == 5.0)
        .expect("smallest bar");
    assert_eq!(max.size.y, spec.dims.height);
    assert_eq!(min.size.y, 0.0);
    // Centers sit at half height so bars rest on the floor plane.
    assert_eq!(max.center.y, max.size.y / 2.0);
}

#[test]
fn rebuild_from_identical_data_is_identical() {
    let first = layout::bar_placements(&sample_spec());
    let second = layout::bar_placements(&sample_spec());
    assert_eq!(first, second);
}

#[test]
fn hidden_floor_removes_margin_and_slab() {
    let mut spec = sample_spec();
    assert!(layout::floor_slab(&spec).is_some());
    spec.floor.visible = false;
    assert_eq!(layout::floor_margin(&spec), (0.0, 0.0));
    assert!(layout::floor_slab(&spec).is_none());
}

#[test]
fn category_labels_cover_both_axes() {
    let spec = sample_spec();
    let labels = layout::category_labels(&spec);
    let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["A", "B", "2020", "2021"]);
}

#[test]
fn wall_ticks_pair_labels_with_gridlines() {
    let spec = sample_spec();
    let (labels, lines) = layout::wall_ticks(&spec);
    assert!(!labels.is_empty());
    // One label and one gridline per tick per wall face.
    assert_eq!(labels.len(), lines.len());
}

#[test]
fn ray_from_above_hits_each_bar() {
    let spec = sample_spec();
    let bars = layout::bar_placements(&spec);
    let targets: Vec<(usize, Vec3, Vec3)> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| (i, b.center, b.size / 2.0))
        .collect();

    for (i, bar) in bars.iter().enumerate() {
        if bar.size.y == 0.0 {
            continue;
        }
        let ray = PickRay {
            origin: Vec3::new(bar.center.x, 100.0, bar.center.z),
            dir: Vec3::NEG_Y,
        };
        let (hit, distance) = pick_nearest(&ray, &targets).expect("ray should hit");
        assert_eq!(hit, i, "wrong bar under {:?}", bar.info);
        assert!(distance > 0.0);
    }
}

#[test]
fn nearest_of_stacked_targets_wins() {
    let ray = PickRay {
        origin: Vec3::ZERO,
        dir: Vec3::X,
    };
    let targets = [
        ("far", Vec3::new(10.0, 0.0, 0.0), Vec3::splat(0.5)),
        ("near", Vec3::new(3.0, 0.0, 0.0), Vec3::splat(0.5)),
    ];
    let (hit, distance) = pick_nearest(&ray, &targets).unwrap();
    assert_eq!(hit, "near");
    assert_eq!(distance, 2.5);
}

#[test]
fn origin_inside_a_box_hits_at_zero() {
    let ray = PickRay {
        origin: Vec3::ZERO,
        dir: Vec3::X,
    };
    assert_eq!(ray_box_distance(&ray, Vec3::ZERO, Vec3::ONE), Some(0.0));
}

#[test]
fn parallel_ray_outside_the_slab_misses() {
    let ray = PickRay {
        origin: Vec3::new(0.0, 5.0, 0.0),
        dir: Vec3::X,
    };
    assert_eq!(ray_box_distance(&ray, Vec3::ZERO, Vec3::ONE), None);
}

#[test]
fn overlay_origin_is_the_canvas_center() {
    let canvas = Vec2::new(960.0, 600.0);
    assert_eq!(screen_to_overlay(Vec2::new(480.0, 300.0), canvas), Vec2::ZERO);
    let corner = screen_to_overlay(Vec2::ZERO, canvas);
    assert_eq!(corner, Vec2::new(-480.0, 300.0));
}

#[test]
fn growth_is_monotonic_and_converges() {
    let target = 1.37f32;
    let mut scale = 0.0f32;
    let mut ticks = 0;
    loop {
        let (next, done) = grow(scale, target);
        assert!(next >= scale, "growth reversed at tick {ticks}");
        assert!(next <= target, "overshot at tick {ticks}");
        scale = next;
        ticks += 1;
        if done {
            break;
        }
        assert!(ticks < 1000, "never converged");
    }
    assert_eq!(scale, target);
    assert_eq!(ticks, (target / GROWTH_STEP).ceil() as usize);
    assert_eq!(recenter(scale), target / 2.0);
}

#[test]
fn growth_clamps_a_bar_already_past_target() {
    assert_eq!(grow(2.0, 1.0), (1.0, true));
    assert_eq!(grow(0.0, 0.0), (0.0, true));
}

#[test]
fn outline_table_never_dangles() {
    let mut table: OutlineTable<u32, &str> = OutlineTable::default();
    assert!(table.is_empty());

    assert_eq!(table.attach(1, "first"), None);
    // Attaching over a live entry hands the displaced record back.
    assert_eq!(table.attach(1, "second"), Some("first"));
    assert_eq!(table.len(), 1);

    assert_eq!(table.release(&1), Some("second"));
    assert_eq!(table.release(&1), None);

    table.attach(2, "a");
    table.attach(3, "b");
    let mut drained = table.drain();
    drained.sort_unstable();
    assert_eq!(drained, vec!["a", "b"]);
    assert!(table.is_empty());
}
