//! Pure spatial layout: converts the pivoted table and the scale set into
//! bar footprints, reference-plane boxes, gridline segments and label
//! anchors. Everything here is plain math over `ChartSpec`, so the picking
//! and idempotence properties can be exercised without a running renderer.

use crate::chart::ChartSpec;
use crate::core::BarInfo;
use bevy_math::Vec3;

/// Padding between the chart box and tick labels, in scene units.
pub const TICK_PADDING: f32 = 0.1;
/// Thickness of the floor and wall reference planes.
pub const WALL_THICKNESS: f32 = 0.025;

/// One bar's resolved placement: axis-aligned box `size` centered on
/// `center`, plus the info record carried for picking and tooltips.
#[derive(Clone, Debug, PartialEq)]
pub struct BarPlacement {
    pub info: BarInfo,
    pub center: Vec3,
    pub size: Vec3,
}

/// A text label anchored to a point in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub anchor: Vec3,
}

/// An axis-aligned reference plane (floor or wall).
#[derive(Clone, Debug, PartialEq)]
pub struct Slab {
    pub center: Vec3,
    pub size: Vec3,
}

/// Margin between the bars and the floor edge: 1/20th of each horizontal
/// extent while the floor is visible, zero otherwise.
pub fn floor_margin(spec: &ChartSpec) -> (f32, f32) {
    if spec.floor.visible {
        (spec.dims.width / 20.0, spec.dims.depth / 20.0)
    } else {
        (0.0, 0.0)
    }
}

/// Translation that centers the chart box on the scene origin, so the orbit
/// camera can target `Vec3::ZERO`.
pub fn root_offset(spec: &ChartSpec) -> Vec3 {
    let (mx, mz) = floor_margin(spec);
    Vec3::new(
        -(spec.dims.width + mx) / 2.0,
        -spec.dims.height / 2.0,
        -(spec.dims.depth + mz) / 2.0,
    )
}

/// One placement per (primary, secondary) pair that actually has a value;
/// missing cells produce no bar. Bars fill a configurable fraction of their
/// band so neighbors never touch.
pub fn bar_placements(spec: &ChartSpec) -> Vec<BarPlacement> {
    let (mx, mz) = floor_margin(spec);
    let sx = spec.x.bandwidth() * spec.bar.fill_x;
    let sz = spec.z.bandwidth() * spec.bar.fill_z;

    let mut out = Vec::new();
    for row in &spec.table.rows {
        let Some(bx) = spec.x.position(&row.key) else {
            continue;
        };
        let x = bx + mx / 2.0;
        for key_z in &spec.table.keys_z {
            let Some(value) = row.get(key_z) else {
                continue;
            };
            let Some(bz) = spec.z.position(key_z) else {
                continue;
            };
            let z = bz + mz / 2.0;
            let h = spec.y.position(value);
            out.push(BarPlacement {
                info: BarInfo {
                    key_x: row.key.clone(),
                    key_z: key_z.clone(),
                    value,
                },
                center: Vec3::new(x + sx / 2.0, h / 2.0, z + sz / 2.0),
                size: Vec3::new(sx, h, sz),
            });
        }
    }
    out
}

/// Floor-edge category labels. Primary labels appear once per category along
/// the front edge; secondary labels once along the left edge.
pub fn category_labels(spec: &ChartSpec) -> Vec<Label> {
    let mut out = Vec::new();
    if !spec.floor.show_ticks {
        return out;
    }

    let (mx, mz) = floor_margin(spec);
    let sx = spec.x.bandwidth() * spec.bar.fill_x;
    let sz = spec.z.bandwidth() * spec.bar.fill_z;

    for key_x in &spec.table.keys_x {
        if let Some(bx) = spec.x.position(key_x) {
            let x = bx + mx / 2.0;
            out.push(Label {
                text: key_x.clone(),
                anchor: Vec3::new(
                    x + sx / 2.0 + sx / 4.0,
                    0.0,
                    spec.dims.depth + mz + TICK_PADDING,
                ),
            });
        }
    }
    for key_z in &spec.table.keys_z {
        if let Some(bz) = spec.z.position(key_z) {
            let z = bz + mz / 2.0;
            out.push(Label {
                text: key_z.clone(),
                anchor: Vec3::new(-TICK_PADDING, 0.0, z + sz / 4.0),
            });
        }
    }
    out
}

/// The floor reference plane, sized to the axis extents plus margin.
pub fn floor_slab(spec: &ChartSpec) -> Option<Slab> {
    if !spec.floor.visible {
        return None;
    }
    let (mx, mz) = floor_margin(spec);
    let fw = spec.dims.width + mx;
    let fd = spec.dims.depth + mz;
    let t = WALL_THICKNESS;
    Some(Slab {
        center: Vec3::new(fw / 2.0, t / 2.0, fd / 2.0),
        size: Vec3::new(fw, t, fd),
    })
}

/// The back wall (along x) and side wall (along z).
pub fn wall_slabs(spec: &ChartSpec) -> Vec<Slab> {
    if !spec.wall.visible {
        return Vec::new();
    }
    let (mx, mz) = floor_margin(spec);
    let fw = spec.dims.width + mx;
    let fd = spec.dims.depth + mz;
    let h = spec.dims.height;
    let t = WALL_THICKNESS;
    vec![
        Slab {
            center: Vec3::new(fw / 2.0, h / 2.0, t / 2.0),
            size: Vec3::new(fw, h, t),
        },
        Slab {
            center: Vec3::new(fw + t / 2.0, h / 2.0, fd / 2.0),
            size: Vec3::new(t, h, fd),
        },
    ]
}

/// Numeric tick labels and gridline segments for both wall faces. Tick
/// values and count come from the value scale's own generator.
pub fn wall_ticks(spec: &ChartSpec) -> (Vec<Label>, Vec<(Vec3, Vec3)>) {
    let mut labels = Vec::new();
    let mut lines = Vec::new();
    if !spec.wall.show_ticks {
        return (labels, lines);
    }

    let (mx, mz) = floor_margin(spec);
    let fw = spec.dims.width + mx;
    let fd = spec.dims.depth + mz;
    let t = WALL_THICKNESS;

    for tick in spec.y.ticks(10) {
        let y = spec.y.position(tick);
        let text = spec.wall.tick_format.format(tick);

        // Back wall: label left of the origin, gridline across the face.
        labels.push(Label {
            text: text.clone(),
            anchor: Vec3::new(-TICK_PADDING, y, 0.0),
        });
        lines.push((Vec3::new(0.0, y, t), Vec3::new(fw - t, y, t)));

        // Side wall: label past the far depth edge, gridline down the face.
        labels.push(Label {
            text,
            anchor: Vec3::new(fw, y, fd + TICK_PADDING),
        });
        lines.push((Vec3::new(fw - t, y, t), Vec3::new(fw - t, y, fd)));
    }
    (labels, lines)
}
