//! The caller-facing chart builder: configure data, column roles, styling
//! and hooks, then validate into a [`ChartSpec`] or launch the renderer.

use crate::core::{
    BarInfo, BarStyle, ChartOptions, ColumnMap, Dims, FloorStyle, RawRow, TooltipStyle, WallStyle,
    default_canvas,
};
use crate::data::{PivotedTable, pivot};
use crate::render::ChartHooks;
use crate::scale::{BandScale, ColorScale, LinearScale};
use crate::Result;
use bevy_math::UVec2;
use std::sync::Arc;

/// Callback invoked with the focused bar's info record.
pub type BarHook = Arc<dyn Fn(&BarInfo) + Send + Sync + 'static>;
/// Callback invoked when a click resolves to no bar.
pub type CancelHook = Arc<dyn Fn() + Send + Sync + 'static>;

pub fn chart() -> ClusteredChart {
    ClusteredChart::default()
}

/// Builder for a 3-D clustered bar chart.
///
/// ```no_run
/// use clusterbar::prelude::*;
///
/// let rows: Vec<RawRow> = serde_json::from_str(
///     r#"[{"region":"A","year":"2020","sales":10},
///         {"region":"A","year":"2021","sales":20},
///         {"region":"B","year":"2020","sales":5}]"#,
/// )
/// .unwrap();
///
/// chart()
///     .data(rows)
///     .columns("region", "sales", "year")
///     .bar(|b| BarStyle { opacity: 0.75, ..b })
///     .on_hover(|info| println!("{} / {} = {}", info.key_x, info.key_z, info.value))
///     .run()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct ClusteredChart {
    data: Vec<RawRow>,
    columns: ColumnMap,
    size: Option<UVec2>,
    dims: Option<Dims>,
    options: Option<ChartOptions>,
    bar: Option<BarStyle>,
    wall: Option<WallStyle>,
    floor: Option<FloorStyle>,
    tooltip: Option<TooltipStyle>,
    on_hover: Option<BarHook>,
    on_click: Option<BarHook>,
    on_cancel: Option<CancelHook>,
}

impl ClusteredChart {
    pub fn data(mut self, rows: Vec<RawRow>) -> Self {
        self.data = rows;
        self
    }

    /// Assign column roles: primary category, numeric value, secondary
    /// category. Pass `""` for `y` and `z` when the data is pre-pivoted.
    pub fn columns(
        mut self,
        x: impl Into<String>,
        y: impl Into<String>,
        z: impl Into<String>,
    ) -> Self {
        self.columns = ColumnMap {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        };
        self
    }

    /// Target canvas size in physical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(UVec2::new(width, height));
        self
    }

    /// Chart box extents in scene units.
    pub fn dimensions(mut self, dims: Dims) -> Self {
        self.dims = Some(dims);
        self
    }

    pub fn options(mut self, f: impl FnOnce(ChartOptions) -> ChartOptions) -> Self {
        self.options = Some(f(self.options.unwrap_or_default()));
        self
    }

    pub fn bar(mut self, f: impl FnOnce(BarStyle) -> BarStyle) -> Self {
        self.bar = Some(f(self.bar.unwrap_or_default()));
        self
    }

    pub fn wall(mut self, f: impl FnOnce(WallStyle) -> WallStyle) -> Self {
        self.wall = Some(f(self.wall.unwrap_or_default()));
        self
    }

    pub fn floor(mut self, f: impl FnOnce(FloorStyle) -> FloorStyle) -> Self {
        self.floor = Some(f(self.floor.unwrap_or_default()));
        self
    }

    pub fn tooltip(mut self, f: impl FnOnce(TooltipStyle) -> TooltipStyle) -> Self {
        self.tooltip = Some(f(self.tooltip.unwrap_or_default()));
        self
    }

    pub fn on_hover(mut self, f: impl Fn(&BarInfo) + Send + Sync + 'static) -> Self {
        self.on_hover = Some(Arc::new(f));
        self
    }

    pub fn on_click(mut self, f: impl Fn(&BarInfo) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(f));
        self
    }

    /// Validate the dataset and derive the spatial layout inputs. All
    /// configuration errors surface here, before any renderer exists.
    pub fn build(self) -> Result<(ChartSpec, ChartHooks)> {
        let dims = self.dims.unwrap_or_default();
        let table = pivot(&self.data, &self.columns)?;
        let values = table.values();
        let bar = self.bar.unwrap_or_default();

        let x = BandScale::new(table.keys_x.clone(), (0.0, dims.width));
        // Reversed range: the secondary axis grows toward the viewer.
        let z = BandScale::new(table.keys_z.clone(), (dims.depth, 0.0));
        let y = LinearScale::from_values(&values, (0.0, dims.height));
        let color =
            ColorScale::from_mode(bar.color_mode, &table.keys_x, &values, bar.palette.clone());

        let spec = ChartSpec {
            table,
            x,
            y,
            z,
            color,
            dims,
            size: self.size.unwrap_or_else(default_canvas),
            options: self.options.unwrap_or_default(),
            bar,
            wall: self.wall.unwrap_or_default(),
            floor: self.floor.unwrap_or_default(),
            tooltip: self.tooltip.unwrap_or_default(),
        };
        let hooks = ChartHooks {
            on_hover: self.on_hover,
            on_click: self.on_click,
            on_cancel: self.on_cancel,
        };
        Ok((spec, hooks))
    }

    /// Validate and run the chart in a native window. Blocks until closed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(self) -> Result<()> {
        let (spec, hooks) = self.build()?;
        crate::runtime::run_chart(spec, hooks);
        Ok(())
    }

    /// Validate and run the chart inside the canvas with the given DOM id.
    #[cfg(target_arch = "wasm32")]
    pub fn run(self, canvas_id: &str) -> Result<()> {
        let (spec, hooks) = self.build()?;
        crate::runtime::run_chart(spec, hooks, canvas_id);
        Ok(())
    }
}

/// A validated chart: the pivoted table, the scale set and every styling
/// option the scene assembler needs. Immutable once built.
#[derive(Clone, Debug)]
pub struct ChartSpec {
    pub table: PivotedTable,
    pub x: BandScale,
    pub y: LinearScale,
    pub z: BandScale,
    pub color: ColorScale,
    pub dims: Dims,
    pub size: UVec2,
    pub options: ChartOptions,
    pub bar: BarStyle,
    pub wall: WallStyle,
    pub floor: FloorStyle,
    pub tooltip: TooltipStyle,
}
