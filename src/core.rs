use bevy_math::UVec2;
use serde::{Deserialize, Serialize};

/// A raw tabular row as supplied by the caller: column name -> cell.
/// Cells may be JSON strings or numbers; the normalizer coerces values.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// 0xRRGGBB, full alpha.
    pub fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::linear_rgba(c.r, c.g, c.b, c.a)
    }
}

/// An ordered list of colors, used both as an ordinal scheme (one color per
/// category, cycling) and as a sequential ramp (interpolated by `sample`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Palette(pub Vec<Color>);

impl Palette {
    /// The Tableau-10 categorical scheme.
    pub fn tableau10() -> Self {
        Self(
            [
                0x4e79a7, 0xf28e2c, 0xe15759, 0x76b7b2, 0x59a14f, 0xedc949, 0xaf7aa1, 0xff9da7,
                0x9c755f, 0xbab0ab,
            ]
            .into_iter()
            .map(Color::hex)
            .collect(),
        )
    }

    pub fn entry(&self, i: usize) -> Color {
        if self.0.is_empty() {
            return Color::BLACK;
        }
        self.0[i % self.0.len()]
    }

    /// Piecewise-linear interpolation across the palette, t in [0, 1].
    pub fn sample(&self, t: f32) -> Color {
        match self.0.len() {
            0 => Color::BLACK,
            1 => self.0[0],
            n => {
                let t = t.clamp(0.0, 1.0) * (n - 1) as f32;
                let i = (t.floor() as usize).min(n - 2);
                let f = t - i as f32;
                let (a, b) = (self.0[i], self.0[i + 1]);
                Color::rgba(
                    a.r + (b.r - a.r) * f,
                    a.g + (b.g - a.g) * f,
                    a.b + (b.b - a.b) * f,
                    a.a + (b.a - a.a) * f,
                )
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::tableau10()
    }
}

/// Chart box extents in scene units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Dims {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for Dims {
    fn default() -> Self {
        Self {
            width: 5.0,
            height: 2.0,
            depth: 5.0,
        }
    }
}

/// Column-role assignments against the raw rows' keys.
///
/// `x` names the primary category column and must always resolve. When `z`
/// (secondary category) and `y` (numeric value) are also given the rows are
/// pivoted; with only `x` the data is taken as already pivoted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ColumnMap {
    pub x: String,
    pub y: String,
    pub z: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartOptions {
    pub animation: bool,
    /// Asset path of a font to load; `None` uses the renderer's default font.
    pub font: Option<String>,
    pub background_color: Color,
    pub text_color: Color,
    pub line_color: Color,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            animation: true,
            font: None,
            background_color: Color::hex(0xffffff),
            text_color: Color::hex(0x666666),
            line_color: Color::hex(0xcccccc),
        }
    }
}

/// Whether bars are colored by primary category or by numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    Ordinal,
    Continuous,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarStyle {
    /// Fraction of the x band a bar fills, so neighbors never touch.
    pub fill_x: f32,
    /// Fraction of the z band a bar fills.
    pub fill_z: f32,
    pub opacity: f32,
    pub color_mode: ColorMode,
    pub palette: Palette,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            fill_x: 0.65,
            fill_z: 0.65,
            opacity: 0.85,
            color_mode: ColorMode::Ordinal,
            palette: Palette::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WallStyle {
    pub visible: bool,
    pub color: Color,
    pub opacity: f32,
    pub show_ticks: bool,
    pub tick_format: TickFormat,
}

impl Default for WallStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::hex(0xeeeeee),
            opacity: 0.9,
            show_ticks: true,
            tick_format: TickFormat::Si,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorStyle {
    pub visible: bool,
    pub color: Color,
    pub opacity: f32,
    pub show_ticks: bool,
}

impl Default for FloorStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::hex(0xeeeeee),
            opacity: 0.9,
            show_ticks: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TooltipStyle {
    pub text_color: Color,
    pub fill_color: Color,
    pub scale: f32,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            text_color: Color::BLACK,
            fill_color: Color::WHITE.with_a(0.75),
            scale: 0.4,
        }
    }
}

/// Numeric tick label formatting for the value axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickFormat {
    /// SI-prefixed with insignificant zeros trimmed: 1500 -> "1.5k",
    /// 0.005 -> "5m". Prefixes span nano through tera.
    Si,
    /// Plain decimal with trailing zeros trimmed.
    Plain,
    /// Fixed number of decimal places.
    Fixed(u8),
}

impl TickFormat {
    pub fn format(&self, v: f64) -> String {
        match self {
            TickFormat::Fixed(p) => format!("{v:.*}", *p as usize),
            TickFormat::Plain => trim_zeros(format!("{v:.3}")),
            TickFormat::Si => {
                let a = v.abs();
                let (scaled, suffix) = if a >= 1e12 {
                    (v / 1e12, "T")
                } else if a >= 1e9 {
                    (v / 1e9, "G")
                } else if a >= 1e6 {
                    (v / 1e6, "M")
                } else if a >= 1e3 {
                    (v / 1e3, "k")
                } else if a >= 1.0 || a == 0.0 {
                    (v, "")
                } else if a >= 1e-3 {
                    (v * 1e3, "m")
                } else if a >= 1e-6 {
                    (v * 1e6, "µ")
                } else {
                    (v * 1e9, "n")
                };
                format!("{}{}", trim_zeros(format!("{scaled:.3}")), suffix)
            }
        }
    }
}

fn trim_zeros(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Default canvas size in physical pixels.
pub fn default_canvas() -> UVec2 {
    UVec2::new(960, 600)
}

/// The record attached to every bar, used only for picking, tooltips and
/// the caller-facing hooks — never for layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarInfo {
    pub key_x: String,
    pub key_z: String,
    pub value: f64,
}
