//! Placement functions: banded category scales, the linear value scale and
//! the bar color mapping. Domains are computed once from the full dataset
//! and never resized mid-render.

use crate::core::{Color, ColorMode, Palette};
use serde::{Deserialize, Serialize};

/// Discrete-domain, continuous-range placement: each category gets a fixed
/// band so categories never overlap. A reversed range (`r0 > r1`) lays the
/// bands out back-to-front, which the depth axis uses so the first secondary
/// category sits nearest the back wall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f32, f32),
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Band size, derived purely from the category count and axis length.
    pub fn bandwidth(&self) -> f32 {
        if self.domain.is_empty() {
            return 0.0;
        }
        (self.range.1 - self.range.0).abs() / self.domain.len() as f32
    }

    /// Lower edge of the category's band, or `None` for unknown categories.
    pub fn position(&self, key: &str) -> Option<f32> {
        let i = self.domain.iter().position(|k| k == key)?;
        let n = self.domain.len();
        let step = self.bandwidth();
        let (r0, r1) = self.range;
        Some(if r1 < r0 {
            r1 + step * (n - 1 - i) as f32
        } else {
            r0 + step * i as f32
        })
    }
}

/// Continuous value placement over the observed extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Domain = `[min, max]` of the values, or `[0, 0]` when none exist.
    pub fn from_values(values: &[f64], range: (f32, f32)) -> Self {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let domain = finite.clone().fold(None, |acc: Option<(f64, f64)>, v| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            })
        });
        Self::new(domain.unwrap_or((0.0, 0.0)), range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// A collapsed domain maps everything to the start of the range.
    pub fn position(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span == 0.0 {
            return self.range.0;
        }
        let t = ((v - d0) / span) as f32;
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Round tick values covering the domain at a 1/2/5 step.
    pub fn ticks(&self, target: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span <= 0.0 || target == 0 {
            return vec![d0];
        }
        let step = nice_step(span, target);
        let mut out = Vec::new();
        let mut t = (d0 / step).ceil() * step;
        while t <= d1 + step * 1e-6 {
            out.push(t);
            t += step;
        }
        out
    }
}

/// Round a rough step up to 1, 2 or 5 times a power of ten.
fn nice_step(span: f64, target: usize) -> f64 {
    let rough = span / target as f64;
    let base = 10f64.powf(rough.log10().floor());
    let normalized = rough / base;
    let nice = if normalized <= 1.5 {
        1.0
    } else if normalized <= 3.0 {
        2.0
    } else if normalized <= 7.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Bar coloring: ordinal over the primary categories, or sequential over the
/// observed value extent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ColorScale {
    Ordinal { domain: Vec<String>, palette: Palette },
    Sequential { min: f64, max: f64, palette: Palette },
}

impl ColorScale {
    pub fn from_mode(
        mode: ColorMode,
        keys_x: &[String],
        values: &[f64],
        palette: Palette,
    ) -> Self {
        match mode {
            ColorMode::Ordinal => ColorScale::Ordinal {
                domain: keys_x.to_vec(),
                palette,
            },
            ColorMode::Continuous => {
                let ext = LinearScale::from_values(values, (0.0, 1.0)).domain();
                ColorScale::Sequential {
                    min: ext.0,
                    max: ext.1,
                    palette,
                }
            }
        }
    }

    pub fn key_color(&self, key: &str) -> Color {
        match self {
            ColorScale::Ordinal { domain, palette } => {
                let i = domain.iter().position(|k| k == key).unwrap_or(0);
                palette.entry(i)
            }
            ColorScale::Sequential { palette, .. } => palette.sample(0.0),
        }
    }

    pub fn value_color(&self, v: f64) -> Color {
        match self {
            ColorScale::Ordinal { palette, .. } => palette.entry(0),
            ColorScale::Sequential { min, max, palette } => {
                let span = max - min;
                let t = if span == 0.0 { 0.0 } else { (v - min) / span };
                palette.sample(t as f32)
            }
        }
    }
}
