pub mod chart;
pub mod core;
pub mod data;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod scale;

use std::fmt;

/// Error contexts surfaced by the chart pipeline.
///
/// `Configuration` covers everything detectable before a scene exists:
/// empty datasets, missing column mappings, columns absent from the data.
/// `ResourceLoad` covers asynchronous resource failures (font loading).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartError {
    Configuration,
    ResourceLoad,
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::Configuration => write!(f, "chart configuration error"),
            ChartError::ResourceLoad => write!(f, "chart resource failed to load"),
        }
    }
}

impl std::error::Error for ChartError {}

pub type Result<T> = std::result::Result<T, error_stack::Report<ChartError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::chart::*;
    pub use crate::core::*;
    pub use crate::data::*;
    pub use crate::layout::*;
    pub use crate::render::*;
    pub use crate::runtime::*;
    pub use crate::scale::*;
}
