#![forbid(unsafe_code)]

//! Headless layout and SVG rendering for layered network diagrams.
//!
//! Layer entries go through [`layout_layered`] into a [`LayeredLayout`], which
//! [`svg::render_layered_svg`] turns into an SVG document. Layout is pure geometry; only the
//! legend needs a [`TextMeasurer`].

pub mod color;
pub mod layout;
pub mod legend;
pub mod model;
pub mod options;
pub mod shape;
pub mod svg;
pub mod text;

pub use layout::layout_layered;
pub use model::{Canvas, LayerBox, LayeredLayout, LegendLayout, LegendPatch};
pub use options::{ColorOverride, LayeredOptions, LegendFont};

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use layerbox_core::LayerEntry;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] layerbox_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions").finish_non_exhaustive()
    }
}

/// Lays out `entries` and renders the result as SVG in one step.
pub fn render_svg(
    entries: &[LayerEntry],
    options: &LayeredOptions,
    layout_options: &LayoutOptions,
    svg_options: &svg::SvgRenderOptions,
) -> Result<String> {
    let layout = layout_layered(entries, options, layout_options.text_measurer.as_ref())?;
    Ok(svg::render_layered_svg(&layout, svg_options))
}
