#![forbid(unsafe_code)]

//! `layerbox` draws the layer-by-layer structure of a feed-forward neural network as a row of
//! 2D or pseudo-3D boxes joined by funnel lines.
//!
//! The input is a plain sequence of [`LayerEntry`] values (layer type + output shape, or a
//! spacing gap); how that sequence was extracted from a model is up to the caller.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`layerbox::render`)
//! - `raster`: enable PNG/JPG/PDF output and [`render::layered_view`] via pure-Rust SVG
//!   rasterization/conversion

pub use layerbox_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use layerbox_render::model::{Canvas, LayerBox, LayeredLayout, LegendLayout, LegendPatch};
    pub use layerbox_render::svg::{SvgRenderOptions, render_layered_svg};
    pub use layerbox_render::text::{
        BoundsTextMeasurer, DeterministicTextMeasurer, TextBounds, TextMeasurer, TextMetrics,
        TextStyle,
    };
    pub use layerbox_render::{
        ColorOverride, Error, LayeredOptions, LayoutOptions, LegendFont, Result, layout_layered,
    };

    use layerbox_core::LayerEntry;

    #[cfg(feature = "raster")]
    pub mod raster;

    #[cfg(feature = "raster")]
    pub use raster::{LayeredImage, OutputFormat, layered_view};

    /// Converts an arbitrary string (typically a model name or file stem) into a conservative
    /// SVG `id` token.
    ///
    /// Unsupported characters become `-`, runs of `-` collapse, and ids that do not start with
    /// an ASCII letter get an `lb-` prefix.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "lb-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 3);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "lb-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "lb" {
            return "lb-untitled".to_string();
        }
        out.to_string()
    }

    /// Bundles the option sets needed for one render so callers pass a single value around.
    #[derive(Debug, Clone, Default)]
    pub struct LayeredRenderer {
        pub options: LayeredOptions,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
    }

    impl LayeredRenderer {
        pub fn new(options: LayeredOptions) -> Self {
            Self {
                options,
                ..Self::default()
            }
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self
        }

        pub fn layout(&self, entries: &[LayerEntry]) -> Result<LayeredLayout> {
            layout_layered(entries, &self.options, self.layout.text_measurer.as_ref())
        }

        pub fn render_svg(&self, entries: &[LayerEntry]) -> Result<String> {
            let layout = self.layout(entries)?;
            Ok(render_layered_svg(&layout, &self.svg))
        }

        #[cfg(feature = "raster")]
        pub fn render_image(&self, entries: &[LayerEntry]) -> raster::Result<LayeredImage> {
            raster::render_image(entries, self, &raster::RasterOptions::default())
        }
    }

}
