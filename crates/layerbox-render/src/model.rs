use crate::color::LayerColors;
use indexmap::IndexMap;
use layerbox_core::{LayerKind, Rgba};
use serde::{Deserialize, Serialize};

/// One drawn layer. `(x1, y1)`-`(x2, y2)` is the front face; `de` is the depth extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBox {
    /// Position of the layer in the input sequence.
    pub index: usize,
    pub kind: LayerKind,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub de: f64,
    pub fill: Rgba,
    pub outline: Rgba,
    pub shade_step: i32,
}

impl LayerBox {
    /// Vertical extent including the depth offset above the front face.
    pub fn total_height(&self) -> f64 {
        self.y2 - (self.y1 - self.de)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
    }

    pub fn top_face_fill(&self) -> Rgba {
        self.fill.fade(self.shade_step)
    }

    pub fn side_face_fill(&self) -> Rgba {
        self.fill.fade(2 * self.shade_step)
    }
}

/// Main drawing area, before any legend is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Unrounded `max_right + x_off + padding`.
    pub img_width: f64,
    /// Largest box total height.
    pub img_height: f64,
    pub max_right: f64,
    pub x_off: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendPatch {
    pub kind: LayerKind,
    pub label: String,
    /// Patch origin inside the legend strip.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Sample box in patch-local coordinates.
    pub sample: LayerBox,
    pub text_x: f64,
    pub text_y: f64,
    pub text_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub font_size: f64,
    pub font_color: Rgba,
    pub patches: Vec<LegendPatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredLayout {
    pub canvas: Canvas,
    pub boxes: Vec<LayerBox>,
    pub background: Rgba,
    pub draw_reversed: bool,
    pub draw_funnel: bool,
    /// Resolved colors per kind, in first-seen order.
    pub colors: IndexMap<LayerKind, LayerColors>,
    pub legend: Option<LegendLayout>,
}

impl LayeredLayout {
    /// Width of the final image, legend included.
    pub fn width(&self) -> u32 {
        match &self.legend {
            Some(legend) => self.canvas.width.max(legend.width),
            None => self.canvas.width,
        }
    }

    /// Height of the final image, legend included.
    pub fn height(&self) -> u32 {
        match &self.legend {
            Some(legend) => self.canvas.height + legend.height,
            None => self.canvas.height,
        }
    }

    /// Layer kinds in the order they first appear.
    pub fn layer_kinds(&self) -> impl Iterator<Item = &LayerKind> {
        self.colors.keys()
    }
}
