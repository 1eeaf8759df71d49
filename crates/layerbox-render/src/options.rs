use indexmap::IndexMap;
use layerbox_core::{LayerKind, Orientation, Rgba};
use serde::{Deserialize, Serialize};

/// Caller-supplied colors for one layer kind. Missing parts fall back to the color wheel
/// (fill) and black (outline).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Rgba>,
}

impl ColorOverride {
    pub fn fill(fill: Rgba) -> Self {
        Self {
            fill: Some(fill),
            outline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendFont {
    pub family: String,
    pub size: f64,
}

impl Default for LegendFont {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 11.0,
        }
    }
}

/// Configuration of the layered view. Every field has a default; config files only need to
/// name what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredOptions {
    /// Minimum z size in pixels a layer will have.
    pub min_z: f64,
    /// Minimum x and y size in pixels a layer will have.
    pub min_xy: f64,
    /// Maximum z size in pixels a layer will have.
    pub max_z: f64,
    /// Maximum x and y size in pixels a layer will have.
    pub max_xy: f64,
    pub scale_z: f64,
    pub scale_xy: f64,
    /// Layer kinds that are not drawn.
    pub type_ignore: Vec<LayerKind>,
    /// Layer positions (in the input sequence, spacing entries included) that are not drawn.
    pub index_ignore: Vec<usize>,
    pub color_map: IndexMap<LayerKind, ColorOverride>,
    /// Axis on which one-dimensional layers are drawn.
    pub one_dim_orientation: Orientation,
    /// Layer positions drawn flat even when `draw_volume` is on.
    #[serde(alias = "index_2D")]
    pub index_2d: Vec<usize>,
    pub background_fill: Rgba,
    pub draw_volume: bool,
    /// Extrude boxes toward the back-left instead of the back-right.
    pub draw_reversed: bool,
    /// Distance before the first and after the last layer.
    pub padding: f64,
    /// Gap between two consecutive layers.
    pub spacing: f64,
    pub draw_funnel: bool,
    /// Lightness deviation used for the top and side faces.
    pub shade_step: i32,
    pub legend: bool,
    pub font: LegendFont,
    pub font_color: Rgba,
}

impl Default for LayeredOptions {
    fn default() -> Self {
        Self {
            min_z: 20.0,
            min_xy: 20.0,
            max_z: 400.0,
            max_xy: 2000.0,
            scale_z: 0.1,
            scale_xy: 4.0,
            type_ignore: Vec::new(),
            index_ignore: Vec::new(),
            color_map: IndexMap::new(),
            one_dim_orientation: Orientation::Z,
            index_2d: Vec::new(),
            background_fill: Rgba::WHITE,
            draw_volume: true,
            draw_reversed: false,
            padding: 10.0,
            spacing: 10.0,
            draw_funnel: true,
            shade_step: 10,
            legend: false,
            font: LegendFont::default(),
            font_color: Rgba::BLACK,
        }
    }
}

impl LayeredOptions {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn ignores_index(&self, index: usize) -> bool {
        self.index_ignore.contains(&index)
    }

    pub fn ignores_kind(&self, kind: &LayerKind) -> bool {
        self.type_ignore.contains(kind)
    }

    /// Whether spacing pseudo-layers are listed in `type_ignore`.
    pub fn ignores_spacing(&self) -> bool {
        self.type_ignore.iter().any(LayerKind::is_spacing)
    }

    /// Whether the layer at `index` gets a depth extent.
    pub fn is_volumetric(&self, index: usize) -> bool {
        self.draw_volume && !self.index_2d.contains(&index)
    }
}
