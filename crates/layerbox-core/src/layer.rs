use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default gap inserted by a spacing pseudo-layer that does not name its own width.
pub const DEFAULT_SPACING_LAYER_WIDTH: f64 = 50.0;

/// Type names that mark an entry as a spacing pseudo-layer rather than a real layer.
const SPACING_TYPE_NAMES: &[&str] = &["Spacing", "SpacingDummyLayer"];

macro_rules! layer_kinds {
    ($($variant:ident),* $(,)?) => {
        /// Layer category used as the key for colors, the ignore list and the legend.
        ///
        /// The well-known categories are closed variants; anything else keeps its name in
        /// [`LayerKind::Other`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum LayerKind {
            $($variant,)*
            Other(String),
        }

        impl LayerKind {
            pub fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                    Self::Other(name) => name.as_str(),
                }
            }

            pub fn from_name(name: &str) -> Self {
                match name.trim() {
                    $(stringify!($variant) => Self::$variant,)*
                    other => Self::Other(other.to_string()),
                }
            }
        }
    };
}

layer_kinds!(
    InputLayer,
    Dense,
    Conv1D,
    Conv2D,
    Conv3D,
    Conv2DTranspose,
    DepthwiseConv2D,
    SeparableConv2D,
    MaxPooling1D,
    MaxPooling2D,
    MaxPooling3D,
    AveragePooling1D,
    AveragePooling2D,
    AveragePooling3D,
    GlobalAveragePooling1D,
    GlobalAveragePooling2D,
    GlobalMaxPooling1D,
    GlobalMaxPooling2D,
    Flatten,
    Dropout,
    BatchNormalization,
    LayerNormalization,
    Activation,
    Reshape,
    ZeroPadding2D,
    UpSampling2D,
    Embedding,
    LSTM,
    GRU,
    SimpleRNN,
    Concatenate,
    Add,
);

impl LayerKind {
    /// Whether this name marks a spacing pseudo-layer.
    pub fn is_spacing(&self) -> bool {
        SPACING_TYPE_NAMES.contains(&self.name())
    }
}

impl From<String> for LayerKind {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<&str> for LayerKind {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl From<LayerKind> for String {
    fn from(value: LayerKind) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tensor shape with the batch axis first. Unknown sizes are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TensorShape(pub Vec<Option<u64>>);

impl TensorShape {
    pub fn new(dims: impl IntoIterator<Item = Option<u64>>) -> Self {
        Self(dims.into_iter().collect())
    }

    /// Builds a shape with an unknown batch axis followed by `dims`.
    pub fn batched(dims: &[u64]) -> Self {
        Self(
            std::iter::once(None)
                .chain(dims.iter().copied().map(Some))
                .collect(),
        )
    }

    /// Number of axes, batch axis included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dims(&self) -> &[Option<u64>] {
        &self.0
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, dim) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            match dim {
                Some(v) => write!(f, "{v}")?,
                None => f.write_str("None")?,
            }
        }
        if self.0.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

/// Output shape as reported by a layer: either a plain shape or a list of per-output shapes.
///
/// Non-sequential models report a one-element list; that single entry is used. Layers with
/// several outputs cannot be drawn as a single box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputShape {
    Single(TensorShape),
    Multi(Vec<TensorShape>),
}

impl OutputShape {
    pub fn resolve(&self) -> Option<&TensorShape> {
        match self {
            Self::Single(shape) => Some(shape),
            Self::Multi(shapes) if shapes.len() == 1 => shapes.first(),
            Self::Multi(_) => None,
        }
    }
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(shape) => write!(f, "{shape}"),
            Self::Multi(shapes) => {
                f.write_str("[")?;
                for (idx, shape) in shapes.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{shape}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<TensorShape> for OutputShape {
    fn from(value: TensorShape) -> Self {
        Self::Single(value)
    }
}

/// One visualized layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    pub layer_type: LayerKind,
    pub output_shape: OutputShape,
    /// Opts this record out of drawing, like an index in the ignore list.
    pub skip: bool,
}

impl LayerRecord {
    pub fn new(layer_type: impl Into<LayerKind>, output_shape: impl Into<OutputShape>) -> Self {
        Self {
            layer_type: layer_type.into(),
            output_shape: output_shape.into(),
            skip: false,
        }
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }
}

/// An entry of the layer sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayerEntry", into = "RawLayerEntry")]
pub enum LayerEntry {
    Layer(LayerRecord),
    /// Inserts horizontal space without drawing a box.
    Spacing { spacing: f64 },
}

impl LayerEntry {
    pub fn layer(layer_type: impl Into<LayerKind>, output_shape: impl Into<OutputShape>) -> Self {
        Self::Layer(LayerRecord::new(layer_type, output_shape))
    }

    pub fn spacing(spacing: f64) -> Self {
        Self::Spacing { spacing }
    }

    pub fn as_record(&self) -> Option<&LayerRecord> {
        match self {
            Self::Layer(record) => Some(record),
            Self::Spacing { .. } => None,
        }
    }
}

impl From<LayerRecord> for LayerEntry {
    fn from(value: LayerRecord) -> Self {
        Self::Layer(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLayerEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_shape: Option<OutputShape>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    skip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spacing: Option<f64>,
}

impl TryFrom<RawLayerEntry> for LayerEntry {
    type Error = Error;

    fn try_from(raw: RawLayerEntry) -> Result<Self> {
        if SPACING_TYPE_NAMES.contains(&raw.kind.trim()) {
            let spacing = raw.spacing.unwrap_or(DEFAULT_SPACING_LAYER_WIDTH);
            if !(spacing.is_finite() && spacing >= 0.0) {
                return Err(Error::InvalidLayer {
                    layer: raw.kind,
                    message: format!("spacing must be a non-negative number, got {spacing}"),
                });
            }
            return Ok(Self::Spacing { spacing });
        }

        let Some(output_shape) = raw.output_shape else {
            return Err(Error::InvalidLayer {
                layer: raw.kind,
                message: "missing `output_shape`".to_string(),
            });
        };
        Ok(Self::Layer(LayerRecord {
            layer_type: LayerKind::from_name(&raw.kind),
            output_shape,
            skip: raw.skip,
        }))
    }
}

impl From<LayerEntry> for RawLayerEntry {
    fn from(entry: LayerEntry) -> Self {
        match entry {
            LayerEntry::Layer(record) => Self {
                kind: record.layer_type.into(),
                output_shape: Some(record.output_shape),
                skip: record.skip,
                spacing: None,
            },
            LayerEntry::Spacing { spacing } => Self {
                kind: SPACING_TYPE_NAMES[0].to_string(),
                output_shape: None,
                skip: false,
                spacing: Some(spacing),
            },
        }
    }
}
