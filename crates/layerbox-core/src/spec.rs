use crate::layer::{LayerEntry, LayerRecord};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A saved description of a linear model: its layers in forward order.
///
/// ```yaml
/// name: mnist-cnn
/// layers:
///   - { type: InputLayer, output_shape: [null, 28, 28, 1] }
///   - { type: Conv2D, output_shape: [[null, 26, 26, 32]] }
///   - { type: Spacing, spacing: 40 }
///   - { type: Dense, output_shape: [null, 10] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub layers: Vec<LayerEntry>,
}

impl ModelSpec {
    pub fn new(layers: impl IntoIterator<Item = LayerEntry>) -> Self {
        Self {
            name: None,
            layers: layers.into_iter().collect(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses `text`, trying JSON first and falling back to YAML.
    pub fn from_str_any(text: &str) -> Result<Self> {
        match Self::from_json_str(text) {
            Ok(spec) => Ok(spec),
            Err(json_err) => {
                tracing::debug!(error = %json_err, "model spec is not JSON; trying YAML");
                Self::from_yaml_str(text)
            }
        }
    }

    /// Loads a spec, picking the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let text = std::fs::read_to_string(path)?;
        match ext.as_deref() {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Err(Error::UnknownSpecFormat {
                path: path.display().to_string(),
            }),
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &LayerRecord> {
        self.layers.iter().filter_map(LayerEntry::as_record)
    }
}

impl FromIterator<LayerEntry> for ModelSpec {
    fn from_iter<T: IntoIterator<Item = LayerEntry>>(iter: T) -> Self {
        Self::new(iter)
    }
}
