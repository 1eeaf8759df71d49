pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not supported tensor shape {shape} (layer #{index})")]
    UnsupportedShape { index: usize, shape: String },

    #[error("unsupported orientation {value:?}; expected one of 'x', 'y' or 'z'")]
    InvalidOrientation { value: String },

    #[error("invalid color {value:?}")]
    InvalidColor { value: String },

    #[error("invalid layer entry {layer:?}: {message}")]
    InvalidLayer { layer: String, message: String },

    #[error("unknown model spec format for {path:?}; expected .json, .yaml or .yml")]
    UnknownSpecFormat { path: String },

    #[error("model spec JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model spec YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
