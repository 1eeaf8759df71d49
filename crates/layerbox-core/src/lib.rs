#![forbid(unsafe_code)]

//! Input model for layered network diagrams.
//!
//! A diagram is drawn from an ordered sequence of [`LayerEntry`] values: real layers carry a
//! [`LayerKind`] and an output [`TensorShape`] (batch axis first), spacing entries only widen
//! the gap between neighbours. How the sequence was obtained (introspection, a saved
//! [`ModelSpec`], hand-written tests) does not matter to the layout.

pub mod color;
pub mod error;
pub mod geom;
pub mod layer;
pub mod spec;

pub use color::Rgba;
pub use error::{Error, Result};
pub use geom::Orientation;
pub use layer::{
    DEFAULT_SPACING_LAYER_WIDTH, LayerEntry, LayerKind, LayerRecord, OutputShape, TensorShape,
};
pub use spec::ModelSpec;
