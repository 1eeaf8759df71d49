use crate::options::LayeredOptions;
use layerbox_core::{Orientation, TensorShape};
use serde::{Deserialize, Serialize};

/// Box sizes derived from a tensor shape.
///
/// `z` is the horizontal run of the front face, `y` its height, and `x` only feeds the depth
/// extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxExtents {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeToBoxMapper {
    pub min_xy: f64,
    pub max_xy: f64,
    pub min_z: f64,
    pub max_z: f64,
    pub scale_xy: f64,
    pub scale_z: f64,
    pub one_dim_orientation: Orientation,
}

impl ShapeToBoxMapper {
    pub fn from_options(options: &LayeredOptions) -> Self {
        Self {
            min_xy: options.min_xy,
            max_xy: options.max_xy,
            min_z: options.min_z,
            max_z: options.max_z,
            scale_xy: options.scale_xy,
            scale_z: options.scale_z,
            one_dim_orientation: options.one_dim_orientation,
        }
    }

    fn xy(&self, dim: u64) -> f64 {
        bound(dim as f64 * self.scale_xy, self.min_xy, self.max_xy)
    }

    fn z(&self, size: f64) -> f64 {
        bound(size * self.scale_z, self.min_z, self.max_z)
    }

    /// Maps a shape (batch axis first) to box extents. Returns `None` for shapes that have no
    /// axis besides the batch axis, or whose width/height axes are unknown.
    pub fn map(&self, shape: &TensorShape) -> Option<BoxExtents> {
        let dims = shape.dims();
        let mut out = BoxExtents {
            x: self.min_xy,
            y: self.min_xy,
            z: self.min_z,
        };
        match dims.len() {
            0 | 1 => return None,
            2 => {
                let d = dims[1]?;
                match self.one_dim_orientation {
                    Orientation::X => out.x = self.xy(d),
                    Orientation::Y => out.y = self.xy(d),
                    Orientation::Z => out.z = self.z(d as f64),
                }
            }
            n => {
                out.x = self.xy(dims[1]?);
                out.y = self.xy(dims[2]?);
                let depth_from = if n >= 4 { 3 } else { 2 };
                out.z = self.z(known_product(&dims[depth_from..]));
            }
        }
        Some(out)
    }
}

/// `min(max(v, lo), hi)`; when `lo > hi` the upper bound wins.
fn bound(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Product of the known dimensions; `0` when none are known.
fn known_product(dims: &[Option<u64>]) -> f64 {
    let mut known = dims.iter().flatten().peekable();
    if known.peek().is_none() {
        return 0.0;
    }
    known.map(|d| *d as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> ShapeToBoxMapper {
        ShapeToBoxMapper::from_options(&LayeredOptions::default())
    }

    #[test]
    fn rank4_uses_trailing_product_for_depth() {
        let e = mapper()
            .map(&TensorShape::batched(&[14, 14, 32]))
            .unwrap();
        assert_eq!(e.x, 56.0);
        assert_eq!(e.y, 56.0);
        // 32 * 0.1 is under min_z.
        assert_eq!(e.z, 20.0);

        let e = mapper()
            .map(&TensorShape::batched(&[7, 9, 50, 60]))
            .unwrap();
        assert_eq!(e.x, 28.0);
        assert_eq!(e.y, 36.0);
        assert_eq!(e.z, 300.0);
    }

    #[test]
    fn rank3_uses_the_trailing_slice_from_the_second_axis() {
        let e = mapper().map(&TensorShape::batched(&[10, 300])).unwrap();
        assert_eq!(e.x, 40.0);
        assert_eq!(e.y, 1200.0);
        assert_eq!(e.z, 30.0);
    }

    #[test]
    fn extreme_sizes_are_clamped() {
        let e = mapper()
            .map(&TensorShape::batched(&[100_000, 1, 1_000_000]))
            .unwrap();
        assert_eq!(e.x, 2000.0);
        assert_eq!(e.y, 20.0);
        assert_eq!(e.z, 400.0);
    }

    #[test]
    fn one_dimensional_shapes_follow_the_orientation() {
        let shape = TensorShape::batched(&[10]);
        let mut m = mapper();

        assert_eq!(
            m.map(&shape),
            Some(BoxExtents {
                x: 20.0,
                y: 20.0,
                z: 20.0
            })
        );

        m.one_dim_orientation = Orientation::Y;
        assert_eq!(
            m.map(&shape),
            Some(BoxExtents {
                x: 20.0,
                y: 40.0,
                z: 20.0
            })
        );

        m.one_dim_orientation = Orientation::X;
        let e = m.map(&TensorShape::batched(&[64])).unwrap();
        assert_eq!((e.x, e.y, e.z), (256.0, 20.0, 20.0));

        m.one_dim_orientation = Orientation::Z;
        let e = m.map(&TensorShape::batched(&[4096])).unwrap();
        assert_eq!(e.z, 400.0);
    }

    #[test]
    fn rejects_unsupported_shapes() {
        let m = mapper();
        assert_eq!(m.map(&TensorShape::default()), None);
        assert_eq!(m.map(&TensorShape::new([None])), None);
        assert_eq!(m.map(&TensorShape::new([None, None, Some(3)])), None);
    }

    #[test]
    fn unknown_trailing_dims_are_skipped_in_the_depth_product() {
        let shape = TensorShape::new([None, Some(4), Some(4), None, Some(300)]);
        assert_eq!(mapper().map(&shape).unwrap().z, 30.0);

        let shape = TensorShape::new([None, Some(4), Some(4), None]);
        assert_eq!(mapper().map(&shape).unwrap().z, 20.0);
    }
}
