use crate::options::ColorOverride;
use indexmap::IndexMap;
use layerbox_core::{LayerKind, Rgba};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Default wheel, cycled in order of first appearance.
pub const DEFAULT_PALETTE: [Rgba; 10] = [
    Rgba::rgb(0xff, 0xd1, 0x66),
    Rgba::rgb(0xef, 0x47, 0x6f),
    Rgba::rgb(0x11, 0x8a, 0xb2),
    Rgba::rgb(0x07, 0x3b, 0x4c),
    Rgba::rgb(0x84, 0x2d, 0xa1),
    Rgba::rgb(0xff, 0xba, 0xd4),
    Rgba::rgb(0xfe, 0x97, 0x75),
    Rgba::rgb(0x83, 0xd4, 0x83),
    Rgba::rgb(0x06, 0xd6, 0xa0),
    Rgba::rgb(0x0c, 0xb0, 0xa9),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerColors {
    pub fill: Rgba,
    pub outline: Rgba,
}

#[derive(Debug, Clone)]
pub struct ColorWheel {
    palette: Vec<Rgba>,
    mapping: FxHashMap<LayerKind, usize>,
    next: usize,
}

impl Default for ColorWheel {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.to_vec())
    }
}

impl ColorWheel {
    pub fn new(palette: Vec<Rgba>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            mapping: FxHashMap::default(),
            next: 0,
        }
    }

    pub fn color_for(&mut self, kind: &LayerKind) -> Rgba {
        if let Some(idx) = self.mapping.get(kind).copied() {
            return self.palette[idx % self.palette.len()];
        }
        let idx = self.next;
        self.next += 1;
        self.mapping.insert(kind.clone(), idx);
        self.palette[idx % self.palette.len()]
    }
}

/// Resolves the colors of each layer kind for one layout pass.
///
/// The first resolution of a kind is kept for the rest of the pass. The wheel advances once
/// per distinct kind even when the caller overrides its fill, so an override never shifts the
/// colors of the kinds that follow.
#[derive(Debug, Clone)]
pub struct ColorAssigner<'a> {
    overrides: &'a IndexMap<LayerKind, ColorOverride>,
    wheel: ColorWheel,
    resolved: IndexMap<LayerKind, LayerColors>,
}

impl<'a> ColorAssigner<'a> {
    pub fn new(overrides: &'a IndexMap<LayerKind, ColorOverride>) -> Self {
        Self::with_wheel(overrides, ColorWheel::default())
    }

    pub fn with_wheel(overrides: &'a IndexMap<LayerKind, ColorOverride>, wheel: ColorWheel) -> Self {
        Self {
            overrides,
            wheel,
            resolved: IndexMap::new(),
        }
    }

    pub fn get(&mut self, kind: &LayerKind) -> LayerColors {
        if let Some(colors) = self.resolved.get(kind) {
            return *colors;
        }
        let wheel_fill = self.wheel.color_for(kind);
        let requested = self.overrides.get(kind).copied().unwrap_or_default();
        let colors = LayerColors {
            fill: requested.fill.unwrap_or(wheel_fill),
            outline: requested.outline.unwrap_or(Rgba::BLACK),
        };
        self.resolved.insert(kind.clone(), colors);
        colors
    }

    /// Resolved colors in first-seen order.
    pub fn into_resolved(self) -> IndexMap<LayerKind, LayerColors> {
        self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_cycles_in_first_seen_order() {
        let mut wheel = ColorWheel::new(vec![Rgba::BLACK, Rgba::WHITE]);
        assert_eq!(wheel.color_for(&LayerKind::Dense), Rgba::BLACK);
        assert_eq!(wheel.color_for(&LayerKind::Conv2D), Rgba::WHITE);
        assert_eq!(wheel.color_for(&LayerKind::Flatten), Rgba::BLACK);
        assert_eq!(wheel.color_for(&LayerKind::Conv2D), Rgba::WHITE);
    }

    #[test]
    fn same_kind_gets_the_same_pair() {
        let overrides = IndexMap::new();
        let mut colors = ColorAssigner::new(&overrides);
        let a = colors.get(&LayerKind::Conv2D);
        let _ = colors.get(&LayerKind::Dense);
        let b = colors.get(&LayerKind::Conv2D);
        assert_eq!(a, b);
        assert_eq!(a.fill, DEFAULT_PALETTE[0]);
        assert_eq!(a.outline, Rgba::BLACK);
    }

    #[test]
    fn overrides_win_but_still_advance_the_wheel() {
        let mut overrides = IndexMap::new();
        overrides.insert(
            LayerKind::Conv2D,
            ColorOverride {
                fill: Some(Rgba::rgb(1, 2, 3)),
                outline: Some(Rgba::WHITE),
            },
        );
        overrides.insert(
            LayerKind::Dropout,
            ColorOverride {
                fill: None,
                outline: Some(Rgba::rgb(9, 9, 9)),
            },
        );
        let mut colors = ColorAssigner::new(&overrides);

        let conv = colors.get(&LayerKind::Conv2D);
        assert_eq!(conv.fill, Rgba::rgb(1, 2, 3));
        assert_eq!(conv.outline, Rgba::WHITE);

        let dense = colors.get(&LayerKind::Dense);
        assert_eq!(dense.fill, DEFAULT_PALETTE[1]);

        let dropout = colors.get(&LayerKind::Dropout);
        assert_eq!(dropout.fill, DEFAULT_PALETTE[2]);
        assert_eq!(dropout.outline, Rgba::rgb(9, 9, 9));

        let order: Vec<_> = colors.into_resolved().into_keys().collect();
        assert_eq!(
            order,
            vec![LayerKind::Conv2D, LayerKind::Dense, LayerKind::Dropout]
        );
    }

    #[test]
    fn separate_passes_are_independent() {
        let overrides = IndexMap::new();
        let kinds = [LayerKind::Dense, LayerKind::Flatten, LayerKind::Dense];
        let run = || {
            let mut colors = ColorAssigner::new(&overrides);
            kinds.iter().map(|k| colors.get(k)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
