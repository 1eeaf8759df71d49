use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 11.0,
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// Text measurement capability used by the legend.
///
/// Font backends expose sizes in different shapes (a `(width, height)` pair, or a
/// `(left, top, right, bottom)` box). Implementations normalize to [`TextMetrics`]; see
/// [`TextBounds`] for the box-shaped adapter.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font backends that report a bounding box `(left, top, right, bottom)` for a single line.
pub trait TextBounds {
    fn bbox(&self, text: &str, style: &TextStyle) -> (f64, f64, f64, f64);
}

/// Adapts a [`TextBounds`] backend to [`TextMeasurer`]. Width and height are the box's right
/// and bottom edges, matching how box-based APIs are read for layout purposes.
#[derive(Debug, Clone, Default)]
pub struct BoundsTextMeasurer<B>(pub B);

impl<B: TextBounds> TextMeasurer for BoundsTextMeasurer<B> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let lines = DeterministicTextMeasurer::normalized_text_lines(text);
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;
        for line in &lines {
            let (_, _, right, bottom) = self.0.bbox(line, style);
            width = width.max(right);
            height += bottom;
        }
        TextMetrics {
            width,
            height,
            line_count: lines.len(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<String> {
        let out = text.split('\n').map(|s| s.to_string()).collect::<Vec<_>>();
        if out.is_empty() {
            return vec!["".to_string()];
        }
        out
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        let mut max_chars = 0usize;
        for line in &lines {
            max_chars = max_chars.max(line.chars().count());
        }

        let width = max_chars as f64 * font_size * char_width_factor;
        let height = lines.len() as f64 * font_size * line_height_factor;
        TextMetrics {
            width,
            height,
            line_count: lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBox;

    impl TextBounds for FixedBox {
        fn bbox(&self, text: &str, _style: &TextStyle) -> (f64, f64, f64, f64) {
            (0.0, 2.0, text.len() as f64 * 5.0, 9.0)
        }
    }

    #[test]
    fn deterministic_measurer_scales_with_font_size() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            ..Default::default()
        };
        let metrics = m.measure("Dense", &style);
        assert_eq!(metrics.width, 30.0);
        assert_eq!(metrics.height, 12.0);
        assert_eq!(metrics.line_count, 1);
    }

    #[test]
    fn bounds_adapter_reads_right_and_bottom_edges() {
        let m = BoundsTextMeasurer(FixedBox);
        let metrics = m.measure("Ag", &TextStyle::default());
        assert_eq!(metrics.width, 10.0);
        assert_eq!(metrics.height, 9.0);

        let two_lines = m.measure("Conv\nAg", &TextStyle::default());
        assert_eq!(two_lines.width, 20.0);
        assert_eq!(two_lines.height, 18.0);
        assert_eq!(two_lines.line_count, 2);
    }
}
