use crate::color::LayerColors;
use crate::model::{LayerBox, LegendLayout, LegendPatch};
use crate::options::LayeredOptions;
use crate::text::{TextMeasurer, TextStyle};
use indexmap::IndexMap;
use layerbox_core::LayerKind;

/// Reference string for the legend line height; covers ascenders and descenders.
const LINE_HEIGHT_PROBE: &str = "Ag";

/// Builds one patch per layer kind (sample box + label) and flows them left to right,
/// wrapping to a new row when a patch would cross `max_width`.
pub fn compose_legend(
    colors: &IndexMap<LayerKind, LayerColors>,
    options: &LayeredOptions,
    max_width: u32,
    measurer: &dyn TextMeasurer,
) -> LegendLayout {
    let style = TextStyle {
        font_family: Some(options.font.family.clone()),
        font_size: options.font.size,
        font_weight: None,
    };

    let text_height = measurer.measure(LINE_HEIGHT_PROBE, &style).height.ceil();
    let cube_size = text_height;
    let de = if options.draw_volume {
        (cube_size / 2.0).floor()
    } else {
        0.0
    };

    let mut patches: Vec<LegendPatch> = Vec::with_capacity(colors.len());
    for (idx, (kind, c)) in colors.iter().enumerate() {
        let label = kind.name().to_string();
        let text_width = measurer.measure(&label, &style).width.ceil();
        let width = cube_size + de + options.spacing + text_width;
        let height = cube_size + de;

        let x1 = if options.draw_reversed { de } else { 0.0 };
        let sample = LayerBox {
            index: idx,
            kind: kind.clone(),
            x1,
            y1: de,
            x2: x1 + cube_size,
            y2: de + cube_size,
            de,
            fill: c.fill,
            outline: c.outline,
            shade_step: options.shade_step,
        };
        let box_right = if options.draw_reversed {
            sample.x2
        } else {
            sample.x2 + de
        };

        patches.push(LegendPatch {
            kind: kind.clone(),
            label,
            x: 0.0,
            y: 0.0,
            width,
            height,
            sample,
            text_x: box_right + options.spacing,
            // Center on the probe height so every label shares one baseline.
            text_y: (height - text_height) / 2.0,
            text_height,
        });
    }

    let (width, height) = flow_row_wise(
        &mut patches,
        f64::from(max_width),
        options.padding,
        options.spacing,
    );

    LegendLayout {
        width: width.ceil() as u32,
        height: height.ceil() as u32,
        font_family: options.font.family.clone(),
        font_size: options.font.size,
        font_color: options.font_color,
        patches,
    }
}

/// Assigns patch positions and returns the strip size (trailing padding included).
fn flow_row_wise(
    patches: &mut [LegendPatch],
    max_width: f64,
    padding: f64,
    spacing: f64,
) -> (f64, f64) {
    let mut x = padding;
    let mut y = padding;
    let mut width: f64 = 0.0;
    let mut height: f64 = 0.0;

    for patch in patches.iter_mut() {
        // A patch wider than the canvas still gets a row of its own.
        if x > padding && x + patch.width > max_width {
            x = padding;
            y = height - padding + spacing;
        }
        patch.x = x;
        patch.y = y;
        width = width.max(x + patch.width + padding);
        height = height.max(y + patch.height + padding);
        x += patch.width + spacing;
    }

    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use layerbox_core::Rgba;

    fn colors(kinds: &[LayerKind]) -> IndexMap<LayerKind, LayerColors> {
        kinds
            .iter()
            .map(|k| {
                (
                    k.clone(),
                    LayerColors {
                        fill: Rgba::WHITE,
                        outline: Rgba::BLACK,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn patch_geometry_follows_text_metrics() {
        // Font 10px: "Ag" is 12px high, so cube = 12 and de = 6.
        let mut options = LayeredOptions::default();
        options.font.size = 10.0;
        let legend = compose_legend(
            &colors(&[LayerKind::Dense]),
            &options,
            1000,
            &DeterministicTextMeasurer::default(),
        );

        let p = &legend.patches[0];
        assert_eq!(p.label, "Dense");
        assert_eq!(p.text_height, 12.0);
        assert_eq!(p.sample.de, 6.0);
        assert_eq!((p.sample.x1, p.sample.x2), (0.0, 12.0));
        assert_eq!((p.sample.y1, p.sample.y2), (6.0, 18.0));
        // cube + de + spacing + "Dense" (5 * 6px)
        assert_eq!(p.width, 12.0 + 6.0 + 10.0 + 30.0);
        assert_eq!(p.height, 18.0);
        assert_eq!(p.text_x, 12.0 + 6.0 + 10.0);
        assert_eq!(p.text_y, 3.0);
        assert_eq!((p.x, p.y), (10.0, 10.0));
        assert_eq!(legend.width, 10 + 58 + 10);
        assert_eq!(legend.height, 10 + 18 + 10);
    }

    #[test]
    fn flat_legend_has_no_depth() {
        let mut options = LayeredOptions::default();
        options.draw_volume = false;
        let legend = compose_legend(
            &colors(&[LayerKind::Dense]),
            &options,
            1000,
            &DeterministicTextMeasurer::default(),
        );
        assert_eq!(legend.patches[0].sample.de, 0.0);
        assert_eq!(legend.patches[0].height, legend.patches[0].text_height);
    }

    #[test]
    fn reversed_legend_leaves_room_for_the_left_extrusion() {
        let mut options = LayeredOptions::default();
        options.font.size = 10.0;
        options.draw_reversed = true;
        let legend = compose_legend(
            &colors(&[LayerKind::Dense]),
            &options,
            1000,
            &DeterministicTextMeasurer::default(),
        );
        let p = &legend.patches[0];
        assert_eq!(p.sample.x1 - p.sample.de, 0.0);
        assert_eq!(p.text_x, p.sample.x2 + options.spacing);
        assert_eq!(p.text_x + 30.0, p.width);
    }

    #[test]
    fn patches_wrap_at_the_canvas_width() {
        let mut options = LayeredOptions::default();
        options.font.size = 10.0;
        let kinds = [LayerKind::Dense, LayerKind::Dropout, LayerKind::Flatten];
        // Dense is 58px wide, Dropout and Flatten are 70px.
        let legend = compose_legend(
            &colors(&kinds),
            &options,
            150,
            &DeterministicTextMeasurer::default(),
        );

        let pos: Vec<(f64, f64)> = legend.patches.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(pos[0], (10.0, 10.0));
        assert_eq!(pos[1], (10.0 + 58.0 + 10.0, 10.0));
        // The cursor is at 158 after Dropout: Flatten opens a second row.
        assert_eq!(pos[2], (10.0, 10.0 + 18.0 + 10.0));
        assert_eq!(legend.height, 10 + 18 + 10 + 18 + 10);
    }

    #[test]
    fn oversized_first_patch_stays_on_the_first_row() {
        let options = LayeredOptions::default();
        let legend = compose_legend(
            &colors(&[LayerKind::BatchNormalization]),
            &options,
            5,
            &DeterministicTextMeasurer::default(),
        );
        assert_eq!((legend.patches[0].x, legend.patches[0].y), (10.0, 10.0));
    }
}
