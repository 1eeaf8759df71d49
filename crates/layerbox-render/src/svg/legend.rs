use super::{SvgSurface, draw_box};
use crate::model::LegendLayout;

/// Draws the legend strip below the main canvas (`top` is the canvas height).
pub(super) fn draw_legend(
    surface: &mut SvgSurface,
    legend: &LegendLayout,
    top: f64,
    reversed: bool,
) {
    surface.open_group("legend", 0.0, top);
    for patch in &legend.patches {
        surface.open_group("legend-item", patch.x, patch.y);
        draw_box(surface, &patch.sample, reversed);
        surface.text(
            patch.text_x,
            patch.text_y + patch.text_height / 2.0,
            &patch.label,
            &legend.font_family,
            legend.font_size,
            legend.font_color,
        );
        surface.close_group();
    }
    surface.close_group();
}
