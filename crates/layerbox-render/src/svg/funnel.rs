use super::SvgSurface;
use crate::model::LayerBox;

/// Connects `prev` to `cur` for forward boxes: top and bottom edges of the back faces, then
/// bottom and top edges of the front faces. Drawn in `cur`'s outline color.
pub fn draw_forward_funnel(surface: &mut SvgSurface, prev: &LayerBox, cur: &LayerBox) {
    let stroke = cur.outline;
    surface.line(
        (prev.x2 + prev.de, prev.y1 - prev.de),
        (cur.x1 + cur.de, cur.y1 - cur.de),
        stroke,
    );
    surface.line(
        (prev.x2 + prev.de, prev.y2 - prev.de),
        (cur.x1 + cur.de, cur.y2 - cur.de),
        stroke,
    );
    surface.line((prev.x2, prev.y2), (cur.x1, cur.y2), stroke);
    surface.line((prev.x2, prev.y1), (cur.x1, cur.y1), stroke);
}

/// Back-face edges between reversed boxes, walked in sequence order.
pub fn draw_back_funnel_reversed(surface: &mut SvgSurface, prev: &LayerBox, cur: &LayerBox) {
    let stroke = cur.outline;
    surface.line(
        (prev.x2 - prev.de, prev.y1 - prev.de),
        (cur.x1 - cur.de, cur.y1 - cur.de),
        stroke,
    );
    surface.line(
        (prev.x2 - prev.de, prev.y2 - prev.de),
        (cur.x1 - cur.de, cur.y2 - cur.de),
        stroke,
    );
}

/// Front-face edges between reversed boxes, walked from the last box back to the first:
/// `later` is the box drawn just before `cur` and sits to its right.
pub fn draw_front_funnel_reversed(surface: &mut SvgSurface, later: &LayerBox, cur: &LayerBox) {
    let stroke = cur.outline;
    surface.line((later.x1, later.y1), (cur.x2, cur.y1), stroke);
    surface.line((later.x1, later.y2), (cur.x2, cur.y2), stroke);
}
