use super::SvgSurface;
use crate::model::LayerBox;

/// Draws one box: the hidden back edges, the top and side faces when the box has depth, then
/// the front face on top.
///
/// Forward boxes extrude toward the back-right (`+de`), reversed boxes toward the back-left
/// (`-de`). The top face is darkened by one shade step, the side face by two.
pub fn draw_box(surface: &mut SvgSurface, b: &LayerBox, reversed: bool) {
    let stroke = b.outline;
    let de = b.de;

    if de > 0.0 {
        if reversed {
            surface.line((b.x2 - de, b.y1 - de), (b.x2 - de, b.y2 - de), stroke);
            surface.line((b.x2 - de, b.y2 - de), (b.x2, b.y2), stroke);
            surface.line((b.x1 - de, b.y2 - de), (b.x2 - de, b.y2 - de), stroke);

            surface.polygon(
                &[
                    (b.x1, b.y1),
                    (b.x1 - de, b.y1 - de),
                    (b.x2 - de, b.y1 - de),
                    (b.x2, b.y1),
                ],
                stroke,
                b.top_face_fill(),
            );
            surface.polygon(
                &[
                    (b.x1 - de, b.y1 - de),
                    (b.x1, b.y1),
                    (b.x1, b.y2),
                    (b.x1 - de, b.y2 - de),
                ],
                stroke,
                b.side_face_fill(),
            );
        } else {
            surface.line((b.x1 + de, b.y1 - de), (b.x1 + de, b.y2 - de), stroke);
            surface.line((b.x1 + de, b.y2 - de), (b.x1, b.y2), stroke);
            surface.line((b.x1 + de, b.y2 - de), (b.x2 + de, b.y2 - de), stroke);

            surface.polygon(
                &[
                    (b.x1, b.y1),
                    (b.x1 + de, b.y1 - de),
                    (b.x2 + de, b.y1 - de),
                    (b.x2, b.y1),
                ],
                stroke,
                b.top_face_fill(),
            );
            surface.polygon(
                &[
                    (b.x2 + de, b.y1 - de),
                    (b.x2, b.y1),
                    (b.x2, b.y2),
                    (b.x2 + de, b.y2 - de),
                ],
                stroke,
                b.side_face_fill(),
            );
        }
    }

    surface.rect(b.x1, b.y1, b.x2, b.y2, stroke, b.fill);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::SvgRenderOptions;
    use layerbox_core::{LayerKind, Rgba};

    fn sample(de: f64) -> LayerBox {
        LayerBox {
            index: 0,
            kind: LayerKind::Conv2D,
            x1: 20.0,
            y1: 10.0,
            x2: 40.0,
            y2: 50.0,
            de,
            fill: Rgba::rgb(100, 100, 100),
            outline: Rgba::BLACK,
            shade_step: 10,
        }
    }

    fn draw(b: &LayerBox, reversed: bool) -> String {
        let mut s = SvgSurface::new(100, 100, Rgba::WHITE, &SvgRenderOptions::default());
        draw_box(&mut s, b, reversed);
        s.finish()
    }

    #[test]
    fn flat_box_is_a_single_rect() {
        let svg = draw(&sample(0.0), false);
        assert_eq!(svg.matches("<polygon").count(), 0);
        assert_eq!(svg.matches("<line").count(), 0);
        assert!(svg.contains(
            r##"<rect x="20" y="10" width="20" height="40" fill="#646464" stroke="#000000" stroke-width="1"/>"##
        ));
    }

    #[test]
    fn forward_box_extrudes_back_right_with_shaded_faces() {
        let svg = draw(&sample(6.0), false);
        assert_eq!(svg.matches("<line").count(), 3);
        assert!(svg.contains(r##"<polygon points="20,10 26,4 46,4 40,10" fill="#5a5a5a""##));
        assert!(svg.contains(r##"<polygon points="46,4 40,10 40,50 46,44" fill="#505050""##));
        // The front face is written last so it covers the hidden edges.
        assert!(svg.rfind("<rect").unwrap() > svg.rfind("<polygon").unwrap());
    }

    #[test]
    fn reversed_box_extrudes_back_left() {
        let svg = draw(&sample(6.0), true);
        assert!(svg.contains(r#"<polygon points="20,10 14,4 34,4 40,10""#));
        assert!(svg.contains(r#"<polygon points="14,4 20,10 20,50 14,44""#));
        assert!(svg.contains(r#"<line x1="34" y1="4" x2="34" y2="44""#));
    }
}
