use crate::model::LayeredLayout;
use layerbox_core::Rgba;
use std::fmt::Write as _;

mod boxes;
mod funnel;
mod legend;

pub use boxes::draw_box;
pub use funnel::{draw_back_funnel_reversed, draw_forward_funnel, draw_front_funnel_reversed};

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Optional id for the root `<svg>` element.
    pub diagram_id: Option<String>,
    /// Stroke width for outlines and funnel lines.
    pub stroke_width: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            stroke_width: 1.0,
        }
    }
}

/// Append-only SVG drawing surface.
///
/// Shapes are written in call order, so later shapes paint over earlier ones. The document is
/// only complete after [`SvgSurface::finish`].
#[derive(Debug)]
pub struct SvgSurface {
    out: String,
    stroke_width: f64,
    open_groups: usize,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32, background: Rgba, options: &SvgRenderOptions) -> Self {
        // Zero-sized documents are rejected by SVG consumers.
        let w = width.max(1);
        let h = height.max(1);
        let mut out = String::new();
        let id_attr = options
            .diagram_id
            .as_deref()
            .map(|id| format!(r#" id="{}""#, escape_xml(id)))
            .unwrap_or_default();
        let _ = write!(
            &mut out,
            r#"<svg{id_attr} xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        if background.a > 0 {
            let _ = write!(
                &mut out,
                r#"<rect class="background" x="0" y="0" width="{w}" height="{h}"{fill}/>"#,
                fill = paint_attrs("fill", background)
            );
        }
        Self {
            out,
            stroke_width: options.stroke_width,
            open_groups: 0,
        }
    }

    pub fn open_group(&mut self, class: &str, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            let _ = write!(&mut self.out, r#"<g class="{}">"#, escape_xml(class));
        } else {
            let _ = write!(
                &mut self.out,
                r#"<g class="{}" transform="translate({},{})">"#,
                escape_xml(class),
                fmt(dx),
                fmt(dy)
            );
        }
        self.open_groups += 1;
    }

    pub fn close_group(&mut self) {
        if self.open_groups > 0 {
            self.out.push_str("</g>");
            self.open_groups -= 1;
        }
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Rgba) {
        let _ = write!(
            &mut self.out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            fmt(from.0),
            fmt(from.1),
            fmt(to.0),
            fmt(to.1),
            stroke_attrs(stroke, self.stroke_width)
        );
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], stroke: Rgba, fill: Rgba) {
        self.out.push_str(r#"<polygon points=""#);
        for (idx, (x, y)) in points.iter().enumerate() {
            if idx > 0 {
                self.out.push(' ');
            }
            let _ = write!(&mut self.out, "{},{}", fmt(*x), fmt(*y));
        }
        self.out.push('"');
        let _ = write!(
            &mut self.out,
            "{}{}/>",
            paint_attrs("fill", fill),
            stroke_attrs(stroke, self.stroke_width)
        );
    }

    pub fn rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Rgba, fill: Rgba) {
        let _ = write!(
            &mut self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            fmt(x1),
            fmt(y1),
            fmt((x2 - x1).max(0.0)),
            fmt((y2 - y1).max(0.0)),
            paint_attrs("fill", fill),
            stroke_attrs(stroke, self.stroke_width)
        );
    }

    /// Writes a single-line label whose vertical center is `center_y`.
    pub fn text(
        &mut self,
        x: f64,
        center_y: f64,
        text: &str,
        font_family: &str,
        font_size: f64,
        fill: Rgba,
    ) {
        let _ = write!(
            &mut self.out,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" dominant-baseline="central"{}>{}</text>"#,
            fmt(x),
            fmt(center_y),
            escape_xml(font_family),
            fmt(font_size),
            paint_attrs("fill", fill),
            escape_xml(text)
        );
    }

    /// Closes any open groups and the root element.
    pub fn finish(mut self) -> String {
        while self.open_groups > 0 {
            self.close_group();
        }
        self.out.push_str("</svg>\n");
        self.out
    }

}

fn stroke_attrs(stroke: Rgba, width: f64) -> String {
    format!(
        r#"{} stroke-width="{}""#,
        paint_attrs("stroke", stroke),
        fmt(width)
    )
}

/// Renders the boxes, funnels and legend of `layout` as an SVG document.
pub fn render_layered_svg(layout: &LayeredLayout, options: &SvgRenderOptions) -> String {
    let mut surface = SvgSurface::new(
        layout.width(),
        layout.height(),
        layout.background,
        options,
    );

    surface.open_group("layers", 0.0, 0.0);
    let boxes = &layout.boxes;
    if layout.draw_reversed {
        // Back connectors first, front to back, so the boxes drawn afterwards cover them.
        if layout.draw_funnel {
            for pair in boxes.windows(2) {
                draw_back_funnel_reversed(&mut surface, &pair[0], &pair[1]);
            }
        }
        let mut last = None;
        for b in boxes.iter().rev() {
            if let (Some(prev), true) = (last, layout.draw_funnel) {
                draw_front_funnel_reversed(&mut surface, prev, b);
            }
            draw_box(&mut surface, b, true);
            last = Some(b);
        }
    } else {
        let mut last = None;
        for b in boxes {
            if let (Some(prev), true) = (last, layout.draw_funnel) {
                draw_forward_funnel(&mut surface, prev, b);
            }
            draw_box(&mut surface, b, false);
            last = Some(b);
        }
    }
    surface.close_group();

    if let Some(l) = &layout.legend {
        legend::draw_legend(
            &mut surface,
            l,
            f64::from(layout.canvas.height),
            layout.draw_reversed,
        );
    }

    surface.finish()
}

fn paint_attrs(name: &str, color: Rgba) -> String {
    if color.a == 0 {
        return format!(r#" {name}="none""#);
    }
    if color.is_opaque() {
        format!(r#" {name}="{}""#, color.to_hex_rgb())
    } else {
        format!(
            r#" {name}="{}" {name}-opacity="{}""#,
            color.to_hex_rgb(),
            fmt(color.opacity())
        )
    }
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form, without `-0` or float noise from our own arithmetic.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
