use crate::color::ColorAssigner;
use crate::legend::compose_legend;
use crate::model::{Canvas, LayerBox, LayeredLayout};
use crate::options::LayeredOptions;
use crate::shape::ShapeToBoxMapper;
use crate::text::TextMeasurer;
use crate::{Error, Result};
use layerbox_core::{LayerEntry, LayerRecord};

fn unsupported_shape(index: usize, record: &LayerRecord) -> Error {
    layerbox_core::Error::UnsupportedShape {
        index,
        shape: record.output_shape.to_string(),
    }
    .into()
}

/// Lays out `entries` left to right.
///
/// Every drawn layer becomes one [`LayerBox`]; spacing entries only advance the cursor. After
/// the pass, boxes are centered vertically on the canvas and shifted right by `x_off` so the
/// depth offset of the first box stays visible. Any unsupported shape aborts the layout.
pub fn layout_layered(
    entries: &[LayerEntry],
    options: &LayeredOptions,
    measurer: &dyn TextMeasurer,
) -> Result<LayeredLayout> {
    let mapper = ShapeToBoxMapper::from_options(options);
    let mut colors = ColorAssigner::new(&options.color_map);

    let mut boxes: Vec<LayerBox> = Vec::new();
    let mut current_z = options.padding;
    let mut x_off: Option<f64> = None;
    let mut img_height: f64 = 0.0;
    let mut max_right: f64 = 0.0;

    for (index, entry) in entries.iter().enumerate() {
        if options.ignores_index(index) {
            tracing::debug!(index, "layer ignored by index");
            continue;
        }

        let record = match entry {
            LayerEntry::Spacing { spacing } => {
                if options.ignores_spacing() {
                    tracing::debug!(index, "spacing ignored by type");
                } else {
                    current_z += spacing;
                }
                continue;
            }
            LayerEntry::Layer(record) => record,
        };

        if record.skip || options.ignores_kind(&record.layer_type) {
            tracing::debug!(index, kind = %record.layer_type, "layer skipped");
            continue;
        }

        let extents = record
            .output_shape
            .resolve()
            .and_then(|shape| mapper.map(shape))
            .ok_or_else(|| unsupported_shape(index, record))?;

        let de = if options.is_volumetric(index) {
            extents.x / 3.0
        } else {
            0.0
        };
        x_off.get_or_insert(de / 2.0);

        let layer_colors = colors.get(&record.layer_type);
        let x1 = current_z - de / 2.0;
        let y1 = de;
        let b = LayerBox {
            index,
            kind: record.layer_type.clone(),
            x1,
            y1,
            x2: x1 + extents.z,
            y2: y1 + extents.y,
            de,
            fill: layer_colors.fill,
            outline: layer_colors.outline,
            shade_step: options.shade_step,
        };

        img_height = img_height.max(b.total_height());
        max_right = max_right.max(b.x2 + b.de);
        current_z += extents.z + options.spacing;

        tracing::debug!(
            index,
            kind = %b.kind,
            x1 = b.x1,
            x2 = b.x2,
            y = extents.y,
            de = b.de,
            "placed layer box"
        );
        boxes.push(b);
    }

    let x_off = x_off.unwrap_or(0.0);
    let img_width = max_right + x_off + options.padding;
    let canvas = Canvas {
        width: img_width.ceil().max(0.0) as u32,
        height: img_height.ceil().max(0.0) as u32,
        img_width,
        img_height,
        max_right,
        x_off,
    };

    // Center on the rounded canvas height so half-pixel boxes stay inside the raster.
    let canvas_height = f64::from(canvas.height);
    for b in &mut boxes {
        let y_off = (canvas_height - b.total_height()) / 2.0;
        b.translate(x_off, y_off);
    }

    // Reversed boxes extrude to the left; move them so front faces line up with the funnels.
    if options.draw_reversed {
        for b in &mut boxes {
            let de = b.de;
            b.translate(de, 0.0);
        }
    }

    let colors = colors.into_resolved();
    let legend = options
        .legend
        .then(|| compose_legend(&colors, options, canvas.width, measurer));

    tracing::debug!(
        boxes = boxes.len(),
        width = canvas.width,
        height = canvas.height,
        "layered layout complete"
    );

    Ok(LayeredLayout {
        canvas,
        boxes,
        background: options.background_fill,
        draw_reversed: options.draw_reversed,
        draw_funnel: options.draw_funnel,
        colors,
        legend,
    })
}
