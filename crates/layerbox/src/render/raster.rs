#![forbid(unsafe_code)]

use crate::render::{LayeredLayout, LayeredOptions, LayeredRenderer, render_layered_svg};
use layerbox_core::{LayerEntry, Rgba};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Layout(#[from] layerbox_render::Error),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("JPG rendering requires an opaque background color (e.g. white)")]
    JpegOpaqueBackgroundRequired,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
    #[error("unsupported output format for {path} (expected .svg, .png, .jpg, .jpeg or .pdf)")]
    UnsupportedOutputFormat { path: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl OutputFormat {
    /// Parses a format name as given on the command line (`svg`, `png`, `jpg`/`jpeg`, `pdf`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
            .ok_or_else(|| RasterError::UnsupportedOutputFormat {
                path: path.display().to_string(),
            })
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// Fill painted under the SVG. The diagram carries its own background, so this only matters
    /// for transparent diagrams.
    pub background: Option<Rgba>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
        }
    }
}

/// A rendered diagram: the layout it came from, its SVG source and the rasterized pixels.
#[derive(Debug, Clone)]
pub struct LayeredImage {
    pub layout: LayeredLayout,
    pub svg: String,
    pixmap: tiny_skia::Pixmap,
}

impl LayeredImage {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        self.pixmap.encode_png().map_err(|_| RasterError::PngEncode)
    }

    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        pixmap_to_jpeg(&self.pixmap, quality)
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        svg_to_pdf(&self.svg)
    }

    pub fn encode(&self, format: OutputFormat, options: &RasterOptions) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Svg => Ok(self.svg.clone().into_bytes()),
            OutputFormat::Png => self.to_png(),
            OutputFormat::Jpeg => self.to_jpeg(options.jpeg_quality),
            OutputFormat::Pdf => self.to_pdf(),
        }
    }

    /// Writes the image to `path`, choosing the format from its extension.
    pub fn save(&self, path: &Path, options: &RasterOptions) -> Result<()> {
        let format = OutputFormat::from_path(path)?;
        let bytes = self.encode(format, options)?;
        std::fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), format = format.extension(), "wrote diagram");
        Ok(())
    }
}

/// Lays out, draws and rasterizes `entries` with default text measurement and raster settings.
///
/// When `to_file` is given the image is also written there (format from the extension); the
/// returned image is the same either way.
pub fn layered_view(
    entries: &[LayerEntry],
    options: &LayeredOptions,
    to_file: Option<&Path>,
) -> Result<LayeredImage> {
    let renderer = LayeredRenderer::new(options.clone());
    let raster = RasterOptions::default();
    let image = render_image(entries, &renderer, &raster)?;
    if let Some(path) = to_file {
        image.save(path, &raster)?;
    }
    Ok(image)
}

pub fn render_image(
    entries: &[LayerEntry],
    renderer: &LayeredRenderer,
    raster: &RasterOptions,
) -> Result<LayeredImage> {
    let layout = renderer.layout(entries)?;
    let svg = render_layered_svg(&layout, &renderer.svg);
    // Pre-fill with an opaque diagram background so partially covered edge pixels stay opaque
    // at fractional scales.
    let background = raster
        .background
        .or_else(|| layout.background.is_opaque().then_some(layout.background));
    let pixmap = svg_to_pixmap(&svg, raster.scale, background)?;
    Ok(LayeredImage {
        layout,
        svg,
        pixmap,
    })
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let bg = options.background.unwrap_or(Rgba::WHITE);
    if !bg.is_opaque() {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }
    let pixmap = svg_to_pixmap(svg, options.scale, Some(bg))?;
    pixmap_to_jpeg(&pixmap, options.jpeg_quality)
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "DejaVu Sans".to_string();

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| RasterError::PdfConvert)
}

fn pixmap_to_jpeg(pixmap: &tiny_skia::Pixmap, quality: u8) -> Result<Vec<u8>> {
    let (w, h) = (pixmap.width(), pixmap.height());

    // JPEG has no alpha channel; anything not fully opaque would come out premultiplied.
    let rgba = pixmap.data();
    if rgba.chunks_exact(4).any(|px| px[3] != u8::MAX) {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }
    let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
    for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst.copy_from_slice(&src[..3]);
    }

    let mut out = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<Rgba>) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    // Used when the legend font family is not installed.
    opt.font_family = "DejaVu Sans".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // Diagrams always carry a root width/height matching the viewBox.
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    if let Some(bg) = background {
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    tracing::debug!(width = width_px, height = height_px, scale, "rasterized SVG");
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect width="10" height="10" fill="black"/></svg>"#;

    #[test]
    fn svg_to_png_produces_png_signature() {
        let bytes = svg_to_png(SQUARE, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn svg_to_pdf_produces_pdf_signature() {
        let bytes = svg_to_pdf(SQUARE).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn svg_to_jpeg_requires_opaque_background() {
        let options = RasterOptions {
            background: Some(Rgba::TRANSPARENT),
            ..Default::default()
        };
        assert!(matches!(
            svg_to_jpeg(SQUARE, &options),
            Err(RasterError::JpegOpaqueBackgroundRequired)
        ));

        let bytes = svg_to_jpeg(SQUARE, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(&[0xff, 0xd8]));
    }

    #[test]
    fn scale_multiplies_pixel_size() {
        let pixmap = svg_to_pixmap(SQUARE, 2.0, None).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (20, 20));
    }

    #[test]
    fn output_format_follows_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/model.PNG")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("model.jpeg")).unwrap(),
            OutputFormat::Jpeg
        );
        assert_eq!(OutputFormat::from_name("pdf"), Some(OutputFormat::Pdf));
        assert!(matches!(
            OutputFormat::from_path(Path::new("model.gif")),
            Err(RasterError::UnsupportedOutputFormat { .. })
        ));
        assert!(OutputFormat::from_path(Path::new("model")).is_err());
    }
}
