use layerbox::render::raster::{RasterError, RasterOptions, render_image};
use layerbox::render::{LayeredLayout, LayeredOptions, LayeredRenderer, OutputFormat};
use layerbox::{ModelSpec, Rgba};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Model(layerbox::Error),
    Render(layerbox::render::Error),
    Raster(RasterError),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Model(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Yaml(err) => write!(f, "YAML error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<layerbox::Error> for CliError {
    fn from(value: layerbox::Error) -> Self {
        Self::Model(value)
    }
}

impl From<layerbox::render::Error> for CliError {
    fn from(value: layerbox::render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Layout,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    options_file: Option<String>,
    pretty: bool,
    format: Option<OutputFormat>,
    scale: f32,
    background: Option<Rgba>,
    diagram_id: Option<String>,
    out: Option<String>,
    legend: bool,
    reversed: bool,
    flat: bool,
    no_funnel: bool,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    name: Option<&'a str>,
    width: u32,
    height: u32,
    layout: &'a LayeredLayout,
}

fn usage() -> &'static str {
    "layerbox-cli\n\
\n\
USAGE:\n\
  layerbox-cli [render] [--options <file>] [--format svg|png|jpg|pdf] [--scale <n>] [--background <color>] [--id <diagram-id>] [--out <path>] [--legend] [--reversed] [--flat] [--no-funnel] [<model-file>|-]\n\
  layerbox-cli layout [--options <file>] [--pretty] [--legend] [--reversed] [--flat] [--no-funnel] [<model-file>|-]\n\
\n\
NOTES:\n\
  - If <model-file> is omitted or '-', the model spec (JSON or YAML) is read from stdin.\n\
  - --options reads layered view options from a JSON or YAML file; flags override it.\n\
  - The format defaults to the --out extension, then to SVG.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the model file (or ./out.<ext> for stdin).\n\
  - layout prints the box list as JSON.\n\
  - Set RUST_LOG (e.g. RUST_LOG=layerbox_render=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Render,
        scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "--pretty" => args.pretty = true,
            "--legend" => args.legend = true,
            "--reversed" => args.reversed = true,
            "--flat" => args.flat = true,
            "--no-funnel" => args.no_funnel = true,
            "--options" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options_file = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format =
                    Some(OutputFormat::from_name(fmt).ok_or(CliError::Usage(usage()))?);
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.parse::<Rgba>()?);
                }
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_model(input: Option<&str>) -> Result<ModelSpec, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(ModelSpec::from_str_any(&buf)?)
        }
        Some(path) => Ok(ModelSpec::from_path(Path::new(path))?),
    }
}

fn read_options(path: Option<&str>) -> Result<LayeredOptions, CliError> {
    let Some(path) = path else {
        return Ok(LayeredOptions::default());
    };
    let text = std::fs::read_to_string(path)?;
    let is_json = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        // YAML is a superset of JSON, so this also covers extension-less JSON files.
        Ok(serde_yaml::from_str(&text)?)
    }
}

fn apply_flags(options: &mut LayeredOptions, args: &Args) {
    if args.legend {
        options.legend = true;
    }
    if args.reversed {
        options.draw_reversed = true;
    }
    if args.flat {
        options.draw_volume = false;
    }
    if args.no_funnel {
        options.draw_funnel = false;
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn resolve_format(args: &Args) -> Result<OutputFormat, CliError> {
    if let Some(format) = args.format {
        return Ok(format);
    }
    match args.out.as_deref() {
        None | Some("-") => Ok(OutputFormat::Svg),
        Some(out) => Ok(OutputFormat::from_path(Path::new(out))?),
    }
}

fn diagram_id(args: &Args, spec: &ModelSpec) -> Option<String> {
    if let Some(id) = &args.diagram_id {
        return Some(id.clone());
    }
    if let Some(name) = &spec.name {
        return Some(name.clone());
    }
    args.input
        .as_deref()
        .filter(|p| *p != "-")
        .and_then(|p| Path::new(p).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
}

fn run(args: Args) -> Result<(), CliError> {
    let spec = read_model(args.input.as_deref())?;
    let mut options = read_options(args.options_file.as_deref())?;
    apply_flags(&mut options, &args);
    tracing::debug!(
        layers = spec.layers.len(),
        name = spec.name.as_deref().unwrap_or(""),
        "loaded model spec"
    );

    let mut renderer = LayeredRenderer::new(options);
    if let Some(id) = diagram_id(&args, &spec) {
        renderer = renderer.with_diagram_id(&id);
    }

    match args.command {
        Command::Layout => {
            let layout = renderer.layout(&spec.layers)?;
            let out = LayoutOut {
                name: spec.name.as_deref(),
                width: layout.width(),
                height: layout.height(),
                layout: &layout,
            };
            write_json(&out, args.pretty)?;
            Ok(())
        }
        Command::Render => {
            let format = resolve_format(&args)?;
            if format == OutputFormat::Svg {
                let svg = renderer.render_svg(&spec.layers)?;
                match args.out.as_deref() {
                    None => print!("{svg}"),
                    Some(out) => write_bytes(svg.as_bytes(), out)?,
                }
                return Ok(());
            }

            let raster = RasterOptions {
                scale: args.scale,
                background: args.background,
                ..Default::default()
            };
            let image = render_image(&spec.layers, &renderer, &raster)?;
            let bytes = image.encode(format, &raster)?;
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), format.extension())
                    .to_string_lossy()
                    .to_string()
            });
            write_bytes(&bytes, &out)?;
            tracing::info!(
                out = %out,
                width = image.width(),
                height = image.height(),
                "rendered diagram"
            );
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
