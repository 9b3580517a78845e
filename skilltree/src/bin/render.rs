use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use skilltree::logging::init_logging;
use skilltree::source::{JsonFileSource, SkillTreeSource};
use skilltree::{
    NodeId, ScreenRect, SkillTreeSnapshot, SkillTreeView, ViewOptions, ViewportEvent,
};

#[derive(Debug, Parser)]
#[command(name = "skilltree-render")]
#[command(about = "Lay out a skill tree snapshot and render it to SVG or PNG")]
struct Cli {
    /// Snapshot JSON (`{"nodes": [...], "connections": [...]}`); the bundled sample if omitted.
    input: Option<PathBuf>,
    /// Output file; `.svg` or `.png`.
    #[arg(short, long)]
    output: PathBuf,
    #[arg(long, default_value_t = 1024)]
    width: u32,
    #[arg(long, default_value_t = 768)]
    height: u32,
    #[arg(long, default_value_t = 0)]
    zoom_in: u32,
    #[arg(long, default_value_t = 0)]
    zoom_out: u32,
    /// Pan after zooming, in pixels: `DX,DY`.
    #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
    pan: Option<(f32, f32)>,
    /// Node to render with its tooltip open.
    #[arg(long)]
    hover: Option<String>,
    #[arg(long, default_value_t = false)]
    high_contrast: bool,
}

fn parse_pan(s: &str) -> Result<(f32, f32), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid pan component {v:?}"))
    };
    Ok((parse(dx)?, parse(dy)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Svg,
    Png,
}

fn output_format(path: &Path) -> Result<Format> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("svg") => Ok(Format::Svg),
        Some("png") => Ok(Format::Png),
        _ => bail!("output must end in .svg or .png: {}", path.display()),
    }
}

fn replay_events(cli: &Cli) -> Vec<ViewportEvent> {
    let mut events = Vec::new();
    events.extend((0..cli.zoom_in).map(|_| ViewportEvent::ZoomIn));
    events.extend((0..cli.zoom_out).map(|_| ViewportEvent::ZoomOut));
    if let Some((dx, dy)) = cli.pan {
        events.push(ViewportEvent::PanBy { dx, dy });
    }
    events
}

fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create png at {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .with_context(|| format!("failed to write png header at {}", path.display()))?;
    writer
        .write_image_data(rgba)
        .with_context(|| format!("failed to write png data at {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging("warn");

    let format = output_format(&cli.output)?;
    if cli.width == 0 || cli.height == 0 {
        bail!("--width and --height must be positive");
    }

    let snapshot = match &cli.input {
        Some(path) => JsonFileSource::new(path).fetch()?,
        None => SkillTreeSnapshot::sample(),
    };

    let options = ViewOptions {
        reduce_motion: true,
        high_contrast: cli.high_contrast,
    };
    let mut view = SkillTreeView::with_snapshot(options, snapshot);
    view.measure(ScreenRect::from_size(cli.width as f32, cli.height as f32));
    for event in replay_events(&cli) {
        view.apply(event);
    }
    if let Some(id) = &cli.hover {
        let id = NodeId::new(id.as_str());
        if view.node(&id).is_none() {
            bail!("--hover: no node with id {id}");
        }
        view.set_hovered(Some(id));
    }

    let scene = view.scene(Duration::ZERO);
    match format {
        Format::Svg => skilltree::svg::save_scene(&cli.output, &scene)
            .with_context(|| format!("failed to write svg at {}", cli.output.display()))?,
        Format::Png => {
            let surface = skilltree::raster::render_rgba(&scene);
            write_png(&cli.output, cli.width, cli.height, surface.frame())?;
        }
    }

    let t = view.transform();
    tracing::info!(
        output = %cli.output.display(),
        nodes = view.layout().len(),
        scale = t.scale(),
        "rendered skill tree"
    );
    println!(
        "wrote {} ({} nodes, scale {:.3}, offset {:.1},{:.1})",
        cli.output.display(),
        view.layout().len(),
        t.scale(),
        t.offset_x(),
        t.offset_y()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_argument_accepts_negative_components() {
        assert_eq!(parse_pan("-40, 12.5"), Ok((-40.0, 12.5)));
        assert!(parse_pan("40").is_err());
        assert!(parse_pan("x,1").is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(output_format(Path::new("a/tree.SVG")).unwrap(), Format::Svg);
        assert_eq!(output_format(Path::new("tree.png")).unwrap(), Format::Png);
        assert!(output_format(Path::new("tree.jpg")).is_err());
    }

    #[test]
    fn replay_orders_zoom_before_pan() {
        let cli = Cli::parse_from([
            "skilltree-render",
            "-o",
            "out.svg",
            "--zoom-in",
            "2",
            "--pan=-10,5",
        ]);
        assert_eq!(
            replay_events(&cli),
            [
                ViewportEvent::ZoomIn,
                ViewportEvent::ZoomIn,
                ViewportEvent::PanBy { dx: -10.0, dy: 5.0 },
            ]
        );
    }
}
