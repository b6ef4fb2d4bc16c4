//! Solar map renderer.
//!
//! Loads a map document (header keywords plus data as JSON), plots it on
//! axes built from its own WCS, draws the configured overlays and writes
//! the result as a PNG.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{GridConfig, RenderConfig};
use sunmap::{draw_grid, draw_quadrangle, Axes, GenericMap, LimbStyle, PlotOptions};

#[derive(Parser, Debug)]
#[command(name = "map-render")]
#[command(about = "Render a solar image map to PNG")]
struct Args {
    /// Map document (JSON with `header`, `data` and optional `mask`)
    #[arg(long, env = "MAP_RENDER_MAP")]
    map: PathBuf,

    /// Output PNG path
    #[arg(long, env = "MAP_RENDER_OUTPUT", default_value = "map.png")]
    output: PathBuf,

    /// Render configuration (YAML)
    #[arg(long, env = "MAP_RENDER_OPTIONS")]
    options: Option<PathBuf>,

    /// Lower display limit
    #[arg(long)]
    vmin: Option<f32>,

    /// Upper display limit
    #[arg(long)]
    vmax: Option<f32>,

    /// Colormap name
    #[arg(long, env = "MAP_RENDER_CMAP")]
    cmap: Option<String>,

    /// Lower display percentile
    #[arg(long, requires = "clip_high")]
    clip_low: Option<f32>,

    /// Upper display percentile
    #[arg(long, requires = "clip_low")]
    clip_high: Option<f32>,

    /// Draw a coordinate grid (15 degree spacing unless configured)
    #[arg(long)]
    grid: bool,

    /// Draw the solar limb
    #[arg(long)]
    limb: bool,

    /// Log level
    #[arg(long, env = "MAP_RENDER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    /// Command-line display settings layered over the configured ones.
    fn apply_overrides(&self, options: &mut PlotOptions) {
        if self.vmin.is_some() {
            options.vmin = self.vmin;
        }
        if self.vmax.is_some() {
            options.vmax = self.vmax;
        }
        if let Some(cmap) = &self.cmap {
            options.cmap = Some(cmap.clone());
        }
        if let (Some(low), Some(high)) = (self.clip_low, self.clip_high) {
            options.clip_interval = Some((low, high));
        }
    }
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(map = ?args.map, output = ?args.output, "Starting map render");
    render(&args)
}

fn render(args: &Args) -> Result<()> {
    let mut config = match &args.options {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    config.load_colormaps()?;
    args.apply_overrides(&mut config.plot);

    let map = load_map(&args.map)?;
    let (width, height) = map.dimensions();
    info!(
        width,
        height,
        frame = %map.coordinate_frame(),
        instrument = ?map.meta().instrument,
        "Loaded map"
    );

    let mut axes = map.create_axes()?;
    let report = map
        .plot(&mut axes, &config.plot)
        .context("Failed to plot map")?;

    let overlays = &config.overlays;
    if let Some(contours) = &overlays.contours {
        let (levels, style) = contours.to_parts()?;
        let lines = map
            .draw_contours(&mut axes, &levels, &style)
            .context("Failed to draw contours")?;
        info!(lines, "Drew contours");
    }
    for quad in &overlays.quadrangles {
        let (bottom_left, extent, style) = quad.resolve(&map)?;
        draw_quadrangle(&mut axes, &bottom_left, &extent, &style)
            .context("Failed to draw quadrangle")?;
    }

    let grid = match (&overlays.grid, args.grid) {
        (Some(grid), _) => Some(grid.clone()),
        (None, true) => Some(GridConfig::default()),
        (None, false) => None,
    };
    if let Some(grid) = grid {
        let lines = draw_grid(&mut axes, &grid.to_options()).context("Failed to draw grid")?;
        info!(lines, "Drew coordinate grid");
    }
    if overlays.limb || args.limb {
        map.draw_limb(&mut axes, &LimbStyle::default())
            .context("Failed to draw limb")?;
    }

    let png = axes.render_png()?;
    renderer::export::save_png(&args.output, &png)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    info!(
        output = ?args.output,
        bytes = png.len(),
        vmin = report.norm.vmin,
        vmax = report.norm.vmax,
        cmap = %report.colormap,
        warnings = report.warnings.len(),
        "Render complete"
    );
    Ok(())
}

fn load_map(path: &Path) -> Result<GenericMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read map document: {:?}", path))?;
    GenericMap::from_json(&content).with_context(|| format!("Invalid map document: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunmap::Normalize;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["map-render", "--map", "in.json"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_overrides_layer_over_config() {
        let mut options = PlotOptions::default().with_cmap("gray");
        args(&["--vmax", "500", "--cmap", "heat"]).apply_overrides(&mut options);

        assert_eq!(options.vmax, Some(500.0));
        assert_eq!(options.vmin, None);
        assert_eq!(options.cmap.as_deref(), Some("heat"));
    }

    #[test]
    fn test_override_conflicting_with_configured_norm() {
        let mut options = PlotOptions::default().with_norm(Normalize::new(0.0, 1.0).unwrap());
        args(&["--vmin", "0.5"]).apply_overrides(&mut options);

        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("Cannot manually specify vmin"));
    }

    #[test]
    fn test_clip_flags_require_each_other() {
        let result = Args::try_parse_from(["map-render", "--map", "in.json", "--clip-low", "1"]);
        assert!(result.is_err());

        let mut options = PlotOptions::default();
        args(&["--clip-low", "1", "--clip-high", "99"]).apply_overrides(&mut options);
        assert_eq!(options.clip_interval, Some((1.0, 99.0)));
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("map.json");
        let out_path = dir.path().join("map.png");
        std::fs::write(
            &map_path,
            r#"{
                "header": {
                    "NAXIS1": 4, "NAXIS2": 4,
                    "CTYPE1": "HPLN-TAN", "CTYPE2": "HPLT-TAN",
                    "CDELT1": 600.0, "CDELT2": 600.0,
                    "RSUN_OBS": 960.0
                },
                "data": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]
            }"#,
        )
        .unwrap();

        let map_arg = map_path.to_string_lossy().to_string();
        let out_arg = out_path.to_string_lossy().to_string();
        let args = Args::parse_from([
            "map-render",
            "--map",
            &map_arg,
            "--output",
            &out_arg,
            "--limb",
            "--grid",
        ]);
        render(&args).unwrap();

        let png = std::fs::read(&out_path).unwrap();
        let (_, width, height) = renderer::export::decode_png(&png).unwrap();
        assert_eq!((width, height), (4, 4));
    }
}
