//! Render configuration loaded from YAML.
//!
//! ```yaml
//! plot:
//!   cmap: sdoaia171
//!   clip_interval: [1.0, 99.5]
//! colormaps: config/colormaps.json
//! overlays:
//!   grid: { spacing: 10.0 }
//!   limb: true
//!   contours: { levels: [10, 50, 90], percent: true, color: "#00FFFF" }
//!   quadrangles:
//!     - { bottom_left: [-500, -500], width: 1000, height: 1000, label: AR }
//! ```
//!
//! Quadrangle positions and sizes are in the map's world units (CUNIT1/2).

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use renderer::Color;
use serde::Deserialize;
use sunmap::{
    Angle, ContourLevels, ContourStyle, GenericMap, GridOptions, GridSpacing, PlotOptions,
    QuadrangleExtent, QuadrangleStyle, SkyCoord,
};
use tracing::debug;

/// Root of a render configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub plot: PlotOptions,
    /// JSON colormap definitions, relative to the config file
    pub colormaps: Option<PathBuf>,
    pub overlays: OverlayConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub grid: Option<GridConfig>,
    pub limb: bool,
    pub contours: Option<ContourConfig>,
    pub quadrangles: Vec<QuadrangleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// Spacing in degrees
    #[serde(default = "default_grid_spacing")]
    pub spacing: f64,
    /// Latitude spacing in degrees, if different
    #[serde(default)]
    pub lat_spacing: Option<f64>,
    #[serde(default = "default_true")]
    pub annotate: bool,
}

fn default_grid_spacing() -> f64 {
    15.0
}

fn default_true() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: default_grid_spacing(),
            lat_spacing: None,
            annotate: true,
        }
    }
}

impl GridConfig {
    pub fn to_options(&self) -> GridOptions {
        GridOptions {
            spacing: GridSpacing {
                lon: Angle::from_degrees(self.spacing),
                lat: Angle::from_degrees(self.lat_spacing.unwrap_or(self.spacing)),
            },
            annotate: self.annotate,
            ..GridOptions::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContourConfig {
    pub levels: Vec<f32>,
    /// Interpret levels as percentages of the data range
    #[serde(default)]
    pub percent: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub linewidth: Option<f32>,
    #[serde(default)]
    pub smoothing: u32,
}

impl ContourConfig {
    pub fn to_parts(&self) -> Result<(ContourLevels, ContourStyle)> {
        let levels = if self.percent {
            ContourLevels::Percent(self.levels.clone())
        } else {
            ContourLevels::Absolute(self.levels.clone())
        };
        let mut style = ContourStyle {
            smoothing: self.smoothing,
            ..ContourStyle::default()
        };
        if let Some(color) = &self.color {
            style.color = parse_color(color)?;
        }
        if let Some(linewidth) = self.linewidth {
            style.linewidth = linewidth;
        }
        Ok((levels, style))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuadrangleConfig {
    pub bottom_left: [f64; 2],
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub edgecolor: Option<String>,
    #[serde(default)]
    pub linewidth: Option<f32>,
    #[serde(default)]
    pub label: Option<String>,
}

impl QuadrangleConfig {
    /// Corner, extent and style in the frame and units of `map`.
    pub fn resolve(&self, map: &GenericMap) -> Result<(SkyCoord, QuadrangleExtent, QuadrangleStyle)> {
        let [lon_unit, lat_unit] = map.wcs().cunit;
        let bottom_left = SkyCoord::new(
            Angle::from_unit(self.bottom_left[0], lon_unit),
            Angle::from_unit(self.bottom_left[1], lat_unit),
            map.coordinate_frame().clone(),
        );
        let extent = QuadrangleExtent::WidthHeight {
            width: Angle::from_unit(self.width, lon_unit),
            height: Angle::from_unit(self.height, lat_unit),
        };

        let mut style = QuadrangleStyle::default();
        if let Some(color) = &self.edgecolor {
            style.edgecolor = parse_color(color)?;
        }
        if let Some(linewidth) = self.linewidth {
            style.linewidth = linewidth;
        }
        style.label = self.label.clone();
        Ok((bottom_left, extent, style))
    }
}

fn parse_color(spec: &str) -> Result<Color> {
    Color::parse(spec).ok_or_else(|| anyhow!("Unrecognised color '{}'", spec))
}

impl RenderConfig {
    /// Load a configuration file, resolving the colormap path against it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config: RenderConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        if let (Some(colormaps), Some(dir)) = (config.colormaps.as_ref(), path.parent()) {
            if colormaps.is_relative() {
                config.colormaps = Some(dir.join(colormaps));
            }
        }

        debug!(
            path = ?path,
            quadrangles = config.overlays.quadrangles.len(),
            contours = config.overlays.contours.is_some(),
            "Loaded render config"
        );
        Ok(config)
    }

    /// Attach the configured colormap definitions to the plot options.
    pub fn load_colormaps(&mut self) -> Result<()> {
        if let Some(path) = &self.colormaps {
            let colormaps = renderer::ColormapConfig::from_file(path)
                .with_context(|| format!("Failed to load colormaps from {:?}", path))?;
            self.plot.colormaps = Some(colormaps);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use sunmap::MapHeader;

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "render.yaml",
            r#"
plot:
  cmap: heat
  clip_interval: [1.0, 99.0]
colormaps: colormaps.json
overlays:
  grid: { spacing: 10.0 }
  limb: true
  contours: { levels: [10, 90], percent: true, color: cyan }
  quadrangles:
    - { bottom_left: [-500, -500], width: 1000, height: 800, label: AR }
"#,
        );

        let config = RenderConfig::load(&path).unwrap();
        assert_eq!(config.plot.cmap.as_deref(), Some("heat"));
        assert_eq!(config.plot.clip_interval, Some((1.0, 99.0)));
        assert_eq!(config.colormaps, Some(dir.path().join("colormaps.json")));
        assert!(config.overlays.limb);

        let grid = config.overlays.grid.as_ref().unwrap().to_options();
        assert_eq!(grid.spacing, GridSpacing::uniform(Angle::from_degrees(10.0)));

        let (levels, style) = config.overlays.contours.as_ref().unwrap().to_parts().unwrap();
        assert_eq!(levels, ContourLevels::Percent(vec![10.0, 90.0]));
        assert_eq!(style.color, Color::new(0, 255, 255, 255));
    }

    #[test]
    fn test_empty_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "empty.yaml", "{}\n");

        let config = RenderConfig::load(&path).unwrap();
        assert!(config.plot.norm.is_none());
        assert!(config.overlays.grid.is_none());
        assert!(config.overlays.quadrangles.is_empty());
    }

    #[test]
    fn test_unknown_plot_option_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "bad.yaml", "plot:\n  autoalign: true\n");
        assert!(RenderConfig::load(&path).is_err());
    }

    #[test]
    fn test_quadrangle_uses_map_units() {
        let header = MapHeader::helioprojective(8, 8, 100.0);
        let map = GenericMap::new(vec![0.0; 64], 8, 8, header).unwrap();
        let quad = QuadrangleConfig {
            bottom_left: [-200.0, -100.0],
            width: 300.0,
            height: 150.0,
            edgecolor: Some("#00FF00".to_string()),
            linewidth: None,
            label: None,
        };

        let (bottom_left, extent, style) = quad.resolve(&map).unwrap();
        assert!((bottom_left.lon.arcsec() + 200.0).abs() < 1e-9);
        assert_eq!(
            extent,
            QuadrangleExtent::WidthHeight {
                width: Angle::from_arcsec(300.0),
                height: Angle::from_arcsec(150.0),
            }
        );
        assert_eq!(style.edgecolor, Color::new(0, 255, 0, 255));
    }

    #[test]
    fn test_bad_color_rejected() {
        let contours = ContourConfig {
            levels: vec![1.0],
            percent: false,
            color: Some("not-a-color".to_string()),
            linewidth: None,
            smoothing: 0,
        };
        assert!(contours.to_parts().is_err());
    }
}
