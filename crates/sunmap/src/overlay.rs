//! Overlays positioned in world coordinates.
//!
//! Every overlay needs axes that know their WCS and fails with
//! [`SolarError::NotWcsAxes`] before drawing anything otherwise.

use renderer::contour::{contour_lines, percent_levels};
use renderer::Color;
use solar_common::{Angle, FrameKind, SkyCoord, SolarError, SolarResult};
use tracing::debug;
use wcs::Wcs;

use crate::axes::{require_wcs, Axes, LegendEntry};
use crate::map::GenericMap;

/// Samples per quadrangle edge, so edges follow the projection.
const QUADRANGLE_EDGE_SAMPLES: usize = 20;

/// Samples along each grid line.
const GRID_LINE_SAMPLES: usize = 64;

/// Upper bound on grid lines per axis.
const MAX_GRID_LINES: usize = 360;

const LIMB_SAMPLES: usize = 360;

/// Size of the second corner of a quadrangle.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadrangleExtent {
    /// Offsets from the bottom-left corner
    WidthHeight { width: Angle, height: Angle },
    /// Opposite corner, in the same frame as the bottom-left corner
    TopRight(SkyCoord),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuadrangleStyle {
    pub edgecolor: Color,
    pub linewidth: f32,
    /// Legend label; unlabelled quadrangles stay out of the legend
    pub label: Option<String>,
}

impl Default for QuadrangleStyle {
    fn default() -> Self {
        Self {
            edgecolor: Color::new(255, 0, 0, 255),
            linewidth: 1.0,
            label: None,
        }
    }
}

impl QuadrangleStyle {
    /// Set the edge color from a hex string or a basic color name.
    pub fn with_edgecolor(mut self, spec: &str) -> SolarResult<Self> {
        self.edgecolor = Color::parse(spec)
            .ok_or_else(|| SolarError::invalid("edgecolor", format!("unrecognised color '{}'", spec)))?;
        Ok(self)
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Draw a quadrangle bounded by lines of constant longitude and latitude.
pub fn draw_quadrangle(
    axes: &mut dyn Axes,
    bottom_left: &SkyCoord,
    extent: &QuadrangleExtent,
    style: &QuadrangleStyle,
) -> SolarResult<()> {
    let wcs = require_wcs(axes, "draw_quadrangle")?.clone();
    wcs.frame.ensure_same_kind(&bottom_left.frame)?;

    let (lon0, lat0) = (bottom_left.lon, bottom_left.lat);
    let (lon1, lat1) = match extent {
        QuadrangleExtent::WidthHeight { width, height } => {
            if width.radians() <= 0.0 || height.radians() <= 0.0 {
                return Err(SolarError::invalid(
                    "extent",
                    "width and height must be positive",
                ));
            }
            let top_right = bottom_left.offset(*width, *height);
            (top_right.lon, top_right.lat)
        }
        QuadrangleExtent::TopRight(top_right) => {
            bottom_left.frame.ensure_same_kind(&top_right.frame)?;
            if top_right.lon <= lon0 || top_right.lat <= lat0 {
                return Err(SolarError::invalid(
                    "top_right",
                    "must be above and to the right of bottom_left",
                ));
            }
            (top_right.lon, top_right.lat)
        }
    };

    let corners = [(lon0, lat0), (lon1, lat0), (lon1, lat1), (lon0, lat1)];
    let mut points = Vec::with_capacity(4 * QUADRANGLE_EDGE_SAMPLES);
    for (i, &(start_lon, start_lat)) in corners.iter().enumerate() {
        let (end_lon, end_lat) = corners[(i + 1) % corners.len()];
        for k in 0..QUADRANGLE_EDGE_SAMPLES {
            let t = k as f64 / QUADRANGLE_EDGE_SAMPLES as f64;
            let lon = start_lon + (end_lon - start_lon) * t;
            let lat = start_lat + (end_lat - start_lat) * t;
            let (x, y) = wcs.world_to_pixel(lon, lat)?;
            points.push(axes.image_to_canvas(x, y));
        }
    }

    axes.canvas_mut()
        .stroke_polyline(&points, style.edgecolor, style.linewidth, true);
    if let Some(label) = &style.label {
        axes.add_legend_entry(LegendEntry {
            label: label.clone(),
            color: style.edgecolor,
        });
    }

    debug!(
        bottom_left = ?(lon0.degrees(), lat0.degrees()),
        top_right = ?(lon1.degrees(), lat1.degrees()),
        "Drew quadrangle"
    );
    Ok(())
}

/// Which contour levels to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ContourLevels {
    /// Levels in data units
    Absolute(Vec<f32>),
    /// Levels as percentages of the data range
    Percent(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContourStyle {
    pub color: Color,
    pub linewidth: f32,
    /// Chaikin smoothing passes
    pub smoothing: u32,
}

impl Default for ContourStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            linewidth: 1.0,
            smoothing: 0,
        }
    }
}

/// Grid line spacing along each world axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpacing {
    pub lon: Angle,
    pub lat: Angle,
}

impl GridSpacing {
    pub fn uniform(spacing: Angle) -> Self {
        Self {
            lon: spacing,
            lat: spacing,
        }
    }
}

impl Default for GridSpacing {
    fn default() -> Self {
        Self::uniform(Angle::from_degrees(15.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub spacing: GridSpacing,
    /// Label each line where it leaves the bottom/left edge
    pub annotate: bool,
    pub color: Color,
    pub linewidth: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            spacing: GridSpacing::default(),
            annotate: true,
            color: Color::new(255, 255, 255, 160),
            linewidth: 0.5,
        }
    }
}

/// Draw lines of constant longitude and latitude in the axes' own frame.
///
/// Returns the number of lines drawn.
pub fn draw_grid(axes: &mut dyn Axes, options: &GridOptions) -> SolarResult<usize> {
    let wcs = require_wcs(axes, "draw_grid")?.clone();
    let spacing = options.spacing;
    if spacing.lon.radians() <= 0.0 || spacing.lat.radians() <= 0.0 {
        return Err(SolarError::invalid("spacing", "grid spacing must be positive"));
    }

    let ((lon_min, lon_max), (lat_min, lat_max)) = world_bounds(&wcs);
    let lon_values = grid_values(lon_min, lon_max, spacing.lon)?;
    let lat_values = grid_values(lat_min, lat_max, spacing.lat)?;

    let canvas_w = axes.canvas().width() as f32;
    let canvas_h = axes.canvas().height() as f32;
    let mut strokes = Vec::with_capacity(lon_values.len() + lat_values.len());
    let mut labels = Vec::new();

    for &lon in &lon_values {
        let points = sample_line(axes, &wcs, |t| (lon, lat_min + (lat_max - lat_min) * t))?;
        if let Some(&(x, _)) = points.first() {
            labels.push(((x.clamp(0.0, canvas_w), canvas_h - 6.0), lon));
        }
        strokes.push(points);
    }
    for &lat in &lat_values {
        let points = sample_line(axes, &wcs, |t| (lon_min + (lon_max - lon_min) * t, lat))?;
        if let Some(&(_, y)) = points.first() {
            labels.push(((12.0, y.clamp(0.0, canvas_h)), lat));
        }
        strokes.push(points);
    }

    let canvas = axes.canvas_mut();
    for points in &strokes {
        canvas.stroke_polyline(points, options.color, options.linewidth, false);
    }
    if options.annotate {
        for ((x, y), value) in labels {
            canvas.draw_text(x, y, &format!("{:.0}°", value.degrees()), 8.0, options.color);
        }
    }

    debug!(
        lon_lines = lon_values.len(),
        lat_lines = lat_values.len(),
        frame = %wcs.frame_kind(),
        "Drew coordinate grid"
    );
    Ok(strokes.len())
}

/// World extent of the image area, from its four outer corners.
fn world_bounds(wcs: &Wcs) -> ((Angle, Angle), (Angle, Angle)) {
    let (nx, ny) = (wcs.shape.0 as f64, wcs.shape.1 as f64);
    let corners = [
        wcs.pixel_to_world(-0.5, -0.5),
        wcs.pixel_to_world(nx - 0.5, -0.5),
        wcs.pixel_to_world(-0.5, ny - 0.5),
        wcs.pixel_to_world(nx - 0.5, ny - 0.5),
    ];
    let fold = |pick: fn(&(Angle, Angle)) -> Angle| {
        corners.iter().map(pick).fold(
            (Angle::from_radians(f64::INFINITY), Angle::from_radians(f64::NEG_INFINITY)),
            |(lo, hi), v| {
                (
                    if v < lo { v } else { lo },
                    if v > hi { v } else { hi },
                )
            },
        )
    };
    (fold(|c| c.0), fold(|c| c.1))
}

/// Multiples of `spacing` inside [min, max].
fn grid_values(min: Angle, max: Angle, spacing: Angle) -> SolarResult<Vec<Angle>> {
    let step = spacing.radians();
    // Tolerate unit conversion rounding at the edges.
    let first = (min.radians() / step - 1e-9).ceil() as i64;
    let last = (max.radians() / step + 1e-9).floor() as i64;
    let count = (last - first + 1).max(0) as usize;
    if count > MAX_GRID_LINES {
        return Err(SolarError::invalid(
            "spacing",
            format!(
                "{} deg would draw {} lines (limit {})",
                spacing.degrees(),
                count,
                MAX_GRID_LINES
            ),
        ));
    }
    Ok((first..=last)
        .map(|k| Angle::from_radians(k as f64 * step))
        .collect())
}

/// Canvas points along a world-coordinate curve parameterised over [0, 1].
fn sample_line(
    axes: &dyn Axes,
    wcs: &Wcs,
    at: impl Fn(f64) -> (Angle, Angle),
) -> SolarResult<Vec<(f32, f32)>> {
    (0..=GRID_LINE_SAMPLES)
        .map(|k| {
            let (lon, lat) = at(k as f64 / GRID_LINE_SAMPLES as f64);
            let (x, y) = wcs.world_to_pixel(lon, lat)?;
            Ok(axes.image_to_canvas(x, y))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimbStyle {
    pub color: Color,
    pub linewidth: f32,
}

impl Default for LimbStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            linewidth: 1.0,
        }
    }
}

impl GenericMap {
    /// Draw contours of this map's data onto `axes`.
    ///
    /// Contour points are carried from map pixels to world coordinates and
    /// then to axes pixels, so they line up on axes whose WCS differs from
    /// the map's as long as both use the same kind of frame. Masked pixels
    /// break contours. Returns the number of lines drawn.
    pub fn draw_contours(
        &self,
        axes: &mut dyn Axes,
        levels: &ContourLevels,
        style: &ContourStyle,
    ) -> SolarResult<usize> {
        let axes_wcs = require_wcs(axes, "draw_contours")?.clone();
        axes_wcs.frame.ensure_same_kind(&self.wcs().frame)?;

        let levels = match levels {
            ContourLevels::Absolute(values) => values.clone(),
            ContourLevels::Percent(percents) => percent_levels(self.data(), self.mask(), percents),
        };
        if levels.iter().any(|l| !l.is_finite()) {
            return Err(SolarError::invalid("levels", "contour levels must be finite"));
        }

        let data: Vec<f32> = match self.mask() {
            Some(mask) => self
                .data()
                .iter()
                .zip(mask)
                .map(|(&v, &masked)| if masked { f32::NAN } else { v })
                .collect(),
            None => self.data().to_vec(),
        };
        let (width, height) = self.dimensions();
        let lines = contour_lines(&data, width, height, &levels, style.smoothing);

        let mut strokes = Vec::with_capacity(lines.len());
        for line in &lines {
            let points = line
                .points
                .iter()
                .map(|p| {
                    let (lon, lat) = self.wcs().pixel_to_world(p.x as f64, p.y as f64);
                    let (x, y) = axes_wcs.world_to_pixel(lon, lat)?;
                    Ok(axes.image_to_canvas(x, y))
                })
                .collect::<SolarResult<Vec<_>>>()?;
            strokes.push((points, line.closed));
        }

        let canvas = axes.canvas_mut();
        for (points, closed) in &strokes {
            canvas.stroke_polyline(points, style.color, style.linewidth, *closed);
        }
        Ok(strokes.len())
    }

    /// Draw the solar limb as a circle of radius `RSUN_OBS` about disk centre.
    ///
    /// Only helioprojective axes are supported.
    pub fn draw_limb(&self, axes: &mut dyn Axes, style: &LimbStyle) -> SolarResult<()> {
        let axes_wcs = require_wcs(axes, "draw_limb")?.clone();
        if axes_wcs.frame_kind() != FrameKind::Helioprojective {
            return Err(SolarError::IncompatibleFrame {
                expected: FrameKind::Helioprojective.to_string(),
                found: axes_wcs.frame_kind().to_string(),
            });
        }

        let radius = self.rsun_obs();
        let points = (0..LIMB_SAMPLES)
            .map(|k| {
                let theta = std::f64::consts::TAU * k as f64 / LIMB_SAMPLES as f64;
                let (x, y) = axes_wcs.world_to_pixel(radius * theta.cos(), radius * theta.sin())?;
                Ok(axes.image_to_canvas(x, y))
            })
            .collect::<SolarResult<Vec<_>>>()?;

        axes.canvas_mut()
            .stroke_polyline(&points, style.color, style.linewidth, true);
        debug!(radius_arcsec = radius.arcsec(), "Drew limb");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_values_are_multiples() {
        let values = grid_values(
            Angle::from_degrees(-20.0),
            Angle::from_degrees(40.0),
            Angle::from_degrees(15.0),
        )
        .unwrap();
        let degrees: Vec<i64> = values.iter().map(|a| a.degrees().round() as i64).collect();
        assert_eq!(degrees, vec![-15, 0, 15, 30]);
    }

    #[test]
    fn test_grid_values_limit() {
        let result = grid_values(
            Angle::from_degrees(0.0),
            Angle::from_degrees(360.0),
            Angle::from_arcsec(1.0),
        );
        assert!(result.is_err());
    }
}
