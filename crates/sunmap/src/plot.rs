//! Plot options, their validation, and drawing a map onto axes.

use renderer::contour::{finite_range, percentile};
use renderer::{apply_colormap, Colormap, ColormapConfig, Normalize};
use serde::{Deserialize, Serialize};
use solar_common::{SolarError, SolarResult};
use tracing::{debug, warn};
use wcs::{ToleranceEquivalence, WcsEquivalence};

use crate::axes::{Axes, WcsAxes};
use crate::map::GenericMap;
use crate::overlay::{draw_grid, GridOptions, LimbStyle};
use crate::warning::{PlotReport, PlotWarning};

/// Options controlling how map data is turned into an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotOptions {
    /// Explicit normalization; excludes `vmin`, `vmax` and `clip_interval`
    pub norm: Option<Normalize>,
    pub vmin: Option<f32>,
    pub vmax: Option<f32>,
    /// Display range as (low, high) percentiles of the valid data
    pub clip_interval: Option<(f32, f32)>,
    pub cmap: Option<String>,
    pub alpha: Option<f32>,
    /// Extra colormaps, consulted before the built-ins
    #[serde(skip)]
    pub colormaps: Option<ColormapConfig>,
}

impl PlotOptions {
    pub fn with_norm(mut self, norm: Normalize) -> Self {
        self.norm = Some(norm);
        self
    }

    pub fn with_vmin(mut self, vmin: f32) -> Self {
        self.vmin = Some(vmin);
        self
    }

    pub fn with_vmax(mut self, vmax: f32) -> Self {
        self.vmax = Some(vmax);
        self
    }

    pub fn with_clip_interval(mut self, low: f32, high: f32) -> Self {
        self.clip_interval = Some((low, high));
        self
    }

    pub fn with_cmap(mut self, cmap: &str) -> Self {
        self.cmap = Some(cmap.to_string());
        self
    }

    /// Reject option combinations that cannot be honoured.
    ///
    /// A normalization object already fixes the display range, so supplying
    /// `vmin` or `vmax` (directly or through `clip_interval`) alongside it is
    /// a conflict. `vmin` is checked before `vmax`.
    pub fn validate(&self) -> SolarResult<()> {
        if self.norm.is_some() {
            if self.vmin.is_some() || self.clip_interval.is_some() {
                return Err(SolarError::NormConflict { bound: "vmin" });
            }
            if self.vmax.is_some() {
                return Err(SolarError::NormConflict { bound: "vmax" });
            }
        }
        // A deserialized norm has not been through Normalize::new.
        if let Some(norm) = &self.norm {
            Normalize::new(norm.vmin, norm.vmax)?;
        }

        if let Some((low, high)) = self.clip_interval {
            if self.vmin.is_some() || self.vmax.is_some() {
                return Err(SolarError::invalid(
                    "clip_interval",
                    "cannot be combined with vmin or vmax",
                ));
            }
            if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) || low >= high {
                return Err(SolarError::invalid(
                    "clip_interval",
                    format!("expected 0 <= low < high <= 100 percent, got ({}, {})", low, high),
                ));
            }
        }

        if let Some(alpha) = self.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(SolarError::invalid("alpha", format!("{} outside [0, 1]", alpha)));
            }
        }
        Ok(())
    }

    fn resolve_colormap(&self, map: &GenericMap) -> SolarResult<Colormap> {
        let name = self.cmap.as_deref().unwrap_or(&map.meta().default_cmap);
        match &self.colormaps {
            Some(config) => config.resolve(name),
            None => Colormap::builtin(name).ok_or_else(|| SolarError::UnknownColormap(name.to_string())),
        }
    }
}

/// Overlays drawn by [`GenericMap::peek`].
#[derive(Debug, Clone, Default)]
pub struct PeekOptions {
    pub draw_grid: Option<GridOptions>,
    pub draw_limb: bool,
}

/// A standalone rendering of a map.
#[derive(Debug, Clone)]
pub struct RenderedFigure {
    pub png: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub report: PlotReport,
}

impl GenericMap {
    /// Axes set up with this map's coordinate system.
    pub fn create_axes(&self) -> SolarResult<WcsAxes> {
        WcsAxes::new(self.wcs().clone())
    }

    /// Draw the map onto `axes`, comparing coordinate systems with the
    /// default tolerance.
    pub fn plot(&self, axes: &mut dyn Axes, options: &PlotOptions) -> SolarResult<PlotReport> {
        self.plot_with(axes, options, &ToleranceEquivalence::default())
    }

    /// Draw the map onto `axes`.
    ///
    /// Options are validated before anything is drawn. If the axes have no
    /// WCS, or one that `equivalence` does not consider equal to the map's,
    /// a warning is logged and reported; the image is still drawn in the
    /// map's own pixel grid.
    pub fn plot_with(
        &self,
        axes: &mut dyn Axes,
        options: &PlotOptions,
        equivalence: &dyn WcsEquivalence,
    ) -> SolarResult<PlotReport> {
        options.validate()?;
        let cmap = options.resolve_colormap(self)?;

        let mut warnings = Vec::new();
        match axes.wcs() {
            None => warnings.push(PlotWarning::NotWcsAxes),
            Some(axes_wcs) if !equivalence.equivalent(axes_wcs, self.wcs()) => {
                warnings.push(PlotWarning::WcsMismatch {
                    map_wcs: self.wcs().to_string(),
                    axes_wcs: axes_wcs.to_string(),
                });
            }
            Some(_) => {}
        }
        for warning in &warnings {
            warn!("{}", warning);
        }

        let norm = self.resolve_norm(options)?;
        let (width, height) = self.dimensions();
        let pixels = apply_colormap(
            self.data(),
            self.mask(),
            width,
            &norm,
            &cmap,
            options.alpha.unwrap_or(1.0),
        );
        axes.canvas_mut().draw_rgba_image(&pixels, width, height, true)?;
        axes.record_image();

        debug!(
            width,
            height,
            vmin = norm.vmin,
            vmax = norm.vmax,
            cmap = %cmap.name,
            images = axes.images_drawn(),
            "Plotted map"
        );

        let mut report = PlotReport::new(norm, cmap.name);
        report.warnings = warnings;
        Ok(report)
    }

    /// Render the map on its own axes, with optional grid and limb.
    pub fn peek(&self, options: &PlotOptions, peek: &PeekOptions) -> SolarResult<RenderedFigure> {
        let mut axes = self.create_axes()?;
        let report = self.plot(&mut axes, options)?;

        if let Some(grid) = &peek.draw_grid {
            draw_grid(&mut axes, grid)?;
        }
        if peek.draw_limb {
            self.draw_limb(&mut axes, &LimbStyle::default())?;
        }

        let png = axes.render_png()?;
        let (width, height) = self.dimensions();
        Ok(RenderedFigure {
            png,
            width,
            height,
            report,
        })
    }

    /// Display range for `options`.
    ///
    /// Precedence: explicit norm, clip interval, vmin/vmax (each missing side
    /// from the data), then the full range of the valid data.
    fn resolve_norm(&self, options: &PlotOptions) -> SolarResult<Normalize> {
        if let Some(norm) = options.norm {
            return Ok(norm);
        }

        let data_range = finite_range(self.data(), self.mask());

        if let Some((low, high)) = options.clip_interval {
            let lo = percentile(self.data(), self.mask(), low);
            let hi = percentile(self.data(), self.mask(), high);
            return match (lo, hi) {
                (Some(lo), Some(hi)) => Ok(widen(lo, hi)),
                _ => Ok(widen(0.0, 1.0)),
            };
        }

        match (options.vmin, options.vmax, data_range) {
            (Some(vmin), Some(vmax), _) => Normalize::new(vmin, vmax),
            (Some(vmin), None, Some((_, hi))) => Normalize::new(vmin, hi.max(vmin + 1.0)),
            (None, Some(vmax), Some((lo, _))) => Normalize::new(lo.min(vmax - 1.0), vmax),
            (Some(vmin), None, None) => Normalize::new(vmin, vmin + 1.0),
            (None, Some(vmax), None) => Normalize::new(vmax - 1.0, vmax),
            (None, None, Some((lo, hi))) => Ok(widen(lo, hi)),
            (None, None, None) => Ok(widen(0.0, 1.0)),
        }
    }
}

/// Normalization over [lo, hi], widened to unit width when the range is empty.
fn widen(lo: f32, hi: f32) -> Normalize {
    let hi = if hi > lo { hi } else { lo + 1.0 };
    Normalize {
        vmin: lo,
        vmax: hi,
        clip: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_norm_is_valid() {
        let norm = Normalize::new(0.0, 1.0).unwrap();
        assert!(PlotOptions::default().with_norm(norm).validate().is_ok());
        assert!(PlotOptions::default().with_vmin(0.0).with_vmax(1.0).validate().is_ok());
        assert!(PlotOptions::default().validate().is_ok());
    }

    #[test]
    fn test_clip_interval_bounds() {
        assert!(PlotOptions::default().with_clip_interval(5.0, 99.0).validate().is_ok());
        assert!(PlotOptions::default().with_clip_interval(50.0, 5.0).validate().is_err());
        assert!(PlotOptions::default().with_clip_interval(-1.0, 5.0).validate().is_err());
        assert!(PlotOptions::default()
            .with_clip_interval(1.0, 99.0)
            .with_vmax(3.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_widen_flat_range() {
        let norm = widen(3.0, 3.0);
        assert_eq!((norm.vmin, norm.vmax), (3.0, 4.0));
    }
}
