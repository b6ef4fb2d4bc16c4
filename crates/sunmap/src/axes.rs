//! Drawing surfaces.
//!
//! Whether a surface can place things by world coordinate is part of the
//! [`Axes`] trait: [`Axes::wcs`] returns the surface's WCS, or `None` for a
//! surface that only knows pixels.

use renderer::{Canvas, Color};
use solar_common::{SolarError, SolarResult};
use wcs::Wcs;

/// An entry in the axes legend, added by labelled overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Canvas and bookkeeping shared by every axes type.
#[derive(Debug, Clone)]
pub struct AxesState {
    canvas: Canvas,
    images: usize,
    legend: Vec<LegendEntry>,
}

impl AxesState {
    pub fn new(width: usize, height: usize) -> SolarResult<Self> {
        Ok(Self {
            canvas: Canvas::new(width, height)?,
            images: 0,
            legend: Vec::new(),
        })
    }
}

/// A rendering target for maps and overlays.
pub trait Axes {
    /// The coordinate system of this surface, if it has one.
    fn wcs(&self) -> Option<&Wcs>;

    fn state(&self) -> &AxesState;

    fn state_mut(&mut self) -> &mut AxesState;

    fn canvas(&self) -> &Canvas {
        &self.state().canvas
    }

    fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.state_mut().canvas
    }

    /// Number of images drawn so far.
    fn images_drawn(&self) -> usize {
        self.state().images
    }

    fn record_image(&mut self) {
        self.state_mut().images += 1;
    }

    fn legend(&self) -> &[LegendEntry] {
        &self.state().legend
    }

    fn add_legend_entry(&mut self, entry: LegendEntry) {
        self.state_mut().legend.push(entry);
    }

    /// Canvas position of the centre of image pixel (x, y).
    ///
    /// Image rows grow upwards, canvas rows grow downwards.
    fn image_to_canvas(&self, x: f64, y: f64) -> (f32, f32) {
        let height = self.canvas().height() as f64;
        ((x + 0.5) as f32, (height - (y + 0.5)) as f32)
    }

    fn render_png(&self) -> SolarResult<Vec<u8>> {
        self.canvas().to_png()
    }
}

/// The WCS of `axes`, or the capability error naming `operation`.
pub fn require_wcs<'a>(axes: &'a dyn Axes, operation: &'static str) -> SolarResult<&'a Wcs> {
    axes.wcs().ok_or(SolarError::NotWcsAxes { operation })
}

/// Axes that know their world coordinate system.
#[derive(Debug, Clone)]
pub struct WcsAxes {
    wcs: Wcs,
    state: AxesState,
}

impl WcsAxes {
    /// Axes sized to the image described by `wcs`.
    pub fn new(wcs: Wcs) -> SolarResult<Self> {
        let (w, h) = wcs.shape;
        Ok(Self {
            state: AxesState::new(w, h)?,
            wcs,
        })
    }
}

impl Axes for WcsAxes {
    fn wcs(&self) -> Option<&Wcs> {
        Some(&self.wcs)
    }

    fn state(&self) -> &AxesState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AxesState {
        &mut self.state
    }
}

/// Pixel-only axes with no coordinate system.
#[derive(Debug, Clone)]
pub struct PlainAxes {
    state: AxesState,
}

impl PlainAxes {
    pub fn new(width: usize, height: usize) -> SolarResult<Self> {
        Ok(Self {
            state: AxesState::new(width, height)?,
        })
    }
}

impl Axes for PlainAxes {
    fn wcs(&self) -> Option<&Wcs> {
        None
    }

    fn state(&self) -> &AxesState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AxesState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wcs::MapHeader;

    #[test]
    fn test_capability() {
        let wcs = Wcs::from_header(&MapHeader::helioprojective(8, 4, 1.0)).unwrap();
        let wcs_axes = WcsAxes::new(wcs).unwrap();
        assert!(require_wcs(&wcs_axes, "test").is_ok());
        assert_eq!(wcs_axes.canvas().width(), 8);
        assert_eq!(wcs_axes.canvas().height(), 4);

        let plain = PlainAxes::new(8, 4).unwrap();
        let err = require_wcs(&plain, "draw_quadrangle").unwrap_err();
        assert!(err.to_string().contains("WCSAxes"));
    }

    #[test]
    fn test_image_to_canvas_flips_rows() {
        let plain = PlainAxes::new(4, 4).unwrap();
        assert_eq!(plain.image_to_canvas(0.0, 0.0), (0.5, 3.5));
        assert_eq!(plain.image_to_canvas(3.0, 3.0), (3.5, 0.5));
    }
}
