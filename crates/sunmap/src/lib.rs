//! Solar image maps and their plotting layer.
//!
//! A [`GenericMap`] pairs image data with a world coordinate system. It is
//! drawn onto an [`Axes`]: either a [`WcsAxes`], which knows its own WCS and
//! accepts coordinate overlays, or a [`PlainAxes`], which does not.
//!
//! Every plotting entry point validates its request before touching the
//! canvas:
//! - a normalization object cannot be combined with explicit `vmin`/`vmax`
//! - overlays positioned in world coordinates need a [`WcsAxes`]
//! - drawing a map onto axes with a different WCS produces a [`PlotWarning`]

pub mod axes;
pub mod map;
pub mod overlay;
pub mod plot;
pub mod warning;

pub use axes::{Axes, AxesState, LegendEntry, PlainAxes, WcsAxes};
pub use map::{GenericMap, MapDocument, MapMeta, SuperpixelFunc};
pub use overlay::{
    draw_grid, draw_quadrangle, ContourLevels, ContourStyle, GridOptions, GridSpacing, LimbStyle,
    QuadrangleExtent, QuadrangleStyle,
};
pub use plot::{PeekOptions, PlotOptions, RenderedFigure};
pub use warning::{PlotReport, PlotWarning};

pub use renderer::Normalize;
pub use solar_common::{Angle, SkyCoord, SolarError, SolarResult};
pub use wcs::{MapHeader, ToleranceEquivalence, Wcs, WcsEquivalence};
