//! Raster rendering for solar image maps.
//!
//! Provides the drawing primitives the plotting layer delegates to:
//! - Canvas (tiny-skia pixmap with image blitting, polylines and labels)
//! - Linear normalization and colormaps
//! - Contour lines (marching squares)
//! - PNG export

pub mod canvas;
pub mod colormap;
pub mod contour;
pub mod export;
pub mod normalize;

pub use canvas::Canvas;
pub use colormap::{apply_colormap, Color, Colormap, ColormapConfig};
pub use normalize::Normalize;
