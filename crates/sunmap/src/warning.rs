//! Non-fatal plotting warnings.

use renderer::Normalize;
use std::fmt;

/// Something surprising about a plot request that did not stop it.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotWarning {
    /// The target axes carry no coordinate system.
    NotWcsAxes,
    /// The map WCS differs from the WCS of the target axes.
    WcsMismatch { map_wcs: String, axes_wcs: String },
}

impl fmt::Display for PlotWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotWarning::NotWcsAxes => write!(
                f,
                "WCSAxes not being used as the axes object for this plot. \
                 Plots may have unexpected behaviour."
            ),
            PlotWarning::WcsMismatch { .. } => write!(
                f,
                "The map world coordinate system (WCS) is different from the axes WCS. \
                 The map data axes may not correctly align with the coordinate axes."
            ),
        }
    }
}

/// What a successful plot call did.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotReport {
    pub warnings: Vec<PlotWarning>,
    /// Normalization used to color the data
    pub norm: Normalize,
    pub colormap: String,
}

impl PlotReport {
    pub(crate) fn new(norm: Normalize, colormap: String) -> Self {
        Self {
            warnings: Vec::new(),
            norm,
            colormap,
        }
    }

    pub fn has_warning(&self, predicate: impl Fn(&PlotWarning) -> bool) -> bool {
        self.warnings.iter().any(predicate)
    }

    /// Number of [`PlotWarning::WcsMismatch`] warnings.
    pub fn mismatch_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, PlotWarning::WcsMismatch { .. }))
            .count()
    }
}
