//! Linear mapping from data values to the unit interval.

use serde::{Deserialize, Serialize};
use solar_common::{SolarError, SolarResult};

/// Linear normalization between `vmin` and `vmax`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalize {
    pub vmin: f32,
    pub vmax: f32,
    /// Clamp normalized values into [0, 1]
    #[serde(default)]
    pub clip: bool,
}

impl Normalize {
    pub fn new(vmin: f32, vmax: f32) -> SolarResult<Self> {
        if !vmin.is_finite() || !vmax.is_finite() {
            return Err(SolarError::invalid("norm", "vmin and vmax must be finite"));
        }
        if vmin >= vmax {
            return Err(SolarError::invalid(
                "norm",
                format!("vmin ({}) must be less than vmax ({})", vmin, vmax),
            ));
        }
        Ok(Self { vmin, vmax, clip: false })
    }

    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Map `value` onto [0, 1] (or beyond, when not clipping).
    pub fn apply(&self, value: f32) -> f32 {
        let t = (value - self.vmin) / (self.vmax - self.vmin);
        if self.clip {
            t.clamp(0.0, 1.0)
        } else {
            t
        }
    }
}
