//! Sky coordinates tagged with a frame.

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::frame::CoordinateFrame;

/// A single position on the sky or solar surface.
///
/// `lon`/`lat` are Tx/Ty for helioprojective frames and heliographic
/// longitude/latitude otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyCoord {
    pub lon: Angle,
    pub lat: Angle,
    pub frame: CoordinateFrame,
}

impl SkyCoord {
    pub fn new(lon: Angle, lat: Angle, frame: CoordinateFrame) -> Self {
        Self { lon, lat, frame }
    }

    pub fn from_arcsec(lon: f64, lat: f64, frame: CoordinateFrame) -> Self {
        Self::new(Angle::from_arcsec(lon), Angle::from_arcsec(lat), frame)
    }

    pub fn from_degrees(lon: f64, lat: f64, frame: CoordinateFrame) -> Self {
        Self::new(Angle::from_degrees(lon), Angle::from_degrees(lat), frame)
    }

    /// A coordinate in the same frame shifted by (`dlon`, `dlat`).
    pub fn offset(&self, dlon: Angle, dlat: Angle) -> Self {
        Self::new(self.lon + dlon, self.lat + dlat, self.frame.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameKind, Observer};

    #[test]
    fn test_offset_keeps_frame() {
        let frame = CoordinateFrame::new(FrameKind::Helioprojective, Observer::default(), None);
        let corner = SkyCoord::from_arcsec(-500.0, -200.0, frame.clone());
        let moved = corner.offset(Angle::from_arcsec(300.0), Angle::from_arcsec(150.0));
        assert!((moved.lon.arcsec() + 200.0).abs() < 1e-9);
        assert!((moved.lat.arcsec() + 50.0).abs() < 1e-9);
        assert_eq!(moved.frame, frame);
    }
}
