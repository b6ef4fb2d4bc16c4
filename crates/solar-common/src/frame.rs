//! Solar coordinate frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::angle::Angle;
use crate::error::{SolarError, SolarResult};

/// Mean Sun-Earth distance in metres, used when `DSUN_OBS` is absent.
pub const AU_METERS: f64 = 1.495_978_707e11;

/// The kind of a coordinate frame, without its observer or obstime attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameKind {
    /// Observer-centric angular coordinates (Tx, Ty)
    Helioprojective,
    /// Heliographic longitude/latitude fixed to the Sun-Earth line
    HeliographicStonyhurst,
    /// Heliographic longitude/latitude rotating with the Sun
    HeliographicCarrington,
}

impl FrameKind {
    /// Identify the frame from a FITS `CTYPEi` value.
    ///
    /// Accepts the axis prefixes:
    /// - "HPLN" / "HPLT" (helioprojective)
    /// - "HGLN" / "HGLT" (Stonyhurst heliographic)
    /// - "CRLN" / "CRLT" (Carrington heliographic)
    pub fn from_ctype(ctype: &str) -> SolarResult<Self> {
        let prefix: String = ctype.trim().chars().take(4).collect::<String>().to_uppercase();
        match prefix.as_str() {
            "HPLN" | "HPLT" => Ok(FrameKind::Helioprojective),
            "HGLN" | "HGLT" => Ok(FrameKind::HeliographicStonyhurst),
            "CRLN" | "CRLT" => Ok(FrameKind::HeliographicCarrington),
            _ => Err(SolarError::InvalidHeader {
                keyword: "CTYPE".to_string(),
                message: format!("unsupported coordinate type '{}'", ctype),
            }),
        }
    }

    /// Check if this is one of the heliographic (lon/lat on the solar surface) frames.
    pub fn is_heliographic(&self) -> bool {
        matches!(
            self,
            FrameKind::HeliographicStonyhurst | FrameKind::HeliographicCarrington
        )
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameKind::Helioprojective => "helioprojective",
            FrameKind::HeliographicStonyhurst => "heliographic_stonyhurst",
            FrameKind::HeliographicCarrington => "heliographic_carrington",
        };
        write!(f, "{}", name)
    }
}

/// Position of the observer in Stonyhurst heliographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub lon: Angle,
    pub lat: Angle,
    /// Distance from Sun centre in metres
    pub distance: f64,
}

impl Default for Observer {
    fn default() -> Self {
        Self {
            lon: Angle::ZERO,
            lat: Angle::ZERO,
            distance: AU_METERS,
        }
    }
}

/// A coordinate frame together with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoordinateFrame {
    Helioprojective {
        observer: Observer,
        obstime: Option<DateTime<Utc>>,
    },
    HeliographicStonyhurst {
        obstime: Option<DateTime<Utc>>,
    },
    HeliographicCarrington {
        observer: Observer,
        obstime: Option<DateTime<Utc>>,
    },
}

impl CoordinateFrame {
    /// Build a frame of `kind` with the given attributes.
    ///
    /// The Stonyhurst frame has no observer, so `observer` is dropped for it.
    pub fn new(kind: FrameKind, observer: Observer, obstime: Option<DateTime<Utc>>) -> Self {
        match kind {
            FrameKind::Helioprojective => CoordinateFrame::Helioprojective { observer, obstime },
            FrameKind::HeliographicStonyhurst => CoordinateFrame::HeliographicStonyhurst { obstime },
            FrameKind::HeliographicCarrington => {
                CoordinateFrame::HeliographicCarrington { observer, obstime }
            }
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            CoordinateFrame::Helioprojective { .. } => FrameKind::Helioprojective,
            CoordinateFrame::HeliographicStonyhurst { .. } => FrameKind::HeliographicStonyhurst,
            CoordinateFrame::HeliographicCarrington { .. } => FrameKind::HeliographicCarrington,
        }
    }

    pub fn obstime(&self) -> Option<DateTime<Utc>> {
        match self {
            CoordinateFrame::Helioprojective { obstime, .. }
            | CoordinateFrame::HeliographicStonyhurst { obstime }
            | CoordinateFrame::HeliographicCarrington { obstime, .. } => *obstime,
        }
    }

    pub fn observer(&self) -> Option<&Observer> {
        match self {
            CoordinateFrame::Helioprojective { observer, .. }
            | CoordinateFrame::HeliographicCarrington { observer, .. } => Some(observer),
            CoordinateFrame::HeliographicStonyhurst { .. } => None,
        }
    }

    /// Fail unless `other` is the same kind of frame as `self`.
    pub fn ensure_same_kind(&self, other: &CoordinateFrame) -> SolarResult<()> {
        if self.kind() == other.kind() {
            Ok(())
        } else {
            Err(SolarError::IncompatibleFrame {
                expected: self.kind().to_string(),
                found: other.kind().to_string(),
            })
        }
    }
}

impl fmt::Display for CoordinateFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.obstime() {
            Some(t) => write!(f, "{} (obstime={})", self.kind(), t.to_rfc3339()),
            None => write!(f, "{}", self.kind()),
        }
    }
}
