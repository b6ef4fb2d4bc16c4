//! Angles and the angular units used by solar header keywords.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{SolarError, SolarResult};

const ARCSEC_PER_DEGREE: f64 = 3600.0;

/// An angle stored in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn from_radians(radians: f64) -> Self {
        Self(radians)
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees.to_radians())
    }

    pub fn from_arcsec(arcsec: f64) -> Self {
        Self::from_degrees(arcsec / ARCSEC_PER_DEGREE)
    }

    /// Build an angle from a value expressed in `unit`.
    pub fn from_unit(value: f64, unit: AngleUnit) -> Self {
        match unit {
            AngleUnit::Degree => Self::from_degrees(value),
            AngleUnit::Arcsec => Self::from_arcsec(value),
        }
    }

    pub fn radians(self) -> f64 {
        self.0
    }

    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }

    pub fn arcsec(self) -> f64 {
        self.degrees() * ARCSEC_PER_DEGREE
    }

    /// Value of this angle in `unit`.
    pub fn to_unit(self, unit: AngleUnit) -> f64 {
        match unit {
            AngleUnit::Degree => self.degrees(),
            AngleUnit::Arcsec => self.arcsec(),
        }
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;
    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} deg", self.degrees())
    }
}

/// Angular unit of a world axis (`CUNITi`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[serde(rename = "deg")]
    Degree,
    Arcsec,
}

impl AngleUnit {
    /// Parse a FITS `CUNITi` value.
    ///
    /// Accepts "deg", "degree", "degrees", "arcsec" and "arcsecs"
    /// in any case, with surrounding whitespace.
    pub fn from_fits(s: &str) -> SolarResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleUnit::Degree),
            "arcsec" | "arcsecs" | "arcsecond" | "arcseconds" => Ok(AngleUnit::Arcsec),
            other => Err(SolarError::InvalidHeader {
                keyword: "CUNIT".to_string(),
                message: format!("unsupported angular unit '{}'", other),
            }),
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleUnit::Degree => write!(f, "deg"),
            AngleUnit::Arcsec => write!(f, "arcsec"),
        }
    }
}
