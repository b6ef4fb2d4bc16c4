//! Equivalence of two world coordinate systems.

use solar_common::AngleUnit;

use crate::wcs::Wcs;

/// Decides whether two WCS descriptors describe the same pixel-to-world mapping.
///
/// Plotting uses this to detect a map being drawn onto axes set up for a
/// different map. Implementations must be symmetric.
pub trait WcsEquivalence {
    fn equivalent(&self, a: &Wcs, b: &Wcs) -> bool;
}

/// Compares every WCS parameter within a relative tolerance.
///
/// Frame kind, axis types, units and image shape must match exactly.
/// Observation time and observer position are not compared.
#[derive(Debug, Clone, Copy)]
pub struct ToleranceEquivalence {
    pub rel_tol: f64,
}

impl Default for ToleranceEquivalence {
    fn default() -> Self {
        Self { rel_tol: 1e-9 }
    }
}

impl ToleranceEquivalence {
    fn close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.rel_tol * a.abs().max(b.abs()).max(1.0)
    }

    /// Compare two world values after bringing them to a common unit.
    fn close_world(&self, a: f64, ua: AngleUnit, b: f64, ub: AngleUnit) -> bool {
        let a = solar_common::Angle::from_unit(a, ua).degrees();
        let b = solar_common::Angle::from_unit(b, ub).degrees();
        self.close(a, b)
    }
}

impl WcsEquivalence for ToleranceEquivalence {
    fn equivalent(&self, a: &Wcs, b: &Wcs) -> bool {
        if a.frame_kind() != b.frame_kind() || a.shape != b.shape {
            return false;
        }
        let same_ctype = a
            .ctype
            .iter()
            .zip(b.ctype.iter())
            .all(|(x, y)| x.eq_ignore_ascii_case(y));
        if !same_ctype {
            return false;
        }

        (0..2).all(|i| {
            self.close(a.crpix[i], b.crpix[i])
                && self.close_world(a.crval[i], a.cunit[i], b.crval[i], b.cunit[i])
                && self.close_world(a.cdelt[i], a.cunit[i], b.cdelt[i], b.cunit[i])
        }) && a
            .pc
            .iter()
            .zip(b.pc.iter())
            .all(|(x, y)| self.close(*x, *y))
    }
}
