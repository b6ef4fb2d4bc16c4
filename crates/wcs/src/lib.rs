//! World coordinate systems for solar image maps.
//!
//! Only the linear (affine) part of the FITS WCS standard is implemented:
//! pixel offsets from the reference pixel are rotated by the PC matrix and
//! scaled by CDELT. Comparing two descriptors is delegated to a
//! [`WcsEquivalence`] predicate so callers can inject their own rules.

pub mod equivalence;
pub mod header;
pub mod wcs;

pub use equivalence::{ToleranceEquivalence, WcsEquivalence};
pub use header::MapHeader;
pub use wcs::Wcs;
