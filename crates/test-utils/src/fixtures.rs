//! Header fixtures for solar maps used across the test suite.
//!
//! Headers are JSON objects of FITS keywords so they can be parsed by
//! `wcs::MapHeader::from_json` without this crate depending on it.

/// Image size shared by the helioprojective fixtures.
pub const FIXTURE_SIZE: usize = 64;

/// An AIA 171-like full-disk header, 64x64 at 38.4 arcsec/pixel.
pub const AIA171_HEADER: &str = r#"{
    "NAXIS1": 64, "NAXIS2": 64,
    "CTYPE1": "HPLN-TAN", "CTYPE2": "HPLT-TAN",
    "CUNIT1": "arcsec", "CUNIT2": "arcsec",
    "CRPIX1": 32.5, "CRPIX2": 32.5,
    "CRVAL1": 0.0, "CRVAL2": 0.0,
    "CDELT1": 38.4, "CDELT2": 38.4,
    "DATE-OBS": "2011-02-15T00:00:00.34",
    "HGLN_OBS": 0.0, "HGLT_OBS": -6.8,
    "DSUN_OBS": 147724815128.0,
    "RSUN_OBS": 975.0,
    "TELESCOP": "SDO/AIA", "INSTRUME": "AIA_3", "WAVELNTH": 171
}"#;

/// An HMI magnetogram-like header: same size as AIA but rotated 180 degrees
/// with a slightly different plate scale.
pub const HMI_HEADER: &str = r#"{
    "NAXIS1": 64, "NAXIS2": 64,
    "CTYPE1": "HPLN-TAN", "CTYPE2": "HPLT-TAN",
    "CUNIT1": "arcsec", "CUNIT2": "arcsec",
    "CRPIX1": 32.5, "CRPIX2": 32.5,
    "CRVAL1": 0.0, "CRVAL2": 0.0,
    "CDELT1": 32.0, "CDELT2": 32.0,
    "CROTA2": 180.0,
    "DATE-OBS": "2011-02-15T00:00:12",
    "RSUN_OBS": 975.0,
    "TELESCOP": "SDO/HMI", "INSTRUME": "HMI_FRONT2"
}"#;

/// A Carrington heliographic phase map header, 72x36 at 5 deg/pixel.
pub const HELIOGRAPHIC_HEADER: &str = r#"{
    "NAXIS1": 72, "NAXIS2": 36,
    "CTYPE1": "CRLN-CAR", "CTYPE2": "CRLT-CAR",
    "CUNIT1": "deg", "CUNIT2": "deg",
    "CRPIX1": 36.5, "CRPIX2": 18.5,
    "CRVAL1": 180.0, "CRVAL2": 0.0,
    "CDELT1": 5.0, "CDELT2": 5.0,
    "DATE-OBS": "2011-02-15T00:00:00",
    "HGLN_OBS": 0.0, "HGLT_OBS": 0.0
}"#;
