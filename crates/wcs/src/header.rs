//! FITS-style header keywords describing a map.

use serde::{Deserialize, Serialize};

/// Header keywords as they appear in a solar FITS file.
///
/// Only the keywords needed for plotting are modelled; unknown keywords are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct MapHeader {
    pub naxis1: Option<usize>,
    pub naxis2: Option<usize>,

    pub ctype1: Option<String>,
    pub ctype2: Option<String>,
    pub cunit1: Option<String>,
    pub cunit2: Option<String>,

    pub crpix1: Option<f64>,
    pub crpix2: Option<f64>,
    pub crval1: Option<f64>,
    pub crval2: Option<f64>,
    pub cdelt1: Option<f64>,
    pub cdelt2: Option<f64>,

    pub pc1_1: Option<f64>,
    pub pc1_2: Option<f64>,
    pub pc2_1: Option<f64>,
    pub pc2_2: Option<f64>,
    /// Rotation of the image in degrees, used when no PC matrix is given
    pub crota2: Option<f64>,

    #[serde(rename = "DATE-OBS", alias = "DATE_OBS")]
    pub date_obs: Option<String>,
    pub hgln_obs: Option<f64>,
    pub hglt_obs: Option<f64>,
    pub dsun_obs: Option<f64>,
    /// Apparent solar radius in arcsec
    pub rsun_obs: Option<f64>,

    pub telescop: Option<String>,
    pub instrume: Option<String>,
    pub wavelnth: Option<f64>,
}

impl MapHeader {
    /// Helioprojective header for an `nx` x `ny` image centred on disk centre.
    ///
    /// `scale` is the plate scale in arcsec per pixel.
    pub fn helioprojective(nx: usize, ny: usize, scale: f64) -> Self {
        Self {
            naxis1: Some(nx),
            naxis2: Some(ny),
            ctype1: Some("HPLN-TAN".to_string()),
            ctype2: Some("HPLT-TAN".to_string()),
            cunit1: Some("arcsec".to_string()),
            cunit2: Some("arcsec".to_string()),
            crpix1: Some((nx as f64 + 1.0) / 2.0),
            crpix2: Some((ny as f64 + 1.0) / 2.0),
            crval1: Some(0.0),
            crval2: Some(0.0),
            cdelt1: Some(scale),
            cdelt2: Some(scale),
            ..Default::default()
        }
    }

    /// Carrington header for a full-Sun `nx` x `ny` longitude/latitude map.
    pub fn carrington(nx: usize, ny: usize) -> Self {
        Self {
            naxis1: Some(nx),
            naxis2: Some(ny),
            ctype1: Some("CRLN-CAR".to_string()),
            ctype2: Some("CRLT-CAR".to_string()),
            cunit1: Some("deg".to_string()),
            cunit2: Some("deg".to_string()),
            crpix1: Some((nx as f64 + 1.0) / 2.0),
            crpix2: Some((ny as f64 + 1.0) / 2.0),
            crval1: Some(180.0),
            crval2: Some(0.0),
            cdelt1: Some(360.0 / nx as f64),
            cdelt2: Some(180.0 / ny as f64),
            ..Default::default()
        }
    }

    /// Parse a header from a JSON object of keyword/value pairs.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}
