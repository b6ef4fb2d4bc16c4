//! The solar image map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solar_common::{Angle, CoordinateFrame, SolarError, SolarResult};
use wcs::{MapHeader, Wcs};

/// Solar radius in metres, used to derive the apparent radius when
/// `RSUN_OBS` is missing.
const RSUN_METERS: f64 = 6.957e8;

/// Metadata derived from the header.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMeta {
    pub obstime: Option<DateTime<Utc>>,
    /// Apparent solar radius in arcsec
    pub rsun_obs: Option<f64>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
    pub wavelength: Option<f64>,
    /// Colormap used when plot options name none
    pub default_cmap: String,
}

impl MapMeta {
    fn from_header(header: &MapHeader, wcs: &Wcs) -> Self {
        Self {
            obstime: wcs.frame.obstime(),
            rsun_obs: header.rsun_obs,
            telescope: header.telescop.clone(),
            instrument: header.instrume.clone(),
            wavelength: header.wavelnth,
            default_cmap: default_cmap(header).to_string(),
        }
    }
}

fn default_cmap(header: &MapHeader) -> &'static str {
    let instrument = header.instrume.as_deref().unwrap_or("").to_uppercase();
    let wavelength = header.wavelnth.map(|w| w.round() as i64);
    match (instrument.get(..3), wavelength) {
        (Some("AIA"), Some(171)) => "sdoaia171",
        (Some("AIA"), Some(193)) => "sdoaia193",
        (Some("HMI"), _) => "hmimag",
        _ => "gray",
    }
}

/// How pixels are combined by [`GenericMap::superpixel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuperpixelFunc {
    #[default]
    Sum,
    Mean,
}

/// Serialized form of a map: header keywords plus row-major data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDocument {
    pub header: MapHeader,
    pub data: Vec<f32>,
    #[serde(default)]
    pub mask: Option<Vec<bool>>,
}

/// A 2D solar image with its coordinate system.
///
/// Data is row-major with row 0 at the bottom of the image. A mask entry of
/// `true` excludes the corresponding sample.
#[derive(Debug, Clone)]
pub struct GenericMap {
    data: Vec<f32>,
    mask: Option<Vec<bool>>,
    width: usize,
    height: usize,
    header: MapHeader,
    wcs: Wcs,
    meta: MapMeta,
}

impl GenericMap {
    /// Create a map from data and header keywords.
    ///
    /// NAXIS1/NAXIS2 are filled in from `width`/`height` when absent and must
    /// agree with them when present.
    pub fn new(data: Vec<f32>, width: usize, height: usize, mut header: MapHeader) -> SolarResult<Self> {
        if data.len() != width * height {
            return Err(SolarError::ShapeMismatch(format!(
                "data has {} samples, expected {}x{}",
                data.len(),
                width,
                height
            )));
        }
        match (header.naxis1, header.naxis2) {
            (Some(nx), Some(ny)) if (nx, ny) != (width, height) => {
                return Err(SolarError::ShapeMismatch(format!(
                    "header NAXIS {}x{} does not match data {}x{}",
                    nx, ny, width, height
                )));
            }
            _ => {
                header.naxis1 = Some(width);
                header.naxis2 = Some(height);
            }
        }

        let wcs = Wcs::from_header(&header)?;
        let meta = MapMeta::from_header(&header, &wcs);
        tracing::debug!(wcs = %wcs, "Created map");

        Ok(Self {
            data,
            mask: None,
            width,
            height,
            header,
            wcs,
            meta,
        })
    }

    /// Attach a mask of the same shape as the data.
    pub fn with_mask(mut self, mask: Vec<bool>) -> SolarResult<Self> {
        if mask.len() != self.data.len() {
            return Err(SolarError::ShapeMismatch(format!(
                "mask has {} entries, data has {}",
                mask.len(),
                self.data.len()
            )));
        }
        self.mask = Some(mask);
        Ok(self)
    }

    pub fn from_document(doc: MapDocument) -> SolarResult<Self> {
        let width = doc
            .header
            .naxis1
            .ok_or_else(|| SolarError::MissingHeader("NAXIS1".to_string()))?;
        let height = doc
            .header
            .naxis2
            .ok_or_else(|| SolarError::MissingHeader("NAXIS2".to_string()))?;
        let map = Self::new(doc.data, width, height, doc.header)?;
        match doc.mask {
            Some(mask) => map.with_mask(mask),
            None => Ok(map),
        }
    }

    /// Parse a [`MapDocument`] from JSON and build the map.
    pub fn from_json(json_str: &str) -> SolarResult<Self> {
        let doc: MapDocument = serde_json::from_str(json_str)?;
        Self::from_document(doc)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn mask(&self) -> Option<&[bool]> {
        self.mask.as_deref()
    }

    /// (width, height) in pixels
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn header(&self) -> &MapHeader {
        &self.header
    }

    pub fn wcs(&self) -> &Wcs {
        &self.wcs
    }

    pub fn meta(&self) -> &MapMeta {
        &self.meta
    }

    pub fn coordinate_frame(&self) -> &CoordinateFrame {
        &self.wcs.frame
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.meta.obstime
    }

    pub fn rotation_angle(&self) -> Angle {
        self.wcs.rotation_angle()
    }

    /// Apparent solar radius: `RSUN_OBS` if present, otherwise derived from
    /// the observer distance.
    pub fn rsun_obs(&self) -> Angle {
        match self.meta.rsun_obs {
            Some(arcsec) => Angle::from_arcsec(arcsec),
            None => {
                let distance = self
                    .wcs
                    .frame
                    .observer()
                    .map(|o| o.distance)
                    .unwrap_or(solar_common::frame::AU_METERS);
                Angle::from_radians((RSUN_METERS / distance).asin())
            }
        }
    }

    /// Set the image rotation (`CROTA2`), discarding any PC matrix.
    ///
    /// Only the coordinate system changes; the data is not resampled.
    pub fn set_rotation(&mut self, angle: Angle) -> SolarResult<()> {
        let mut header = self.header.clone();
        header.crota2 = Some(angle.degrees());
        header.pc1_1 = None;
        header.pc1_2 = None;
        header.pc2_1 = None;
        header.pc2_2 = None;

        self.wcs = Wcs::from_header(&header)?;
        self.header = header;
        Ok(())
    }

    /// Bin the image into `dims` = (nx, ny) blocks after skipping `offset` pixels.
    ///
    /// Trailing pixels that do not fill a whole block are dropped. A block is
    /// masked when any of its input pixels is masked.
    pub fn superpixel(
        &self,
        dims: (usize, usize),
        offset: (usize, usize),
        func: SuperpixelFunc,
    ) -> SolarResult<GenericMap> {
        let binned = self.wcs.with_superpixel(dims, offset)?;
        let (out_w, out_h) = binned.shape;

        let block = (dims.0 * dims.1) as f32;
        let mut data = Vec::with_capacity(out_w * out_h);
        let mut mask = self.mask.as_ref().map(|_| Vec::with_capacity(out_w * out_h));

        for by in 0..out_h {
            for bx in 0..out_w {
                let mut sum = 0.0f32;
                let mut masked = false;
                for dy in 0..dims.1 {
                    let row = offset.1 + by * dims.1 + dy;
                    for dx in 0..dims.0 {
                        let idx = row * self.width + offset.0 + bx * dims.0 + dx;
                        sum += self.data[idx];
                        masked |= self.mask.as_ref().map(|m| m[idx]).unwrap_or(false);
                    }
                }
                data.push(match func {
                    SuperpixelFunc::Sum => sum,
                    SuperpixelFunc::Mean => sum / block,
                });
                if let Some(mask) = mask.as_mut() {
                    mask.push(masked);
                }
            }
        }

        let mut header = self.header.clone();
        header.naxis1 = Some(out_w);
        header.naxis2 = Some(out_h);
        header.crpix1 = Some(binned.crpix[0]);
        header.crpix2 = Some(binned.crpix[1]);
        header.cdelt1 = Some(binned.cdelt[0]);
        header.cdelt2 = Some(binned.cdelt[1]);
        if !binned.pc.is_identity(0.0) {
            header.pc1_1 = Some(binned.pc[(0, 0)]);
            header.pc1_2 = Some(binned.pc[(0, 1)]);
            header.pc2_1 = Some(binned.pc[(1, 0)]);
            header.pc2_2 = Some(binned.pc[(1, 1)]);
            header.crota2 = None;
        }

        let map = GenericMap::new(data, out_w, out_h, header)?;
        match mask {
            Some(mask) => map.with_mask(mask),
            None => Ok(map),
        }
    }
}
