//! Linear world coordinate system descriptor.
//!
//! Pixel coordinates are 0-based with (0, 0) at the centre of the first
//! pixel; `crpix` keeps the 1-based FITS convention. The mapping is
//!
//! ```text
//! world = crval + cdelt * PC * (pixel + 1 - crpix)
//! ```

use nalgebra::{Matrix2, Vector2};
use solar_common::{
    parse_obstime, Angle, AngleUnit, CoordinateFrame, FrameKind, Observer, SkyCoord, SolarError,
    SolarResult,
};
use std::fmt;

use crate::header::MapHeader;

/// A 2D linear world coordinate system attached to an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Wcs {
    /// CTYPE1, CTYPE2
    pub ctype: [String; 2],
    /// Units of the world axes
    pub cunit: [AngleUnit; 2],
    /// 1-based reference pixel
    pub crpix: [f64; 2],
    /// World coordinate of the reference pixel, in `cunit`
    pub crval: [f64; 2],
    /// World increment per pixel, in `cunit`
    pub cdelt: [f64; 2],
    /// Linear transformation (rotation/skew) matrix
    pub pc: Matrix2<f64>,
    /// Frame the world axes live in
    pub frame: CoordinateFrame,
    /// Image dimensions (nx, ny)
    pub shape: (usize, usize),
}

impl Wcs {
    /// Build a WCS from header keywords.
    ///
    /// NAXIS1/NAXIS2 are mandatory. Missing CTYPE defaults to helioprojective,
    /// missing CDELT to 1, CRVAL to 0 and CRPIX to the image centre. An
    /// explicit PC matrix takes precedence over CROTA2.
    pub fn from_header(header: &MapHeader) -> SolarResult<Self> {
        let nx = header
            .naxis1
            .ok_or_else(|| SolarError::MissingHeader("NAXIS1".to_string()))?;
        let ny = header
            .naxis2
            .ok_or_else(|| SolarError::MissingHeader("NAXIS2".to_string()))?;
        if nx == 0 || ny == 0 {
            return Err(SolarError::InvalidHeader {
                keyword: "NAXIS".to_string(),
                message: format!("image dimensions must be non-zero, got {}x{}", nx, ny),
            });
        }

        let ctype1 = header.ctype1.clone().unwrap_or_else(|| {
            tracing::debug!("Missing metadata for CTYPE1, assuming HPLN-TAN");
            "HPLN-TAN".to_string()
        });
        let ctype2 = header.ctype2.clone().unwrap_or_else(|| {
            tracing::debug!("Missing metadata for CTYPE2, assuming HPLT-TAN");
            "HPLT-TAN".to_string()
        });

        let kind = FrameKind::from_ctype(&ctype1)?;
        let kind2 = FrameKind::from_ctype(&ctype2)?;
        if kind != kind2 {
            return Err(SolarError::InvalidHeader {
                keyword: "CTYPE2".to_string(),
                message: format!("'{}' does not pair with '{}'", ctype2, ctype1),
            });
        }

        let default_unit = if kind.is_heliographic() {
            AngleUnit::Degree
        } else {
            AngleUnit::Arcsec
        };
        let cunit = [
            parse_unit(header.cunit1.as_deref(), default_unit)?,
            parse_unit(header.cunit2.as_deref(), default_unit)?,
        ];

        let cdelt = [header.cdelt1.unwrap_or(1.0), header.cdelt2.unwrap_or(1.0)];
        if cdelt[0] == 0.0 || cdelt[1] == 0.0 {
            return Err(SolarError::InvalidHeader {
                keyword: "CDELT".to_string(),
                message: "pixel scale must be non-zero".to_string(),
            });
        }

        let pc = match (header.pc1_1, header.pc1_2, header.pc2_1, header.pc2_2) {
            (None, None, None, None) => header
                .crota2
                .map(|crota| rotation_matrix(crota, cdelt))
                .unwrap_or_else(Matrix2::identity),
            (p11, p12, p21, p22) => Matrix2::new(
                p11.unwrap_or(1.0),
                p12.unwrap_or(0.0),
                p21.unwrap_or(0.0),
                p22.unwrap_or(1.0),
            ),
        };

        let obstime = header.date_obs.as_deref().map(parse_obstime).transpose()?;
        let observer = Observer {
            lon: Angle::from_degrees(header.hgln_obs.unwrap_or(0.0)),
            lat: Angle::from_degrees(header.hglt_obs.unwrap_or(0.0)),
            distance: header.dsun_obs.unwrap_or(solar_common::frame::AU_METERS),
        };
        if kind != FrameKind::HeliographicStonyhurst && header.dsun_obs.is_none() {
            tracing::debug!("Missing metadata for observer, assuming Earth-based observer");
        }

        let wcs = Self {
            ctype: [ctype1, ctype2],
            cunit,
            crpix: [
                header.crpix1.unwrap_or((nx as f64 + 1.0) / 2.0),
                header.crpix2.unwrap_or((ny as f64 + 1.0) / 2.0),
            ],
            crval: [header.crval1.unwrap_or(0.0), header.crval2.unwrap_or(0.0)],
            cdelt,
            pc,
            frame: CoordinateFrame::new(kind, observer, obstime),
            shape: (nx, ny),
        };
        wcs.inverse_pc()?;
        Ok(wcs)
    }

    pub fn frame_kind(&self) -> FrameKind {
        self.frame.kind()
    }

    /// Rotation of the world axes relative to the pixel axes.
    pub fn rotation_angle(&self) -> Angle {
        let lam = self.cdelt[1] / self.cdelt[0];
        Angle::from_radians((lam * self.pc[(1, 0)]).atan2(self.pc[(0, 0)]))
    }

    /// Replace the PC matrix with a rotation of `angle`, as CROTA2 would.
    pub fn set_rotation(&mut self, angle: Angle) {
        self.pc = rotation_matrix(angle.degrees(), self.cdelt);
    }

    /// Convert a 0-based pixel position to world coordinates.
    pub fn pixel_to_world(&self, x: f64, y: f64) -> (Angle, Angle) {
        let offset = Vector2::new(x + 1.0 - self.crpix[0], y + 1.0 - self.crpix[1]);
        let rotated = self.pc * offset;
        let lon = self.crval[0] + self.cdelt[0] * rotated.x;
        let lat = self.crval[1] + self.cdelt[1] * rotated.y;
        (
            Angle::from_unit(lon, self.cunit[0]),
            Angle::from_unit(lat, self.cunit[1]),
        )
    }

    /// Convert world coordinates to a 0-based pixel position.
    pub fn world_to_pixel(&self, lon: Angle, lat: Angle) -> SolarResult<(f64, f64)> {
        let inv = self.inverse_pc()?;
        let scaled = Vector2::new(
            (lon.to_unit(self.cunit[0]) - self.crval[0]) / self.cdelt[0],
            (lat.to_unit(self.cunit[1]) - self.crval[1]) / self.cdelt[1],
        );
        let offset = inv * scaled;
        Ok((
            offset.x + self.crpix[0] - 1.0,
            offset.y + self.crpix[1] - 1.0,
        ))
    }

    /// Pixel position of a sky coordinate.
    ///
    /// No frame transformation is attempted: the coordinate must already be
    /// expressed in a frame of the same kind as this WCS.
    pub fn world_to_pixel_coord(&self, coord: &SkyCoord) -> SolarResult<(f64, f64)> {
        self.frame.ensure_same_kind(&coord.frame)?;
        self.world_to_pixel(coord.lon, coord.lat)
    }

    /// WCS of an image binned in `dims` blocks after skipping `offset` pixels.
    ///
    /// Binning scales pixel axis j, i.e. column j of `cdelt * PC`. CDELT
    /// takes the scaling of its own axis and the PC matrix becomes
    /// `D^-1 * PC * D` with `D = diag(dims)`, which leaves diagonal matrices
    /// and square blocks unchanged.
    pub fn with_superpixel(
        &self,
        dims: (usize, usize),
        offset: (usize, usize),
    ) -> SolarResult<Self> {
        if dims.0 == 0 || dims.1 == 0 {
            return Err(SolarError::invalid("dimensions", "superpixel size must be positive"));
        }
        if offset.0 >= self.shape.0 || offset.1 >= self.shape.1 {
            return Err(SolarError::invalid(
                "offset",
                format!("offset {:?} outside {}x{} image", offset, self.shape.0, self.shape.1),
            ));
        }
        let shape = (
            (self.shape.0 - offset.0) / dims.0,
            (self.shape.1 - offset.1) / dims.1,
        );
        if shape.0 == 0 || shape.1 == 0 {
            return Err(SolarError::invalid(
                "dimensions",
                format!("superpixel {:?} larger than the image after offset", dims),
            ));
        }

        let (bx, by) = (dims.0 as f64, dims.1 as f64);
        let rebin = |crpix: f64, block: f64, skip: usize| {
            (crpix - 1.0 - skip as f64 - (block - 1.0) / 2.0) / block + 1.0
        };
        let scale = Matrix2::new(bx, 0.0, 0.0, by);
        let unscale = Matrix2::new(1.0 / bx, 0.0, 0.0, 1.0 / by);

        let mut wcs = self.clone();
        wcs.crpix = [
            rebin(self.crpix[0], bx, offset.0),
            rebin(self.crpix[1], by, offset.1),
        ];
        wcs.cdelt = [self.cdelt[0] * bx, self.cdelt[1] * by];
        wcs.pc = unscale * self.pc * scale;
        wcs.shape = shape;
        Ok(wcs)
    }

    fn inverse_pc(&self) -> SolarResult<Matrix2<f64>> {
        self.pc.try_inverse().ok_or_else(|| {
            SolarError::ProjectionError("PC matrix is singular".to_string())
        })
    }
}

impl fmt::Display for Wcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}x{} crpix=({:.3}, {:.3}) crval=({:.3}, {:.3}) cdelt=({:.4}, {:.4}) rot={:.3} deg",
            self.ctype[0],
            self.ctype[1],
            self.shape.0,
            self.shape.1,
            self.crpix[0],
            self.crpix[1],
            self.crval[0],
            self.crval[1],
            self.cdelt[0],
            self.cdelt[1],
            self.rotation_angle().degrees(),
        )
    }
}

fn parse_unit(value: Option<&str>, default: AngleUnit) -> SolarResult<AngleUnit> {
    match value {
        Some(s) if !s.trim().is_empty() => AngleUnit::from_fits(s),
        _ => Ok(default),
    }
}

/// PC matrix equivalent to a CROTA2 rotation, corrected for the pixel
/// aspect ratio `lam = cdelt2 / cdelt1`.
fn rotation_matrix(degrees: f64, cdelt: [f64; 2]) -> Matrix2<f64> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let lam = cdelt[1] / cdelt[0];
    Matrix2::new(cos, -lam * sin, sin / lam, cos)
}
