//! Map construction, metadata and resampling.

use sunmap::{Angle, GenericMap, MapDocument, MapHeader, SolarError, SuperpixelFunc};
use test_utils::{
    assert_approx_eq, create_quadrant_mask, create_ramp_grid, create_test_grid, AIA171_HEADER,
    FIXTURE_SIZE, HMI_HEADER,
};

fn ramp_map(width: usize, height: usize) -> GenericMap {
    let header = MapHeader::helioprojective(width, height, 1.0);
    GenericMap::new(create_ramp_grid(width, height), width, height, header).unwrap()
}

#[test]
fn test_new_fills_dimensions() {
    let mut header = MapHeader::helioprojective(4, 3, 2.0);
    header.naxis1 = None;
    header.naxis2 = None;

    let map = GenericMap::new(create_test_grid(4, 3), 4, 3, header).unwrap();
    assert_eq!(map.dimensions(), (4, 3));
    assert_eq!(map.header().naxis1, Some(4));
    assert_eq!(map.wcs().shape, (4, 3));
}

#[test]
fn test_shape_mismatch_rejected() {
    let header = MapHeader::helioprojective(4, 4, 1.0);
    let err = GenericMap::new(vec![0.0; 15], 4, 4, header.clone()).unwrap_err();
    assert!(matches!(err, SolarError::ShapeMismatch(_)));

    let err = GenericMap::new(vec![0.0; 20], 5, 4, header).unwrap_err();
    assert!(matches!(err, SolarError::ShapeMismatch(_)));

    let err = ramp_map(4, 4).with_mask(vec![false; 3]).unwrap_err();
    assert!(matches!(err, SolarError::ShapeMismatch(_)));
}

#[test]
fn test_metadata_from_header() {
    let header = MapHeader::from_json(AIA171_HEADER).unwrap();
    let data = vec![0.0; FIXTURE_SIZE * FIXTURE_SIZE];
    let map = GenericMap::new(data, FIXTURE_SIZE, FIXTURE_SIZE, header).unwrap();

    let meta = map.meta();
    assert_eq!(meta.instrument.as_deref(), Some("AIA_3"));
    assert_eq!(meta.default_cmap, "sdoaia171");
    assert!(map.date().is_some());
    assert_approx_eq!(map.rsun_obs().arcsec(), 975.0, 1e-9);
    assert_approx_eq!(map.rotation_angle().degrees(), 0.0, 1e-12);
}

#[test]
fn test_rsun_from_observer_distance() {
    let mut header = MapHeader::helioprojective(4, 4, 1.0);
    header.dsun_obs = Some(1.495978707e11);
    let map = GenericMap::new(vec![0.0; 16], 4, 4, header).unwrap();

    // About 959 arcsec at 1 AU
    assert_approx_eq!(map.rsun_obs().arcsec(), 959.2, 0.5);
}

#[test]
fn test_rotation_from_crota() {
    let header = MapHeader::from_json(HMI_HEADER).unwrap();
    let data = vec![0.0; FIXTURE_SIZE * FIXTURE_SIZE];
    let mut map = GenericMap::new(data, FIXTURE_SIZE, FIXTURE_SIZE, header).unwrap();
    assert_approx_eq!(map.rotation_angle().degrees().abs(), 180.0, 1e-9);

    map.set_rotation(Angle::from_degrees(45.0)).unwrap();
    assert_approx_eq!(map.rotation_angle().degrees(), 45.0, 1e-9);
    assert_approx_eq!(map.header().crota2.unwrap(), 45.0, 1e-9);
}

#[test]
fn test_from_json_document() {
    let json = r#"{
        "header": {
            "NAXIS1": 2, "NAXIS2": 2,
            "CTYPE1": "HPLN-TAN", "CTYPE2": "HPLT-TAN",
            "CDELT1": 2.0, "CDELT2": 2.0
        },
        "data": [1.0, 2.0, 3.0, 4.0],
        "mask": [false, true, false, false]
    }"#;

    let map = GenericMap::from_json(json).unwrap();
    assert_eq!(map.dimensions(), (2, 2));
    assert_eq!(map.data(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(map.mask(), Some(&[false, true, false, false][..]));
}

#[test]
fn test_document_requires_naxis() {
    let doc = MapDocument {
        header: MapHeader::default(),
        data: vec![0.0; 4],
        mask: None,
    };
    let err = GenericMap::from_document(doc).unwrap_err();
    assert!(matches!(err, SolarError::MissingHeader(_)));
}

#[test]
fn test_superpixel_sum() {
    let map = ramp_map(4, 4);
    let binned = map.superpixel((2, 2), (0, 0), SuperpixelFunc::Sum).unwrap();

    assert_eq!(binned.dimensions(), (2, 2));
    assert_eq!(binned.data(), &[10.0, 18.0, 42.0, 50.0]);
    assert_eq!(binned.wcs().cdelt, [2.0, 2.0]);
    assert_approx_eq!(binned.wcs().crpix[0], 1.5, 1e-12);
}

#[test]
fn test_superpixel_keeps_world_centre() {
    let map = ramp_map(4, 4);
    let binned = map.superpixel((2, 2), (0, 0), SuperpixelFunc::Mean).unwrap();
    assert_eq!(binned.data(), &[2.5, 4.5, 10.5, 12.5]);

    // Centre of the image is still disk centre.
    let (lon, lat) = binned.wcs().pixel_to_world(0.5, 0.5);
    assert_approx_eq!(lon.arcsec(), 0.0, 1e-9);
    assert_approx_eq!(lat.arcsec(), 0.0, 1e-9);
}

#[test]
fn test_superpixel_propagates_mask() {
    let map = ramp_map(4, 4).with_mask(create_quadrant_mask(4, 4)).unwrap();
    let binned = map.superpixel((2, 2), (0, 0), SuperpixelFunc::Sum).unwrap();
    assert_eq!(binned.mask(), Some(&[true, false, false, false][..]));
}

#[test]
fn test_superpixel_rejects_bad_dimensions() {
    let map = ramp_map(4, 4);
    assert!(map.superpixel((0, 2), (0, 0), SuperpixelFunc::Sum).is_err());
    assert!(map.superpixel((8, 8), (0, 0), SuperpixelFunc::Sum).is_err());
    assert!(map.superpixel((2, 2), (4, 0), SuperpixelFunc::Sum).is_err());
}

#[test]
fn test_superpixel_of_rotated_map() {
    let mut header = MapHeader::helioprojective(8, 8, 1.0);
    header.crota2 = Some(90.0);
    let map = GenericMap::new(create_ramp_grid(8, 8), 8, 8, header).unwrap();
    let binned = map.superpixel((2, 1), (0, 0), SuperpixelFunc::Sum).unwrap();
    assert_eq!(binned.dimensions(), (4, 8));
    assert!(binned.header().crota2.is_none());
    assert_approx_eq!(binned.rotation_angle().degrees(), 90.0, 1e-9);

    let (lon, lat) = binned.wcs().pixel_to_world(0.0, 0.0);
    assert_approx_eq!(lon.arcsec(), 3.5, 1e-9);
    assert_approx_eq!(lat.arcsec(), -3.0, 1e-9);
    let (lon, lat) = binned.wcs().pixel_to_world(3.0, 7.0);
    assert_approx_eq!(lon.arcsec(), -3.5, 1e-9);
    assert_approx_eq!(lat.arcsec(), 3.0, 1e-9);
}
