//! Tests for colormaps and colormapping of image data.

use renderer::colormap::{apply_colormap, Color, Colormap, ColormapConfig};
use renderer::Normalize;
use solar_common::SolarError;

const CONFIG: &str = r##"{
    "version": "1.0",
    "colormaps": {
        "teal": {
            "description": "black to teal",
            "stops": [
                {"position": 1.0, "color": "#00FFFF"},
                {"position": 0.0, "color": "#000000"}
            ]
        },
        "gray": {
            "stops": [
                {"position": 0.0, "color": "#FF0000"},
                {"position": 1.0, "color": "#FF0000"}
            ]
        }
    }
}"##;

#[test]
fn test_builtins_resolve() {
    for name in Colormap::builtin_names() {
        let cmap = Colormap::builtin(name).unwrap();
        assert_eq!(cmap.sample(0.0), Color::BLACK, "{} should start black", name);
    }
    assert!(Colormap::builtin("viridis-ish").is_none());
}

#[test]
fn test_config_stops_are_sorted() {
    let config = ColormapConfig::from_json(CONFIG).unwrap();
    let teal = config.resolve("teal").unwrap();
    assert_eq!(teal.sample(0.0), Color::BLACK);
    assert_eq!(teal.sample(1.0), Color::new(0, 255, 255, 255));
}

#[test]
fn test_config_overrides_builtin() {
    let config = ColormapConfig::from_json(CONFIG).unwrap();
    let gray = config.resolve("gray").unwrap();
    assert_eq!(gray.sample(0.3), Color::new(255, 0, 0, 255));
    // Falls back to built-ins for names not in the file.
    assert!(config.resolve("heat").is_ok());
}

#[test]
fn test_unknown_colormap() {
    let config = ColormapConfig::from_json(CONFIG).unwrap();
    assert!(matches!(
        config.resolve("nope"),
        Err(SolarError::UnknownColormap(name)) if name == "nope"
    ));
}

#[test]
fn test_invalid_stops_rejected() {
    let json = r##"{"version": "1.0", "colormaps": {
        "one": {"stops": [{"position": 0.0, "color": "#000000"}]},
        "far": {"stops": [{"position": 0.0, "color": "#000000"}, {"position": 2.0, "color": "#FFFFFF"}]},
        "bad": {"stops": [{"position": 0.0, "color": "nope"}, {"position": 1.0, "color": "#FFFFFF"}]}
    }}"##;
    let config = ColormapConfig::from_json(json).unwrap();
    assert!(config.resolve("one").is_err());
    assert!(config.resolve("far").is_err());
    assert!(config.resolve("bad").is_err());
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("colormaps.json");
    std::fs::write(&path, CONFIG).unwrap();
    let config = ColormapConfig::from_file(&path).unwrap();
    assert_eq!(config.colormaps.len(), 2);
}

#[test]
fn test_apply_colormap_masks_and_nans() {
    let gray = Colormap::builtin("gray").unwrap();
    let norm = Normalize::new(0.0, 1.0).unwrap();
    let data = vec![0.0, 1.0, f32::NAN, 0.5];
    let mask = vec![false, false, false, true];

    let pixels = apply_colormap(&data, Some(&mask), 2, &norm, &gray, 1.0);
    assert_eq!(&pixels[0..4], &[0, 0, 0, 255]);
    assert_eq!(&pixels[4..8], &[255, 255, 255, 255]);
    assert_eq!(pixels[11], 0, "NaN must be transparent");
    assert_eq!(pixels[15], 0, "masked must be transparent");
}

#[test]
fn test_apply_colormap_alpha() {
    let gray = Colormap::builtin("gray").unwrap();
    let norm = Normalize::new(0.0, 1.0).unwrap();
    let pixels = apply_colormap(&[1.0], None, 1, &norm, &gray, 0.5);
    assert_eq!(pixels[3], 128);
}
