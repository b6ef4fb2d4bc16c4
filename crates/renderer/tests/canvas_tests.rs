//! Tests for the raster canvas and PNG export.

use renderer::export::{decode_png, encode_png};
use renderer::{Canvas, Color};

#[test]
fn test_new_canvas_is_transparent() {
    let canvas = Canvas::new(4, 3).unwrap();
    assert_eq!(canvas.width(), 4);
    assert_eq!(canvas.height(), 3);
    assert_eq!(canvas.pixel(0, 0), Some(Color::transparent()));
    assert!(canvas.pixel(4, 0).is_none());
}

#[test]
fn test_image_origin_lower_flips_rows() {
    let mut canvas = Canvas::new(1, 2).unwrap();
    // First row red, second row blue.
    let rgba = [255, 0, 0, 255, 0, 0, 255, 255];
    canvas.draw_rgba_image(&rgba, 1, 2, true).unwrap();
    assert_eq!(canvas.pixel(0, 1), Some(Color::new(255, 0, 0, 255)));
    assert_eq!(canvas.pixel(0, 0), Some(Color::new(0, 0, 255, 255)));
}

#[test]
fn test_image_size_mismatch() {
    let mut canvas = Canvas::new(2, 2).unwrap();
    assert!(canvas.draw_rgba_image(&[0; 12], 2, 2, false).is_err());
}

#[test]
fn test_transparent_pixels_leave_background() {
    let mut canvas = Canvas::new(1, 1).unwrap();
    canvas.fill(Color::WHITE);
    canvas.draw_rgba_image(&[255, 0, 0, 0], 1, 1, false).unwrap();
    assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
}

#[test]
fn test_polyline_marks_pixels() {
    let mut canvas = Canvas::new(20, 20).unwrap();
    canvas.stroke_polyline(&[(0.0, 10.0), (20.0, 10.0)], Color::WHITE, 2.0, false);
    assert!(canvas.pixel(10, 10).unwrap().a > 0);
    assert_eq!(canvas.pixel(10, 2).unwrap().a, 0);
}

#[test]
fn test_polyline_breaks_on_nan() {
    let mut canvas = Canvas::new(20, 20).unwrap();
    canvas.stroke_polyline(
        &[(0.0, 5.0), (4.0, 5.0), (f32::NAN, f32::NAN), (16.0, 5.0), (20.0, 5.0)],
        Color::WHITE,
        1.0,
        false,
    );
    assert!(canvas.pixel(2, 5).unwrap().a > 0);
    assert_eq!(canvas.pixel(10, 5).unwrap().a, 0);
}

#[test]
fn test_text_draws_something() {
    let mut canvas = Canvas::new(40, 20).unwrap();
    canvas.draw_text(20.0, 10.0, "-30°", 10.0, Color::WHITE);
    assert!(canvas.to_rgba().chunks_exact(4).any(|p| p[3] > 0));
}

#[test]
fn test_png_roundtrip_keeps_pixels() {
    let mut canvas = Canvas::new(3, 2).unwrap();
    canvas.fill(Color::new(10, 20, 30, 255));
    let png = canvas.to_png().unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let (rgba, w, h) = decode_png(&png).unwrap();
    assert_eq!((w, h), (3, 2));
    assert_eq!(&rgba[0..4], &[10, 20, 30, 255]);
}

#[test]
fn test_encode_rejects_wrong_buffer() {
    assert!(encode_png(&[0; 7], 1, 2).is_err());
}
