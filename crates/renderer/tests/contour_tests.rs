//! Tests for contour line generation.

use renderer::contour::{
    connect_segments, contour_lines, finite_range, march_squares, percent_levels, percentile,
    smooth_contour, ContourLine, Point, Segment,
};
use test_utils::{assert_approx_eq, create_disk_grid};

// ============================================================================
// Level generation
// ============================================================================

#[test]
fn test_percent_levels_follow_data_range() {
    let data = vec![10.0, 20.0, 30.0, 110.0];
    let levels = percent_levels(&data, None, &[0.0, 50.0, 100.0]);
    assert_eq!(levels, vec![10.0, 60.0, 110.0]);
}

#[test]
fn test_percent_levels_ignore_masked_values() {
    let data = vec![0.0, 10.0, 1000.0, f32::NAN];
    let mask = vec![false, false, true, false];
    assert_eq!(finite_range(&data, Some(&mask)), Some((0.0, 10.0)));
    let levels = percent_levels(&data, Some(&mask), &[50.0]);
    assert_eq!(levels, vec![5.0]);
}

#[test]
fn test_percent_levels_without_valid_data() {
    let data = vec![f32::NAN; 4];
    assert!(percent_levels(&data, None, &[10.0]).is_empty());
}

#[test]
fn test_percentile_interpolates() {
    let data: Vec<f32> = (0..=10).map(|v| v as f32).collect();
    assert_approx_eq!(percentile(&data, None, 0.0).unwrap(), 0.0, 1e-6);
    assert_approx_eq!(percentile(&data, None, 95.0).unwrap(), 9.5, 1e-5);
    assert_approx_eq!(percentile(&data, None, 100.0).unwrap(), 10.0, 1e-6);
    assert!(percentile(&[], None, 50.0).is_none());
}

// ============================================================================
// Marching squares
// ============================================================================

#[test]
fn test_march_squares_rejects_bad_shapes() {
    assert!(march_squares(&[1.0], 1, 1, 0.5).is_empty());
    assert!(march_squares(&[1.0, 2.0, 3.0], 2, 2, 0.5).is_empty());
}

#[test]
fn test_march_squares_peak() {
    let data = vec![
        0.0, 0.0, 0.0,
        0.0, 10.0, 0.0,
        0.0, 0.0, 0.0,
    ];
    let segments = march_squares(&data, 3, 3, 5.0);
    assert_eq!(segments.len(), 4);
}

#[test]
fn test_march_squares_skips_nan_cells() {
    let data = vec![
        0.0, 10.0,
        f32::NAN, 10.0,
    ];
    assert!(march_squares(&data, 2, 2, 5.0).is_empty());
}

#[test]
fn test_peak_contour_is_closed_loop() {
    let data = vec![
        0.0, 0.0, 0.0,
        0.0, 10.0, 0.0,
        0.0, 0.0, 0.0,
    ];
    let segments = march_squares(&data, 3, 3, 5.0);
    let lines = connect_segments(&segments, 5.0);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].closed);
    assert_eq!(lines[0].level, 5.0);
}

#[test]
fn test_connect_grows_both_ends() {
    let p = |x: f32| Point::new(x, 0.0);
    // Seed in the middle; neighbours on both sides.
    let segments = vec![
        Segment { start: p(1.0), end: p(2.0) },
        Segment { start: p(2.0), end: p(3.0) },
        Segment { start: p(0.0), end: p(1.0) },
    ];
    let lines = connect_segments(&segments, 1.0);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].points.len(), 4);
    assert!(!lines[0].closed);
    assert_eq!(lines[0].points[0], p(0.0));
    assert_eq!(lines[0].points[3], p(3.0));
}

#[test]
fn test_connect_unordered_loop_with_mixed_orientation() {
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];
    // Edges out of order, two of them reversed, one endpoint off by rounding.
    let segments = vec![
        Segment { start: corners[2], end: corners[1] },
        Segment { start: corners[3], end: Point::new(0.0, 0.0001) },
        Segment { start: corners[0], end: corners[1] },
        Segment { start: corners[3], end: corners[2] },
    ];
    let lines = connect_segments(&segments, 1.0);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].points.len(), 5);
    assert!(lines[0].closed);
}

#[test]
fn test_connect_large_contour() {
    let (w, h) = (600, 600);
    let data = create_disk_grid(w, h, 250.0);
    let segments = march_squares(&data, w, h, 500.0);
    assert!(segments.len() > 1000);

    let lines = connect_segments(&segments, 500.0);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].closed);
    assert_eq!(lines[0].points.len(), segments.len() + 1);
}

// ============================================================================
// Smoothing and full pipeline
// ============================================================================

#[test]
fn test_smoothing_keeps_open_endpoints() {
    let line = ContourLine {
        level: 1.0,
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
        closed: false,
    };
    let smoothed = smooth_contour(&line, 2);
    assert!(smoothed.points.len() > line.points.len());
    assert_eq!(smoothed.points[0], line.points[0]);
    assert_eq!(*smoothed.points.last().unwrap(), line.points[2]);
}

#[test]
fn test_disk_contours_one_loop_per_level() {
    let (w, h) = (40, 40);
    let data = create_disk_grid(w, h, 12.0);
    let lines = contour_lines(&data, w, h, &[250.0, 750.0], 1);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.closed));
}
