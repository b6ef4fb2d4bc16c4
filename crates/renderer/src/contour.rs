//! Contour lines over image data using marching squares.
//!
//! Points are in image pixel coordinates: (x, y) is the centre of the pixel
//! at column x, row y, in the row order of the input data.

use std::collections::{HashMap, VecDeque};

/// A point in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A connected contour polyline at one level
#[derive(Debug, Clone)]
pub struct ContourLine {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

const JOIN_EPSILON: f32 = 1e-3;

/// Levels at `percents` of the way from the data minimum to the maximum.
///
/// Masked and non-finite values are ignored. Returns an empty list when
/// there is no valid data.
pub fn percent_levels(data: &[f32], mask: Option<&[bool]>, percents: &[f32]) -> Vec<f32> {
    let Some((min, max)) = finite_range(data, mask) else {
        return vec![];
    };
    percents.iter().map(|p| min + p / 100.0 * (max - min)).collect()
}

/// Minimum and maximum of the unmasked finite values.
pub fn finite_range(data: &[f32], mask: Option<&[bool]>) -> Option<(f32, f32)> {
    data.iter()
        .enumerate()
        .filter(|(i, v)| v.is_finite() && !mask.map(|m| m[*i]).unwrap_or(false))
        .fold(None, |acc, (_, &v)| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Value at percentile `p` (0-100) of the unmasked finite values,
/// with linear interpolation between ranks.
pub fn percentile(data: &[f32], mask: Option<&[bool]>, p: f32) -> Option<f32> {
    let mut valid: Vec<f32> = data
        .iter()
        .enumerate()
        .filter(|(i, v)| v.is_finite() && !mask.map(|m| m[*i]).unwrap_or(false))
        .map(|(_, &v)| v)
        .collect();
    if valid.is_empty() {
        return None;
    }
    valid.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (valid.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f32;
    Some(valid[lo] + (valid[hi] - valid[lo]) * frac)
}

/// Marching squares over a row-major grid for a single level.
///
/// Cells touching a NaN are skipped, so masked regions (set to NaN by the
/// caller) break contours rather than bending them.
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];
            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let case = (tl >= level) as u8
                | ((tr >= level) as u8) << 1
                | ((br >= level) as u8) << 2
                | ((bl >= level) as u8) << 3;
            if case == 0 || case == 15 {
                continue;
            }

            let (fx, fy) = (x as f32, y as f32);
            let top = crossing((fx, fy), (fx + 1.0, fy), tl, tr, level);
            let right = crossing((fx + 1.0, fy), (fx + 1.0, fy + 1.0), tr, br, level);
            let bottom = crossing((fx, fy + 1.0), (fx + 1.0, fy + 1.0), bl, br, level);
            let left = crossing((fx, fy), (fx, fy + 1.0), tl, bl, level);

            let mut push = |start, end| segments.push(Segment { start, end });
            match case {
                1 | 14 => push(left, top),
                2 | 13 => push(top, right),
                3 | 12 => push(left, right),
                4 | 11 => push(right, bottom),
                6 | 9 => push(top, bottom),
                7 | 8 => push(left, bottom),
                5 => {
                    push(left, top);
                    push(right, bottom);
                }
                10 => {
                    push(top, right);
                    push(left, bottom);
                }
                _ => {}
            }
        }
    }
    segments
}

/// Where `level` crosses the edge from `p1` (value `v1`) to `p2` (value `v2`).
fn crossing(p1: (f32, f32), p2: (f32, f32), v1: f32, v2: f32, level: f32) -> Point {
    let t = if (v2 - v1).abs() < 1e-12 {
        0.5
    } else {
        ((level - v1) / (v2 - v1)).clamp(0.0, 1.0)
    };
    Point::new(p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

/// Segment endpoints snapped to a `JOIN_EPSILON` grid.
type EndpointKey = (i64, i64);

fn endpoint_key(p: &Point) -> EndpointKey {
    (
        (p.x / JOIN_EPSILON).round() as i64,
        (p.y / JOIN_EPSILON).round() as i64,
    )
}

/// Join unordered segments into polylines, growing each line at both ends.
///
/// Neighbouring marching-squares cells compute shared crossings from the
/// same corner values, so joined endpoints land on the same key.
pub fn connect_segments(segments: &[Segment], level: f32) -> Vec<ContourLine> {
    let mut by_endpoint: HashMap<EndpointKey, Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        by_endpoint.entry(endpoint_key(&s.start)).or_default().push(i);
        by_endpoint.entry(endpoint_key(&s.end)).or_default().push(i);
    }

    // First unused segment touching `p`, with its far endpoint.
    let next_from = |p: &Point, used: &[bool]| -> Option<(usize, Point)> {
        let key = endpoint_key(p);
        let &i = by_endpoint.get(&key)?.iter().find(|&&i| !used[i])?;
        let s = &segments[i];
        Some(if endpoint_key(&s.start) == key { (i, s.end) } else { (i, s.start) })
    };

    let mut used = vec![false; segments.len()];
    let mut lines = Vec::new();

    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;
        let mut points = VecDeque::from([segments[seed].start, segments[seed].end]);

        loop {
            let (Some(&head), Some(&tail)) = (points.front(), points.back()) else {
                break;
            };
            if let Some((i, p)) = next_from(&tail, &used) {
                used[i] = true;
                points.push_back(p);
            } else if let Some((i, p)) = next_from(&head, &used) {
                used[i] = true;
                points.push_front(p);
            } else {
                break;
            }
        }

        let points: Vec<Point> = points.into_iter().collect();
        let closed = points.len() > 2 && points[0].distance(&points[points.len() - 1]) < JOIN_EPSILON;
        lines.push(ContourLine { level, points, closed });
    }
    lines
}

/// Chaikin corner cutting; open lines keep their endpoints.
pub fn smooth_contour(line: &ContourLine, passes: u32) -> ContourLine {
    if passes == 0 || line.points.len() < 3 {
        return line.clone();
    }

    let mut points = line.points.clone();
    for _ in 0..passes {
        let n = points.len();
        let pairs = if line.closed { n } else { n - 1 };
        let mut next = Vec::with_capacity(pairs * 2 + 2);
        if !line.closed {
            next.push(points[0]);
        }
        for i in 0..pairs {
            let a = points[i];
            let b = points[(i + 1) % n];
            next.push(Point::new(0.75 * a.x + 0.25 * b.x, 0.75 * a.y + 0.25 * b.y));
            next.push(Point::new(0.25 * a.x + 0.75 * b.x, 0.25 * a.y + 0.75 * b.y));
        }
        if !line.closed {
            next.push(points[n - 1]);
        }
        points = next;
    }

    ContourLine {
        level: line.level,
        points,
        closed: line.closed,
    }
}

/// Contour lines for every level in `levels`.
pub fn contour_lines(
    data: &[f32],
    width: usize,
    height: usize,
    levels: &[f32],
    smoothing_passes: u32,
) -> Vec<ContourLine> {
    let lines: Vec<ContourLine> = levels
        .iter()
        .flat_map(|&level| {
            let segments = march_squares(data, width, height, level);
            connect_segments(&segments, level)
        })
        .map(|line| smooth_contour(&line, smoothing_passes))
        .collect();

    tracing::debug!(
        num_levels = levels.len(),
        num_lines = lines.len(),
        total_points = lines.iter().map(|l| l.points.len()).sum::<usize>(),
        "Generated contours"
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_midpoint() {
        let p = crossing((0.0, 0.0), (1.0, 0.0), 0.0, 10.0, 5.0);
        assert!((p.x - 0.5).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_flat_field_has_no_contours() {
        let data = vec![5.0; 9];
        assert!(march_squares(&data, 3, 3, 5.0).is_empty());
    }
}
