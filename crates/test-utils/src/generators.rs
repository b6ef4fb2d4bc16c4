//! Synthetic image generators.
//!
//! All grids are row-major `Vec<f32>` with row 0 first.

/// Creates a grid where each value encodes its position: `col * 1000 + row`.
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a ramp `0, 1, 2, ...` in row-major order.
pub fn create_ramp_grid(width: usize, height: usize) -> Vec<f32> {
    (0..width * height).map(|i| i as f32).collect()
}

/// Creates a bright disk centred in the grid, like a full-disk solar image.
///
/// Values follow `1000 * (1 - (r / radius)^2)` inside `radius` pixels of the
/// centre and are zero outside, so every level in (0, 1000) traces one
/// closed loop.
pub fn create_disk_grid(width: usize, height: usize, radius: f32) -> Vec<f32> {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let r = ((col as f32 - cx).powi(2) + (row as f32 - cy).powi(2)).sqrt();
            let value = if r < radius {
                1000.0 * (1.0 - (r / radius).powi(2))
            } else {
                0.0
            };
            data.push(value);
        }
    }
    data
}

/// A mask that excludes the lower-left quadrant of the image.
pub fn create_quadrant_mask(width: usize, height: usize) -> Vec<bool> {
    let mut mask = vec![false; width * height];
    for row in 0..height / 2 {
        for col in 0..width / 2 {
            mask[row * width + col] = true;
        }
    }
    mask
}
