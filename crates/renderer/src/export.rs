//! PNG export for rendered canvases.

use image::{ImageOutputFormat, RgbaImage};
use solar_common::{SolarError, SolarResult};
use std::io::Cursor;
use std::path::Path;

/// Encode straight-alpha RGBA pixels (top row first) as PNG.
pub fn encode_png(rgba: &[u8], width: usize, height: usize) -> SolarResult<Vec<u8>> {
    let img = RgbaImage::from_raw(width as u32, height as u32, rgba.to_vec()).ok_or_else(|| {
        SolarError::RenderError(format!(
            "pixel buffer of {} bytes does not match {}x{}",
            rgba.len(),
            width,
            height
        ))
    })?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png)
        .map_err(|e| SolarError::RenderError(format!("PNG encoding failed: {}", e)))?;

    let bytes = out.into_inner();
    tracing::debug!(width, height, size = bytes.len(), "Encoded PNG");
    Ok(bytes)
}

/// Decode PNG bytes into straight-alpha RGBA pixels and dimensions.
pub fn decode_png(bytes: &[u8]) -> SolarResult<(Vec<u8>, usize, usize)> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| SolarError::RenderError(format!("PNG decoding failed: {}", e)))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Ok((img.into_raw(), w as usize, h as usize))
}

/// Write PNG bytes to `path`.
pub fn save_png(path: &Path, png: &[u8]) -> SolarResult<()> {
    std::fs::write(path, png)?;
    Ok(())
}
