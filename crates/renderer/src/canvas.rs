//! Raster canvas backing a plot.
//!
//! Canvas pixel coordinates have the origin at the top-left corner with y
//! pointing down, as in tiny-skia. Converting from image coordinates
//! (origin at the bottom-left) is the caller's job.

use solar_common::{SolarError, SolarResult};
use tiny_skia::{
    ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke,
    Transform,
};

use crate::colormap::Color;
use crate::export;

/// An RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Create a transparent canvas.
    pub fn new(width: usize, height: usize) -> SolarResult<Self> {
        let pixmap = Pixmap::new(width as u32, height as u32).ok_or_else(|| {
            SolarError::RenderError(format!("cannot create a {}x{} canvas", width, height))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> usize {
        self.pixmap.width() as usize
    }

    pub fn height(&self) -> usize {
        self.pixmap.height() as usize
    }

    pub fn fill(&mut self, color: Color) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    /// Composite straight-alpha RGBA pixels over the canvas at (0, 0).
    ///
    /// With `origin_lower` the first row of `rgba` lands on the bottom row of
    /// the canvas. Pixels falling outside the canvas are dropped.
    pub fn draw_rgba_image(
        &mut self,
        rgba: &[u8],
        width: usize,
        height: usize,
        origin_lower: bool,
    ) -> SolarResult<()> {
        if rgba.len() != width * height * 4 {
            return Err(SolarError::RenderError(format!(
                "image buffer holds {} bytes, expected {} for {}x{}",
                rgba.len(),
                width * height * 4,
                width,
                height
            )));
        }

        let canvas_w = self.width();
        let canvas_h = self.height();
        let pixels = self.pixmap.pixels_mut();

        for row in 0..height.min(canvas_h) {
            let dst_row = if origin_lower { canvas_h - 1 - row } else { row };
            for col in 0..width.min(canvas_w) {
                let src = &rgba[(row * width + col) * 4..(row * width + col) * 4 + 4];
                if src[3] == 0 {
                    continue;
                }
                let dst = &mut pixels[dst_row * canvas_w + col];
                *dst = blend_over(ColorU8::from_rgba(src[0], src[1], src[2], src[3]), *dst);
            }
        }
        Ok(())
    }

    /// Stroke a polyline through `points` (canvas coordinates).
    ///
    /// Non-finite points split the line into separate runs.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], color: Color, width: f32, closed: bool) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        let mut pb = PathBuilder::new();
        let mut run_len = 0usize;
        let mut runs = 0usize;
        for &(x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                run_len = 0;
                continue;
            }
            if run_len == 0 {
                pb.move_to(x, y);
                runs += 1;
            } else {
                pb.line_to(x, y);
            }
            run_len += 1;
        }
        if closed && runs == 1 && run_len > 2 {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    /// Draw a numeric label centred on (x, y) with seven-segment glyphs.
    ///
    /// Digits, '-', '.' and '°' are supported; other characters leave a gap.
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, size: f32, color: Color) {
        let glyph_w = size * 0.55;
        let advance = glyph_w + size * 0.2;
        let total = advance * text.chars().count() as f32 - size * 0.2;
        let mut left = x - total / 2.0;

        for ch in text.chars() {
            for ((x1, y1), (x2, y2)) in glyph_strokes(ch) {
                let p1 = (left + x1 * glyph_w, y + (y1 - 0.5) * size);
                let p2 = (left + x2 * glyph_w, y + (y2 - 0.5) * size);
                self.stroke_polyline(&[p1, p2], color, (size * 0.12).max(1.0), false);
            }
            left += advance;
        }
    }

    /// Straight-alpha color of the pixel at canvas position (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        let p = self.pixmap.pixel(x as u32, y as u32)?.demultiply();
        Some(Color::new(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Straight-alpha RGBA bytes, row-major from the top row.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Encode the canvas as PNG.
    pub fn to_png(&self) -> SolarResult<Vec<u8>> {
        export::encode_png(&self.to_rgba(), self.width(), self.height())
    }
}

/// Porter-Duff source-over of a straight-alpha source onto a premultiplied pixel.
fn blend_over(src: ColorU8, dst: PremultipliedColorU8) -> PremultipliedColorU8 {
    let src = src.premultiply();
    let inv = 255 - src.alpha() as u32;
    let mix = |s: u8, d: u8| (s as u32 + (d as u32 * inv + 127) / 255).min(255) as u8;
    let a = mix(src.alpha(), dst.alpha());
    let r = mix(src.red(), dst.red()).min(a);
    let g = mix(src.green(), dst.green()).min(a);
    let b = mix(src.blue(), dst.blue()).min(a);
    PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(dst)
}

type GlyphStroke = ((f32, f32), (f32, f32));

/// Strokes of a glyph in a unit box (x right, y down).
fn glyph_strokes(ch: char) -> Vec<GlyphStroke> {
    const A: GlyphStroke = ((0.0, 0.0), (1.0, 0.0));
    const B: GlyphStroke = ((1.0, 0.0), (1.0, 0.5));
    const C: GlyphStroke = ((1.0, 0.5), (1.0, 1.0));
    const D: GlyphStroke = ((0.0, 1.0), (1.0, 1.0));
    const E: GlyphStroke = ((0.0, 0.5), (0.0, 1.0));
    const F: GlyphStroke = ((0.0, 0.0), (0.0, 0.5));
    const G: GlyphStroke = ((0.0, 0.5), (1.0, 0.5));

    match ch {
        '0' => vec![A, B, C, D, E, F],
        '1' => vec![B, C],
        '2' => vec![A, B, G, E, D],
        '3' => vec![A, B, G, C, D],
        '4' => vec![F, G, B, C],
        '5' => vec![A, F, G, C, D],
        '6' => vec![A, F, G, E, C, D],
        '7' => vec![A, B, C],
        '8' => vec![A, B, C, D, E, F, G],
        '9' => vec![A, B, C, D, F, G],
        '-' => vec![G],
        '.' => vec![((0.45, 0.95), (0.55, 0.95))],
        '°' => vec![
            ((0.3, 0.0), (0.6, 0.0)),
            ((0.6, 0.0), (0.6, 0.3)),
            ((0.6, 0.3), (0.3, 0.3)),
            ((0.3, 0.3), (0.3, 0.0)),
        ],
        _ => vec![],
    }
}
