//! Colormaps for solar image data.
//!
//! A colormap is a list of color stops over the unit interval. The built-in
//! maps cover the common instruments; more can be loaded from a JSON
//! configuration:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "colormaps": {
//!     "teal": { "stops": [ {"position": 0.0, "color": "#000000"},
//!                          {"position": 1.0, "color": "#00FFFF"} ] }
//!   }
//! }
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use solar_common::{SolarError, SolarResult};
use std::collections::HashMap;

use crate::normalize::Normalize;

/// Color value in RGBA format (straight alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse "#RRGGBB", "#RRGGBBAA" or a basic color name.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let named = match spec.to_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "red" => Some(Color::new(255, 0, 0, 255)),
            "green" => Some(Color::new(0, 128, 0, 255)),
            "blue" => Some(Color::new(0, 0, 255, 255)),
            "cyan" => Some(Color::new(0, 255, 255, 255)),
            "magenta" => Some(Color::new(255, 0, 255, 255)),
            "yellow" => Some(Color::new(255, 255, 0, 255)),
            "orange" => Some(Color::new(255, 165, 0, 255)),
            "gray" | "grey" => Some(Color::new(128, 128, 128, 255)),
            _ => None,
        };
        if named.is_some() {
            return named;
        }

        let hex = spec.strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }
}

/// Linear color interpolation
pub fn interpolate_color(c1: Color, c2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b), mix(c1.a, c2.a))
}

/// Color stop as written in configuration files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: String,
}

/// A named, sorted list of color stops over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    pub name: String,
    stops: Vec<(f32, Color)>,
    /// Color used for masked and non-finite values
    pub bad: Color,
}

impl Colormap {
    /// Build a colormap from configuration stops.
    pub fn from_stops(name: &str, stops: &[ColorStop]) -> SolarResult<Self> {
        let mut parsed = stops
            .iter()
            .map(|s| {
                let color = Color::parse(&s.color).ok_or_else(|| {
                    SolarError::invalid("colormap", format!("{}: bad color '{}'", name, s.color))
                })?;
                if !(0.0..=1.0).contains(&s.position) {
                    return Err(SolarError::invalid(
                        "colormap",
                        format!("{}: stop position {} outside [0, 1]", name, s.position),
                    ));
                }
                Ok((s.position, color))
            })
            .collect::<SolarResult<Vec<_>>>()?;

        if parsed.len() < 2 {
            return Err(SolarError::invalid(
                "colormap",
                format!("{}: at least two stops are required", name),
            ));
        }
        parsed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(Self {
            name: name.to_string(),
            stops: parsed,
            bad: Color::transparent(),
        })
    }

    fn from_hex(name: &str, stops: &[(f32, &str)]) -> Self {
        let stops = stops
            .iter()
            .map(|(p, hex)| (*p, Color::parse(hex).unwrap_or(Color::BLACK)))
            .collect();
        Self {
            name: name.to_string(),
            stops,
            bad: Color::transparent(),
        }
    }

    /// Look up one of the built-in colormaps.
    pub fn builtin(name: &str) -> Option<Self> {
        let cmap = match name {
            "gray" | "grey" => Self::from_hex(name, &[(0.0, "#000000"), (1.0, "#FFFFFF")]),
            "sdoaia171" => Self::from_hex(
                name,
                &[
                    (0.0, "#000000"),
                    (0.35, "#6B4A0C"),
                    (0.7, "#D9B04A"),
                    (1.0, "#FFFFFF"),
                ],
            ),
            "sdoaia193" => Self::from_hex(
                name,
                &[
                    (0.0, "#000000"),
                    (0.4, "#8A3E14"),
                    (0.75, "#E8A35C"),
                    (1.0, "#FFFFFF"),
                ],
            ),
            "hmimag" => Self::from_hex(
                name,
                &[(0.0, "#000000"), (0.5, "#808080"), (1.0, "#FFFFFF")],
            ),
            "heat" => Self::from_hex(
                name,
                &[
                    (0.0, "#000000"),
                    (0.4, "#B30000"),
                    (0.75, "#FFB300"),
                    (1.0, "#FFFFFF"),
                ],
            ),
            _ => return None,
        };
        Some(cmap)
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["gray", "sdoaia171", "sdoaia193", "hmimag", "heat"]
    }

    /// Color at normalized position `t`; values outside [0, 1] clamp to the ends.
    pub fn sample(&self, t: f32) -> Color {
        if t.is_nan() {
            return self.bad;
        }
        let t = t.clamp(0.0, 1.0);
        let upper = self.stops.iter().position(|(p, _)| *p >= t);
        match upper {
            Some(0) => self.stops[0].1,
            Some(i) => {
                let (p0, c0) = self.stops[i - 1];
                let (p1, c1) = self.stops[i];
                let span = p1 - p0;
                if span <= f32::EPSILON {
                    c1
                } else {
                    interpolate_color(c0, c1, (t - p0) / span)
                }
            }
            None => self.stops[self.stops.len() - 1].1,
        }
    }
}

/// Colormap definitions loaded from JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColormapConfig {
    pub version: String,
    pub colormaps: HashMap<String, ColormapDefinition>,
}

/// A single colormap definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColormapDefinition {
    pub description: Option<String>,
    pub stops: Vec<ColorStop>,
}

impl ColormapConfig {
    pub fn from_json(json_str: &str) -> SolarResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn from_file(path: &std::path::Path) -> SolarResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Resolve a colormap by name, preferring configured maps over built-ins.
    pub fn resolve(&self, name: &str) -> SolarResult<Colormap> {
        match self.colormaps.get(name) {
            Some(def) => Colormap::from_stops(name, &def.stops),
            None => Colormap::builtin(name)
                .ok_or_else(|| SolarError::UnknownColormap(name.to_string())),
        }
    }
}

/// Map data values to RGBA pixels.
///
/// Output rows follow the input row order. Masked and non-finite values get
/// the colormap's `bad` color; `alpha` scales the opacity of everything else.
pub fn apply_colormap(
    data: &[f32],
    mask: Option<&[bool]>,
    width: usize,
    norm: &Normalize,
    cmap: &Colormap,
    alpha: f32,
) -> Vec<u8> {
    let mut pixels = vec![0u8; data.len() * 4];
    if width == 0 {
        return pixels;
    }

    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(row, out)| {
            let start = row * width;
            for (col, px) in out.chunks_exact_mut(4).enumerate() {
                let idx = start + col;
                let value = data[idx];
                let masked = mask.map(|m| m[idx]).unwrap_or(false);
                let color = if masked || !value.is_finite() {
                    cmap.bad
                } else {
                    cmap.sample(norm.apply(value)).with_alpha(alpha)
                };
                px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        });

    pixels
}
