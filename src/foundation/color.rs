//! Parsing of the CSS-like color expressions found in design systems.
//!
//! Supported: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, `rgb()`/`rgba()`, a handful of named
//! colors, and `linear-gradient(<angle>deg | to <side>, <color> [<pos>%], ...)`. Anything else
//! is kept verbatim as [`Fill::Unsupported`] so the live view can still hand it to a CSS engine.

use crate::foundation::core::Color;

/// A background fill expression.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fill {
    /// Flat color.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// CSS-style linear gradient.
    LinearGradient {
        /// CSS angle: 0 points up, 90 points right.
        angle_deg: f32,
        /// Stops with offsets in `[0, 1]`, sorted.
        stops: Vec<GradientStop>,
    },
    /// An expression only a CSS engine understands (radial gradients, `var()`, ...).
    Unsupported {
        /// Original expression.
        css: String,
    },
}

/// One stop of a [`Fill::LinearGradient`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GradientStop {
    /// Offset along the gradient line in `[0, 1]`.
    pub offset: f32,
    /// Stop color.
    pub color: Color,
}

impl Fill {
    /// Parse a background expression. Never fails: unknown syntax becomes `Unsupported`.
    pub fn parse(expr: &str) -> Self {
        let trimmed = expr.trim();
        if let Ok(color) = parse_color(trimmed) {
            return Self::Solid { color };
        }
        if let Some(fill) = parse_linear_gradient(trimmed) {
            return fill;
        }
        Self::Unsupported {
            css: trimmed.to_owned(),
        }
    }

    /// Solid color when the fill is flat, otherwise `None`.
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Self::Solid { color } => Some(*color),
            _ => None,
        }
    }

    /// Sample the fill at `t` in `[0, 1]` along its gradient line.
    pub(crate) fn sample(stops: &[GradientStop], t: f32) -> Color {
        let Some(first) = stops.first() else {
            return Color::BLACK;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = (b.offset - a.offset).max(f32::EPSILON);
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        stops.last().map_or(first.color, |s| s.color)
    }
}

/// Parse a single color expression.
pub fn parse_color(s: &str) -> Result<Color, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
        return parse_rgb_args(args);
    }
    named_color(&lower).ok_or_else(|| format!("unrecognized color \"{s}\""))
}

fn parse_hex(s: &str) -> Result<Color, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }
    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }
    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    match s.len() {
        3 | 4 => {
            let r = hex_nibble(&s[0..1])?;
            let g = hex_nibble(&s[1..2])?;
            let b = hex_nibble(&s[2..3])?;
            let a = if s.len() == 4 {
                hex_nibble(&s[3..4])?
            } else {
                255
            };
            Ok(Color::rgba(r, g, b, a))
        }
        6 | 8 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            let a = if s.len() == 8 {
                hex_byte(&s[6..8])?
            } else {
                255
            };
            Ok(Color::rgba(r, g, b, a))
        }
        _ => Err("hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_args(args: &str) -> Result<Color, String> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("rgb() expects 3 or 4 components, got {}", parts.len()));
    }
    let channel = |p: &str| -> Result<u8, String> {
        if let Some(pct) = p.strip_suffix('%') {
            let v: f32 = pct.parse().map_err(|_| format!("bad channel \"{p}\""))?;
            return Ok((v.clamp(0.0, 100.0) * 2.55).round() as u8);
        }
        let v: f32 = p.parse().map_err(|_| format!("bad channel \"{p}\""))?;
        Ok(v.clamp(0.0, 255.0).round() as u8)
    };
    let alpha = |p: &str| -> Result<u8, String> {
        let v: f32 = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().map(|v| v / 100.0),
            None => p.parse::<f32>(),
        }
        .map_err(|_| format!("bad alpha \"{p}\""))?;
        Ok((v.clamp(0.0, 1.0) * 255.0).round() as u8)
    };

    let a = match parts.get(3) {
        Some(p) => alpha(p)?,
        None => 255,
    };
    Ok(Color::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        a,
    ))
}

fn named_color(s: &str) -> Option<Color> {
    Some(match s {
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        "transparent" => Color::rgba(0, 0, 0, 0),
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "lime" => Color::rgb(0, 255, 0),
        "blue" => Color::rgb(0, 0, 255),
        "navy" => Color::rgb(0, 0, 128),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "silver" => Color::rgb(192, 192, 192),
        "orange" => Color::rgb(255, 165, 0),
        "yellow" => Color::rgb(255, 255, 0),
        "purple" => Color::rgb(128, 0, 128),
        "teal" => Color::rgb(0, 128, 128),
        _ => return None,
    })
}

fn parse_linear_gradient(s: &str) -> Option<Fill> {
    let lower = s.to_ascii_lowercase();
    let args = function_args(&lower, "linear-gradient")?;
    let parts = split_top_level(args);
    let mut iter = parts.iter().map(|p| p.trim()).peekable();

    let mut angle_deg = 180.0;
    if let Some(first) = iter.peek() {
        if let Some(a) = parse_angle(first) {
            angle_deg = a;
            iter.next();
        }
    }

    let mut raw: Vec<(Option<f32>, Color)> = Vec::new();
    for part in iter {
        let (color_src, offset) = match part.rsplit_once(' ') {
            Some((c, pos)) if pos.ends_with('%') => {
                let v: f32 = pos.trim_end_matches('%').parse().ok()?;
                (c.trim(), Some((v / 100.0).clamp(0.0, 1.0)))
            }
            _ => (part, None),
        };
        raw.push((offset, parse_color(color_src).ok()?));
    }
    if raw.len() < 2 {
        return None;
    }

    // Missing positions are spread evenly between their neighbours.
    let last = raw.len() - 1;
    let mut stops = Vec::with_capacity(raw.len());
    for (i, (offset, color)) in raw.iter().enumerate() {
        let fallback = i as f32 / last as f32;
        stops.push(GradientStop {
            offset: offset.unwrap_or(fallback),
            color: *color,
        });
    }
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    Some(Fill::LinearGradient { angle_deg, stops })
}

fn parse_angle(s: &str) -> Option<f32> {
    if let Some(deg) = s.strip_suffix("deg") {
        return deg.trim().parse().ok();
    }
    if let Some(turn) = s.strip_suffix("turn") {
        return turn.trim().parse::<f32>().ok().map(|t| t * 360.0);
    }
    let side = s.strip_prefix("to ")?;
    Some(match side.trim() {
        "top" => 0.0,
        "top right" | "right top" => 45.0,
        "right" => 90.0,
        "bottom right" | "right bottom" => 135.0,
        "bottom" => 180.0,
        "bottom left" | "left bottom" => 225.0,
        "left" => 270.0,
        "top left" | "left top" => 315.0,
        _ => return None,
    })
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
