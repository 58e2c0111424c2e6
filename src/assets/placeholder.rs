//! Illustrative imagery for slides that ask for a picture.
//!
//! Lookups are keyed by slide id so the same slide always shows the same picture, whichever
//! back-end renders it. The keyword only describes the picture.

use std::{path::PathBuf, sync::Arc};

use crate::{
    assets::{decode::decode_image, store::PreparedImage},
    foundation::{
        core::Color,
        error::{SlideError, SlideResult},
        math::{SplitMix64, fnv1a64_str, premultiply_rgba8_in_place},
    },
};

/// Source of illustrative images.
pub trait PlaceholderImages: Send + Sync {
    /// Image for `slide_id`. Must return the same picture for the same id.
    fn image_for(&self, slide_id: &str, keyword: &str) -> SlideResult<PreparedImage>;
}

/// Procedural placeholder: a soft two-tone gradient with blurred discs, seeded by slide id.
#[derive(Clone, Copy, Debug)]
pub struct SeededPlaceholders {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl Default for SeededPlaceholders {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
        }
    }
}

fn hsl(h: f32, s: f32, l: f32) -> Color {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::rgb(to(r), to(g), to(b))
}

impl PlaceholderImages for SeededPlaceholders {
    fn image_for(&self, slide_id: &str, _keyword: &str) -> SlideResult<PreparedImage> {
        if self.width == 0 || self.height == 0 {
            return Err(SlideError::validation("placeholder size must be > 0"));
        }
        let mut rng = SplitMix64::new(fnv1a64_str(slide_id));
        let hue = rng.next_f32() * 360.0;
        let from = hsl(hue, 0.55, 0.32);
        let to = hsl(hue + 40.0 + rng.next_f32() * 80.0, 0.6, 0.62);

        let discs: Vec<(f32, f32, f32, Color)> = (0..4)
            .map(|i| {
                let cx = rng.next_f32();
                let cy = rng.next_f32();
                let r = 0.15 + rng.next_f32() * 0.3;
                let c = hsl(hue + 90.0 * i as f32, 0.5, 0.55 + rng.next_f32() * 0.2);
                (cx, cy, r, c)
            })
            .collect();

        let (w, h) = (self.width as usize, self.height as usize);
        let mut bytes = vec![0u8; w * h * 4];
        let diag = (w + h).max(1) as f32;
        for y in 0..h {
            for x in 0..w {
                let t = (x + y) as f32 / diag;
                let mut c = from.lerp(to, t);
                let (fx, fy) = (x as f32 / w as f32, y as f32 / h as f32);
                for &(cx, cy, r, dc) in &discs {
                    let d = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
                    if d < r {
                        let k = (1.0 - d / r).powi(2) * 0.45;
                        c = c.lerp(dc, k);
                    }
                }
                let o = (y * w + x) * 4;
                bytes[o..o + 4].copy_from_slice(&[c.r, c.g, c.b, 255]);
            }
        }
        premultiply_rgba8_in_place(&mut bytes);

        Ok(PreparedImage {
            width: self.width,
            height: self.height,
            rgba8_premul: Arc::new(bytes),
        })
    }
}

/// Looks for `<dir>/<slide id>.{jpg,jpeg,png,webp}` and falls back to another source.
pub struct DirectoryPlaceholders {
    dir: PathBuf,
    fallback: Arc<dyn PlaceholderImages>,
}

impl DirectoryPlaceholders {
    /// Images from `dir`, falling back to [`SeededPlaceholders`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_fallback(dir, Arc::new(SeededPlaceholders::default()))
    }

    /// Images from `dir`, falling back to `fallback`.
    pub fn with_fallback(dir: impl Into<PathBuf>, fallback: Arc<dyn PlaceholderImages>) -> Self {
        Self {
            dir: dir.into(),
            fallback,
        }
    }
}

impl PlaceholderImages for DirectoryPlaceholders {
    fn image_for(&self, slide_id: &str, keyword: &str) -> SlideResult<PreparedImage> {
        let safe: String = slide_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        for ext in ["jpg", "jpeg", "png", "webp"] {
            let path = self.dir.join(format!("{safe}.{ext}"));
            if path.is_file() {
                let bytes = std::fs::read(&path).map_err(|e| {
                    SlideError::asset_load(format!("failed to read '{}': {e}", path.display()))
                })?;
                return decode_image(&bytes).map_err(|e| {
                    SlideError::asset_load(format!("'{}': {e}", path.display()))
                });
            }
        }
        self.fallback.image_for(slide_id, keyword)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/placeholder.rs"]
mod tests;
