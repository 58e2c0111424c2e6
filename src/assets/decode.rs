use std::{io::Cursor, sync::Arc};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    assets::store::PreparedImage,
    foundation::{
        error::{SlideError, SlideResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
};

/// Longest edge of a rasterized SVG logo, in pixels.
const SVG_RASTER_MAX_EDGE: f32 = 1024.0;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> SlideResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> SlideResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Parse and rasterize an SVG so its longest edge is at most 1024 pixels.
pub fn decode_svg(bytes: &[u8]) -> SlideResult<PreparedImage> {
    let tree = parse_svg(bytes)?;
    let size = tree.size();
    let scale = (SVG_RASTER_MAX_EDGE / size.width().max(size.height())).min(4.0);
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SlideError::asset_load(format!("cannot allocate {width}x{height} logo")))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are already premultiplied.
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

/// Whether `bytes` look like SVG markup.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Decoded `data:` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type, lower-cased (`image/png`, `video/mp4`, ...).
    pub mime: String,
    /// Payload bytes.
    pub bytes: Vec<u8>,
}

/// Decode a `data:[<mime>][;base64],<payload>` URL. `None` when `s` is not a data URL.
pub fn decode_data_url(s: &str) -> Option<SlideResult<DataUrl>> {
    let rest = s.trim().strip_prefix("data:")?;
    Some(decode_data_url_body(rest))
}

fn decode_data_url_body(rest: &str) -> SlideResult<DataUrl> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| SlideError::asset_load("data URL has no ',' separator"))?;
    let mut parts = meta.split(';');
    let mime = parts
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("text/plain")
        .to_ascii_lowercase();
    let is_base64 = parts.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| SlideError::asset_load(format!("invalid base64 in data URL: {e}")))?
    } else {
        percent_decode(payload)
    };
    Ok(DataUrl { mime, bytes })
}

fn percent_decode(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(v) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Encode a `data:` URL with a base64 payload.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Encode premultiplied RGBA8 pixels as PNG.
pub fn encode_png(image: &PreparedImage) -> SlideResult<Vec<u8>> {
    let mut straight = image.rgba8_premul.as_ref().clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let buf = image::RgbaImage::from_raw(image.width, image.height, straight)
        .ok_or_else(|| SlideError::export_encoding("pixel buffer does not match dimensions"))?;
    let mut out = Vec::new();
    buf.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| SlideError::export_encoding(format!("png encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
