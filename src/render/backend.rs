use crate::{
    assets::store::AssetStore,
    foundation::{core::Color, error::SlideResult},
    layout::tree::RenderTree,
};

/// Flat color painted where a background cannot be reproduced (gradients in PPTX, videos
/// without a poster frame, unsupported CSS).
pub const FALLBACK_BACKGROUND: Color = Color::rgb(0x11, 0x18, 0x27);

/// A rendered slide as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Drop alpha by compositing over white.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        for px in self.data.chunks_exact(4) {
            let a = u16::from(px[3]);
            for &c in &px[..3] {
                let c = u16::from(c);
                let premul = if self.premultiplied {
                    c
                } else {
                    crate::foundation::math::mul_div255_u16(c, a)
                };
                out.push((premul + (255 - a)).min(255) as u8);
            }
        }
        out
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A renderer that turns a laid-out slide into pixels.
pub trait SlideRenderer {
    /// Paint `tree` using prepared `assets`.
    fn render_slide(&mut self, tree: &RenderTree, assets: &AssetStore) -> SlideResult<FrameRGBA>;
}
