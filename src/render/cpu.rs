use std::{collections::HashMap, sync::Arc};

use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::{
        store::{AssetStore, PreparedImage},
        text::{LineAlign, TextBrushRgba8, TextLayoutEngine, layout_height},
    },
    foundation::{
        color::{Fill, GradientStop},
        core::{Color, Rect, Vec2},
        error::{SlideError, SlideResult},
    },
    layout::{
        measure::estimate_line_widths,
        tree::{RenderTree, ShapeKind, TextAlign, TextBlock, VerticalAlign},
    },
    model::design::FontPair,
    render::backend::{FALLBACK_BACKGROUND, FrameRGBA, SlideRenderer},
    theme::resolver::SlideBackground,
};

/// Shadow under text drawn over media backgrounds.
const TEXT_SHADOW: Color = Color::rgba(0, 0, 0, 115);
/// Shadow offset in frame units.
const TEXT_SHADOW_OFFSET: f64 = 2.0;
/// Greeked bars are this fraction of the font size tall.
const GREEK_BAR_EM: f64 = 0.5;

/// How text is painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextRendering {
    /// Shaped glyphs from the loaded fonts.
    #[default]
    Glyphs,
    /// One bar per estimated line. Needs no fonts.
    Greeked,
}

/// CPU renderer settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Pixels per frame unit.
    pub scale: f64,
    /// Text painting mode.
    pub text: TextRendering,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            text: TextRendering::Glyphs,
        }
    }
}

/// Off-screen slide rasterizer built on `vello_cpu`.
///
/// Holds per-thread state (render context, shaping caches); create one per worker.
pub struct CpuSlideRenderer {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    font_cache: HashMap<usize, vello_cpu::peniko::FontData>,
}

impl CpuSlideRenderer {
    /// New renderer with empty caches.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            font_cache: HashMap::new(),
        }
    }

    /// Active settings.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn paint(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        tree: &RenderTree,
        assets: &AssetStore,
        width: u32,
        height: u32,
    ) -> SlideResult<()> {
        let s = self.settings.scale;
        let frame_px = scale_rect(tree.frame.rect(), s);

        match &tree.background {
            SlideBackground::Fill { fill } => match fill {
                Fill::Solid { color } => fill_rect(ctx, frame_px, *color),
                Fill::LinearGradient { angle_deg, stops } => {
                    let img = gradient_image(*angle_deg, stops, width, height);
                    draw_image(ctx, &img, frame_px)?;
                }
                Fill::Unsupported { css } => {
                    tracing::debug!(css = %css, "unsupported background; painting fallback");
                    fill_rect(ctx, frame_px, FALLBACK_BACKGROUND);
                }
            },
            SlideBackground::Media { media } => match assets.background(media) {
                Some(img) => draw_image(ctx, &img.cover(width, height)?, frame_px)?,
                None => fill_rect(ctx, frame_px, FALLBACK_BACKGROUND),
            },
        }
        if let Some(overlay) = tree.overlay {
            fill_rect(ctx, frame_px, overlay);
        }

        for region in &tree.images {
            let Some(img) = assets.image(region) else {
                continue;
            };
            let r = scale_rect(region.region, s).round();
            let (pw, ph) = (r.width() as u32, r.height() as u32);
            if pw == 0 || ph == 0 {
                continue;
            }
            draw_image(ctx, &img.cover(pw, ph)?, r)?;
        }

        for shape in &tree.shapes {
            let r = scale_rect(shape.region, s);
            match shape.kind {
                ShapeKind::Rect => fill_rect(ctx, r, shape.color),
                ShapeKind::Circle => {
                    let circle = vello_cpu::kurbo::Circle::new(
                        (r.center().x, r.center().y),
                        r.width().min(r.height()) / 2.0,
                    );
                    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint(cpu_color(shape.color));
                    ctx.fill_path(&circle.to_path(0.1));
                }
            }
        }

        for block in tree.all_texts() {
            match self.settings.text {
                TextRendering::Glyphs => self.draw_text_glyphs(ctx, block, &tree.fonts, assets)?,
                TextRendering::Greeked => draw_text_greeked(ctx, block, s),
            }
        }

        if let Some(logo) = &tree.logo
            && let Some(img) = assets.logo(logo)
        {
            let r = logo.fit(f64::from(img.width), f64::from(img.height));
            draw_image(ctx, img, scale_rect(r, s))?;
        }
        Ok(())
    }

    fn draw_text_glyphs(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        block: &TextBlock,
        fonts: &FontPair,
        assets: &AssetStore,
    ) -> SlideResult<()> {
        let family = block.font.family(fonts);
        let face = assets
            .fonts()
            .resolve(family)
            .ok_or_else(|| SlideError::asset_load(format!("no font available for '{family}'")))?;

        let s = self.settings.scale;
        let region = scale_rect(block.region, s);
        let brush = TextBrushRgba8 {
            r: block.color.r,
            g: block.color.g,
            b: block.color.b,
            a: block.color.a,
        };
        let align = match block.align {
            TextAlign::Start => LineAlign::Start,
            TextAlign::Center => LineAlign::Center,
            TextAlign::End => LineAlign::End,
        };
        let layout = self.text_engine.layout(
            &block.text,
            &face.bytes,
            (block.size.px() * s) as f32,
            brush,
            region.width() as f32,
            align,
        )?;

        let dy = match block.v_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => {
                ((region.height() - f64::from(layout_height(&layout))) / 2.0).max(0.0)
            }
        };
        let font = self.font_data(&face.bytes);
        let origin = (region.x0, region.y0 + dy);
        if block.shadow {
            let off = TEXT_SHADOW_OFFSET * s;
            glyph_pass(ctx, &layout, &font, (origin.0 + off, origin.1 + off), Some(TEXT_SHADOW));
        }
        glyph_pass(ctx, &layout, &font, origin, None);
        Ok(())
    }

    fn font_data(&mut self, bytes: &Arc<Vec<u8>>) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry(Arc::as_ptr(bytes) as usize)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                    0,
                )
            })
            .clone()
    }
}

impl SlideRenderer for CpuSlideRenderer {
    #[tracing::instrument(skip_all, fields(slide = %tree.slide_id, position = tree.position))]
    fn render_slide(&mut self, tree: &RenderTree, assets: &AssetStore) -> SlideResult<FrameRGBA> {
        let scale = self.settings.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SlideError::validation("render scale must be finite and > 0"));
        }
        let width = (f64::from(tree.frame.width) * scale).round() as u32;
        let height = (f64::from(tree.frame.height) * scale).round() as u32;
        let w16: u16 = width
            .try_into()
            .map_err(|_| SlideError::validation("frame width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| SlideError::validation("frame height exceeds u16"))?;
        if w16 == 0 || h16 == 0 {
            return Err(SlideError::validation("frame must be at least one pixel"));
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let painted = self.paint(&mut ctx, tree, assets, width, height);
        if let Err(e) = painted {
            self.ctx = Some(ctx);
            return Err(e);
        }

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn glyph_pass(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
    origin: (f64, f64),
    color_override: Option<Color>,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            let c = color_override.unwrap_or(Color::rgba(brush.r, brush.g, brush.b, brush.a));
            ctx.set_paint(cpu_color(c));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// Paint each estimated line as a bar, aligned the way the glyphs would be.
fn draw_text_greeked(ctx: &mut vello_cpu::RenderContext, block: &TextBlock, scale: f64) {
    let region = block.region;
    let px = block.size.px();
    let line_h = px * block.size.line_height();
    let widths = estimate_line_widths(&block.text, block.size, region.width());
    let total_h = widths.len() as f64 * line_h;
    let top = match block.v_align {
        VerticalAlign::Top => region.y0,
        VerticalAlign::Middle => region.y0 + ((region.height() - total_h) / 2.0).max(0.0),
    };
    let bar_h = px * GREEK_BAR_EM;

    for (i, &w) in widths.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        let w = w.min(region.width());
        let x0 = match block.align {
            TextAlign::Start => region.x0,
            TextAlign::Center => region.x0 + (region.width() - w) / 2.0,
            TextAlign::End => region.x1 - w,
        };
        let y0 = top + i as f64 * line_h + (line_h - bar_h) / 2.0;
        let bar = Rect::new(x0, y0, x0 + w, y0 + bar_h);
        if block.shadow {
            let shadow = bar + Vec2::new(TEXT_SHADOW_OFFSET, TEXT_SHADOW_OFFSET);
            fill_rect(ctx, scale_rect(shadow, scale), TEXT_SHADOW);
        }
        fill_rect(ctx, scale_rect(bar, scale), block.color);
    }
}

fn scale_rect(r: Rect, s: f64) -> Rect {
    Rect::new(r.x0 * s, r.y0 * s, r.x1 * s, r.y1 * s)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn cpu_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn fill_rect(ctx: &mut vello_cpu::RenderContext, r: Rect, color: Color) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(cpu_color(color));
    ctx.fill_rect(&rect_to_cpu(r));
}

/// Draw `img` stretched over `dst`.
fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    img: &PreparedImage,
    dst: Rect,
) -> SlideResult<()> {
    if img.width == 0 || img.height == 0 {
        return Ok(());
    }
    let pixmap = pixmap_from_premul_bytes(img.rgba8_premul.as_slice(), img.width, img.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    let sx = dst.width() / f64::from(img.width);
    let sy = dst.height() / f64::from(img.height);
    ctx.set_transform(vello_cpu::kurbo::Affine::new([sx, 0.0, 0.0, sy, dst.x0, dst.y0]));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width),
        f64::from(img.height),
    ));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SlideResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SlideError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SlideError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SlideError::validation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

/// Rasterize a CSS linear gradient over a `width`×`height` box.
pub(crate) fn gradient_image(
    angle_deg: f32,
    stops: &[GradientStop],
    width: u32,
    height: u32,
) -> PreparedImage {
    let theta = f64::from(angle_deg).to_radians();
    let (dx, dy) = (theta.sin(), -theta.cos());
    let (w, h) = (f64::from(width), f64::from(height));
    let line_len = (w * dx.abs() + h * dy.abs()).max(f64::EPSILON);
    let (cx, cy) = (w / 2.0, h / 2.0);

    let mut bytes = vec![0u8; (width as usize) * (height as usize) * 4];
    for y in 0..height {
        for x in 0..width {
            let px = f64::from(x) + 0.5 - cx;
            let py = f64::from(y) + 0.5 - cy;
            let t = ((px * dx + py * dy) / line_len + 0.5).clamp(0.0, 1.0);
            let c = Fill::sample(stops, t as f32).premul_array();
            let i = ((y as usize) * (width as usize) + (x as usize)) * 4;
            bytes[i..i + 4].copy_from_slice(&c);
        }
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(bytes),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
