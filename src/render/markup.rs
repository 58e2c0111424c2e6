//! Live view: every slide as a standalone SVG document.
//!
//! Text goes into XHTML `foreignObject` blocks so the browser does the shaping, CSS background
//! expressions we cannot parse are handed to the browser unchanged, and videos play. The logo
//! inversion stays a CSS filter here; the raster and PPTX back-ends bake it into pixels.

use std::fmt::Write as _;

use crate::{
    assets::{decode::encode_data_url, decode::encode_png, store::AssetStore},
    foundation::{
        color::{Fill, GradientStop},
        core::{Color, Rect},
        error::{SlideError, SlideResult},
    },
    layout::tree::{
        ImageRegion, LogoRegion, RenderTree, ShapeKind, TextAlign, TextBlock, VerticalAlign,
    },
    model::design::{BackgroundMedia, LogoPlacement},
    theme::resolver::{LogoFilter, SlideBackground},
};

const SHADOW_CSS: &str = "0 2px 8px rgba(0,0,0,0.45)";

/// Escape text for XML content and attribute values.
///
/// Characters XML 1.0 cannot carry at all (C0 controls other than tab and newlines, U+FFFE,
/// U+FFFF) become spaces.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {
                out.push(' ')
            }
            c => out.push(c),
        }
    }
    out
}

/// CSS color: `#RRGGBB` when opaque, `rgba()` otherwise.
pub fn css_color(c: Color) -> String {
    if c.a == 255 {
        c.to_rgb_hex()
    } else {
        format!("rgba({},{},{},{:.3})", c.r, c.g, c.b, f32::from(c.a) / 255.0)
    }
}

fn fmt_err(_: std::fmt::Error) -> SlideError {
    SlideError::validation("failed to format markup")
}

/// Render one slide as an SVG document sized to its frame.
#[tracing::instrument(skip_all, fields(slide = %tree.slide_id))]
pub fn slide_svg(tree: &RenderTree, assets: &AssetStore) -> SlideResult<String> {
    let (w, h) = (tree.frame.width, tree.frame.height);
    let mut out = String::new();
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {w} {h}" width="{w}" height="{h}" data-slide-id="{}">"#,
        escape_xml(&tree.slide_id)
    )
    .map_err(fmt_err)?;

    out.push_str("<defs>");
    out.push_str(
        r#"<filter id="logo-invert"><feColorMatrix type="matrix" values="-1 0 0 0 1 0 -1 0 0 1 0 0 -1 0 1 0 0 0 1 0"/></filter>"#,
    );
    if let SlideBackground::Fill {
        fill: Fill::LinearGradient { angle_deg, stops },
    } = &tree.background
    {
        gradient_def(&mut out, *angle_deg, stops, tree.frame.rect()).map_err(fmt_err)?;
    }
    out.push_str("</defs>");

    background(&mut out, tree, assets)?;
    if let Some(overlay) = tree.overlay {
        write!(
            out,
            r#"<rect class="overlay" x="0" y="0" width="{w}" height="{h}" fill="{}" fill-opacity="{:.3}"/>"#,
            overlay.to_rgb_hex(),
            f32::from(overlay.a) / 255.0
        )
        .map_err(fmt_err)?;
    }

    for region in &tree.images {
        image_panel(&mut out, region, assets)?;
    }

    for shape in &tree.shapes {
        let r = shape.region;
        match shape.kind {
            ShapeKind::Rect => write!(
                out,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                r.x0,
                r.y0,
                r.width(),
                r.height(),
                css_color(shape.color)
            ),
            ShapeKind::Circle => write!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                r.center().x,
                r.center().y,
                r.width().min(r.height()) / 2.0,
                css_color(shape.color)
            ),
        }
        .map_err(fmt_err)?;
    }

    for block in tree.all_texts() {
        text_block(&mut out, block, tree).map_err(fmt_err)?;
    }

    if let Some(logo) = &tree.logo {
        logo_image(&mut out, logo).map_err(fmt_err)?;
    }

    out.push_str("</svg>");
    Ok(out)
}

/// All slides of a deck in one HTML page, one `<section>` per slide.
pub fn deck_html(title: &str, trees: &[RenderTree], assets: &AssetStore) -> SlideResult<String> {
    let mut out = String::new();
    write!(
        out,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>body{{margin:0;background:#0b0b0b}}section{{margin:24px auto;max-width:1280px}}\
         svg{{width:100%;height:auto;display:block}}</style></head><body>\n",
        escape_xml(title)
    )
    .map_err(fmt_err)?;
    for tree in trees {
        write!(out, "<section id=\"slide-{}\">", tree.position + 1).map_err(fmt_err)?;
        out.push_str(&slide_svg(tree, assets)?);
        out.push_str("</section>\n");
    }
    out.push_str("</body></html>\n");
    Ok(out)
}

fn gradient_def(
    out: &mut String,
    angle_deg: f32,
    stops: &[GradientStop],
    frame: Rect,
) -> std::fmt::Result {
    let theta = f64::from(angle_deg).to_radians();
    let (dx, dy) = (theta.sin(), -theta.cos());
    let len = frame.width() * dx.abs() + frame.height() * dy.abs();
    let c = frame.center();
    write!(
        out,
        r#"<linearGradient id="bg-gradient" gradientUnits="userSpaceOnUse" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}">"#,
        c.x - dx * len / 2.0,
        c.y - dy * len / 2.0,
        c.x + dx * len / 2.0,
        c.y + dy * len / 2.0
    )?;
    for stop in stops {
        write!(
            out,
            r#"<stop offset="{:.4}" stop-color="{}" stop-opacity="{:.3}"/>"#,
            stop.offset,
            stop.color.to_rgb_hex(),
            f32::from(stop.color.a) / 255.0
        )?;
    }
    out.push_str("</linearGradient>");
    Ok(())
}

fn background(out: &mut String, tree: &RenderTree, assets: &AssetStore) -> SlideResult<()> {
    let (w, h) = (tree.frame.width, tree.frame.height);
    match &tree.background {
        SlideBackground::Fill { fill } => match fill {
            Fill::Solid { color } => write!(
                out,
                r#"<rect class="background" x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
                css_color(*color)
            )
            .map_err(fmt_err)?,
            Fill::LinearGradient { .. } => write!(
                out,
                r#"<rect class="background" x="0" y="0" width="{w}" height="{h}" fill="url(#bg-gradient)"/>"#
            )
            .map_err(fmt_err)?,
            Fill::Unsupported { css } => write!(
                out,
                r#"<foreignObject class="background" x="0" y="0" width="{w}" height="{h}"><div xmlns="http://www.w3.org/1999/xhtml" style="width:100%;height:100%;background:{}"></div></foreignObject>"#,
                escape_xml(css)
            )
            .map_err(fmt_err)?,
        },
        SlideBackground::Media { media } => match media {
            BackgroundMedia::Image(reference) => {
                let href = match assets.background(media) {
                    Some(img) => encode_data_url("image/png", &encode_png(img)?),
                    None => reference.clone(),
                };
                write!(
                    out,
                    r#"<image class="background" x="0" y="0" width="{w}" height="{h}" preserveAspectRatio="xMidYMid slice" href="{}"/>"#,
                    escape_xml(&href)
                )
                .map_err(fmt_err)?;
            }
            BackgroundMedia::Video(reference) => write!(
                out,
                r#"<foreignObject class="background" x="0" y="0" width="{w}" height="{h}"><video xmlns="http://www.w3.org/1999/xhtml" src="{}" autoplay="autoplay" muted="muted" loop="loop" playsinline="playsinline" style="width:100%;height:100%;object-fit:cover"></video></foreignObject>"#,
                escape_xml(reference)
            )
            .map_err(fmt_err)?,
        },
    }
    Ok(())
}

fn image_panel(out: &mut String, region: &ImageRegion, assets: &AssetStore) -> SlideResult<()> {
    let Some(img) = assets.image(region) else {
        tracing::warn!(slide = %region.slide_id, "illustration missing from live view");
        return Ok(());
    };
    let href = encode_data_url("image/png", &encode_png(img)?);
    let r = region.region;
    write!(
        out,
        r#"<image x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" preserveAspectRatio="xMidYMid slice" href="{}"><title>{}</title></image>"#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
        href,
        escape_xml(&region.keyword)
    )
    .map_err(fmt_err)
}

fn text_block(out: &mut String, block: &TextBlock, tree: &RenderTree) -> std::fmt::Result {
    let r = block.region;
    let family = block.font.family(&tree.fonts);
    let align = match block.align {
        TextAlign::Start => "left",
        TextAlign::Center => "center",
        TextAlign::End => "right",
    };
    let justify = match block.v_align {
        VerticalAlign::Top => "flex-start",
        VerticalAlign::Middle => "center",
    };
    write!(
        out,
        r#"<foreignObject x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"><div xmlns="http://www.w3.org/1999/xhtml" style="display:flex;flex-direction:column;justify-content:{justify};height:100%;margin:0;font-family:'{}',sans-serif;font-size:{}px;line-height:{};color:{};text-align:{align};font-weight:{};font-style:{};white-space:pre-wrap;overflow-wrap:break-word{}">{}</div></foreignObject>"#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
        escape_xml(family),
        block.size.px(),
        block.size.line_height(),
        css_color(block.color),
        if block.bold { 700 } else { 400 },
        if block.italic { "italic" } else { "normal" },
        if block.shadow {
            format!(";text-shadow:{SHADOW_CSS}")
        } else {
            String::new()
        },
        escape_xml(&block.text)
    )
}

fn logo_image(out: &mut String, logo: &LogoRegion) -> std::fmt::Result {
    let b = logo.bounds;
    let anchor = match logo.placement {
        LogoPlacement::TopLeft
        | LogoPlacement::BottomLeft
        | LogoPlacement::None => "xMin",
        LogoPlacement::TopRight
        | LogoPlacement::BottomRight => "xMax",
        LogoPlacement::TopCenter => "xMid",
    };
    let v = match logo.placement {
        LogoPlacement::BottomLeft
        | LogoPlacement::BottomRight => "YMax",
        _ => "YMin",
    };
    let filter = match logo.filter {
        LogoFilter::None => "",
        LogoFilter::Invert => r#" filter="url(#logo-invert)""#,
    };
    write!(
        out,
        r#"<image class="logo" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" preserveAspectRatio="{anchor}{v} meet"{filter} href="{}"/>"#,
        b.x0,
        b.y0,
        b.width(),
        b.height(),
        escape_xml(&logo.source)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/markup.rs"]
mod tests;
