use chrono::NaiveDate;

use crate::{
    assets::{decode::encode_png, store::AssetStore},
    encode::pptx::{
        BackgroundFill, EmuRect, Geometry, ParagraphAlign, PictureObject, PptxDocument,
        ShapeObject, NativeSlide, SlideObject, TextAnchor, TextObject, ThemeSpec,
    },
    foundation::{
        color::{Fill, parse_color},
        core::{Color, Rect},
        error::{SlideError, SlideResult},
    },
    layout::{
        engine::layout_deck,
        tree::{RenderTree, ShapeKind, ShapeRole, TextAlign, TextBlock, VerticalAlign},
    },
    model::{
        deck::PresentationData,
        design::{BackgroundMedia, DesignSystem},
    },
    render::backend::FALLBACK_BACKGROUND,
    theme::resolver::SlideBackground,
};

use super::{ensure_slides, export_context};

/// Hundredths of a point per frame unit (one unit is half a point).
const FONT_HUNDREDTHS_PER_UNIT: f64 = 50.0;

/// Options for [`export_native`].
#[derive(Clone, Debug, Default)]
pub struct NativeOpts {
    /// Pin the title-slide date.
    pub today: Option<NaiveDate>,
}

/// A finished native export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeDocument {
    /// PPTX bytes.
    pub bytes: Vec<u8>,
    /// Slide count.
    pub slides: usize,
}

/// Package theme from the design palette; unparseable entries keep the stock colors.
pub fn theme_spec(design: &DesignSystem) -> ThemeSpec {
    let base = ThemeSpec::default();
    let pick = |expr: &str, fallback: Color| parse_color(expr).unwrap_or(fallback);
    ThemeSpec {
        name: if design.name.trim().is_empty() {
            base.name.clone()
        } else {
            design.name.clone()
        },
        text: pick(&design.colors.text, base.text),
        background: pick(&design.colors.background, base.background),
        primary: pick(&design.colors.primary, base.primary),
        secondary: pick(&design.colors.secondary, base.secondary),
        accent: pick(&design.colors.accent, base.accent),
        heading_font: design.fonts.heading.clone(),
        body_font: design.fonts.body.clone(),
    }
}

/// Translate laid-out slides into PPTX objects.
///
/// Gradients, unsupported background expressions and video backgrounds become the flat
/// fallback color; the logo bitmap already carries its inversion.
pub fn build_document(
    title: &str,
    theme: ThemeSpec,
    trees: &[RenderTree],
    assets: &AssetStore,
) -> SlideResult<PptxDocument> {
    let mut doc = PptxDocument::new(title, theme);
    for tree in trees {
        let slide = native_slide(&mut doc, tree, assets)?;
        doc.push_slide(slide)?;
    }
    Ok(doc)
}

/// Lay the deck out and write it as an editable PPTX.
#[tracing::instrument(skip_all, fields(slides = deck.len()))]
pub fn export_native(
    design: &DesignSystem,
    deck: &PresentationData,
    assets: &AssetStore,
    opts: &NativeOpts,
) -> SlideResult<NativeDocument> {
    ensure_slides(deck)?;
    let ctx = export_context(design, opts.today);
    let trees = layout_deck(design, deck, &ctx);

    let doc = build_document(&design.name, theme_spec(design), &trees, assets)
        .map_err(SlideError::into_export_failure)?;
    let bytes = doc.write()?;
    tracing::debug!(slides = trees.len(), bytes = bytes.len(), "native export finished");
    Ok(NativeDocument {
        bytes,
        slides: trees.len(),
    })
}

fn native_slide(
    doc: &mut PptxDocument,
    tree: &RenderTree,
    assets: &AssetStore,
) -> SlideResult<NativeSlide> {
    let to_emu = |r: Rect| EmuRect::from_frame(r, tree.frame);

    let background = match &tree.background {
        SlideBackground::Fill {
            fill: Fill::Solid { color },
        } => BackgroundFill::Solid(*color),
        SlideBackground::Fill { fill } => {
            tracing::debug!(slide = %tree.slide_id, ?fill, "background flattened to fallback");
            BackgroundFill::Solid(FALLBACK_BACKGROUND)
        }
        SlideBackground::Media {
            media: media @ BackgroundMedia::Image(_),
        } => match assets.background(media) {
            Some(img) => BackgroundFill::Picture(doc.add_media(encode_png(img)?)),
            None => BackgroundFill::Solid(FALLBACK_BACKGROUND),
        },
        SlideBackground::Media {
            media: BackgroundMedia::Video(_),
        } => BackgroundFill::Solid(FALLBACK_BACKGROUND),
    };

    let mut objects = Vec::new();
    if let Some(overlay) = tree.overlay {
        objects.push(SlideObject::Shape(ShapeObject {
            geometry: Geometry::Rect,
            bounds: EmuRect::FULL,
            fill: overlay,
            name: "Overlay".to_owned(),
        }));
    }

    for region in &tree.images {
        let Some(img) = assets.image(region) else {
            tracing::warn!(slide = %region.slide_id, "illustration missing from native export");
            continue;
        };
        let r = region.region;
        let cropped = img.cover(
            (r.width().round() as u32).max(1),
            (r.height().round() as u32).max(1),
        )?;
        let media = doc.add_media(encode_png(&cropped)?);
        objects.push(SlideObject::Picture(PictureObject {
            media,
            bounds: to_emu(r),
            description: region.keyword.clone(),
        }));
    }

    for shape in &tree.shapes {
        let (geometry, region) = match shape.kind {
            ShapeKind::Rect => (Geometry::Rect, shape.region),
            ShapeKind::Circle => {
                let c = shape.region.center();
                let rad = shape.region.width().min(shape.region.height()) / 2.0;
                (
                    Geometry::Ellipse,
                    Rect::new(c.x - rad, c.y - rad, c.x + rad, c.y + rad),
                )
            }
        };
        let name = match shape.role {
            ShapeRole::AccentBar => "Accent",
            ShapeRole::Divider => "Divider",
            ShapeRole::BulletDot => "Bullet",
        };
        objects.push(SlideObject::Shape(ShapeObject {
            geometry,
            bounds: to_emu(region),
            fill: shape.color,
            name: name.to_owned(),
        }));
    }

    for block in tree.all_texts() {
        objects.push(SlideObject::Text(text_object(block, tree, to_emu(block.region))));
    }

    if let Some(logo) = &tree.logo
        && let Some(img) = assets.logo(logo)
    {
        let placed = logo.fit(f64::from(img.width), f64::from(img.height));
        objects.push(SlideObject::Picture(PictureObject {
            media: doc.add_media(encode_png(img)?),
            bounds: to_emu(placed),
            description: "Logo".to_owned(),
        }));
    }

    Ok(NativeSlide {
        name: tree.slide_id.clone(),
        background,
        objects,
    })
}

fn text_object(block: &TextBlock, tree: &RenderTree, bounds: EmuRect) -> TextObject {
    TextObject {
        bounds,
        text: block.text.clone(),
        typeface: block.font.family(&tree.fonts).to_owned(),
        size: (block.size.px() * FONT_HUNDREDTHS_PER_UNIT).round() as u32,
        color: block.color,
        bold: block.bold,
        italic: block.italic,
        align: match block.align {
            TextAlign::Start => ParagraphAlign::Left,
            TextAlign::Center => ParagraphAlign::Center,
            TextAlign::End => ParagraphAlign::Right,
        },
        anchor: match block.v_align {
            VerticalAlign::Top => TextAnchor::Top,
            VerticalAlign::Middle => TextAnchor::Middle,
        },
        shadow: block.shadow,
        line_spacing: (block.size.line_height() * 100_000.0).round() as u32,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/native.rs"]
mod tests;
