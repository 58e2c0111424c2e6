//! Back-end agnostic description of one laid-out slide.
//!
//! A [`RenderTree`] is the shared layout intent: the live markup view, the CPU rasterizer and
//! the PPTX writer all consume the same tree. Coordinates are logical frame units
//! (1920×1080, origin top-left).

use serde::Serialize;

use crate::{
    foundation::core::{Canvas, Color, Rect},
    model::{deck::SlideType, design::{FontPair, LogoPlacement}},
    theme::resolver::{LogoFilter, LogoVariant, SlideBackground},
};

/// Layout rule that produced a tree: a slide type, or the closing-slide override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideVariant {
    /// Opening slide.
    Title,
    /// Section divider.
    Section,
    /// Bullets with optional image.
    Content,
    /// Image left, text right.
    SplitLeft,
    /// Text left, image right.
    SplitRight,
    /// Quotation.
    Quote,
    /// Statistic.
    BigNumber,
    /// Closing slide.
    End,
}

impl From<SlideType> for SlideVariant {
    fn from(t: SlideType) -> Self {
        match t {
            SlideType::Title => Self::Title,
            SlideType::Section => Self::Section,
            SlideType::Content => Self::Content,
            SlideType::SplitLeft => Self::SplitLeft,
            SlideType::SplitRight => Self::SplitRight,
            SlideType::Quote => Self::Quote,
            SlideType::BigNumber => Self::BigNumber,
        }
    }
}

impl SlideVariant {
    /// Whether the `n / total` caption belongs on this kind of slide.
    pub fn shows_page_number(self) -> bool {
        !matches!(self, Self::Title | Self::Section | Self::End)
    }
}

/// Semantic role of a text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRole {
    /// Slide heading.
    Heading,
    /// Secondary line under a heading.
    Subheading,
    /// One bullet item.
    BodyBullet,
    /// Small print: dates, page numbers, captions.
    Caption,
    /// Quote body or big number.
    FocalHighlight,
    /// Ornamental glyph (the oversized quote mark).
    Decoration,
}

/// Which design font family a block uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontRole {
    /// Heading family.
    Heading,
    /// Body family.
    Body,
}

impl FontRole {
    /// Family name for this role.
    pub fn family(self, fonts: &FontPair) -> &str {
        match self {
            Self::Heading => &fonts.heading,
            Self::Body => &fonts.body,
        }
    }
}

/// Type scale of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeRole {
    /// Big-number numeral.
    Display,
    /// Title, section and closing headings.
    Hero,
    /// Regular slide heading.
    Heading,
    /// Quote body.
    Focal,
    /// Subheadings and attributions.
    Subheading,
    /// Bullets.
    Body,
    /// Captions and page numbers.
    Caption,
    /// Decorative glyphs.
    Glyph,
}

impl SizeRole {
    /// Font size in frame units.
    pub const fn px(self) -> f64 {
        match self {
            Self::Display => 220.0,
            Self::Hero => 104.0,
            Self::Heading => 64.0,
            Self::Focal => 60.0,
            Self::Subheading => 36.0,
            Self::Body => 32.0,
            Self::Caption => 22.0,
            Self::Glyph => 480.0,
        }
    }

    /// Line height as a multiple of [`SizeRole::px`].
    pub const fn line_height(self) -> f64 {
        match self {
            Self::Display | Self::Glyph => 1.0,
            Self::Hero => 1.1,
            Self::Heading => 1.15,
            Self::Focal => 1.3,
            Self::Subheading => 1.35,
            Self::Body | Self::Caption => 1.4,
        }
    }
}

/// Horizontal alignment inside a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    /// Left.
    Start,
    /// Centered.
    Center,
    /// Right.
    End,
}

/// Vertical alignment inside a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    /// Top.
    Top,
    /// Centered.
    Middle,
}

/// One positioned run of text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextBlock {
    /// Semantic role.
    pub role: TextRole,
    /// Text content.
    pub text: String,
    /// Font family role.
    pub font: FontRole,
    /// Size role.
    pub size: SizeRole,
    /// Color, alpha included.
    pub color: Color,
    /// Bounding region in frame units.
    pub region: Rect,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub v_align: VerticalAlign,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Drop shadow under the glyphs.
    pub shadow: bool,
}

/// Geometry of a decorative shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Circle inscribed in the region.
    Circle,
}

/// Purpose of a decorative shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeRole {
    /// Short accent bar.
    AccentBar,
    /// Hairline under a heading.
    Divider,
    /// Bullet marker.
    BulletDot,
}

/// One filled decorative shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapeNode {
    /// Geometry.
    pub kind: ShapeKind,
    /// Purpose.
    pub role: ShapeRole,
    /// Bounding region.
    pub region: Rect,
    /// Fill color.
    pub color: Color,
}

/// An illustrative image panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRegion {
    /// Slide id keying the placeholder lookup.
    pub slide_id: String,
    /// Descriptive keyword (alt text).
    pub keyword: String,
    /// Region, filled edge to edge (cover).
    pub region: Rect,
}

/// The logo box. Artwork is fitted inside `bounds`, aligned to the placement corner.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogoRegion {
    /// Artwork reference.
    pub source: String,
    /// Chosen artwork.
    pub variant: LogoVariant,
    /// Visibility filter.
    pub filter: LogoFilter,
    /// Corner.
    pub placement: LogoPlacement,
    /// Maximum box.
    pub bounds: Rect,
}

impl LogoRegion {
    /// Fit artwork of `width`×`height` into the box, keeping its aspect ratio.
    pub fn fit(&self, width: f64, height: f64) -> Rect {
        let b = self.bounds;
        if width <= 0.0 || height <= 0.0 {
            return Rect::new(b.x0, b.y0, b.x0, b.y0);
        }
        let scale = (b.width() / width).min(b.height() / height);
        let (w, h) = (width * scale, height * scale);
        let x0 = match self.placement {
            LogoPlacement::TopLeft | LogoPlacement::BottomLeft | LogoPlacement::None => b.x0,
            LogoPlacement::TopRight | LogoPlacement::BottomRight => b.x1 - w,
            LogoPlacement::TopCenter => b.x0 + (b.width() - w) / 2.0,
        };
        let y0 = match self.placement {
            LogoPlacement::BottomLeft | LogoPlacement::BottomRight => b.y1 - h,
            _ => b.y0,
        };
        Rect::new(x0, y0, x0 + w, y0 + h)
    }
}

/// Laid-out slide, ready for any back-end.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTree {
    /// Source slide id.
    pub slide_id: String,
    /// Layout rule applied.
    pub variant: SlideVariant,
    /// 0-based position in the deck.
    pub position: usize,
    /// Deck length.
    pub total: usize,
    /// Logical frame.
    pub frame: Canvas,
    /// Background paint.
    pub background: SlideBackground,
    /// Darkening layer over media backgrounds.
    pub overlay: Option<Color>,
    /// Decorative shapes, painted before text.
    pub shapes: Vec<ShapeNode>,
    /// Illustrative images, painted before shapes.
    pub images: Vec<ImageRegion>,
    /// Text blocks in paint order.
    pub texts: Vec<TextBlock>,
    /// Page-number caption.
    pub page_number: Option<TextBlock>,
    /// Logo box.
    pub logo: Option<LogoRegion>,
    /// Font families for [`FontRole`] lookups.
    pub fonts: FontPair,
}

impl RenderTree {
    /// Text blocks with the given role.
    pub fn texts_with_role(&self, role: TextRole) -> impl Iterator<Item = &TextBlock> {
        self.texts.iter().filter(move |t| t.role == role)
    }

    /// First heading, if any.
    pub fn heading(&self) -> Option<&TextBlock> {
        self.texts_with_role(TextRole::Heading).next()
    }

    /// Text blocks followed by the page number, in paint order.
    pub fn all_texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.texts.iter().chain(self.page_number.iter())
    }
}
