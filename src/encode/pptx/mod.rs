//! Minimal PresentationML writer.
//!
//! The object model mirrors what a slide needs once layout is done: positioned text boxes,
//! preset shapes and pictures over a solid or picture background. Everything is written as
//! plain XML strings into a deflated zip package.

use std::{
    collections::HashMap,
    io::{Cursor, Write as _},
};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::foundation::{
    core::{Canvas, Color, Rect},
    error::{SlideError, SlideResult},
    math::Fnv1a64,
};

mod parts;
mod slide;

/// Slide width of a 16:9 deck.
pub const SLIDE_WIDTH_EMU: i64 = 12_192_000;
/// Slide height of a 16:9 deck.
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// Axis-aligned box in English Metric Units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmuRect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width.
    pub cx: i64,
    /// Height.
    pub cy: i64,
}

impl EmuRect {
    /// Whole slide.
    pub const FULL: Self = Self {
        x: 0,
        y: 0,
        cx: SLIDE_WIDTH_EMU,
        cy: SLIDE_HEIGHT_EMU,
    };

    /// Scale a rectangle in frame units onto the slide.
    pub fn from_frame(r: Rect, frame: Canvas) -> Self {
        let sx = SLIDE_WIDTH_EMU as f64 / f64::from(frame.width.max(1));
        let sy = SLIDE_HEIGHT_EMU as f64 / f64::from(frame.height.max(1));
        let x = (r.x0 * sx).round() as i64;
        let y = (r.y0 * sy).round() as i64;
        Self {
            x,
            y,
            cx: ((r.x1 * sx).round() as i64 - x).max(0),
            cy: ((r.y1 * sy).round() as i64 - y).max(0),
        }
    }
}

/// Preset geometry of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    /// `rect`.
    Rect,
    /// `ellipse`.
    Ellipse,
}

/// Filled shape without outline.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeObject {
    /// Geometry.
    pub geometry: Geometry,
    /// Position and size.
    pub bounds: EmuRect,
    /// Fill; alpha below 255 becomes `<a:alpha>`.
    pub fill: Color,
    /// Shape name shown in the selection pane.
    pub name: String,
}

/// Handle to an embedded PNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MediaRef(usize);

impl MediaRef {
    /// 0-based media index; the part is `ppt/media/image{index+1}.png`.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stretched picture.
#[derive(Clone, Debug, PartialEq)]
pub struct PictureObject {
    /// Embedded image.
    pub media: MediaRef,
    /// Position and size.
    pub bounds: EmuRect,
    /// Alt text.
    pub description: String,
}

/// Paragraph alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParagraphAlign {
    /// `l`.
    Left,
    /// `ctr`.
    Center,
    /// `r`.
    Right,
}

/// Vertical anchor of a text body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// `t`.
    Top,
    /// `ctr`.
    Middle,
}

/// Single-run text box. Line breaks in `text` start new paragraphs.
#[derive(Clone, Debug, PartialEq)]
pub struct TextObject {
    /// Position and size.
    pub bounds: EmuRect,
    /// Content.
    pub text: String,
    /// Latin typeface.
    pub typeface: String,
    /// Size in hundredths of a point.
    pub size: u32,
    /// Color with alpha.
    pub color: Color,
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Alignment.
    pub align: ParagraphAlign,
    /// Anchor.
    pub anchor: TextAnchor,
    /// Outer shadow under the glyphs.
    pub shadow: bool,
    /// Line spacing in thousandths of a percent (`100000` is single).
    pub line_spacing: u32,
}

/// One drawable on a slide, in z-order.
#[derive(Clone, Debug, PartialEq)]
pub enum SlideObject {
    /// Preset shape.
    Shape(ShapeObject),
    /// Picture.
    Picture(PictureObject),
    /// Text box.
    Text(TextObject),
}

/// Slide background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundFill {
    /// Flat color.
    Solid(Color),
    /// Picture stretched over the slide.
    Picture(MediaRef),
}

/// One slide of the package.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeSlide {
    /// Slide name (`cSld/@name`).
    pub name: String,
    /// Background.
    pub background: BackgroundFill,
    /// Objects bottom to top.
    pub objects: Vec<SlideObject>,
}

impl NativeSlide {
    /// Distinct media used by this slide, background first.
    pub fn media(&self) -> Vec<MediaRef> {
        let mut out = Vec::new();
        if let BackgroundFill::Picture(m) = self.background {
            out.push(m);
        }
        for obj in &self.objects {
            if let SlideObject::Picture(p) = obj
                && !out.contains(&p.media)
            {
                out.push(p.media);
            }
        }
        out
    }
}

/// Colors and fonts of the package theme.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeSpec {
    /// Theme name.
    pub name: String,
    /// Dark text color (`dk1`).
    pub text: Color,
    /// Light background color (`lt1`).
    pub background: Color,
    /// `dk2` and `accent2`.
    pub primary: Color,
    /// `lt2` and `accent3`.
    pub secondary: Color,
    /// `accent1`.
    pub accent: Color,
    /// Major (heading) latin font.
    pub heading_font: String,
    /// Minor (body) latin font.
    pub body_font: String,
}

impl Default for ThemeSpec {
    fn default() -> Self {
        Self {
            name: "Office Theme".to_owned(),
            text: Color::BLACK,
            background: Color::WHITE,
            primary: Color::rgb(0x1F, 0x49, 0x7D),
            secondary: Color::rgb(0xEE, 0xEC, 0xE1),
            accent: Color::rgb(0x4F, 0x81, 0xBD),
            heading_font: "Calibri".to_owned(),
            body_font: "Calibri".to_owned(),
        }
    }
}

/// In-memory presentation, serialized with [`PptxDocument::write`].
#[derive(Clone, Debug, Default)]
pub struct PptxDocument {
    title: String,
    theme: ThemeSpec,
    media: Vec<Vec<u8>>,
    media_index: HashMap<u64, usize>,
    slides: Vec<NativeSlide>,
}

impl PptxDocument {
    /// Empty document.
    pub fn new(title: impl Into<String>, theme: ThemeSpec) -> Self {
        Self {
            title: title.into(),
            theme,
            ..Self::default()
        }
    }

    /// Embed PNG bytes; identical bytes share one part.
    pub fn add_media(&mut self, png: Vec<u8>) -> MediaRef {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(&png);
        let key = h.finish();
        if let Some(&idx) = self.media_index.get(&key)
            && self.media[idx] == png
        {
            return MediaRef(idx);
        }
        let idx = self.media.len();
        self.media.push(png);
        self.media_index.insert(key, idx);
        MediaRef(idx)
    }

    /// Append a slide.
    pub fn push_slide(&mut self, slide: NativeSlide) -> SlideResult<()> {
        if let Some(bad) = slide.media().into_iter().find(|m| m.0 >= self.media.len()) {
            return Err(SlideError::export_encoding(format!(
                "slide references unknown media {}",
                bad.0
            )));
        }
        self.slides.push(slide);
        Ok(())
    }

    /// Slides in order.
    pub fn slides(&self) -> &[NativeSlide] {
        &self.slides
    }

    /// Number of embedded images.
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Serialize the package.
    #[tracing::instrument(skip_all, fields(slides = self.slides.len(), media = self.media.len()))]
    pub fn write(&self) -> SlideResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let xml = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let slide_count = self.slides.len();
        let mut put = |name: &str, body: &[u8], opts: SimpleFileOptions| -> SlideResult<()> {
            zip.start_file(name, opts).map_err(zip_err)?;
            zip.write_all(body)
                .map_err(|e| SlideError::export_encoding(format!("pptx write {name}: {e}")))
        };

        put("[Content_Types].xml", parts::content_types(slide_count)?.as_bytes(), xml)?;
        put("_rels/.rels", parts::ROOT_RELS.as_bytes(), xml)?;
        put("docProps/core.xml", parts::core_props(&self.title)?.as_bytes(), xml)?;
        put("docProps/app.xml", parts::app_props(slide_count)?.as_bytes(), xml)?;
        put("ppt/presentation.xml", parts::presentation(slide_count)?.as_bytes(), xml)?;
        put(
            "ppt/_rels/presentation.xml.rels",
            parts::presentation_rels(slide_count)?.as_bytes(),
            xml,
        )?;
        put("ppt/presProps.xml", parts::PRES_PROPS.as_bytes(), xml)?;
        put("ppt/viewProps.xml", parts::VIEW_PROPS.as_bytes(), xml)?;
        put("ppt/tableStyles.xml", parts::TABLE_STYLES.as_bytes(), xml)?;
        put("ppt/theme/theme1.xml", parts::theme(&self.theme)?.as_bytes(), xml)?;
        put("ppt/slideMasters/slideMaster1.xml", parts::SLIDE_MASTER.as_bytes(), xml)?;
        put(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            parts::SLIDE_MASTER_RELS.as_bytes(),
            xml,
        )?;
        put("ppt/slideLayouts/slideLayout1.xml", parts::SLIDE_LAYOUT.as_bytes(), xml)?;
        put(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            parts::SLIDE_LAYOUT_RELS.as_bytes(),
            xml,
        )?;

        for (i, s) in self.slides.iter().enumerate() {
            let media = s.media();
            let n = i + 1;
            put(
                &format!("ppt/slides/slide{n}.xml"),
                slide::slide_xml(s, &media)?.as_bytes(),
                xml,
            )?;
            put(
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                slide::slide_rels(&media)?.as_bytes(),
                xml,
            )?;
        }
        for (i, png) in self.media.iter().enumerate() {
            put(&format!("ppt/media/image{}.png", i + 1), png, stored)?;
        }

        let cursor = zip.finish().map_err(zip_err)?;
        Ok(cursor.into_inner())
    }
}

fn zip_err(e: zip::result::ZipError) -> SlideError {
    SlideError::export_encoding(format!("pptx package: {e}"))
}

pub(crate) fn fmt_err(_: std::fmt::Error) -> SlideError {
    SlideError::export_encoding("failed to format pptx part")
}

/// `RRGGBB` as used by `<a:srgbClr val>`.
pub(crate) fn srgb(c: Color) -> String {
    format!("{:02X}{:02X}{:02X}", c.r, c.g, c.b)
}

#[cfg(test)]
#[path = "../../../tests/unit/encode/pptx.rs"]
mod tests;
