use std::io::Cursor;

use lopdf::{
    Document, Object, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};

use crate::{
    encode::sink::{PageConfig, PageSink, check_order},
    foundation::error::{SlideError, SlideResult},
    render::backend::FrameRGBA,
};

/// A PDF text string: ASCII as a literal, anything else as UTF-16BE behind a byte order mark.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Default JPEG quality of page images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encode a frame as baseline JPEG, flattened over white.
pub fn encode_jpeg(frame: &FrameRGBA, quality: u8) -> SlideResult<Vec<u8>> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(SlideError::export_encoding("frame byte length mismatch"));
    }
    let rgb = frame.to_rgb8();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut Cursor::new(&mut out), quality.clamp(1, 100))
        .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| SlideError::export_encoding(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

struct JpegPage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Collects rendered slides as full-bleed JPEG pages and assembles a PDF.
pub struct PdfSink {
    quality: u8,
    cfg: Option<PageConfig>,
    pages: Vec<JpegPage>,
}

impl Default for PdfSink {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl PdfSink {
    /// New sink encoding pages at `quality` (1..=100).
    pub fn new(quality: u8) -> Self {
        Self {
            quality,
            cfg: None,
            pages: Vec::new(),
        }
    }

    /// Number of pages received so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assemble the document.
    pub fn finish(self) -> SlideResult<Vec<u8>> {
        let cfg = self
            .cfg
            .ok_or_else(|| SlideError::export_encoding("pdf sink finished before begin"))?;
        if self.pages.len() != cfg.pages {
            return Err(SlideError::export_encoding(format!(
                "pdf has {} of {} pages",
                self.pages.len(),
                cfg.pages
            )));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());

        for page in self.pages {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(page.width),
                    "Height" => i64::from(page.height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => Object::Integer(8),
                    "Filter" => "DCTDecode",
                },
                page.data,
            )
            .with_compression(false);
            let image_id = doc.add_object(image);

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            real(cfg.page_width),
                            Object::Integer(0),
                            Object::Integer(0),
                            real(cfg.page_height),
                            Object::Integer(0),
                            Object::Integer(0),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let encoded = content
                .encode()
                .map_err(|e| SlideError::export_encoding(format!("pdf content: {e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    real(cfg.page_width),
                    real(cfg.page_height),
                ],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(&cfg.title),
            "Producer" => Object::string_literal(concat!("slidewright ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| SlideError::export_encoding(format!("pdf write failed: {e}")))?;
        Ok(out)
    }
}

impl PageSink for PdfSink {
    fn begin(&mut self, cfg: PageConfig) -> SlideResult<()> {
        if !(cfg.page_width > 0.0 && cfg.page_height > 0.0) {
            return Err(SlideError::validation("pdf page size must be > 0"));
        }
        self.pages = Vec::with_capacity(cfg.pages);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_page(&mut self, index: usize, frame: &FrameRGBA) -> SlideResult<()> {
        if self.cfg.is_none() {
            return Err(SlideError::export_encoding("pdf sink received a page before begin"));
        }
        check_order(self.pages.len(), index)?;
        let data = encode_jpeg(frame, self.quality)?;
        self.pages.push(JpegPage {
            width: frame.width,
            height: frame.height,
            data,
        });
        Ok(())
    }

    fn end(&mut self) -> SlideResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pdf.rs"]
mod tests;
