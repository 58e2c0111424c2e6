//! Whole-deck exports.
//!
//! Both exporters lay the deck out once and consume the same [`RenderTree`]s the live view
//! shows. Assets must already be in an [`AssetStore`](crate::assets::store::AssetStore),
//! usually prepared in strict mode.
//!
//! [`RenderTree`]: crate::layout::tree::RenderTree

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    layout::engine::LayoutContext,
    model::{deck::PresentationData, design::DesignSystem},
    foundation::error::{SlideError, SlideResult},
};

/// Download file names.
pub mod naming;
/// PPTX export.
pub mod native;
/// PDF export.
pub mod raster;

pub use naming::file_name;
pub use native::{NativeDocument, NativeOpts, export_native};
pub use raster::{RasterDocument, RasterOpts, export_raster};

/// Kind of document an export produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// One full-bleed JPEG page per slide, in a PDF.
    #[serde(alias = "pdf")]
    Raster,
    /// Editable PPTX.
    #[serde(alias = "pptx")]
    Native,
}

impl ExportKind {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Raster => "pdf",
            Self::Native => "pptx",
        }
    }

    /// MIME type of the document.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Raster => "application/pdf",
            Self::Native => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

/// Layout context for an export; `today` pins the title-slide date.
pub(crate) fn export_context(design: &DesignSystem, today: Option<NaiveDate>) -> LayoutContext {
    let ctx = LayoutContext::for_design(design);
    match today {
        Some(day) => ctx.with_today(day),
        None => ctx,
    }
}

pub(crate) fn ensure_slides(deck: &PresentationData) -> SlideResult<()> {
    if deck.is_empty() {
        return Err(SlideError::validation("cannot export a deck without slides"));
    }
    Ok(())
}
