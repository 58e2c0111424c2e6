//! Slidewright turns a design system and structured slide records into rendered slides.
//!
//! One deterministic layout pass produces a [`RenderTree`] per slide. Three back-ends consume
//! the same trees:
//!
//! - the live view renders SVG markup, one slide at a time ([`render::markup`])
//! - the raster exporter snapshots every slide and packs the pages into a PDF ([`export::raster`])
//! - the native exporter writes an editable PPTX ([`export::native`])
//!
//! A [`DeckSession`] ties these together with navigation and background exports.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Asset loading: images, SVG logos, video posters, fonts and placeholders.
pub mod assets;
/// Document encoders.
pub mod encode;
/// Whole-deck exports.
pub mod export;
/// Core types, errors and colors.
pub mod foundation;
/// Slide layout.
pub mod layout;
/// Design system and deck records.
pub mod model;
/// Deck navigation.
pub mod nav;
/// Rendering back-ends.
pub mod render;
/// Presentation sessions and export tasks.
pub mod session;
/// Master and color resolution per slide.
pub mod theme;
/// Design-analysis and content-generation collaborator.
pub mod upstream;

pub use crate::assets::store::{AssetLoader, AssetStore, PrepareMode};
pub use crate::export::{
    ExportKind, NativeDocument, NativeOpts, RasterDocument, RasterOpts, export_native,
    export_raster, file_name,
};
pub use crate::foundation::core::{Canvas, Color, Rect};
pub use crate::foundation::error::{SlideError, SlideResult};
pub use crate::layout::engine::{LayoutContext, layout_deck, layout_slide};
pub use crate::layout::tree::RenderTree;
pub use crate::model::deck::{PresentationData, Slide, SlideType};
pub use crate::model::design::DesignSystem;
pub use crate::nav::navigator::{DeckNavigator, Key, NavOutcome};
pub use crate::render::backend::FrameRGBA;
pub use crate::session::{DeckSession, ExportArtifact, Exporter, SessionOpts};
pub use crate::theme::resolver::{ResolvedTheme, resolve};
pub use crate::upstream::{DeckGenerator, JsonGenerator};
