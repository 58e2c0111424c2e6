//! Asset loading: images, SVG logos, video poster frames, placeholder art and fonts.

/// Raster/SVG decoding and data URLs.
pub mod decode;
/// Font discovery.
pub mod fonts;
pub mod media;
pub mod placeholder;
/// Prepared, immutable asset store.
pub mod store;
/// Text shaping with `parley`.
pub mod text;
