//! Slide layout: one pure rule per slide type, producing a [`tree::RenderTree`].

/// Localized date captions.
pub mod dates;
/// Dispatch and deck-level layout.
pub mod engine;
/// Deterministic text measurement.
pub mod measure;
pub(crate) mod rules;
pub mod tree;
