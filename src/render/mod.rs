//! Back-ends that paint a [`crate::layout::tree::RenderTree`]: the live SVG markup view and the
//! off-screen CPU rasterizer used by the PDF export.

/// Frame type and renderer trait.
pub mod backend;
/// `vello_cpu` rasterizer.
pub mod cpu;
pub mod markup;
