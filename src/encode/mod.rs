//! Document writers.
//!
//! Paged output consumes rendered frames through a [`sink::PageSink`]; the native writer
//! packages positioned slide objects into a PPTX archive.

/// PDF pages from rendered frames.
pub mod pdf;
pub mod pptx;
/// Generic page sink trait and built-in sinks.
pub mod sink;
