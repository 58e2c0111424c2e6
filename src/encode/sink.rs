use crate::foundation::error::{SlideError, SlideResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`PageSink`] before the first page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    /// Page width in document units.
    pub page_width: f64,
    /// Page height in document units.
    pub page_height: f64,
    /// Number of pages that will be pushed.
    pub pages: usize,
    /// Document title.
    pub title: String,
}

/// Sink contract for consuming rendered slides in deck order.
///
/// Ordering contract: `push_page` is called with indices `0, 1, 2, ...` exactly once each.
pub trait PageSink: Send {
    /// Called once before any page is pushed.
    fn begin(&mut self, cfg: PageConfig) -> SlideResult<()>;
    /// Push the page at `index`.
    fn push_page(&mut self, index: usize, frame: &FrameRGBA) -> SlideResult<()>;
    /// Called once after the last page is pushed.
    fn end(&mut self) -> SlideResult<()>;
}

pub(crate) fn check_order(expected: usize, got: usize) -> SlideResult<()> {
    if expected != got {
        return Err(SlideError::export_encoding(format!(
            "page {got} pushed out of order (expected {expected})"
        )));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<PageConfig>,
    pages: Vec<FrameRGBA>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&PageConfig> {
        self.cfg.as_ref()
    }

    /// Captured pages in order.
    pub fn pages(&self) -> &[FrameRGBA] {
        &self.pages
    }

    /// Whether `end` was called.
    pub fn is_finished(&self) -> bool {
        self.ended
    }
}

impl PageSink for InMemorySink {
    fn begin(&mut self, cfg: PageConfig) -> SlideResult<()> {
        self.cfg = Some(cfg);
        self.pages.clear();
        self.ended = false;
        Ok(())
    }

    fn push_page(&mut self, index: usize, frame: &FrameRGBA) -> SlideResult<()> {
        check_order(self.pages.len(), index)?;
        self.pages.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> SlideResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
