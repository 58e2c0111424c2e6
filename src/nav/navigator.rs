use crate::{foundation::error::SlideResult, session::flag::ExportFlag};

/// Keys the presentation view reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Right arrow.
    ArrowRight,
    /// Left arrow.
    ArrowLeft,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Anything else.
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"ArrowRight"`, `" "`, `"Escape"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowRight" | "Right" | "right" => Self::ArrowRight,
            "ArrowLeft" | "Left" | "left" => Self::ArrowLeft,
            " " | "Space" | "Spacebar" | "space" => Self::Space,
            "Escape" | "Esc" | "esc" | "escape" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// What a key press did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// The current slide changed to this index.
    Moved(usize),
    /// Already at the boundary; nothing changed.
    Unchanged,
    /// Fullscreen was left.
    ExitedFullscreen,
    /// The presentation view should close.
    CloseRequested,
    /// An export is running; input was dropped.
    Ignored,
}

/// Platform fullscreen control.
pub trait FullscreenHost {
    /// Current platform fullscreen state.
    fn is_fullscreen(&self) -> bool;
    /// Ask the platform to enter or leave fullscreen.
    fn set_fullscreen(&mut self, on: bool) -> SlideResult<()>;
}

/// Fullscreen host without a platform behind it; it just remembers the requested state.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowedHost {
    fullscreen: bool,
}

impl FullscreenHost for WindowedHost {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_fullscreen(&mut self, on: bool) -> SlideResult<()> {
        self.fullscreen = on;
        Ok(())
    }
}

/// Current-slide state of a presentation.
///
/// Invariant: `current < total` whenever `total > 0`.
#[derive(Clone, Debug)]
pub struct DeckNavigator {
    current: usize,
    total: usize,
    fullscreen: bool,
    export: ExportFlag,
}

impl DeckNavigator {
    /// Navigator at slide 0 of a deck with `total` slides, sharing `export` with the exporter.
    pub fn new(total: usize, export: ExportFlag) -> Self {
        Self {
            current: 0,
            total,
            fullscreen: false,
            export,
        }
    }

    /// Current slide index.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Deck length.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Last known fullscreen state.
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether input is currently blocked by a running export.
    pub fn is_blocked(&self) -> bool {
        self.export.is_set()
    }

    fn last(&self) -> usize {
        self.total.saturating_sub(1)
    }

    fn move_to(&mut self, target: usize) -> NavOutcome {
        let target = target.min(self.last());
        if target == self.current {
            NavOutcome::Unchanged
        } else {
            self.current = target;
            NavOutcome::Moved(target)
        }
    }

    /// Advance one slide; stays put on the last slide.
    pub fn next(&mut self) -> NavOutcome {
        self.move_to(self.current.saturating_add(1))
    }

    /// Go back one slide; stays put on the first slide.
    pub fn previous(&mut self) -> NavOutcome {
        self.move_to(self.current.saturating_sub(1))
    }

    /// Jump to `index`, clamped into the deck.
    pub fn jump_to(&mut self, index: usize) -> NavOutcome {
        self.move_to(index)
    }

    /// Flip fullscreen based on what the platform reports, not on the cached flag.
    pub fn toggle_fullscreen(&mut self, host: &mut dyn FullscreenHost) -> bool {
        let target = !host.is_fullscreen();
        if let Err(e) = host.set_fullscreen(target) {
            tracing::warn!(error = %e, "fullscreen request failed");
        }
        self.fullscreen = host.is_fullscreen();
        self.fullscreen
    }

    /// Handle a key press. Everything is ignored while an export runs.
    pub fn handle_key(&mut self, key: Key, host: &mut dyn FullscreenHost) -> NavOutcome {
        if self.is_blocked() {
            return NavOutcome::Ignored;
        }
        match key {
            Key::ArrowRight | Key::Space => self.next(),
            Key::ArrowLeft => self.previous(),
            Key::Escape => {
                if host.is_fullscreen() {
                    if let Err(e) = host.set_fullscreen(false) {
                        tracing::warn!(error = %e, "leaving fullscreen failed");
                    }
                    self.fullscreen = host.is_fullscreen();
                    NavOutcome::ExitedFullscreen
                } else {
                    self.fullscreen = false;
                    NavOutcome::CloseRequested
                }
            }
            Key::Other => NavOutcome::Unchanged,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nav/navigator.rs"]
mod tests;
