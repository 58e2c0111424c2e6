use std::sync::Arc;

use crate::{
    assets::store::{AssetStore, PrepareMode, VideoHandling},
    export::{ExportKind, export_context},
    foundation::error::{SlideError, SlideResult},
    layout::{
        engine::{LayoutContext, layout_deck},
        tree::RenderTree,
    },
    model::{deck::PresentationData, design::DesignSystem},
    nav::navigator::{DeckNavigator, FullscreenHost, Key, NavOutcome},
    render::markup::{deck_html, slide_svg},
    session::{
        exporter::{ExportArtifact, Exporter, SessionOpts},
        flag::ExportFlag,
    },
};

/// One deck being presented.
///
/// Owns the laid-out slides, the live-view assets and the navigator. Exports share the
/// session's flag, so navigation input is dropped while one runs.
#[derive(Debug)]
pub struct DeckSession {
    design: Arc<DesignSystem>,
    deck: Arc<PresentationData>,
    ctx: LayoutContext,
    opts: Arc<SessionOpts>,
    flag: ExportFlag,
    navigator: DeckNavigator,
    trees: Vec<RenderTree>,
    live_assets: AssetStore,
}

impl DeckSession {
    /// Lay out the deck and load live-view assets. Broken assets are logged and skipped.
    #[tracing::instrument(skip_all, fields(slides = deck.len()))]
    pub fn new(design: DesignSystem, deck: PresentationData, opts: SessionOpts) -> SlideResult<Self> {
        if deck.is_empty() {
            return Err(SlideError::validation("a session needs at least one slide"));
        }
        let ctx = export_context(&design, opts.today);
        let trees = layout_deck(&design, &deck, &ctx);

        // The live view plays videos and lets the browser shape text.
        let mut loader = opts.loader.clone();
        loader.load_fonts = false;
        loader.video = VideoHandling::Fallback;
        let live_assets = AssetStore::prepare(&loader, &trees, PrepareMode::Lenient)?;

        let flag = ExportFlag::new();
        Ok(Self {
            navigator: DeckNavigator::new(deck.len(), flag.clone()),
            design: Arc::new(design),
            deck: Arc::new(deck),
            ctx,
            opts: Arc::new(opts),
            flag,
            trees,
            live_assets,
        })
    }

    /// Design system.
    pub fn design(&self) -> &DesignSystem {
        &self.design
    }

    /// Deck content.
    pub fn deck(&self) -> &PresentationData {
        &self.deck
    }

    /// Every laid-out slide.
    pub fn trees(&self) -> &[RenderTree] {
        &self.trees
    }

    /// Navigation state.
    pub fn navigator(&self) -> &DeckNavigator {
        &self.navigator
    }

    /// Mutable navigation state.
    pub fn navigator_mut(&mut self) -> &mut DeckNavigator {
        &mut self.navigator
    }

    /// Forward a key press to the navigator.
    pub fn handle_key(&mut self, key: Key, host: &mut dyn FullscreenHost) -> NavOutcome {
        self.navigator.handle_key(key, host)
    }

    /// Layout of the slide on screen.
    pub fn current_tree(&self) -> SlideResult<&RenderTree> {
        let i = self.navigator.current();
        self.trees
            .get(i)
            .ok_or_else(|| SlideError::validation(format!("no slide at index {i}")))
    }

    /// Live markup of the slide on screen.
    pub fn current_markup(&self) -> SlideResult<String> {
        slide_svg(self.current_tree()?, &self.live_assets)
    }

    /// Live markup of the slide at `index`, whatever is on screen.
    pub fn slide_markup(&self, index: usize) -> SlideResult<String> {
        let tree = self
            .trees
            .get(index)
            .ok_or_else(|| SlideError::validation(format!("no slide at index {index}")))?;
        slide_svg(tree, &self.live_assets)
    }

    /// Live markup of the whole deck.
    pub fn deck_markup(&self) -> SlideResult<String> {
        let title = if self.deck.topic.trim().is_empty() {
            &self.design.name
        } else {
            &self.deck.topic
        };
        deck_html(title, &self.trees, &self.live_assets)
    }

    /// Whether an export is running. Export controls should be disabled while it is.
    pub fn is_exporting(&self) -> bool {
        self.flag.is_set()
    }

    /// Handle for running exports, e.g. from a spawned task.
    pub fn exporter(&self) -> Exporter {
        Exporter::new(
            Arc::clone(&self.design),
            Arc::clone(&self.deck),
            self.ctx.clone(),
            Arc::clone(&self.opts),
            self.flag.clone(),
        )
    }

    /// Export the deck; `Ok(None)` when an export is already running.
    pub async fn export(&self, kind: ExportKind) -> SlideResult<Option<ExportArtifact>> {
        self.exporter().export(kind).await
    }

    #[cfg(test)]
    pub(crate) fn export_flag(&self) -> &ExportFlag {
        &self.flag
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/deck_session.rs"]
mod tests;
