use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;

use crate::{
    assets::store::{AssetLoader, AssetStore, PrepareMode, VideoHandling},
    encode::pdf::PdfSink,
    export::{
        ExportKind, file_name,
        native::{build_document, theme_spec},
        raster::{RasterOpts, render_pages, write_pages},
    },
    foundation::error::{SlideError, SlideResult},
    layout::{
        engine::{LayoutContext, layout_deck},
        tree::RenderTree,
    },
    model::{deck::PresentationData, design::DesignSystem},
    render::cpu::TextRendering,
    session::flag::ExportFlag,
};

/// Environment variable overriding [`SessionOpts::asset_timeout`], in milliseconds.
pub const ASSET_TIMEOUT_ENV: &str = "SLIDEWRIGHT_ASSET_TIMEOUT_MS";

/// Default bound on the "assets ready" wait.
pub const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(30);

/// Session configuration.
#[derive(Clone, Debug)]
pub struct SessionOpts {
    /// Asset loading for the live view and exports.
    pub loader: AssetLoader,
    /// How long an export waits for its assets.
    pub asset_timeout: Duration,
    /// Raster export options. Their `today` is ignored; the session pins the date.
    pub raster: RasterOpts,
    /// Pin the title-slide date for the live view and exports.
    pub today: Option<NaiveDate>,
}

impl Default for SessionOpts {
    fn default() -> Self {
        let mut loader = AssetLoader::default();
        loader.load_fonts = true;
        Self {
            loader,
            asset_timeout: DEFAULT_ASSET_TIMEOUT,
            raster: RasterOpts::default(),
            today: None,
        }
    }
}

impl SessionOpts {
    /// Defaults, with `SLIDEWRIGHT_ASSET_TIMEOUT_MS` applied when set.
    pub fn from_env() -> SlideResult<Self> {
        let mut opts = Self::default();
        if let Some(timeout) = asset_timeout_from(std::env::var(ASSET_TIMEOUT_ENV).ok().as_deref())? {
            opts.asset_timeout = timeout;
        }
        Ok(opts)
    }
}

/// Parse a millisecond timeout; blank means unset.
pub(crate) fn asset_timeout_from(raw: Option<&str>) -> SlideResult<Option<Duration>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let ms: u64 = raw.parse().map_err(|_| {
        SlideError::validation(format!("{ASSET_TIMEOUT_ENV} must be a whole number of milliseconds, got '{raw}'"))
    })?;
    Ok(Some(Duration::from_millis(ms)))
}

/// A finished export ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Document kind.
    pub kind: ExportKind,
    /// Suggested file name.
    pub file_name: String,
    /// Document bytes.
    pub bytes: Vec<u8>,
    /// Pages (raster) or slides (native).
    pub pages: usize,
}

/// Runs exports of one deck off the async threads.
///
/// Cheap to clone. All clones share the session's export flag, so at most one export of the
/// deck runs at a time.
#[derive(Clone, Debug)]
pub struct Exporter {
    design: Arc<DesignSystem>,
    deck: Arc<PresentationData>,
    ctx: LayoutContext,
    opts: Arc<SessionOpts>,
    flag: ExportFlag,
}

impl Exporter {
    pub(crate) fn new(
        design: Arc<DesignSystem>,
        deck: Arc<PresentationData>,
        ctx: LayoutContext,
        opts: Arc<SessionOpts>,
        flag: ExportFlag,
    ) -> Self {
        Self {
            design,
            deck,
            ctx,
            opts,
            flag,
        }
    }

    /// Whether an export of this deck is running.
    pub fn is_exporting(&self) -> bool {
        self.flag.is_set()
    }

    /// Export the deck. `Ok(None)` when another export is already running.
    ///
    /// Assets are prepared first, bounded by [`SessionOpts::asset_timeout`]; a timeout is an
    /// asset load failure. The flag is released on every exit path, including cancellation.
    #[tracing::instrument(skip(self), fields(slides = self.deck.len()))]
    pub async fn export(&self, kind: ExportKind) -> SlideResult<Option<ExportArtifact>> {
        let Some(_guard) = self.flag.try_acquire() else {
            tracing::debug!("export already running; request ignored");
            return Ok(None);
        };
        if self.deck.is_empty() {
            return Err(SlideError::validation("cannot export a deck without slides"));
        }

        let (trees, assets) = self.prepare(kind).await?;
        tracing::debug!(assets = assets.len(), "assets ready");

        let design = Arc::clone(&self.design);
        let opts = Arc::clone(&self.opts);
        let (bytes, pages) = tokio::task::spawn_blocking(move || {
            encode(kind, &design, &trees, &assets, &opts).map_err(SlideError::into_export_failure)
        })
        .await
        .map_err(|e| SlideError::export_encoding(format!("export task failed: {e}")))??;

        Ok(Some(ExportArtifact {
            kind,
            file_name: file_name(&self.design.name, kind),
            bytes,
            pages,
        }))
    }

    async fn prepare(&self, kind: ExportKind) -> SlideResult<(Vec<RenderTree>, AssetStore)> {
        let design = Arc::clone(&self.design);
        let deck = Arc::clone(&self.deck);
        let ctx = self.ctx.clone();
        let mut loader = self.opts.loader.clone();
        loader.load_fonts &= kind == ExportKind::Raster
            && self.opts.raster.render.text == TextRendering::Glyphs;
        if kind == ExportKind::Native {
            // PPTX paints video backgrounds flat; no poster frame is needed.
            loader.video = VideoHandling::Fallback;
        }

        let task = tokio::task::spawn_blocking(move || {
            let trees = layout_deck(&design, &deck, &ctx);
            let assets = AssetStore::prepare(&loader, &trees, PrepareMode::Strict)?;
            Ok::<_, SlideError>((trees, assets))
        });

        let timeout = self.opts.asset_timeout;
        tokio::time::timeout(timeout, task)
            .await
            .map_err(|_| {
                SlideError::asset_load(format!(
                    "assets were not ready within {} ms",
                    timeout.as_millis()
                ))
            })?
            .map_err(|e| SlideError::asset_load(format!("asset task failed: {e}")))?
    }
}

fn encode(
    kind: ExportKind,
    design: &DesignSystem,
    trees: &[RenderTree],
    assets: &AssetStore,
    opts: &SessionOpts,
) -> SlideResult<(Vec<u8>, usize)> {
    match kind {
        ExportKind::Raster => {
            let frames = render_pages(trees, assets, &opts.raster)?;
            let mut sink = PdfSink::new(opts.raster.jpeg_quality);
            write_pages(&mut sink, &frames, &design.name)?;
            Ok((sink.finish()?, frames.len()))
        }
        ExportKind::Native => {
            let doc = build_document(&design.name, theme_spec(design), trees, assets)?;
            Ok((doc.write()?, trees.len()))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/exporter.rs"]
mod tests;
