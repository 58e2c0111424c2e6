use chrono::NaiveDate;
use rayon::prelude::*;

use crate::{
    assets::store::AssetStore,
    encode::{
        pdf::{DEFAULT_JPEG_QUALITY, PdfSink},
        sink::{PageConfig, PageSink},
    },
    foundation::{
        core::{FRAME_HEIGHT, FRAME_WIDTH},
        error::{SlideError, SlideResult},
    },
    layout::{engine::layout_deck, tree::RenderTree},
    model::{deck::PresentationData, design::DesignSystem},
    render::{
        backend::{FrameRGBA, SlideRenderer},
        cpu::{CpuSlideRenderer, RenderSettings},
    },
};

use super::{ensure_slides, export_context};

/// Options for [`export_raster`].
#[derive(Clone, Debug)]
pub struct RasterOpts {
    /// Rasterizer settings. Scale 1.0 snapshots at 1920×1080.
    pub render: RenderSettings,
    /// JPEG quality of every page.
    pub jpeg_quality: u8,
    /// Render slides on a rayon pool.
    pub parallel: bool,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Pin the title-slide date.
    pub today: Option<NaiveDate>,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            render: RenderSettings::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            parallel: true,
            threads: None,
            today: None,
        }
    }
}

/// A finished raster export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterDocument {
    /// PDF bytes.
    pub bytes: Vec<u8>,
    /// Page count, one per slide.
    pub pages: usize,
}

/// Render every tree in order. The first failing slide fails the whole batch.
pub fn render_pages(
    trees: &[RenderTree],
    assets: &AssetStore,
    opts: &RasterOpts,
) -> SlideResult<Vec<FrameRGBA>> {
    if !opts.parallel {
        let mut renderer = CpuSlideRenderer::new(opts.render);
        return trees
            .iter()
            .map(|tree| renderer.render_slide(tree, assets))
            .collect();
    }

    let pool = build_thread_pool(opts.threads)?;
    let rendered = pool.install(|| {
        trees
            .par_iter()
            .map_init(
                || CpuSlideRenderer::new(opts.render),
                |renderer, tree| renderer.render_slide(tree, assets),
            )
            .collect::<Vec<_>>()
    });
    rendered.into_iter().collect()
}

/// Write rendered pages to `sink` in order.
pub fn write_pages(
    sink: &mut dyn PageSink,
    frames: &[FrameRGBA],
    title: &str,
) -> SlideResult<()> {
    sink.begin(PageConfig {
        page_width: FRAME_WIDTH,
        page_height: FRAME_HEIGHT,
        pages: frames.len(),
        title: title.to_owned(),
    })?;
    for (i, frame) in frames.iter().enumerate() {
        sink.push_page(i, frame)?;
    }
    sink.end()
}

/// Rasterize every slide and pack the pages into a PDF.
#[tracing::instrument(skip_all, fields(slides = deck.len()))]
pub fn export_raster(
    design: &DesignSystem,
    deck: &PresentationData,
    assets: &AssetStore,
    opts: &RasterOpts,
) -> SlideResult<RasterDocument> {
    ensure_slides(deck)?;
    let ctx = export_context(design, opts.today);
    let trees = layout_deck(design, deck, &ctx);

    let frames = render_pages(&trees, assets, opts).map_err(SlideError::into_export_failure)?;
    let mut sink = PdfSink::new(opts.jpeg_quality);
    write_pages(&mut sink, &frames, &design.name)?;
    let bytes = sink.finish()?;
    tracing::debug!(pages = frames.len(), bytes = bytes.len(), "raster export finished");
    Ok(RasterDocument {
        bytes,
        pages: frames.len(),
    })
}

fn build_thread_pool(threads: Option<usize>) -> SlideResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SlideError::validation("raster 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SlideError::export_encoding(format!("failed to build render pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/export/raster.rs"]
mod tests;
