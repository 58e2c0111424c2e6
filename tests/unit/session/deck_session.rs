use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;

use super::*;
use crate::{
    assets::{
        placeholder::PlaceholderImages,
        store::{AssetLoader, PreparedImage, VideoHandling},
    },
    foundation::core::Color,
    model::deck::{Slide, SlideType},
    nav::navigator::WindowedHost,
    render::cpu::{RenderSettings, TextRendering},
};

struct SlowPlaceholders(Duration);

impl PlaceholderImages for SlowPlaceholders {
    fn image_for(&self, _slide_id: &str, _keyword: &str) -> SlideResult<PreparedImage> {
        std::thread::sleep(self.0);
        Ok(PreparedImage::solid(4, 4, Color::rgb(10, 10, 10)))
    }
}

fn opts() -> SessionOpts {
    let mut opts = SessionOpts::default();
    opts.loader = AssetLoader::new(".");
    opts.raster.render = RenderSettings {
        scale: 0.1,
        text: TextRendering::Greeked,
    };
    opts.today = NaiveDate::from_ymd_opt(2026, 10, 16);
    opts
}

fn design() -> DesignSystem {
    DesignSystem {
        name: "Ocean Breeze".to_owned(),
        ..DesignSystem::default()
    }
}

fn deck() -> PresentationData {
    let mut content = Slide::new("s2", SlideType::Content, "Plan");
    content.image_keyword = Some("harbor".to_owned());
    PresentationData::new(
        "Harbor project",
        vec![
            Slide::new("s1", SlideType::Title, "Kickoff"),
            content,
            Slide::new("s3", SlideType::Content, "Wrap"),
        ],
    )
}

#[test]
fn empty_decks_cannot_start_a_session() {
    let err = DeckSession::new(design(), PresentationData::default(), opts()).unwrap_err();
    assert!(matches!(err, SlideError::Validation(_)));
}

#[test]
fn markup_follows_navigation() {
    let mut session = DeckSession::new(design(), deck(), opts()).unwrap();
    assert!(session.current_markup().unwrap().contains(r#"data-slide-id="s1""#));

    let mut host = WindowedHost::default();
    assert_eq!(session.handle_key(Key::ArrowRight, &mut host), NavOutcome::Moved(1));
    let markup = session.current_markup().unwrap();
    assert!(markup.contains(r#"data-slide-id="s2""#));
    assert!(markup.contains("<title>harbor</title>"));

    let html = session.deck_markup().unwrap();
    assert!(html.contains("<title>Harbor project</title>"));
    assert_eq!(html.matches("<section").count(), 3);
}

#[test]
fn slide_markup_does_not_move_the_view() {
    let session = DeckSession::new(design(), deck(), opts()).unwrap();
    assert!(session.slide_markup(2).unwrap().contains(r#"data-slide-id="s3""#));
    assert_eq!(session.navigator().current(), 0);
    assert!(matches!(session.slide_markup(3), Err(SlideError::Validation(_))));
}

#[tokio::test]
async fn raster_export_is_named_after_the_theme() {
    let session = DeckSession::new(design(), deck(), opts()).unwrap();
    let artifact = session.export(ExportKind::Raster).await.unwrap().unwrap();
    assert_eq!(artifact.file_name, "Ocean_Breeze.pdf");
    assert_eq!(artifact.pages, 3);
    assert!(artifact.bytes.starts_with(b"%PDF"));
    assert!(!session.is_exporting());
}

#[tokio::test]
async fn native_export_has_every_slide() {
    let session = DeckSession::new(design(), deck(), opts()).unwrap();
    let artifact = session.export(ExportKind::Native).await.unwrap().unwrap();
    assert_eq!(artifact.file_name, "Ocean_Breeze.pptx");
    assert_eq!(artifact.pages, 3);
    assert!(artifact.bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn second_export_is_ignored_while_one_runs() {
    let mut session = DeckSession::new(design(), deck(), opts()).unwrap();
    let guard = session.export_flag().try_acquire().unwrap();
    assert!(session.is_exporting());
    assert_eq!(session.export(ExportKind::Native).await.unwrap(), None);

    let mut host = WindowedHost::default();
    assert_eq!(session.handle_key(Key::ArrowRight, &mut host), NavOutcome::Ignored);
    assert_eq!(session.navigator().current(), 0);

    drop(guard);
    assert!(session.export(ExportKind::Native).await.unwrap().is_some());
}

#[tokio::test]
async fn slow_assets_time_out_and_release_the_flag() {
    let mut slow = opts();
    slow.loader = AssetLoader::new(".")
        .with_placeholders(Arc::new(SlowPlaceholders(Duration::from_millis(400))));
    slow.asset_timeout = Duration::from_millis(20);
    // The live view tolerates the slow source; only exports are bounded.
    let session = DeckSession::new(design(), deck(), slow).unwrap();

    let err = session.export(ExportKind::Raster).await.unwrap_err();
    assert!(matches!(err, SlideError::AssetLoad(_)), "{err}");
    assert!(!session.is_exporting());
}

#[tokio::test]
async fn missing_assets_fail_exports_but_not_the_live_view() {
    let mut d = design();
    d.masters.default.background_image = Some("missing/background.png".to_owned());
    let session = DeckSession::new(d, deck(), opts()).unwrap();
    assert!(session.current_markup().is_ok());

    let err = session.export(ExportKind::Native).await.unwrap_err();
    assert!(matches!(err, SlideError::AssetLoad(_)));
    assert!(!session.is_exporting());
}

#[tokio::test]
async fn greeked_raster_exports_skip_font_discovery() {
    let mut greeked = opts();
    greeked.loader.load_fonts = true;
    greeked.loader.font_dirs = vec!["does/not/exist".into()];
    let session = DeckSession::new(design(), deck(), greeked).unwrap();

    let artifact = session.export(ExportKind::Raster).await.unwrap().unwrap();
    assert_eq!(artifact.pages, 3);
}

#[tokio::test]
async fn missing_video_fails_raster_but_not_native_exports() {
    let mut d = design();
    d.masters.default.background_video = Some("does/not/exist.mp4".to_owned());
    let mut posters = opts();
    posters.loader.video = VideoHandling::PosterFrame;
    let session = DeckSession::new(d, deck(), posters).unwrap();

    let err = session.export(ExportKind::Raster).await.unwrap_err();
    assert!(matches!(err, SlideError::AssetLoad(_)), "{err}");
    assert!(!session.is_exporting());

    let artifact = session.export(ExportKind::Native).await.unwrap().unwrap();
    assert_eq!(artifact.pages, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_exports_yield_one_artifact() {
    let mut slow = opts();
    slow.loader = AssetLoader::new(".")
        .with_placeholders(Arc::new(SlowPlaceholders(Duration::from_millis(300))));
    slow.asset_timeout = Duration::from_secs(30);
    let session = DeckSession::new(design(), deck(), slow).unwrap();

    let exporter = session.exporter();
    let first = tokio::spawn(async move { exporter.export(ExportKind::Native).await });
    while !session.is_exporting() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // The native export is still preparing assets when the raster request arrives.
    assert_eq!(session.export(ExportKind::Raster).await.unwrap(), None);

    let artifact = first.await.unwrap().unwrap().unwrap();
    assert_eq!(artifact.file_name, "Ocean_Breeze.pptx");
    assert!(!session.is_exporting());
}
