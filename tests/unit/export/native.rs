use std::io::Read as _;

use super::*;
use crate::{
    assets::{
        decode::encode_data_url,
        store::{AssetLoader, PrepareMode, PreparedImage},
    },
    encode::pptx::SLIDE_WIDTH_EMU,
    layout::engine::LayoutContext,
    model::deck::{Slide, SlideType},
};

fn ctx() -> LayoutContext {
    LayoutContext::new(Default::default()).with_today(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
}

fn two_slides() -> PresentationData {
    let mut content = Slide::new("s1", SlideType::Content, "Roadmap");
    content.content = Some(vec!["Plan".to_owned(), "Build".to_owned()]);
    content.image_keyword = Some("mountain".to_owned());
    PresentationData::new("t", vec![content, Slide::new("s2", SlideType::Content, "Bye")])
}

fn build(design: &DesignSystem, deck: &PresentationData) -> PptxDocument {
    let trees = layout_deck(design, deck, &ctx());
    let assets = AssetStore::prepare(&AssetLoader::new("."), &trees, PrepareMode::Lenient).unwrap();
    build_document(&design.name, theme_spec(design), &trees, &assets).unwrap()
}

#[test]
fn solid_backgrounds_pass_through_and_gradients_fall_back() {
    let mut design = DesignSystem::default();
    design.colors.background = "#336699".to_owned();
    design.masters.title.background = Some("linear-gradient(90deg, #000000, #FFFFFF)".to_owned());
    let doc = build(&design, &two_slides());

    assert_eq!(doc.slides()[0].background, BackgroundFill::Solid(Color::rgb(0x33, 0x66, 0x99)));
    // The closing slide uses the title master.
    assert_eq!(doc.slides()[1].background, BackgroundFill::Solid(FALLBACK_BACKGROUND));
}

#[test]
fn video_backgrounds_become_the_fallback_color() {
    let mut design = DesignSystem::default();
    design.masters.default.background_video = Some("clips/intro.mp4".to_owned());
    let doc = build(&design, &two_slides());
    assert_eq!(doc.slides()[0].background, BackgroundFill::Solid(FALLBACK_BACKGROUND));
    // Media backgrounds still darken and shadow.
    match &doc.slides()[0].objects[0] {
        SlideObject::Shape(s) => assert_eq!(s.fill, Color::rgba(0, 0, 0, 102)),
        other => panic!("expected overlay, got {other:?}"),
    }
    let shadowed = doc.slides()[0].objects.iter().any(|o| match o {
        SlideObject::Text(t) => t.shadow && t.color == Color::WHITE,
        _ => false,
    });
    assert!(shadowed);
}

#[test]
fn image_backgrounds_become_picture_fills() {
    let png = encode_png(&PreparedImage::solid(4, 4, Color::rgb(0, 200, 0))).unwrap();
    let mut design = DesignSystem::default();
    design.masters.default.background_image = Some(encode_data_url("image/png", &png));
    let doc = build(&design, &two_slides());
    assert!(matches!(doc.slides()[0].background, BackgroundFill::Picture(_)));
}

#[test]
fn illustrations_and_text_keep_their_layout() {
    let doc = build(&DesignSystem::default(), &two_slides());
    let first = &doc.slides()[0];
    assert_eq!(first.name, "s1");

    let picture = first
        .objects
        .iter()
        .find_map(|o| match o {
            SlideObject::Picture(p) => Some(p),
            _ => None,
        })
        .unwrap();
    assert_eq!(picture.description, "mountain");
    assert!(picture.bounds.x > SLIDE_WIDTH_EMU / 2);

    let bullet = first
        .objects
        .iter()
        .find_map(|o| match o {
            SlideObject::Text(t) if t.text == "Plan" => Some(t),
            _ => None,
        })
        .unwrap();
    assert_eq!(bullet.size, 1600);
    assert_eq!(bullet.typeface, "Inter");
    assert_eq!(bullet.line_spacing, 140_000);

    let page = first
        .objects
        .iter()
        .any(|o| matches!(o, SlideObject::Text(t) if t.text == "1 / 2"));
    assert!(page);
}

#[test]
fn export_writes_one_slide_per_deck_slide() {
    let design = DesignSystem {
        name: "Ocean Breeze".to_owned(),
        ..DesignSystem::default()
    };
    let deck = two_slides();
    let trees = layout_deck(&design, &deck, &ctx());
    let assets = AssetStore::prepare(&AssetLoader::new("."), &trees, PrepareMode::Strict).unwrap();
    let out = export_native(&design, &deck, &assets, &NativeOpts::default()).unwrap();
    assert_eq!(out.slides, 2);

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(out.bytes)).unwrap();
    let mut slide2 = String::new();
    archive
        .by_name("ppt/slides/slide2.xml")
        .unwrap()
        .read_to_string(&mut slide2)
        .unwrap();
    assert!(slide2.contains("Thank You!"));
    assert!(archive.by_name("ppt/slides/slide3.xml").is_err());
}

#[test]
fn theme_takes_palette_and_fonts() {
    let mut design = DesignSystem::default();
    design.colors.accent = "not a color".to_owned();
    design.fonts.heading = "Playfair Display".to_owned();
    let spec = theme_spec(&design);
    assert_eq!(spec.accent, ThemeSpec::default().accent);
    assert_eq!(spec.heading_font, "Playfair Display");
    assert_eq!(spec.name, "Office Theme");
}

#[test]
fn control_characters_do_not_reach_slide_xml() {
    let deck = PresentationData::new(
        "t",
        vec![Slide::new("s1", SlideType::Content, "Q3\u{B}results\u{1}")],
    );
    let design = DesignSystem::default();
    let trees = layout_deck(&design, &deck, &ctx());
    let out = export_native(&design, &deck, &AssetStore::empty(), &NativeOpts::default()).unwrap();
    assert_eq!(trees.len(), out.slides);

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(out.bytes)).unwrap();
    let mut slide1 = String::new();
    archive
        .by_name("ppt/slides/slide1.xml")
        .unwrap()
        .read_to_string(&mut slide1)
        .unwrap();
    assert!(slide1.contains("Q3") && slide1.contains("results"));
    assert!(!slide1.chars().any(|c| c == '\u{B}' || c == '\u{1}'));
}
