use chrono::NaiveDate;

use super::*;
use crate::{
    layout::engine::{LayoutContext, layout_deck},
    model::{
        deck::{PresentationData, Slide, SlideType},
        design::{DesignSystem, MasterSlideStyle, PresentationSettings},
    },
};

fn layout(design: &DesignSystem, slides: Vec<Slide>) -> Vec<RenderTree> {
    let ctx = LayoutContext::new(PresentationSettings::default())
        .with_today(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    layout_deck(design, &PresentationData::new("t", slides), &ctx)
}

fn with_default_master(master: MasterSlideStyle) -> DesignSystem {
    let mut d = DesignSystem::default();
    d.masters.default = master;
    d
}

#[test]
fn escaping() {
    assert_eq!(escape_xml(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&apos;");
    assert_eq!(css_color(Color::rgb(1, 2, 255)), "#0102FF");
    assert_eq!(css_color(Color::rgba(0, 0, 0, 102)), "rgba(0,0,0,0.400)");
}

#[test]
fn characters_xml_cannot_carry_become_spaces() {
    assert_eq!(escape_xml("a\u{B}b\u{0}c\u{FFFF}"), "a b c ");
    assert_eq!(escape_xml("tab\tnew\nline\r"), "tab\tnew\nline\r");
}

#[test]
fn slide_svg_has_frame_and_escaped_text() {
    let trees = layout(
        &DesignSystem::default(),
        vec![Slide::new("s<1>", SlideType::Content, "R&D <2026>")],
    );
    let svg = slide_svg(&trees[0], &AssetStore::empty()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r#"viewBox="0 0 1920 1080""#));
    assert!(svg.contains(r#"data-slide-id="s&lt;1&gt;""#));
    assert!(svg.contains("R&amp;D &lt;2026&gt;"));
    assert!(svg.contains("1 / 1"));
}

#[test]
fn gradient_becomes_svg_gradient() {
    let design = with_default_master(MasterSlideStyle {
        background: Some("linear-gradient(90deg, #000000, #FFFFFF)".to_owned()),
        ..MasterSlideStyle::default()
    });
    let trees = layout(&design, vec![Slide::new("s", SlideType::Content, "x")]);
    let svg = slide_svg(&trees[0], &AssetStore::empty()).unwrap();
    assert!(svg.contains(r#"<linearGradient id="bg-gradient""#));
    assert!(svg.contains(r#"x2="1920.00" y2="540.00""#));
    assert!(svg.contains(r##"stop-color="#FFFFFF""##));
}

#[test]
fn unsupported_background_is_passed_to_css() {
    let design = with_default_master(MasterSlideStyle {
        background: Some("radial-gradient(circle, red, blue)".to_owned()),
        ..MasterSlideStyle::default()
    });
    let trees = layout(&design, vec![Slide::new("s", SlideType::Content, "x")]);
    let svg = slide_svg(&trees[0], &AssetStore::empty()).unwrap();
    assert!(svg.contains("background:radial-gradient(circle, red, blue)"));
}

#[test]
fn video_background_plays_under_an_overlay_with_shadowed_text() {
    let design = with_default_master(MasterSlideStyle {
        background_video: Some("media/loop.mp4".to_owned()),
        ..MasterSlideStyle::default()
    });
    let trees = layout(&design, vec![Slide::new("s", SlideType::Content, "Over video")]);
    let svg = slide_svg(&trees[0], &AssetStore::empty()).unwrap();
    assert!(svg.contains(r#"<video xmlns="http://www.w3.org/1999/xhtml" src="media/loop.mp4""#));
    assert!(svg.contains(r#"class="overlay""#));
    assert!(svg.contains(r#"fill-opacity="0.400""#));
    assert!(svg.contains("text-shadow:"));
    assert!(svg.contains("color:#FFFFFF"));
}

#[test]
fn inverted_logo_uses_css_filter() {
    let mut design = DesignSystem::default();
    design.logo.images.get_or_insert_with(Default::default).light = Some("brand/light.svg".to_owned());
    let trees = layout(&design, vec![Slide::new("s", SlideType::Content, "x")]);
    let svg = slide_svg(&trees[0], &AssetStore::empty()).unwrap();
    assert!(svg.contains(r#"filter="url(#logo-invert)" href="brand/light.svg""#));
    assert!(svg.contains(r#"preserveAspectRatio="xMaxYMin meet""#));
}

#[test]
fn deck_html_keeps_slide_order() {
    let trees = layout(
        &DesignSystem::default(),
        vec![
            Slide::new("a", SlideType::Title, "First"),
            Slide::new("b", SlideType::Content, "Second"),
            Slide::new("c", SlideType::Content, "Third"),
        ],
    );
    let html = deck_html("Deck & co", &trees, &AssetStore::empty()).unwrap();
    assert!(html.contains("<title>Deck &amp; co</title>"));
    let first = html.find("slide-1").unwrap();
    let second = html.find("slide-2").unwrap();
    let third = html.find("slide-3").unwrap();
    assert!(first < second && second < third);
    assert!(html.contains("Thank You!"));
}
