use super::*;
use crate::{
    layout::tree::{ShapeRole, TextRole},
    model::design::{EndSlideAlign, LogoImages, LogoSpecs, MasterKind, MasterSlideStyle},
    theme::resolver::{LogoFilter, SlideBackground},
};

fn ctx() -> LayoutContext {
    LayoutContext::new(PresentationSettings::default())
        .with_today(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
}

fn five_slide_deck() -> PresentationData {
    let mut content = Slide::new("s3", SlideType::Content, "Goals");
    content.content = Some(vec!["Grow".to_owned(), "Ship".to_owned()]);
    PresentationData::new(
        "Quarterly review",
        vec![
            Slide::new("s1", SlideType::Title, "Q3 Review"),
            Slide::new("s2", SlideType::Section, "Context"),
            content,
            Slide::new("s4", SlideType::Quote, "Stay hungry"),
            Slide::new("s5", SlideType::Content, "Wrap-up"),
        ],
    )
}

fn design() -> DesignSystem {
    let mut d = DesignSystem::default();
    d.masters.title = MasterSlideStyle {
        background: Some("#0F172A".to_owned()),
        text_color: Some("#F8FAFC".to_owned()),
        ..MasterSlideStyle::default()
    };
    d
}

#[test]
fn scenario_five_slide_deck() {
    let d = design();
    let trees = layout_deck(&d, &five_slide_deck(), &ctx());
    assert_eq!(trees.len(), 5);

    let end = &trees[4];
    assert_eq!(end.variant, SlideVariant::End);
    assert_eq!(end.heading().unwrap().text, "Thank You!");
    assert!(end.page_number.is_none());
    let theme = resolve(&five_slide_deck().slides[4], 4, 5, &d);
    assert_eq!(theme.master_kind, MasterKind::Title);

    let content = &trees[2];
    assert_eq!(content.variant, SlideVariant::Content);
    assert_eq!(content.page_number.as_ref().unwrap().text, "3 / 5");
}

#[test]
fn page_numbers_skip_title_section_and_end() {
    let trees = layout_deck(&design(), &five_slide_deck(), &ctx());
    let shown: Vec<bool> = trees.iter().map(|t| t.page_number.is_some()).collect();
    assert_eq!(shown, vec![false, false, true, true, false]);
    assert_eq!(trees[3].page_number.as_ref().unwrap().text, "4 / 5");
}

#[test]
fn page_numbers_can_be_disabled() {
    let mut c = ctx();
    c.settings.show_page_numbers = false;
    let trees = layout_deck(&design(), &five_slide_deck(), &c);
    assert!(trees.iter().all(|t| t.page_number.is_none()));
}

#[test]
fn single_slide_deck_keeps_its_own_rule() {
    let deck = PresentationData::new("x", vec![Slide::new("only", SlideType::Content, "Solo")]);
    let tree = layout_slide(&design(), &deck, 0, &ctx()).unwrap();
    assert_eq!(tree.variant, SlideVariant::Content);
    assert_eq!(tree.heading().unwrap().text, "Solo");
    assert_eq!(tree.page_number.as_ref().unwrap().text, "1 / 1");
}

#[test]
fn layout_slide_rejects_out_of_range() {
    let err = layout_slide(&design(), &five_slide_deck(), 9, &ctx()).unwrap_err();
    assert!(matches!(err, SlideError::Validation(_)));
}

#[test]
fn end_slide_title_and_subtitle_are_configurable() {
    let mut d = design();
    d.settings.end_slide_title = Some("Questions?".to_owned());
    d.settings.end_slide_align = EndSlideAlign::Left;
    let mut deck = five_slide_deck();
    deck.slides[4].subtitle = Some("The Platform Team".to_owned());
    let c = LayoutContext::for_design(&d).with_today(ctx().today);
    let end = layout_slide(&d, &deck, 4, &c).unwrap();
    assert_eq!(end.heading().unwrap().text, "Questions?");
    assert_eq!(end.heading().unwrap().align, TextAlign::Start);
    let sub = end.texts_with_role(TextRole::Subheading).next().unwrap();
    assert_eq!(sub.text, "The Platform Team");
    assert!(end.shapes.iter().any(|s| s.role == ShapeRole::AccentBar));
}

#[test]
fn title_slide_carries_localized_date() {
    let mut c = ctx();
    c.settings.date_locale = Some("de-DE".to_owned());
    let tree = layout_slide(&design(), &five_slide_deck(), 0, &c).unwrap();
    let caption = tree.texts_with_role(TextRole::Caption).next().unwrap();
    assert_eq!(caption.text, "16. Oktober 2026");
    let heading = tree.heading().unwrap();
    assert!(heading.region.width() <= FRAME_WIDTH * 0.55);
    assert_eq!(heading.region.x0, PAD_X);
    assert!(heading.region.y0 > FRAME_HEIGHT / 3.0);
}

#[test]
fn content_with_keyword_gets_image_panel_keyed_by_slide_id() {
    let mut deck = five_slide_deck();
    deck.slides[2].image_keyword = Some("mountain summit".to_owned());
    let tree = layout_slide(&design(), &deck, 2, &ctx()).unwrap();
    assert_eq!(tree.images.len(), 1);
    assert_eq!(tree.images[0].slide_id, "s3");
    assert_eq!(tree.images[0].keyword, "mountain summit");
    let bullets: Vec<_> = tree.texts_with_role(TextRole::BodyBullet).collect();
    assert_eq!(bullets.len(), 2);
    assert!(bullets.iter().all(|b| b.region.x1 <= tree.images[0].region.x0));
    let dots = tree
        .shapes
        .iter()
        .filter(|s| s.role == ShapeRole::BulletDot)
        .count();
    assert_eq!(dots, 2);
    assert!(tree.shapes.iter().any(|s| s.role == ShapeRole::Divider));
}

#[test]
fn content_without_keyword_has_no_image() {
    let tree = layout_slide(&design(), &five_slide_deck(), 2, &ctx()).unwrap();
    assert!(tree.images.is_empty());
}

#[test]
fn split_layouts_mirror_each_other() {
    let mut left = Slide::new("l", SlideType::SplitLeft, "Left");
    left.content = Some(vec!["one".to_owned()]);
    let mut right = left.clone();
    right.id = "r".to_owned();
    right.slide_type = SlideType::SplitRight;
    let deck = PresentationData::new(
        "t",
        vec![left, right, Slide::new("end", SlideType::Content, "bye")],
    );
    let l = layout_slide(&design(), &deck, 0, &ctx()).unwrap();
    let r = layout_slide(&design(), &deck, 1, &ctx()).unwrap();
    assert_eq!(l.images[0].region.x0, 0.0);
    assert_eq!(r.images[0].region.x1, FRAME_WIDTH);
    assert!(l.heading().unwrap().region.x0 >= FRAME_WIDTH / 2.0);
    assert!(r.heading().unwrap().region.x1 <= FRAME_WIDTH / 2.0);
}

#[test]
fn quote_uses_highlight_and_attribution() {
    let mut q = Slide::new("q", SlideType::Quote, "Fallback title");
    q.highlight = Some("Simplicity is the ultimate sophistication.".to_owned());
    q.subtitle = Some("Leonardo".to_owned());
    let deck = PresentationData::new("t", vec![q.clone(), Slide::new("e", SlideType::Title, "x")]);
    let tree = layout_slide(&design(), &deck, 0, &ctx()).unwrap();
    let focal = tree.texts_with_role(TextRole::FocalHighlight).next().unwrap();
    assert_eq!(focal.text, "Simplicity is the ultimate sophistication.");
    assert!(focal.italic);
    let glyph = tree.texts_with_role(TextRole::Decoration).next().unwrap();
    assert_eq!(glyph.text, "\u{201C}");
    assert_eq!(tree.texts[0].role, TextRole::Decoration);
    let sub = tree.texts_with_role(TextRole::Subheading).next().unwrap();
    assert_eq!(sub.text, "\u{2014} Leonardo");

    q.highlight = None;
    let deck = PresentationData::new("t", vec![q, Slide::new("e", SlideType::Title, "x")]);
    let tree = layout_slide(&design(), &deck, 0, &ctx()).unwrap();
    let focal = tree.texts_with_role(TextRole::FocalHighlight).next().unwrap();
    assert_eq!(focal.text, "Fallback title");
}

#[test]
fn big_number_puts_focal_on_the_right() {
    let mut s = Slide::new("b", SlideType::BigNumber, "Adoption");
    s.highlight = Some("87%".to_owned());
    s.subtitle = Some("of teams".to_owned());
    let deck = PresentationData::new("t", vec![s, Slide::new("e", SlideType::Title, "x")]);
    let tree = layout_slide(&design(), &deck, 0, &ctx()).unwrap();
    let focal = tree.texts_with_role(TextRole::FocalHighlight).next().unwrap();
    assert_eq!(focal.text, "87%");
    assert_eq!(focal.size, SizeRole::Display);
    assert!(focal.region.x0 > FRAME_WIDTH / 2.0);
    assert!(tree.heading().unwrap().region.x1 < FRAME_WIDTH / 2.0);
}

#[test]
fn media_background_adds_overlay_and_shadowed_text() {
    let mut d = design();
    d.masters.default.background_image = Some("photo.jpg".to_owned());
    let tree = layout_slide(&d, &five_slide_deck(), 2, &ctx()).unwrap();
    assert_eq!(tree.overlay, Some(MEDIA_OVERLAY));
    assert!(matches!(tree.background, SlideBackground::Media { .. }));
    assert!(tree.all_texts().all(|t| t.shadow));
    assert_eq!(tree.heading().unwrap().color, Color::WHITE);
}

#[test]
fn logo_box_and_page_number_avoid_each_other() {
    let mut d = design();
    d.logo = LogoSpecs {
        placement: LogoPlacement::BottomRight,
        images: Some(LogoImages {
            light: None,
            dark: Some("dark.svg".to_owned()),
        }),
        max_height: Some(40.0),
        ..LogoSpecs::default()
    };
    let tree = layout_slide(&d, &five_slide_deck(), 2, &ctx()).unwrap();
    let logo = tree.logo.as_ref().unwrap();
    assert_eq!(logo.bounds.height(), 40.0);
    assert_eq!(logo.bounds.x1, FRAME_WIDTH - 48.0);
    assert_eq!(logo.filter, LogoFilter::None);
    let pn = tree.page_number.as_ref().unwrap();
    assert_eq!(pn.align, TextAlign::Start);
    assert!(pn.region.x1 < logo.bounds.x0);

    let fitted = logo.fit(200.0, 100.0);
    assert_eq!(fitted.height(), 40.0);
    assert_eq!(fitted.width(), 80.0);
    assert_eq!(fitted.x1, logo.bounds.x1);
    assert_eq!(fitted.y1, logo.bounds.y1);
}

#[test]
fn every_type_dispatches_to_its_rule() {
    for ty in SlideType::ALL {
        let deck = PresentationData::new(
            "t",
            vec![Slide::new("a", ty, "Heading"), Slide::new("z", SlideType::Content, "z")],
        );
        let tree = layout_slide(&design(), &deck, 0, &ctx()).unwrap();
        assert_eq!(tree.variant, SlideVariant::from(ty));
        assert!(!tree.texts.is_empty());
    }
}

#[test]
fn layout_is_deterministic() {
    let a = layout_deck(&design(), &five_slide_deck(), &ctx());
    let b = layout_deck(&design(), &five_slide_deck(), &ctx());
    assert_eq!(a, b);
}
