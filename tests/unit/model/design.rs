use super::*;

fn style(bg: &str) -> MasterSlideStyle {
    MasterSlideStyle {
        background: Some(bg.to_owned()),
        ..MasterSlideStyle::default()
    }
}

#[test]
fn deserializes_camel_case_design() {
    let json = r##"{
        "name": "Modern Blue",
        "colors": {"background": "#0F172A", "text": "#F8FAFC", "primary": "#2563EB",
                   "secondary": "#64748B", "accent": "#38BDF8"},
        "fonts": {"heading": "Montserrat", "body": "Open Sans"},
        "logo": {"placement": "bottom-right", "style": "light",
                 "images": {"light": "logo-light.png"}, "maxHeight": 40},
        "masters": {
            "title": {"background": "#000000", "textColor": "#FFFFFF", "backgroundImage": "hero.jpg"},
            "default": {"background": "#FFFFFF", "textColor": "#111111", "accentColor": "#FF0000"}
        },
        "vibe": "calm",
        "settings": {"showPageNumbers": false, "endSlideAlign": "left"}
    }"##;
    let ds: DesignSystem = serde_json::from_str(json).unwrap();
    assert_eq!(ds.name, "Modern Blue");
    assert_eq!(ds.fonts.body, "Open Sans");
    assert_eq!(ds.logo.placement, LogoPlacement::BottomRight);
    assert_eq!(ds.logo.style, LogoStyle::Light);
    assert_eq!(ds.logo.max_height, Some(40.0));
    assert_eq!(ds.logo.light_asset(), Some("logo-light.png"));
    assert_eq!(ds.logo.dark_asset(), None);
    assert!(ds.masters.section.is_none());
    assert_eq!(
        ds.masters.title.background_image.as_deref(),
        Some("hero.jpg")
    );
    assert!(!ds.settings.show_page_numbers);
    assert_eq!(ds.settings.end_slide_align, EndSlideAlign::Left);
}

#[test]
fn placement_accepts_camel_case_alias() {
    let p: LogoPlacement = serde_json::from_str("\"topCenter\"").unwrap();
    assert_eq!(p, LogoPlacement::TopCenter);
    let p: LogoPlacement = serde_json::from_str("\"none\"").unwrap();
    assert_eq!(p, LogoPlacement::None);
}

#[test]
fn video_wins_over_image_and_blank_refs_are_ignored() {
    let mut m = style("#fff");
    assert_eq!(m.active_media(), None);

    m.background_image = Some("a.png".to_owned());
    assert_eq!(
        m.active_media(),
        Some(BackgroundMedia::Image("a.png".to_owned()))
    );

    m.background_video = Some("  ".to_owned());
    assert_eq!(
        m.active_media(),
        Some(BackgroundMedia::Image("a.png".to_owned()))
    );

    m.background_video = Some("clip.mp4".to_owned());
    assert_eq!(
        m.active_media(),
        Some(BackgroundMedia::Video("clip.mp4".to_owned()))
    );
}

#[test]
fn section_falls_back_to_title_on_read() {
    let mut masters = Masters {
        title: MasterSlideStyle {
            text_color: Some("#ABCDEF".to_owned()),
            ..style("#000")
        },
        section: None,
        default: style("#fff"),
    };
    let (kind, effective) = masters.section_or_title();
    assert_eq!(kind, MasterKind::Title);
    assert_eq!(*effective, masters.title);

    masters.section = Some(MasterSlideStyle {
        accent_color: Some("#00FF00".to_owned()),
        ..MasterSlideStyle::default()
    });
    let (kind, effective) = masters.section_or_title();
    assert_eq!(kind, MasterKind::Section);
    assert_eq!(effective.accent_color.as_deref(), Some("#00FF00"));
    assert_eq!(effective.text_color.as_deref(), Some("#ABCDEF"));
    assert_eq!(effective.background.as_deref(), Some("#000"));

    // Nothing merged is written back.
    assert_eq!(masters.section.as_ref().unwrap().text_color, None);
}

#[test]
fn section_background_is_inherited_as_a_whole() {
    let title = MasterSlideStyle {
        background_image: Some("hero.png".to_owned()),
        ..style("#000")
    };

    let own = MasterSlideStyle {
        text_color: Some("#000000".to_owned()),
        ..style("#FFFFFF")
    }
    .with_fallback(&title);
    assert_eq!(own.background.as_deref(), Some("#FFFFFF"));
    assert_eq!(own.background_image, None);
    assert_eq!(own.active_media(), None);

    let inherited = MasterSlideStyle {
        background_image: Some("   ".to_owned()),
        ..MasterSlideStyle::default()
    }
    .with_fallback(&title);
    assert_eq!(inherited.background.as_deref(), Some("#000"));
    assert_eq!(inherited.background_image.as_deref(), Some("hero.png"));
}

#[test]
fn defaults_are_usable() {
    let ds = DesignSystem::default();
    assert!(ds.settings.show_page_numbers);
    assert_eq!(ds.logo.placement, LogoPlacement::TopRight);
    assert_eq!(ds.colors.background, "#FFFFFF");
}
