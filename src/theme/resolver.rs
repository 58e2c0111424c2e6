use serde::Serialize;

use crate::{
    foundation::{
        color::{Fill, parse_color},
        core::Color,
    },
    model::{
        deck::{Slide, SlideType},
        design::{
            BackgroundMedia, DesignSystem, FontPair, LogoPlacement, MasterKind, MasterSlideStyle,
        },
    },
};

/// Logo height used when the design does not cap it.
pub const DEFAULT_LOGO_MAX_HEIGHT: f64 = 48.0;

/// Background actually painted behind a slide.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlideBackground {
    /// Color or gradient.
    Fill {
        /// Parsed expression.
        fill: Fill,
    },
    /// Still image or video.
    Media {
        /// Media reference.
        media: BackgroundMedia,
    },
}

impl SlideBackground {
    /// Whether an image or video is behind the text.
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Media { .. })
    }
}

/// Which logo artwork was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoVariant {
    /// Light artwork.
    Light,
    /// Dark artwork.
    Dark,
}

/// Filter applied to the logo so it stays visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoFilter {
    /// Draw as-is.
    #[default]
    None,
    /// Invert the color channels.
    Invert,
}

/// Logo decision for one slide.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedLogo {
    /// Chosen artwork.
    pub variant: LogoVariant,
    /// Reference of the chosen artwork.
    pub source: String,
    /// Visibility filter.
    pub filter: LogoFilter,
    /// Corner.
    pub placement: LogoPlacement,
    /// Maximum height in frame units.
    pub max_height: f64,
}

/// Everything the layout engine needs to know about a slide's styling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedTheme {
    /// Master record that styled the slide.
    pub master_kind: MasterKind,
    /// Effective master (section fields already merged with the title master).
    pub master: MasterSlideStyle,
    /// Painted background.
    pub background: SlideBackground,
    /// Text color after the contrast override.
    pub text_color: Color,
    /// Accent color.
    pub accent_color: Color,
    /// Drop shadow under text.
    pub text_shadow: bool,
    /// Logo decision, if any logo is drawn.
    pub logo: Option<ResolvedLogo>,
    /// Whether this is the closing slide.
    pub is_end_slide: bool,
    /// Font families.
    pub fonts: FontPair,
}

/// `true` for the last slide of a deck with more than one slide.
pub fn is_end_slide(position: usize, total: usize) -> bool {
    total > 1 && position + 1 == total
}

/// Resolve the master, colors and logo of `slide` at `position` in a deck of `total` slides.
pub fn resolve(slide: &Slide, position: usize, total: usize, design: &DesignSystem) -> ResolvedTheme {
    let is_end = is_end_slide(position, total);

    let (master_kind, master) = if is_end || slide.slide_type == SlideType::Title {
        (MasterKind::Title, design.masters.title.clone())
    } else if slide.slide_type == SlideType::Section {
        let (kind, m) = design.masters.section_or_title();
        (kind, m.into_owned())
    } else {
        (MasterKind::Default, design.masters.default.clone())
    };

    let background = match master.active_media() {
        Some(media) => SlideBackground::Media { media },
        None => {
            let expr = master
                .background
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(&design.colors.background);
            SlideBackground::Fill {
                fill: Fill::parse(expr),
            }
        }
    };

    let (text_color, text_shadow) = if background.is_media() {
        (Color::WHITE, true)
    } else {
        let color = first_color(&[master.text_color.as_deref(), Some(&design.colors.text)])
            .unwrap_or(Color::BLACK);
        (color, false)
    };

    let accent_color = first_color(&[
        master.accent_color.as_deref(),
        Some(&design.colors.accent),
        Some(&design.colors.primary),
    ])
    .unwrap_or(text_color);

    let logo = resolve_logo(design, text_color);

    ResolvedTheme {
        master_kind,
        master,
        background,
        text_color,
        accent_color,
        text_shadow,
        logo,
        is_end_slide: is_end,
        fonts: design.fonts.clone(),
    }
}

fn first_color(candidates: &[Option<&str>]) -> Option<Color> {
    candidates
        .iter()
        .flatten()
        .find_map(|s| parse_color(s).ok())
}

/// Pick the logo artwork that stays visible against the slide.
///
/// White text means a dark background, which wants the light artwork. When only the
/// mismatched artwork exists it is drawn inverted.
fn resolve_logo(design: &DesignSystem, text_color: Color) -> Option<ResolvedLogo> {
    let placement = design.logo.placement;
    if placement == LogoPlacement::None {
        return None;
    }

    let light = design.logo.light_asset();
    let dark = design.logo.dark_asset();
    let wants_light = text_color == Color::WHITE;

    let (variant, source, filter) = match (wants_light, light, dark) {
        (true, Some(src), _) => (LogoVariant::Light, src, LogoFilter::None),
        (true, None, Some(src)) => (LogoVariant::Dark, src, LogoFilter::Invert),
        (false, _, Some(src)) => (LogoVariant::Dark, src, LogoFilter::None),
        (false, Some(src), None) => (LogoVariant::Light, src, LogoFilter::Invert),
        (_, None, None) => return None,
    };

    let max_height = design
        .logo
        .max_height
        .filter(|h| h.is_finite() && *h > 0.0)
        .unwrap_or(DEFAULT_LOGO_MAX_HEIGHT);

    Some(ResolvedLogo {
        variant,
        source: source.to_owned(),
        filter,
        placement,
        max_height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/theme/resolver.rs"]
mod tests;
