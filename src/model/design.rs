use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Complete visual language of a deck.
///
/// Produced once per session (usually by the upstream collaborator) and then shared
/// read-only between the live view and both exporters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSystem {
    /// Human-readable theme name; also used to derive export file names.
    pub name: String,
    /// Palette of hex colors.
    pub colors: Palette,
    /// Heading/body font families.
    pub fonts: FontPair,
    /// Logo rules and assets.
    pub logo: LogoSpecs,
    /// Per-slide-type master styles.
    pub masters: Masters,
    /// Free-form mood description.
    pub vibe: String,
    /// Deck-wide presentation settings.
    pub settings: PresentationSettings,
}

/// Base palette. Every entry is a color expression (usually `#RRGGBB`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    /// Default slide background.
    pub background: String,
    /// Default text color.
    pub text: String,
    /// Primary brand color.
    pub primary: String,
    /// Secondary brand color.
    pub secondary: String,
    /// Accent used for bars, bullets and focal numbers.
    pub accent: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_owned(),
            text: "#111827".to_owned(),
            primary: "#2563EB".to_owned(),
            secondary: "#64748B".to_owned(),
            accent: "#F59E0B".to_owned(),
        }
    }
}

/// Heading and body font families.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPair {
    /// Family used for headings and focal text.
    pub heading: String,
    /// Family used for body text and captions.
    pub body: String,
}

impl Default for FontPair {
    fn default() -> Self {
        Self {
            heading: "Inter".to_owned(),
            body: "Inter".to_owned(),
        }
    }
}

/// Where the logo sits on a slide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogoPlacement {
    /// Top-left corner.
    #[serde(rename = "top-left", alias = "topLeft")]
    TopLeft,
    /// Top-right corner.
    #[default]
    #[serde(rename = "top-right", alias = "topRight")]
    TopRight,
    /// Bottom-left corner.
    #[serde(rename = "bottom-left", alias = "bottomLeft")]
    BottomLeft,
    /// Bottom-right corner.
    #[serde(rename = "bottom-right", alias = "bottomRight")]
    BottomRight,
    /// Centered along the top edge.
    #[serde(rename = "top-center", alias = "topCenter")]
    TopCenter,
    /// No logo on any slide.
    #[serde(rename = "none")]
    None,
}

/// Declared tone of the uploaded logo artwork.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoStyle {
    /// Dark artwork meant for light backgrounds.
    Dark,
    /// Light artwork meant for dark backgrounds.
    Light,
    /// Full-color artwork.
    #[default]
    Color,
}

/// Logo variants for light and dark backgrounds.
///
/// `light` is the light-colored artwork (for dark backgrounds), `dark` the dark-colored one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoImages {
    /// Light artwork reference (`data:` URL or path under the assets root).
    pub light: Option<String>,
    /// Dark artwork reference.
    pub dark: Option<String>,
}

/// Logo rules of a design system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoSpecs {
    /// Corner (or none).
    pub placement: LogoPlacement,
    /// Declared artwork tone.
    pub style: LogoStyle,
    /// Embedded artwork.
    pub images: Option<LogoImages>,
    /// Maximum rendered height in frame units.
    pub max_height: Option<f64>,
}

impl LogoSpecs {
    pub(crate) fn light_asset(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|i| i.light.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    pub(crate) fn dark_asset(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|i| i.dark.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Visual rules for one family of slides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasterSlideStyle {
    /// Color or gradient expression.
    pub background: Option<String>,
    /// Still image background reference.
    pub background_image: Option<String>,
    /// Video background reference.
    pub background_video: Option<String>,
    /// Text color expression.
    pub text_color: Option<String>,
    /// Accent color expression.
    pub accent_color: Option<String>,
    /// Free-form ornament hint carried through to the live view.
    pub ornament: Option<String>,
}

/// A media background that overrides the color background.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum BackgroundMedia {
    /// Still image.
    Image(String),
    /// Video (rendered as its first frame off-screen).
    Video(String),
}

impl MasterSlideStyle {
    /// Active media background. Video wins over image; empty references are ignored.
    pub fn active_media(&self) -> Option<BackgroundMedia> {
        fn present(s: &Option<String>) -> Option<String> {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        }
        present(&self.background_video)
            .map(BackgroundMedia::Video)
            .or_else(|| present(&self.background_image).map(BackgroundMedia::Image))
    }

    /// Whether any of the color, image or video backgrounds is set.
    pub fn has_background(&self) -> bool {
        [&self.background, &self.background_image, &self.background_video]
            .into_iter()
            .any(|s| s.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Fill every unset field from `base`.
    ///
    /// The three background fields form one slot: they are taken from `base` together, and
    /// only when none of them is set here.
    pub fn with_fallback(&self, base: &MasterSlideStyle) -> MasterSlideStyle {
        fn pick(a: &Option<String>, b: &Option<String>) -> Option<String> {
            a.clone().or_else(|| b.clone())
        }
        let bg = if self.has_background() { self } else { base };
        MasterSlideStyle {
            background: bg.background.clone(),
            background_image: bg.background_image.clone(),
            background_video: bg.background_video.clone(),
            text_color: pick(&self.text_color, &base.text_color),
            accent_color: pick(&self.accent_color, &base.accent_color),
            ornament: pick(&self.ornament, &base.ornament),
        }
    }
}

/// Which master record styled a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MasterKind {
    /// Title master (also used for the end slide and section fallback).
    Title,
    /// Section master.
    Section,
    /// Default master.
    Default,
}

/// The three master records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Masters {
    /// Title master.
    pub title: MasterSlideStyle,
    /// Section master; falls back to `title` when absent.
    pub section: Option<MasterSlideStyle>,
    /// Master for every other slide.
    pub default: MasterSlideStyle,
}

impl Masters {
    /// Effective section master. The fallback is computed on read and never stored.
    pub fn section_or_title(&self) -> (MasterKind, Cow<'_, MasterSlideStyle>) {
        match &self.section {
            Some(section) => (
                MasterKind::Section,
                Cow::Owned(section.with_fallback(&self.title)),
            ),
            None => (MasterKind::Title, Cow::Borrowed(&self.title)),
        }
    }
}

/// Alignment of the closing block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndSlideAlign {
    /// Centered in the frame.
    #[default]
    Center,
    /// Left-anchored, like the title slide.
    Left,
}

/// Deck-wide presentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresentationSettings {
    /// Show `n / total` captions on regular slides.
    pub show_page_numbers: bool,
    /// Locale used for the title slide date caption.
    pub date_locale: Option<String>,
    /// Closing title; `"Thank You!"` when unset.
    pub end_slide_title: Option<String>,
    /// Closing subtitle or team line; falls back to the end slide's own subtitle.
    pub end_slide_subtitle: Option<String>,
    /// Closing block alignment.
    pub end_slide_align: EndSlideAlign,
    /// Content language hint handed to the upstream collaborator.
    pub language: Option<String>,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            show_page_numbers: true,
            date_locale: None,
            end_slide_title: None,
            end_slide_subtitle: None,
            end_slide_align: EndSlideAlign::Center,
            language: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/design.rs"]
mod tests;
