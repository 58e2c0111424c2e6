use serde::{Deserialize, Serialize};

/// The seven slide layouts the upstream collaborator may request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideType {
    /// Opening slide.
    Title,
    /// Section divider.
    Section,
    /// Heading plus bullets, optional image.
    #[default]
    Content,
    /// Image on the left half, text on the right.
    SplitLeft,
    /// Image on the right half, text on the left.
    SplitRight,
    /// Centered quotation.
    Quote,
    /// Oversized statistic.
    BigNumber,
}

impl SlideType {
    /// Every slide type in dispatch order.
    pub const ALL: [SlideType; 7] = [
        SlideType::Title,
        SlideType::Section,
        SlideType::Content,
        SlideType::SplitLeft,
        SlideType::SplitRight,
        SlideType::Quote,
        SlideType::BigNumber,
    ];

    /// Position of this type in [`SlideType::ALL`].
    pub const fn index(self) -> usize {
        match self {
            SlideType::Title => 0,
            SlideType::Section => 1,
            SlideType::Content => 2,
            SlideType::SplitLeft => 3,
            SlideType::SplitRight => 4,
            SlideType::Quote => 5,
            SlideType::BigNumber => 6,
        }
    }

    /// Wire name (`"splitLeft"`, `"bigNumber"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            SlideType::Title => "title",
            SlideType::Section => "section",
            SlideType::Content => "content",
            SlideType::SplitLeft => "splitLeft",
            SlideType::SplitRight => "splitRight",
            SlideType::Quote => "quote",
            SlideType::BigNumber => "bigNumber",
        }
    }

    /// Parse a wire name, case-insensitively and tolerant of `-`/`_` separators.
    pub fn from_wire(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        SlideType::ALL
            .into_iter()
            .find(|t| t.as_str().to_ascii_lowercase() == key)
    }
}

/// One structured slide record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Unique id within the deck; keys placeholder imagery.
    pub id: String,
    /// Layout type.
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    /// Main heading.
    pub title: String,
    /// Secondary line (subtitle, attribution or caption depending on type).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Ordered bullet items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<String>>,
    /// Keyword describing illustrative imagery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_keyword: Option<String>,
    /// Focal text (quote body or big number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

impl Slide {
    /// Minimal slide with an id, type and title.
    pub fn new(id: impl Into<String>, slide_type: SlideType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slide_type,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Bullet items, empty when absent.
    pub fn bullets(&self) -> &[String] {
        self.content.as_deref().unwrap_or(&[])
    }

    pub(crate) fn subtitle_text(&self) -> Option<&str> {
        non_blank(self.subtitle.as_deref())
    }

    pub(crate) fn highlight_text(&self) -> Option<&str> {
        non_blank(self.highlight.as_deref())
    }

    pub(crate) fn image_keyword_text(&self) -> Option<&str> {
        non_blank(self.image_keyword.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// A whole deck: topic plus ordered slides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationData {
    /// Deck topic.
    #[serde(default)]
    pub topic: String,
    /// Slides in presentation order.
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl PresentationData {
    /// Build a deck from a topic and slides.
    pub fn new(topic: impl Into<String>, slides: Vec<Slide>) -> Self {
        Self {
            topic: topic.into(),
            slides,
        }
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index of the closing slide: the last one, but only in decks of two or more.
    pub fn end_index(&self) -> Option<usize> {
        (self.slides.len() > 1).then(|| self.slides.len() - 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/deck.rs"]
mod tests;
