//! Boundary to the collaborator that extracts a design and writes slide content.
//!
//! Responses are treated as untrusted text. Parsing is lenient: markdown fences are stripped,
//! malformed fields fall back to defaults and broken slide records are repaired or skipped.
//! Only a response with no usable structure at all is an error.

use std::{collections::HashSet, path::Path};

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    foundation::error::{SlideError, SlideResult},
    model::{
        deck::{PresentationData, Slide, SlideType},
        design::DesignSystem,
    },
};

/// The external design-analysis and content-generation service.
pub trait DeckGenerator: Send + Sync {
    /// Extract a design system from an uploaded template (image or document bytes).
    fn analyze_design(&self, bytes: &[u8], mime: &str) -> SlideResult<DesignSystem>;

    /// Write slides about `topic` for a design described by `design_summary`.
    fn generate_content(&self, topic: &str, design_summary: &str) -> SlideResult<Vec<Slide>>;
}

/// Run both collaborator calls and assemble a deck.
#[tracing::instrument(skip(generator, bytes), fields(bytes = bytes.len()))]
pub fn generate_deck(
    generator: &dyn DeckGenerator,
    bytes: &[u8],
    mime: &str,
    topic: &str,
) -> SlideResult<(DesignSystem, PresentationData)> {
    let design = generator.analyze_design(bytes, mime)?;
    let slides = generator.generate_content(topic, &design_summary(&design))?;
    if slides.is_empty() {
        return Err(SlideError::upstream("content generation returned no slides"));
    }
    Ok((design, PresentationData::new(topic, slides)))
}

/// Short text description of a design, passed along to content generation.
pub fn design_summary(design: &DesignSystem) -> String {
    let mut parts = Vec::new();
    if !design.name.trim().is_empty() {
        parts.push(format!("Theme: {}", design.name.trim()));
    }
    if !design.vibe.trim().is_empty() {
        parts.push(format!("Mood: {}", design.vibe.trim()));
    }
    parts.push(format!(
        "Fonts: {} / {}",
        design.fonts.heading, design.fonts.body
    ));
    parts.push(format!(
        "Colors: background {}, text {}, accent {}",
        design.colors.background, design.colors.text, design.colors.accent
    ));
    parts.join(". ")
}

/// Strip a surrounding markdown code fence (with optional language tag).
pub fn strip_code_fences(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    // Drop the info string (`json`, `JSON`, ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_json(text: &str, what: &str) -> SlideResult<Value> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(SlideError::upstream(format!("{what} response was empty")));
    }
    serde_json::from_str(body)
        .map_err(|e| SlideError::upstream(format!("{what} response is not JSON: {e}")))
}

fn field_or_default<T: DeserializeOwned + Default>(obj: &Map<String, Value>, key: &str) -> T {
    match obj.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
            tracing::debug!(field = key, error = %e, "malformed field replaced by its default");
            T::default()
        }),
    }
}

/// Parse a design-analysis response. Each top-level field that fails to parse is defaulted.
pub fn parse_design_response(text: &str) -> SlideResult<DesignSystem> {
    let value = parse_json(text, "design")?;
    let Value::Object(obj) = value else {
        return Err(SlideError::upstream("design response is not a JSON object"));
    };
    Ok(DesignSystem {
        name: field_or_default(&obj, "name"),
        colors: field_or_default(&obj, "colors"),
        fonts: field_or_default(&obj, "fonts"),
        logo: field_or_default(&obj, "logo"),
        masters: field_or_default(&obj, "masters"),
        vibe: field_or_default(&obj, "vibe"),
        settings: field_or_default(&obj, "settings"),
    })
}

fn opt_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn bullets(obj: &Map<String, Value>) -> Option<Vec<String>> {
    let items: Vec<String> = match obj.get("content")? {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s
            .lines()
            .map(|l| l.trim().trim_start_matches(['-', '*', '•']).trim())
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    };
    (!items.is_empty()).then_some(items)
}

/// `slide-<n>`, or the first `slide-<k>` after it that no earlier slide uses.
fn generated_id(n: usize, seen: &HashSet<String>) -> String {
    let mut k = n;
    loop {
        let id = format!("slide-{k}");
        if !seen.contains(&id) {
            return id;
        }
        k += 1;
    }
}

/// Parse a content-generation response: a JSON array of slides, or an object with a
/// `slides` array.
///
/// Missing or duplicate ids become `slide-<n>` (1-based position, skipping ids already taken),
/// unknown types become
/// `content` and non-object entries are skipped. No usable slides is an error.
pub fn parse_slides_response(text: &str) -> SlideResult<Vec<Slide>> {
    let value = parse_json(text, "slides")?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("slides") {
            Some(Value::Array(items)) => items,
            _ => return Err(SlideError::upstream("slides response has no `slides` array")),
        },
        _ => return Err(SlideError::upstream("slides response is not a JSON array")),
    };

    let mut seen = HashSet::new();
    let mut slides = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let Value::Object(obj) = item else {
            tracing::debug!(index = i, "non-object slide record skipped");
            continue;
        };
        let n = slides.len() + 1;

        let id = match opt_text(&obj, "id") {
            Some(id) if !seen.contains(&id) => id,
            _ => generated_id(n, &seen),
        };
        seen.insert(id.clone());

        let slide_type = match obj.get("type").and_then(Value::as_str) {
            Some(t) => SlideType::from_wire(t).unwrap_or_else(|| {
                tracing::debug!(slide = %id, kind = t, "unknown slide type; using content");
                SlideType::Content
            }),
            None => SlideType::Content,
        };

        slides.push(Slide {
            id,
            slide_type,
            title: opt_text(&obj, "title").unwrap_or_default(),
            subtitle: opt_text(&obj, "subtitle"),
            content: bullets(&obj),
            image_keyword: opt_text(&obj, "imageKeyword"),
            highlight: opt_text(&obj, "highlight"),
        });
    }

    if slides.is_empty() {
        return Err(SlideError::upstream("slides response contained no slides"));
    }
    Ok(slides)
}

/// Offline generator answering from stored JSON responses.
#[derive(Clone, Debug, Default)]
pub struct JsonGenerator {
    design: String,
    slides: String,
}

impl JsonGenerator {
    /// Generator over in-memory responses.
    pub fn new(design_json: impl Into<String>, slides_json: impl Into<String>) -> Self {
        Self {
            design: design_json.into(),
            slides: slides_json.into(),
        }
    }

    /// Generator over response files.
    pub fn from_files(design: &Path, slides: &Path) -> SlideResult<Self> {
        let design = std::fs::read_to_string(design)
            .with_context(|| format!("read design response '{}'", design.display()))?;
        let slides = std::fs::read_to_string(slides)
            .with_context(|| format!("read slides response '{}'", slides.display()))?;
        Ok(Self::new(design, slides))
    }
}

impl DeckGenerator for JsonGenerator {
    fn analyze_design(&self, _bytes: &[u8], _mime: &str) -> SlideResult<DesignSystem> {
        parse_design_response(&self.design)
    }

    fn generate_content(&self, _topic: &str, _design_summary: &str) -> SlideResult<Vec<Slide>> {
        parse_slides_response(&self.slides)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/upstream/mod.rs"]
mod tests;
