use std::{collections::HashMap, sync::Arc};

use crate::foundation::error::{SlideError, SlideResult};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Horizontal alignment handed to Parley.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineAlign {
    /// Left.
    Start,
    /// Centered.
    Center,
    /// Right.
    End,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
///
/// Not `Sync`: create one per rendering thread.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<usize, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, font_bytes: &Arc<Vec<u8>>) -> SlideResult<String> {
        let key = Arc::as_ptr(font_bytes) as usize;
        if let Some(name) = self.registered.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SlideError::asset_load("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SlideError::asset_load("registered font family has no name"))?
            .to_string();
        self.registered.insert(key, family_name.clone());
        Ok(family_name)
    }

    /// Shape and lay out `text`, wrapping at `max_width_px`.
    pub fn layout(
        &mut self,
        text: &str,
        font_bytes: &Arc<Vec<u8>>,
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: f32,
        align: LineAlign,
    ) -> SlideResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SlideError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        let w = max_width_px.max(1.0);
        layout.break_all_lines(Some(w));
        let alignment = match align {
            LineAlign::Start => parley::Alignment::Start,
            LineAlign::Center => parley::Alignment::Center,
            LineAlign::End => parley::Alignment::End,
        };
        layout.align(Some(w), alignment, parley::AlignmentOptions::default());

        Ok(layout)
    }
}

/// Total height of a laid-out block, from line metrics.
pub fn layout_height(layout: &parley::Layout<TextBrushRgba8>) -> f32 {
    layout
        .lines()
        .map(|line| {
            let m = line.metrics();
            m.ascent + m.descent + m.leading
        })
        .sum()
}
