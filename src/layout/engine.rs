use chrono::NaiveDate;

use crate::{
    foundation::{
        core::{Canvas, Color, FRAME_HEIGHT, FRAME_WIDTH, Rect},
        error::{SlideError, SlideResult},
    },
    layout::{
        measure::estimate_height,
        rules::{self, Composed, LayoutFn, PAD_X, RuleInput},
        tree::{
            FontRole, LogoRegion, RenderTree, SizeRole, SlideVariant, TextAlign, TextBlock,
            TextRole, VerticalAlign,
        },
    },
    model::{
        deck::{PresentationData, Slide, SlideType},
        design::{DesignSystem, LogoPlacement, PresentationSettings},
    },
    theme::resolver::{ResolvedLogo, ResolvedTheme, resolve},
};

/// Darkening layer painted over image and video backgrounds.
pub const MEDIA_OVERLAY: Color = Color::rgba(0, 0, 0, 102);

const LOGO_MARGIN: f64 = 48.0;
const LOGO_MAX_ASPECT: f64 = 6.0;
const PAGE_NUMBER_WIDTH: f64 = 240.0;
const PAGE_NUMBER_BOTTOM: f64 = 56.0;

/// Layout rules indexed by [`SlideType::index`].
const RULES: [LayoutFn; SlideType::ALL.len()] = [
    rules::title,
    rules::section,
    rules::content,
    rules::split_left,
    rules::split_right,
    rules::quote,
    rules::big_number,
];

/// Inputs to layout that do not come from the slide or its theme.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutContext {
    /// Date shown on the title slide.
    pub today: NaiveDate,
    /// Deck-wide settings.
    pub settings: PresentationSettings,
}

impl LayoutContext {
    /// Context dated with the local calendar day.
    pub fn new(settings: PresentationSettings) -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
            settings,
        }
    }

    /// Context for a design system's settings.
    pub fn for_design(design: &DesignSystem) -> Self {
        Self::new(design.settings.clone())
    }

    /// Pin the title-slide date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Lay out one slide with an already resolved theme.
pub fn layout(
    slide: &Slide,
    theme: &ResolvedTheme,
    position: usize,
    total: usize,
    ctx: &LayoutContext,
) -> RenderTree {
    // The closing slide replaces the slide's own rule before dispatch.
    let (variant, rule): (SlideVariant, LayoutFn) = if theme.is_end_slide {
        (SlideVariant::End, rules::end)
    } else {
        (slide.slide_type.into(), RULES[slide.slide_type.index()])
    };

    let Composed {
        shapes,
        images,
        texts,
    } = rule(&RuleInput { slide, theme, ctx });

    let overlay = theme.background.is_media().then_some(MEDIA_OVERLAY);
    let logo = theme.logo.as_ref().map(logo_region);
    let page_number = (ctx.settings.show_page_numbers && variant.shows_page_number())
        .then(|| page_number(position, total, theme, logo.as_ref()));

    RenderTree {
        slide_id: slide.id.clone(),
        variant,
        position,
        total,
        frame: Canvas::slide(),
        background: theme.background.clone(),
        overlay,
        shapes,
        images,
        texts,
        page_number,
        logo,
        fonts: theme.fonts.clone(),
    }
}

/// Resolve and lay out the slide at `position`.
pub fn layout_slide(
    design: &DesignSystem,
    deck: &PresentationData,
    position: usize,
    ctx: &LayoutContext,
) -> SlideResult<RenderTree> {
    let total = deck.len();
    let slide = deck.slides.get(position).ok_or_else(|| {
        SlideError::validation(format!("slide index {position} out of range (deck has {total})"))
    })?;
    let theme = resolve(slide, position, total, design);
    Ok(layout(slide, &theme, position, total, ctx))
}

/// Resolve and lay out every slide, in deck order.
pub fn layout_deck(
    design: &DesignSystem,
    deck: &PresentationData,
    ctx: &LayoutContext,
) -> Vec<RenderTree> {
    let total = deck.len();
    deck.slides
        .iter()
        .enumerate()
        .map(|(i, slide)| {
            let theme = resolve(slide, i, total, design);
            layout(slide, &theme, i, total, ctx)
        })
        .collect()
}

fn logo_region(logo: &ResolvedLogo) -> LogoRegion {
    let h = logo.max_height;
    let w = h * LOGO_MAX_ASPECT;
    let (x0, y0) = match logo.placement {
        LogoPlacement::TopLeft | LogoPlacement::None => (LOGO_MARGIN, LOGO_MARGIN),
        LogoPlacement::TopRight => (FRAME_WIDTH - LOGO_MARGIN - w, LOGO_MARGIN),
        LogoPlacement::BottomLeft => (LOGO_MARGIN, FRAME_HEIGHT - LOGO_MARGIN - h),
        LogoPlacement::BottomRight => (FRAME_WIDTH - LOGO_MARGIN - w, FRAME_HEIGHT - LOGO_MARGIN - h),
        LogoPlacement::TopCenter => ((FRAME_WIDTH - w) / 2.0, LOGO_MARGIN),
    };
    LogoRegion {
        source: logo.source.clone(),
        variant: logo.variant,
        filter: logo.filter,
        placement: logo.placement,
        bounds: Rect::new(x0, y0, x0 + w, y0 + h),
    }
}

fn page_number(
    position: usize,
    total: usize,
    theme: &ResolvedTheme,
    logo: Option<&LogoRegion>,
) -> TextBlock {
    let text = format!("{} / {}", position + 1, total);
    let h = estimate_height(&text, SizeRole::Caption, PAGE_NUMBER_WIDTH);
    let y0 = FRAME_HEIGHT - PAGE_NUMBER_BOTTOM - h;
    let logo_bottom_right = logo.is_some_and(|l| l.placement == LogoPlacement::BottomRight);
    let (x0, align) = if logo_bottom_right {
        (PAD_X, TextAlign::Start)
    } else {
        (FRAME_WIDTH - PAD_X - PAGE_NUMBER_WIDTH, TextAlign::End)
    };
    TextBlock {
        role: TextRole::Caption,
        text,
        font: FontRole::Body,
        size: SizeRole::Caption,
        color: theme.text_color.with_opacity(0.6),
        region: Rect::new(x0, y0, x0 + PAGE_NUMBER_WIDTH, y0 + h),
        align,
        v_align: VerticalAlign::Top,
        bold: false,
        italic: false,
        shadow: theme.text_shadow,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
