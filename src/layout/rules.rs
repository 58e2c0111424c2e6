//! Per-type layout rules. Each rule is a pure function of the slide, its resolved theme and
//! the layout context.

use crate::{
    foundation::core::{Color, FRAME_HEIGHT, FRAME_WIDTH, Rect},
    layout::{
        dates::format_long_date,
        engine::LayoutContext,
        measure::estimate_height,
        tree::{
            FontRole, ImageRegion, ShapeKind, ShapeNode, ShapeRole, SizeRole, TextAlign,
            TextBlock, TextRole, VerticalAlign,
        },
    },
    model::{deck::Slide, design::EndSlideAlign},
    theme::resolver::ResolvedTheme,
};

pub(crate) const PAD_X: f64 = 128.0;
pub(crate) const PAD_Y: f64 = 96.0;
const HALF_COLUMN: f64 = 1000.0;
const BULLET_GAP: f64 = 24.0;
const BULLET_DOT: f64 = 14.0;
const BULLET_INDENT: f64 = 40.0;

/// Closing title used when the design does not set one.
pub const DEFAULT_END_TITLE: &str = "Thank You!";
/// Focal text of a big-number slide without a highlight.
pub const DEFAULT_BIG_NUMBER: &str = "100%";

pub(crate) struct RuleInput<'a> {
    pub(crate) slide: &'a Slide,
    pub(crate) theme: &'a ResolvedTheme,
    pub(crate) ctx: &'a LayoutContext,
}

#[derive(Debug, Default)]
pub(crate) struct Composed {
    pub(crate) shapes: Vec<ShapeNode>,
    pub(crate) images: Vec<ImageRegion>,
    pub(crate) texts: Vec<TextBlock>,
}

pub(crate) type LayoutFn = fn(&RuleInput<'_>) -> Composed;

struct TextSpec {
    role: TextRole,
    text: String,
    font: FontRole,
    size: SizeRole,
    color: Color,
    bold: bool,
    italic: bool,
}

enum Piece {
    Text(TextSpec),
    Bar {
        width: f64,
        height: f64,
        color: Color,
        role: ShapeRole,
    },
    Bullets {
        items: Vec<String>,
        color: Color,
        accent: Color,
    },
    Gap(f64),
}

/// A measured column of pieces, placed top to bottom.
struct Stack {
    x: f64,
    width: f64,
    align: TextAlign,
    shadow: bool,
    pieces: Vec<Piece>,
}

impl Stack {
    fn new(x: f64, width: f64, align: TextAlign, theme: &ResolvedTheme) -> Self {
        Self {
            x,
            width,
            align,
            shadow: theme.text_shadow,
            pieces: Vec::new(),
        }
    }

    fn text(mut self, spec: TextSpec) -> Self {
        self.pieces.push(Piece::Text(spec));
        self
    }

    fn gap(mut self, h: f64) -> Self {
        self.pieces.push(Piece::Gap(h));
        self
    }

    fn bar(mut self, width: f64, height: f64, color: Color, role: ShapeRole) -> Self {
        self.pieces.push(Piece::Bar {
            width,
            height,
            color,
            role,
        });
        self
    }

    fn bullets(mut self, items: &[String], color: Color, accent: Color) -> Self {
        let items: Vec<String> = items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        if !items.is_empty() {
            self.pieces.push(Piece::Bullets {
                items,
                color,
                accent,
            });
        }
        self
    }

    fn bullet_text_width(&self) -> f64 {
        (self.width - BULLET_INDENT).max(1.0)
    }

    fn height(&self) -> f64 {
        self.pieces
            .iter()
            .map(|p| match p {
                Piece::Text(t) => estimate_height(&t.text, t.size, self.width),
                Piece::Bar { height, .. } => *height,
                Piece::Gap(h) => *h,
                Piece::Bullets { items, .. } => {
                    let w = self.bullet_text_width();
                    let sum: f64 = items
                        .iter()
                        .map(|s| estimate_height(s, SizeRole::Body, w))
                        .sum();
                    sum + BULLET_GAP * (items.len().saturating_sub(1)) as f64
                }
            })
            .sum()
    }

    fn place(self, top: f64, out: &mut Composed) -> f64 {
        let mut y = top;
        let bullet_w = self.bullet_text_width();
        for piece in self.pieces {
            match piece {
                Piece::Gap(h) => y += h,
                Piece::Bar {
                    width,
                    height,
                    color,
                    role,
                } => {
                    let x0 = match self.align {
                        TextAlign::Start => self.x,
                        TextAlign::Center => self.x + (self.width - width) / 2.0,
                        TextAlign::End => self.x + self.width - width,
                    };
                    out.shapes.push(ShapeNode {
                        kind: ShapeKind::Rect,
                        role,
                        region: Rect::new(x0, y, x0 + width, y + height),
                        color,
                    });
                    y += height;
                }
                Piece::Text(spec) => {
                    let h = estimate_height(&spec.text, spec.size, self.width);
                    out.texts.push(TextBlock {
                        role: spec.role,
                        text: spec.text,
                        font: spec.font,
                        size: spec.size,
                        color: spec.color,
                        region: Rect::new(self.x, y, self.x + self.width, y + h),
                        align: self.align,
                        v_align: VerticalAlign::Top,
                        bold: spec.bold,
                        italic: spec.italic,
                        shadow: self.shadow,
                    });
                    y += h;
                }
                Piece::Bullets {
                    items,
                    color,
                    accent,
                } => {
                    let line_h = SizeRole::Body.px() * SizeRole::Body.line_height();
                    let count = items.len();
                    for (i, item) in items.into_iter().enumerate() {
                        let h = estimate_height(&item, SizeRole::Body, bullet_w);
                        let cy = y + line_h / 2.0;
                        out.shapes.push(ShapeNode {
                            kind: ShapeKind::Circle,
                            role: ShapeRole::BulletDot,
                            region: Rect::new(
                                self.x,
                                cy - BULLET_DOT / 2.0,
                                self.x + BULLET_DOT,
                                cy + BULLET_DOT / 2.0,
                            ),
                            color: accent,
                        });
                        let x0 = self.x + BULLET_INDENT;
                        out.texts.push(TextBlock {
                            role: TextRole::BodyBullet,
                            text: item,
                            font: FontRole::Body,
                            size: SizeRole::Body,
                            color,
                            region: Rect::new(x0, y, x0 + bullet_w, y + h),
                            align: TextAlign::Start,
                            v_align: VerticalAlign::Top,
                            bold: false,
                            italic: false,
                            shadow: self.shadow,
                        });
                        y += h;
                        if i + 1 < count {
                            y += BULLET_GAP;
                        }
                    }
                }
            }
        }
        y
    }

    /// Place the stack centered vertically between `top` and `bottom`.
    fn place_centered(self, top: f64, bottom: f64, out: &mut Composed) {
        let h = self.height();
        let y = (top + (bottom - top - h) / 2.0).max(top);
        self.place(y, out);
    }
}

fn heading(text: &str, size: SizeRole, color: Color) -> TextSpec {
    TextSpec {
        role: TextRole::Heading,
        text: text.trim().to_owned(),
        font: FontRole::Heading,
        size,
        color,
        bold: true,
        italic: false,
    }
}

fn subheading(text: &str, color: Color) -> TextSpec {
    TextSpec {
        role: TextRole::Subheading,
        text: text.trim().to_owned(),
        font: FontRole::Body,
        size: SizeRole::Subheading,
        color,
        bold: false,
        italic: false,
    }
}

fn caption(text: String, color: Color) -> TextSpec {
    TextSpec {
        role: TextRole::Caption,
        text,
        font: FontRole::Body,
        size: SizeRole::Caption,
        color,
        bold: false,
        italic: false,
    }
}

fn image_panel(slide: &Slide, region: Rect) -> ImageRegion {
    ImageRegion {
        slide_id: slide.id.clone(),
        keyword: slide
            .image_keyword_text()
            .unwrap_or(slide.title.as_str())
            .trim()
            .to_owned(),
        region,
    }
}

pub(crate) fn title(inp: &RuleInput<'_>) -> Composed {
    let t = inp.theme;
    let mut stack =
        Stack::new(PAD_X, HALF_COLUMN, TextAlign::Start, t).text(heading(
            &inp.slide.title,
            SizeRole::Hero,
            t.text_color,
        ));
    if let Some(sub) = inp.slide.subtitle_text() {
        stack = stack
            .gap(24.0)
            .text(subheading(sub, t.text_color.with_opacity(0.85)));
    }
    let date = format_long_date(inp.ctx.today, inp.ctx.settings.date_locale.as_deref());
    stack = stack
        .gap(40.0)
        .text(caption(date, t.text_color.with_opacity(0.7)));

    let mut out = Composed::default();
    let top = (FRAME_HEIGHT - 150.0 - stack.height()).max(PAD_Y);
    stack.place(top, &mut out);
    out
}

pub(crate) fn section(inp: &RuleInput<'_>) -> Composed {
    let t = inp.theme;
    let mut stack = Stack::new(PAD_X, HALF_COLUMN, TextAlign::Start, t)
        .bar(96.0, 8.0, t.accent_color, ShapeRole::AccentBar)
        .gap(36.0)
        .text(heading(&inp.slide.title, SizeRole::Hero, t.text_color));
    if let Some(sub) = inp.slide.subtitle_text() {
        stack = stack
            .gap(24.0)
            .text(subheading(sub, t.text_color.with_opacity(0.85)));
    }
    let mut out = Composed::default();
    stack.place_centered(0.0, FRAME_HEIGHT, &mut out);
    out
}

pub(crate) fn content(inp: &RuleInput<'_>) -> Composed {
    let t = inp.theme;
    let inner_w = FRAME_WIDTH - 2.0 * PAD_X;
    let mut out = Composed::default();

    let mut header = Stack::new(PAD_X, inner_w, TextAlign::Start, t).text(heading(
        &inp.slide.title,
        SizeRole::Heading,
        t.text_color,
    ));
    if let Some(sub) = inp.slide.subtitle_text() {
        header = header
            .gap(12.0)
            .text(subheading(sub, t.text_color.with_opacity(0.8)));
    }
    let header = header
        .gap(24.0)
        .bar(inner_w, 3.0, t.text_color.with_opacity(0.15), ShapeRole::Divider);
    let body_top = header.place(PAD_Y, &mut out) + 48.0;
    let body_bottom = FRAME_HEIGHT - PAD_Y - 40.0;

    let text_w = if inp.slide.image_keyword_text().is_some() {
        let text_w = (inner_w - 64.0) * 0.55;
        let img_x = PAD_X + text_w + 64.0;
        out.images.push(image_panel(
            inp.slide,
            Rect::new(img_x, body_top, FRAME_WIDTH - PAD_X, body_bottom.max(body_top)),
        ));
        text_w
    } else {
        inner_w
    };

    Stack::new(PAD_X, text_w, TextAlign::Start, t)
        .bullets(inp.slide.bullets(), t.text_color, t.accent_color)
        .place(body_top, &mut out);
    out
}

fn split(inp: &RuleInput<'_>, image_left: bool) -> Composed {
    let t = inp.theme;
    let half = FRAME_WIDTH / 2.0;
    let mut out = Composed::default();

    let (image_rect, text_x) = if image_left {
        (Rect::new(0.0, 0.0, half, FRAME_HEIGHT), half + PAD_X)
    } else {
        (Rect::new(half, 0.0, FRAME_WIDTH, FRAME_HEIGHT), PAD_X)
    };
    out.images.push(image_panel(inp.slide, image_rect));

    let mut stack = Stack::new(text_x, half - 2.0 * PAD_X, TextAlign::Start, t).text(heading(
        &inp.slide.title,
        SizeRole::Heading,
        t.text_color,
    ));
    if let Some(sub) = inp.slide.subtitle_text() {
        stack = stack
            .gap(16.0)
            .text(subheading(sub, t.text_color.with_opacity(0.8)));
    }
    stack
        .gap(40.0)
        .bullets(inp.slide.bullets(), t.text_color, t.accent_color)
        .place_centered(PAD_Y, FRAME_HEIGHT - PAD_Y, &mut out);
    out
}

pub(crate) fn split_left(inp: &RuleInput<'_>) -> Composed {
    split(inp, true)
}

pub(crate) fn split_right(inp: &RuleInput<'_>) -> Composed {
    split(inp, false)
}

pub(crate) fn quote(inp: &RuleInput<'_>) -> Composed {
    let t = inp.theme;
    let mut out = Composed::default();
    let (cx, cy) = (FRAME_WIDTH / 2.0, FRAME_HEIGHT / 2.0);

    // The glyph is painted first so the quote sits on top of it.
    out.texts.push(TextBlock {
        role: TextRole::Decoration,
        text: "\u{201C}".to_owned(),
        font: FontRole::Heading,
        size: SizeRole::Glyph,
        color: t.accent_color.with_opacity(0.18),
        region: Rect::new(cx - 300.0, cy - 400.0, cx + 300.0, cy + 80.0),
        align: TextAlign::Center,
        v_align: VerticalAlign::Top,
        bold: true,
        italic: false,
        shadow: false,
    });

    let body = inp
        .slide
        .highlight_text()
        .unwrap_or(inp.slide.title.as_str());
    let width = 1340.0;
    let mut stack = Stack::new((FRAME_WIDTH - width) / 2.0, width, TextAlign::Center, t).text(
        TextSpec {
            role: TextRole::FocalHighlight,
            text: body.trim().to_owned(),
            font: FontRole::Heading,
            size: SizeRole::Focal,
            color: t.text_color,
            bold: false,
            italic: true,
        },
    );
    if let Some(who) = inp.slide.subtitle_text() {
        stack = stack
            .gap(40.0)
            .text(subheading(&format!("\u{2014} {}", who.trim()), t.accent_color));
    }
    stack.place_centered(0.0, FRAME_HEIGHT, &mut out);
    out
}

pub(crate) fn big_number(inp: &RuleInput<'_>) -> Composed {
    let t = inp.theme;
    let mut out = Composed::default();
    let half = FRAME_WIDTH / 2.0;

    Stack::new(PAD_X, half - PAD_X - 40.0, TextAlign::Start, t)
        .text(heading(&inp.slide.title, SizeRole::Heading, t.text_color))
        .gap(40.0)
        .bullets(inp.slide.bullets(), t.text_color, t.accent_color)
        .place_centered(PAD_Y, FRAME_HEIGHT - PAD_Y, &mut out);

    let number = inp.slide.highlight_text().unwrap_or(DEFAULT_BIG_NUMBER);
    let mut right = Stack::new(half + 40.0, half - PAD_X - 40.0, TextAlign::Center, t).text(
        TextSpec {
            role: TextRole::FocalHighlight,
            text: number.trim().to_owned(),
            font: FontRole::Heading,
            size: SizeRole::Display,
            color: t.accent_color,
            bold: true,
            italic: false,
        },
    );
    if let Some(cap) = inp.slide.subtitle_text() {
        right = right
            .gap(16.0)
            .text(subheading(cap, t.text_color.with_opacity(0.8)));
    }
    right.place_centered(PAD_Y, FRAME_HEIGHT - PAD_Y, &mut out);
    out
}

/// Closing slide. Chosen before dispatch, whatever the slide's own type.
pub(crate) fn end(inp: &RuleInput<'_>) -> Composed {
    let t = inp.theme;
    let settings = &inp.ctx.settings;
    let title = settings
        .end_slide_title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_END_TITLE);
    let subtitle = settings
        .end_slide_subtitle
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| inp.slide.subtitle_text());

    let (x, width, align) = match settings.end_slide_align {
        EndSlideAlign::Center => {
            let w = 1400.0;
            ((FRAME_WIDTH - w) / 2.0, w, TextAlign::Center)
        }
        EndSlideAlign::Left => (PAD_X, HALF_COLUMN, TextAlign::Start),
    };

    let mut stack = Stack::new(x, width, align, t)
        .text(heading(title, SizeRole::Hero, t.text_color))
        .gap(32.0)
        .bar(120.0, 8.0, t.accent_color, ShapeRole::AccentBar);
    if let Some(sub) = subtitle {
        stack = stack
            .gap(32.0)
            .text(subheading(sub, t.text_color.with_opacity(0.85)));
    }
    let mut out = Composed::default();
    stack.place_centered(0.0, FRAME_HEIGHT, &mut out);
    out
}
