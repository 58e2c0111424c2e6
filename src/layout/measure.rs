use crate::layout::tree::SizeRole;

/// Average advance of a Latin glyph, in em.
const NARROW_ADVANCE_EM: f64 = 0.52;
/// Advance of full-width (CJK, kana, hangul) glyphs, in em.
const WIDE_ADVANCE_EM: f64 = 1.0;

fn advance_em(c: char) -> f64 {
    if c >= '\u{2E80}' && !('\u{FF61}'..='\u{FFDC}').contains(&c) {
        WIDE_ADVANCE_EM
    } else {
        NARROW_ADVANCE_EM
    }
}

fn word_width(word: &str, px: f64) -> f64 {
    word.chars().map(advance_em).sum::<f64>() * px
}

/// Estimated width of every wrapped line of `text` at `size` in a column `width` units wide.
///
/// Deterministic and font-independent, so every back-end stacks blocks at the same offsets.
pub fn estimate_line_widths(text: &str, size: SizeRole, width: f64) -> Vec<f64> {
    let px = size.px();
    let width = width.max(px);
    let space = NARROW_ADVANCE_EM * px;

    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line_w = 0.0f64;
        for word in paragraph.split_whitespace() {
            let mut w = word_width(word, px);
            if line_w > 0.0 && line_w + space + w <= width {
                line_w += space + w;
                continue;
            }
            if line_w > 0.0 {
                out.push(line_w);
            }
            // Words longer than the column break mid-word.
            while w > width {
                out.push(width);
                w -= width;
            }
            line_w = w;
        }
        out.push(line_w);
    }
    out
}

/// Estimated number of wrapped lines of `text` at `size` in a column `width` units wide.
pub fn estimate_lines(text: &str, size: SizeRole, width: f64) -> usize {
    estimate_line_widths(text, size, width).len().max(1)
}

/// Estimated block height of `text` at `size` in a column `width` units wide.
pub fn estimate_height(text: &str, size: SizeRole, width: f64) -> f64 {
    estimate_lines(text, size, width) as f64 * size.px() * size.line_height()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/measure.rs"]
mod tests;
