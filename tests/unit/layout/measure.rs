use super::*;

#[test]
fn short_text_is_one_line() {
    assert_eq!(estimate_lines("Hello", SizeRole::Body, 800.0), 1);
    assert_eq!(estimate_lines("", SizeRole::Body, 800.0), 1);
}

#[test]
fn long_text_wraps() {
    let text = "word ".repeat(60);
    let lines = estimate_lines(&text, SizeRole::Body, 600.0);
    assert!(lines > 3, "got {lines}");
    let wider = estimate_lines(&text, SizeRole::Body, 1200.0);
    assert!(wider < lines);
}

#[test]
fn explicit_newlines_count() {
    assert_eq!(estimate_lines("a\nb\nc", SizeRole::Caption, 800.0), 3);
}

#[test]
fn wide_glyphs_take_more_room() {
    let latin = estimate_lines(&"a".repeat(40), SizeRole::Heading, 700.0);
    let cjk = estimate_lines(&"漢".repeat(40), SizeRole::Heading, 700.0);
    assert!(cjk > latin);
}

#[test]
fn height_scales_with_lines() {
    let one = estimate_height("x", SizeRole::Body, 800.0);
    assert!((one - 32.0 * 1.4).abs() < 1e-9);
    let two = estimate_height("x\ny", SizeRole::Body, 800.0);
    assert!((two - 2.0 * one).abs() < 1e-9);
}

#[test]
fn line_widths_stay_inside_the_column() {
    let widths = estimate_line_widths(&"lorem ipsum ".repeat(30), SizeRole::Body, 500.0);
    assert!(widths.len() > 1);
    assert!(widths.iter().all(|w| *w > 0.0 && *w <= 500.0));

    let long_word = estimate_line_widths(&"m".repeat(100), SizeRole::Body, 400.0);
    assert_eq!(long_word.len(), 5);
    assert_eq!(long_word[0], 400.0);
}
