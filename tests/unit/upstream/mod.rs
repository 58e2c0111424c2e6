use super::*;

#[test]
fn code_fences_are_stripped() {
    assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
    assert_eq!(strip_code_fences("  ```\n{}\n```  "), "{}");
    assert_eq!(strip_code_fences("[2]"), "[2]");
}

#[test]
fn malformed_design_fields_fall_back() {
    let text = r##"```json
{"name": "Ocean", "colors": 42, "fonts": {"heading": "Playfair Display"},
 "masters": {"title": {"background": "#0F172A"}}}
```"##;
    let d = parse_design_response(text).unwrap();
    assert_eq!(d.name, "Ocean");
    assert_eq!(d.colors, Default::default());
    assert_eq!(d.fonts.heading, "Playfair Display");
    assert_eq!(d.fonts.body, "Inter");
    assert_eq!(d.masters.title.background.as_deref(), Some("#0F172A"));
    assert!(d.masters.section.is_none());
}

#[test]
fn unparseable_design_is_an_upstream_error() {
    for bad in ["", "not json", "[1, 2]"] {
        let err = parse_design_response(bad).unwrap_err();
        assert!(matches!(err, SlideError::UpstreamGeneration(_)), "{bad:?}");
    }
}

#[test]
fn slides_are_repaired() {
    let text = r#"{"slides": [
        {"id": "a", "type": "title", "title": "Hello"},
        {"type": "timeline", "title": "When", "content": ["Q1", 2, null, ""]},
        "garbage",
        {"id": "a", "type": "big-number", "highlight": 87, "content": "- one\n- two"}
    ]}"#;
    let slides = parse_slides_response(text).unwrap();
    assert_eq!(slides.len(), 3);

    assert_eq!(slides[0].id, "a");
    assert_eq!(slides[0].slide_type, SlideType::Title);

    assert_eq!(slides[1].id, "slide-2");
    assert_eq!(slides[1].slide_type, SlideType::Content);
    assert_eq!(slides[1].bullets(), ["Q1".to_owned(), "2".to_owned()]);

    assert_eq!(slides[2].id, "slide-3");
    assert_eq!(slides[2].slide_type, SlideType::BigNumber);
    assert_eq!(slides[2].highlight.as_deref(), Some("87"));
    assert_eq!(slides[2].bullets(), ["one".to_owned(), "two".to_owned()]);
    assert_eq!(slides[2].title, "");
}

#[test]
fn generated_ids_skip_ids_already_taken() {
    let text = r#"[
        {"id": "slide-2", "title": "Explicit"},
        {"title": "Second"},
        {"id": "slide-2", "title": "Repeat"},
        {"title": "Fourth"},
        {"id": "slide-1", "title": "Late explicit"}
    ]"#;
    let ids: Vec<String> = parse_slides_response(text)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, ["slide-2", "slide-3", "slide-4", "slide-5", "slide-1"]);
}

#[test]
fn no_slides_is_an_upstream_error() {
    for bad in ["[]", "[1, 2]", "{\"deck\": []}", "```\n```"] {
        let err = parse_slides_response(bad).unwrap_err();
        assert!(matches!(err, SlideError::UpstreamGeneration(_)), "{bad:?}");
    }
}

#[test]
fn json_generator_builds_a_deck() {
    let generator = JsonGenerator::new(
        r#"{"name": "Ocean", "vibe": "calm"}"#,
        r#"[{"id": "s1", "type": "title", "title": "Tides"}]"#,
    );
    let (design, deck) = generate_deck(&generator, b"", "image/png", "Tides").unwrap();
    assert_eq!(design.name, "Ocean");
    assert_eq!(deck.topic, "Tides");
    assert_eq!(deck.len(), 1);
    assert!(design_summary(&design).starts_with("Theme: Ocean. Mood: calm"));
}

#[test]
fn missing_response_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonGenerator::from_files(&dir.path().join("d.json"), &dir.path().join("s.json"))
        .unwrap_err();
    assert!(err.to_string().contains("d.json"));
}
