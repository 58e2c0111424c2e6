use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlideError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SlideError::upstream("x")
            .to_string()
            .contains("upstream generation failed:")
    );
    assert!(
        SlideError::asset_load("x")
            .to_string()
            .contains("asset load failed:")
    );
    assert!(
        SlideError::export_encoding("x")
            .to_string()
            .contains("export encoding failed:")
    );
    assert!(
        SlideError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlideError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn export_failure_keeps_asset_errors_and_wraps_the_rest() {
    let asset = SlideError::asset_load("logo.png missing").into_export_failure();
    assert!(matches!(asset, SlideError::AssetLoad(_)));

    let other = SlideError::validation("bad page").into_export_failure();
    match other {
        SlideError::ExportEncoding(msg) => assert!(msg.contains("bad page")),
        e => panic!("unexpected {e:?}"),
    }
}

#[test]
fn json_errors_map_to_serde() {
    let err: SlideError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, SlideError::Serde(_)));
}
