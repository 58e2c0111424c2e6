use super::*;

#[test]
fn video_extensions() {
    assert_eq!(video_extension("video/webm"), "webm");
    assert_eq!(video_extension("video/mp4"), "mp4");
    assert_eq!(video_extension("application/octet-stream"), "mp4");
}

#[cfg(not(feature = "media-ffmpeg"))]
#[test]
fn poster_frames_need_the_feature() {
    let err = extract_poster_frame_from_bytes(b"not a video", "mp4").unwrap_err();
    assert!(err.to_string().contains("media-ffmpeg"));
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn garbage_video_is_an_asset_error() {
    let err = extract_poster_frame_from_bytes(b"not a video", "mp4").unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::SlideError::AssetLoad(_)
    ));
}

#[test]
fn staged_videos_are_removed_on_drop() {
    let first = stage_video(b"frames", "webm").unwrap();
    let second = stage_video(b"frames", "webm").unwrap();
    assert_ne!(first.path(), second.path());
    assert_eq!(first.path().extension().and_then(|e| e.to_str()), Some("webm"));
    assert_eq!(std::fs::read(first.path()).unwrap(), b"frames");

    let path = first.path().to_path_buf();
    drop(first);
    assert!(!path.exists());
}
