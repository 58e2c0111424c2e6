//! Poster frames for video backgrounds.
//!
//! A still snapshot cannot play video, so off-screen renders use the first decodable frame.
//! Decoding shells out to the system `ffmpeg` binary behind the `media-ffmpeg` feature.

use std::{io::Write as _, path::Path};

#[cfg(feature = "media-ffmpeg")]
use crate::foundation::error::SlideError;
use crate::{assets::store::PreparedImage, foundation::error::SlideResult};

/// Extract the first frame of the video at `source_path` as a prepared image.
#[cfg(feature = "media-ffmpeg")]
pub fn extract_poster_frame(source_path: &Path) -> SlideResult<PreparedImage> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(source_path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "image2pipe",
            "-vcodec",
            "png",
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            SlideError::asset_load(format!("failed to run ffmpeg for poster frame: {e}"))
        })?;

    if !out.status.success() {
        return Err(SlideError::asset_load(format!(
            "ffmpeg poster frame failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if out.stdout.is_empty() {
        return Err(SlideError::asset_load(format!(
            "ffmpeg returned no video frames for '{}'",
            source_path.display()
        )));
    }
    crate::assets::decode::decode_image(&out.stdout)
}

/// Extract the first frame of the video at `source_path` as a prepared image.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn extract_poster_frame(_source_path: &Path) -> SlideResult<PreparedImage> {
    Err(crate::foundation::error::SlideError::asset_load(
        "video backgrounds require the 'media-ffmpeg' feature",
    ))
}

/// Extract a poster frame from in-memory video bytes via a temporary file.
pub fn extract_poster_frame_from_bytes(bytes: &[u8], ext: &str) -> SlideResult<PreparedImage> {
    let staged = stage_video(bytes, ext)?;
    extract_poster_frame(staged.path())
}

/// Write `bytes` to a uniquely named temporary file that is removed on drop.
fn stage_video(bytes: &[u8], ext: &str) -> SlideResult<tempfile::NamedTempFile> {
    let stage_err = |e: std::io::Error| {
        crate::foundation::error::SlideError::asset_load(format!("failed to stage video: {e}"))
    };
    let mut file = tempfile::Builder::new()
        .prefix("slidewright_video_")
        .suffix(&format!(".{ext}"))
        .tempfile()
        .map_err(stage_err)?;
    file.write_all(bytes).map_err(stage_err)?;
    file.flush().map_err(stage_err)?;
    Ok(file)
}

/// File extension for a video media type.
pub(crate) fn video_extension(mime: &str) -> &'static str {
    match mime {
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "video/ogg" => "ogv",
        _ => "mp4",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
