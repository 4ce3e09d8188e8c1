//! Timeline assembly from composed clips.

use std::path::Path;

use tokio::fs;

use reel_models::{ComposedClip, Timeline};

use crate::error::{MediaError, MediaResult};

/// Join ordered clips into a timeline.
///
/// Order is preserved exactly as submitted; no reordering, deduplication,
/// or trimming. An empty list is rejected, as is any clip whose file is
/// missing or whose duration is non-positive.
pub fn join(clips: Vec<ComposedClip>) -> MediaResult<Timeline> {
    if clips.is_empty() {
        return Err(MediaError::EmptyTimeline);
    }

    for clip in &clips {
        if !clip.path.exists() {
            return Err(MediaError::FileNotFound(clip.path.clone()));
        }
        if !clip.duration_seconds.is_finite() || clip.duration_seconds <= 0.0 {
            return Err(MediaError::InvalidDuration(clip.duration_seconds));
        }
    }

    Ok(Timeline::new(clips))
}

/// Write an ffmpeg concat-demuxer list file for a timeline.
///
/// Single quotes in paths are escaped per the demuxer's quoting rules.
pub async fn write_concat_list(timeline: &Timeline, list_path: &Path) -> MediaResult<()> {
    let mut contents = String::new();
    for clip in timeline.clips() {
        let escaped = clip.path.to_string_lossy().replace('\'', "'\\''");
        contents.push_str(&format!("file '{}'\n", escaped));
    }

    fs::write(list_path, contents).await?;
    Ok(())
}
