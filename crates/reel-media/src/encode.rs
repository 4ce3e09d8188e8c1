//! Final render: timeline -> one encoded output file.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::watch;
use tracing::{debug, info};

use reel_models::{EncodingConfig, Timeline};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::concat::write_concat_list;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::move_file;

/// Renders a timeline to a single file at the fixed vertical profile.
///
/// Encoding happens into a `.tmp` sibling of the destination; the file
/// is moved into place only on success, so the destination path never
/// holds a partial output.
pub struct Encoder {
    encoding: EncodingConfig,
    timeout_secs: Option<u64>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl Encoder {
    pub fn new(encoding: EncodingConfig) -> Self {
        Self {
            encoding,
            timeout_secs: None,
            cancel_rx: None,
        }
    }

    /// Set the encode timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the cancellation signal observed while ffmpeg runs.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Render the timeline to `output_path`.
    pub async fn render(&self, timeline: &Timeline, output_path: &Path) -> MediaResult<PathBuf> {
        if timeline.is_empty() {
            return Err(MediaError::EmptyTimeline);
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let list_path = output_path.with_extension("concat.txt");
        write_concat_list(timeline, &list_path).await?;

        let tmp_output = output_path.with_extension("tmp.mp4");
        let cmd = self.build_command(&list_path, &tmp_output);

        let mut runner = FfmpegRunner::new();
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }
        if let Some(ref rx) = self.cancel_rx {
            runner = runner.with_cancel(rx.clone());
        }

        debug!(
            clips = timeline.len(),
            total_duration = timeline.total_duration(),
            "encoding timeline"
        );

        let result = runner.run(&cmd).await;
        let _ = fs::remove_file(&list_path).await;

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_output).await;
            return Err(e);
        }

        move_file(&tmp_output, output_path).await?;

        info!(output = %output_path.display(), "timeline encoded");
        Ok(output_path.to_path_buf())
    }

    /// Build the concat-demuxer encode invocation.
    fn build_command(&self, list_path: &Path, output: &Path) -> FfmpegCommand {
        FfmpegCommand::new(output)
            .input_with_args(["-f", "concat", "-safe", "0"], list_path.to_string_lossy())
            .output_args(self.encoding.to_ffmpeg_args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_models::ComposedClip;

    #[test]
    fn test_encode_command_uses_concat_demuxer() {
        let encoder = Encoder::new(EncodingConfig::default());
        let cmd = encoder.build_command(Path::new("/tmp/concat.txt"), Path::new("/tmp/out.mp4"));

        let args = cmd.build_args();
        assert!(args.contains(&"concat".to_string()));
        assert!(args.contains(&"-safe".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/out.mp4");
    }

    #[tokio::test]
    async fn test_render_rejects_empty_timeline() {
        let encoder = Encoder::new(EncodingConfig::default());
        let timeline = Timeline::new(Vec::<ComposedClip>::new());
        let err = encoder
            .render(&timeline, Path::new("/tmp/out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::EmptyTimeline));
    }
}
