//! Scene composition: still image + narration -> timed clip.

use std::path::PathBuf;

use tokio::fs;
use tokio::sync::watch;
use tracing::debug;

use reel_models::{AudioAsset, ComposedClip, EncodingConfig, ImageAsset, Scene};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::{caption_filter, vertical_fill_filter, CaptionStyle};

/// The audio track for one scene.
#[derive(Debug, Clone)]
pub enum SceneAudio {
    /// Synthesized narration; its duration drives the clip length.
    Narration(AudioAsset),
    /// No narration: a silent bed of the given length keeps the stream
    /// layout uniform across clips.
    Silent { duration_seconds: f64 },
}

impl SceneAudio {
    /// The clip duration this audio dictates.
    pub fn duration_seconds(&self) -> f64 {
        match self {
            SceneAudio::Narration(audio) => audio.duration_seconds,
            SceneAudio::Silent { duration_seconds } => *duration_seconds,
        }
    }
}

/// Builds one timed clip per scene in a working directory.
///
/// The still is scaled to fill the fixed vertical frame and
/// center-cropped, looped for exactly the audio duration, the audio
/// attached as the sole track, and the narration optionally burned in
/// as a static caption.
pub struct SceneComposer {
    workdir: PathBuf,
    encoding: EncodingConfig,
    caption_style: CaptionStyle,
    timeout_secs: Option<u64>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl SceneComposer {
    /// Create a composer writing into `workdir`.
    pub fn new(workdir: impl Into<PathBuf>, encoding: EncodingConfig) -> Self {
        Self {
            workdir: workdir.into(),
            encoding,
            caption_style: CaptionStyle::default(),
            timeout_secs: None,
            cancel_rx: None,
        }
    }

    /// Set a per-composition ffmpeg timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the cancellation signal observed while ffmpeg runs.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Override the caption style.
    pub fn with_caption_style(mut self, style: CaptionStyle) -> Self {
        self.caption_style = style;
        self
    }

    /// Compose one scene clip. On any failure nothing is left behind
    /// for the scene.
    pub async fn compose(
        &self,
        scene: &Scene,
        audio: SceneAudio,
        image: &ImageAsset,
        subtitles: bool,
    ) -> MediaResult<ComposedClip> {
        let duration = audio.duration_seconds();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(MediaError::InvalidDuration(duration));
        }

        // Reject malformed image data before touching ffmpeg.
        let format = image::guess_format(&image.bytes)
            .map_err(|e| MediaError::invalid_image(e.to_string()))?;
        image::load_from_memory(&image.bytes)
            .map_err(|e| MediaError::invalid_image(e.to_string()))?;

        fs::create_dir_all(&self.workdir).await?;

        let ext = match format {
            image::ImageFormat::Jpeg => "jpg",
            _ => "png",
        };
        let image_path = self.workdir.join(format!("scene_{}.{}", scene.id, ext));
        fs::write(&image_path, &image.bytes).await?;

        let audio_path = match &audio {
            SceneAudio::Narration(narration) => {
                let path = self.workdir.join(format!("scene_{}.wav", scene.id));
                fs::write(&path, &narration.bytes).await?;
                Some(path)
            }
            SceneAudio::Silent { .. } => None,
        };

        let output = self.workdir.join(format!("scene_{}.mp4", scene.id));
        let cmd = self.build_command(scene, &image_path, audio_path.as_deref(), duration, subtitles);

        let mut runner = FfmpegRunner::new();
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }
        if let Some(ref rx) = self.cancel_rx {
            runner = runner.with_cancel(rx.clone());
        }

        debug!(scene_id = %scene.id, duration, "composing scene clip");

        if let Err(e) = runner.run(&cmd).await {
            let _ = fs::remove_file(&output).await;
            return Err(e);
        }

        Ok(ComposedClip {
            scene_id: scene.id,
            path: output,
            duration_seconds: duration,
        })
    }

    /// Build the ffmpeg invocation for one scene clip.
    fn build_command(
        &self,
        scene: &Scene,
        image_path: &std::path::Path,
        audio_path: Option<&std::path::Path>,
        duration: f64,
        subtitles: bool,
    ) -> FfmpegCommand {
        let output = self.workdir.join(format!("scene_{}.mp4", scene.id));
        let framerate = self.encoding.fps.to_string();

        let mut cmd = FfmpegCommand::new(output).input_with_args(
            ["-loop", "1", "-framerate", framerate.as_str()],
            image_path.to_string_lossy(),
        );

        cmd = match audio_path {
            Some(path) => cmd.input(path),
            None => {
                let bed_duration = format!("{:.3}", duration);
                // The bed must match the profile's stream parameters so
                // narrated and silent clips concatenate cleanly.
                let bed = format!(
                    "anullsrc=channel_layout={}:sample_rate={}",
                    self.encoding.channel_layout(),
                    self.encoding.audio_sample_rate
                );
                cmd.input_with_args(["-f", "lavfi", "-t", bed_duration.as_str()], bed)
            }
        };

        let mut filter = vertical_fill_filter(self.encoding.width, self.encoding.height);
        if subtitles {
            filter.push(',');
            filter.push_str(&caption_filter(&scene.narration_text, &self.caption_style));
        }

        cmd.video_filter(filter)
            .output_args(self.encoding.to_ffmpeg_args())
            .duration(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_models::SceneId;
    use tempfile::TempDir;

    fn scene() -> Scene {
        Scene {
            id: SceneId(0),
            narration_text: "Hello world".to_string(),
            visual_prompt: "a sunrise".to_string(),
            estimated_duration_seconds: 5.0,
        }
    }

    fn composer(dir: &TempDir) -> SceneComposer {
        SceneComposer::new(dir.path(), EncodingConfig::default())
    }

    #[test]
    fn test_command_loops_image_for_audio_duration() {
        let dir = TempDir::new().unwrap();
        let cmd = composer(&dir).build_command(
            &scene(),
            std::path::Path::new("scene_0.png"),
            Some(std::path::Path::new("scene_0.wav")),
            8.2,
            false,
        );

        let args = cmd.build_args();
        assert!(args.contains(&"-loop".to_string()));
        assert!(args.contains(&"scene_0.wav".to_string()));
        assert!(args.contains(&"8.200".to_string()));
        assert!(!args.iter().any(|a| a.contains("drawtext")));
    }

    #[test]
    fn test_command_burns_caption_when_enabled() {
        let dir = TempDir::new().unwrap();
        let cmd = composer(&dir).build_command(
            &scene(),
            std::path::Path::new("scene_0.png"),
            Some(std::path::Path::new("scene_0.wav")),
            8.2,
            true,
        );

        let args = cmd.build_args();
        let vf = args
            .iter()
            .find(|a| a.contains("drawtext"))
            .expect("caption filter present");
        assert!(vf.contains("Hello world"));
        assert!(vf.contains("crop=1080:1920"));
    }

    #[test]
    fn test_custom_caption_style_applies() {
        let dir = TempDir::new().unwrap();
        let style = CaptionStyle {
            font_size: 48,
            max_line_chars: 20,
            bottom_margin: 200,
            font_file: None,
        };
        let cmd = composer(&dir).with_caption_style(style).build_command(
            &scene(),
            std::path::Path::new("scene_0.png"),
            Some(std::path::Path::new("scene_0.wav")),
            8.2,
            true,
        );

        let vf = cmd
            .build_args()
            .into_iter()
            .find(|a| a.contains("drawtext"))
            .expect("caption filter present");
        assert!(vf.contains("fontsize=48"));
        assert!(vf.contains("y=h-text_h-200"));
    }

    #[test]
    fn test_command_uses_silent_bed_without_narration() {
        let dir = TempDir::new().unwrap();
        let cmd = composer(&dir).build_command(
            &scene(),
            std::path::Path::new("scene_0.png"),
            None,
            5.0,
            false,
        );

        let args = cmd.build_args();
        let bed = args
            .iter()
            .find(|a| a.contains("anullsrc"))
            .expect("silent bed input present");
        assert!(bed.contains("channel_layout=mono"));
        assert!(bed.contains("sample_rate=44100"));
    }

    #[test]
    fn test_clips_share_audio_stream_parameters() {
        // Narrated and silent clips both resample to the profile, so the
        // concat demuxer sees uniform streams.
        let dir = TempDir::new().unwrap();
        let narrated = composer(&dir).build_command(
            &scene(),
            std::path::Path::new("scene_0.png"),
            Some(std::path::Path::new("scene_0.wav")),
            8.2,
            false,
        );
        let silent = composer(&dir).build_command(
            &scene(),
            std::path::Path::new("scene_0.png"),
            None,
            5.0,
            false,
        );

        for cmd in [narrated, silent] {
            let args = cmd.build_args();
            let ar = args.iter().position(|a| a == "-ar").unwrap();
            assert_eq!(args[ar + 1], "44100");
            let ac = args.iter().position(|a| a == "-ac").unwrap();
            assert_eq!(args[ac + 1], "1");
        }
    }

    #[tokio::test]
    async fn test_malformed_image_rejected_before_ffmpeg() {
        let dir = TempDir::new().unwrap();
        let err = composer(&dir)
            .compose(
                &scene(),
                SceneAudio::Silent {
                    duration_seconds: 5.0,
                },
                &ImageAsset {
                    bytes: b"not an image".to_vec(),
                },
                true,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_zero_duration_rejected() {
        let dir = TempDir::new().unwrap();
        let err = composer(&dir)
            .compose(
                &scene(),
                SceneAudio::Silent {
                    duration_seconds: 0.0,
                },
                &ImageAsset { bytes: vec![] },
                false,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::InvalidDuration(_)));
    }
}
