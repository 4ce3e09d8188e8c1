//! FFmpeg CLI wrapper for scene composition, concatenation, and encoding.
//!
//! All media work shells out to `ffmpeg`/`ffprobe` via the command
//! builder in [`command`]; nothing here links a codec. The crate's
//! surface follows the pipeline stages:
//!
//! - [`SceneComposer`]: still image + narration -> timed scene clip
//! - [`concat::join`]: ordered clips -> timeline
//! - [`Encoder`]: timeline -> single output file, placed atomically

pub mod command;
pub mod compose;
pub mod concat;
pub mod encode;
pub mod error;
pub mod filters;
pub mod fs_utils;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::{SceneAudio, SceneComposer};
pub use concat::join;
pub use encode::Encoder;
pub use error::{MediaError, MediaResult};
pub use filters::CaptionStyle;
pub use probe::probe_duration;
