//! WAV (RIFF) duration measurement and silent-bed synthesis.
//!
//! The narration endpoints return PCM WAV; the audio's true duration is
//! what drives every clip length, so it is measured from the decoded
//! samples rather than trusted from any metadata field. A truncated
//! response therefore reports only the audio actually present.

use std::io::Cursor;

use crate::error::{AssetError, AssetResult};

/// Sample rate used for locally synthesized (mock/silent) narration.
pub const SYNTH_SAMPLE_RATE: u32 = 24_000;

fn wav_error(e: hound::Error) -> AssetError {
    match e {
        hound::Error::IoError(io) => AssetError::Io(io),
        other => AssetError::malformed_audio(other.to_string()),
    }
}

/// Measure the duration of a PCM WAV file.
///
/// Counts the samples that actually decode instead of trusting the
/// header's data-chunk size, so a truncated file is not overstated.
pub fn wav_duration_seconds(bytes: &[u8]) -> AssetResult<f64> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(wav_error)?;
    let spec = reader.spec();

    if spec.sample_rate == 0 || spec.channels == 0 {
        return Err(AssetError::malformed_audio("zero sample rate or channels"));
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .into_samples::<i32>()
            .take_while(|s| s.is_ok())
            .count(),
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .take_while(|s| s.is_ok())
            .count(),
    };

    let duration = samples as f64 / (spec.sample_rate as f64 * spec.channels as f64);
    if duration <= 0.0 {
        return Err(AssetError::malformed_audio("no audio samples"));
    }

    Ok(duration)
}

/// Build a silent 16-bit mono PCM WAV of the given duration.
///
/// Used by the mock client. The sample count is rounded so the written
/// file's measured duration matches the request to within one sample.
pub fn silent_wav(duration_seconds: f64) -> AssetResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SYNTH_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let samples = (duration_seconds * spec.sample_rate as f64).round().max(1.0) as u32;

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_error)?;
    for _ in 0..samples {
        writer.write_sample(0i16).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_wav_roundtrip() {
        let wav = silent_wav(8.2).unwrap();
        let measured = wav_duration_seconds(&wav).unwrap();
        assert!((measured - 8.2).abs() < 1e-3, "measured {}", measured);
    }

    #[test]
    fn test_minimum_one_sample() {
        let wav = silent_wav(0.0).unwrap();
        assert!(wav_duration_seconds(&wav).unwrap() > 0.0);
    }

    #[test]
    fn test_rejects_non_wav() {
        assert!(wav_duration_seconds(b"\x89PNG\r\n\x1a\n").is_err());
        assert!(wav_duration_seconds(b"").is_err());
    }

    #[test]
    fn test_rejects_header_without_audio() {
        // RIFF/WAVE cut off before any data arrives.
        let mut wav = silent_wav(1.0).unwrap();
        wav.truncate(36);
        assert!(wav_duration_seconds(&wav).is_err());
    }

    #[test]
    fn test_truncated_file_reports_only_decoded_audio() {
        // Keep the header but drop the second half of the sample data;
        // the header still claims the full two seconds.
        let full = silent_wav(2.0).unwrap();
        let data_len = full.len() - 44;
        let mut truncated = full.clone();
        truncated.truncate(44 + data_len / 2);

        let measured = wav_duration_seconds(&truncated).unwrap();
        assert!(
            (measured - 1.0).abs() < 1e-2,
            "expected ~1 s from half the samples, got {}",
            measured
        );
    }
}
