use std::path::Path;

use aus::analysis;
use tracing::debug;

use crate::audio::decoder::decode_audio;
use crate::audio::resample::resample_clip;
use crate::audio::AudioClip;
use crate::pronunciation::{PronunciationError, Result};

use super::PitchContour;

pub const TARGET_SAMPLE_RATE: u32 = 16_000;
const FRAME_LENGTH: usize = 1024;
// C2 and C7
const FREQ_MIN: f64 = 65.406;
const FREQ_MAX: f64 = 2093.005;
const SMOOTH_WINDOW: usize = 3;

/// Pitch-extraction boundary: audio in, Hz contour out, 0.0 when unvoiced.
pub trait PitchExtractor: Send + Sync {
    fn extract(&self, audio_path: &Path) -> Result<PitchContour>;
}

/// pYIN over audio decoded to mono and resampled to 16 kHz.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyinPitchExtractor;

impl PyinPitchExtractor {
    pub fn extract_clip(&self, clip: &AudioClip) -> Result<PitchContour> {
        if clip.samples.is_empty() {
            return Ok(PitchContour::default());
        }
        let clip = resample_clip(clip, TARGET_SAMPLE_RATE)?;
        if clip.samples.len() < FRAME_LENGTH {
            return Err(PronunciationError::new(format!(
                "recording too short for pitch analysis: {} samples",
                clip.samples.len()
            )));
        }
        let audio: Vec<f64> = clip.samples.iter().map(|&s| s as f64).collect();
        let (_timestamps, pitches, voiced_flags, _confidence) = analysis::pyin_pitch_estimator(
            &audio,
            TARGET_SAMPLE_RATE,
            FREQ_MIN,
            FREQ_MAX,
            FRAME_LENGTH,
        );
        let raw = voiced_hz(&pitches, &voiced_flags);
        let contour = PitchContour::new(smooth_voiced(&raw, SMOOTH_WINDOW));
        debug!(
            frames = contour.len(),
            voiced = contour.voiced_count(),
            "extracted pitch contour"
        );
        Ok(contour)
    }
}

impl PitchExtractor for PyinPitchExtractor {
    fn extract(&self, audio_path: &Path) -> Result<PitchContour> {
        let clip = decode_audio(audio_path)?;
        self.extract_clip(&clip)
    }
}

fn voiced_hz(pitches: &[f64], voiced: &[bool]) -> Vec<f32> {
    pitches
        .iter()
        .zip(voiced.iter())
        .map(|(&pitch, &flag)| {
            if flag && pitch.is_finite() && pitch > 0.0 {
                pitch as f32
            } else {
                0.0
            }
        })
        .collect()
}

/// Moving average that never crosses an unvoiced frame, so voicing
/// boundaries stay sharp.
fn smooth_voiced(values: &[f32], window: usize) -> Vec<f32> {
    if values.is_empty() || window < 2 {
        return values.to_vec();
    }
    let radius = window / 2;
    let mut smoothed = Vec::with_capacity(values.len());
    for (idx, &value) in values.iter().enumerate() {
        if value <= 0.0 {
            smoothed.push(0.0);
            continue;
        }
        let start = idx.saturating_sub(radius);
        let end = (idx + radius + 1).min(values.len());
        let (sum, count) = values[start..end]
            .iter()
            .filter(|&&v| v > 0.0)
            .fold((0.0, 0.0), |(sum, count), &v| (sum + v, count + 1.0));
        smoothed.push(sum / count);
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::{smooth_voiced, voiced_hz, PyinPitchExtractor};
    use crate::audio::AudioClip;

    #[test]
    fn unvoiced_frames_stay_zero() {
        let raw = voiced_hz(&[120.0, f64::NAN, 130.0, 140.0], &[true, false, true, false]);
        assert_eq!(raw, vec![120.0, 0.0, 130.0, 0.0]);
    }

    #[test]
    fn smoothing_ignores_unvoiced_neighbours() {
        let smoothed = smooth_voiced(&[100.0, 0.0, 120.0, 140.0, 160.0], 3);
        assert_eq!(smoothed, vec![100.0, 0.0, 130.0, 140.0, 150.0]);
    }

    #[test]
    fn empty_clip_yields_empty_contour() {
        let contour = PyinPitchExtractor
            .extract_clip(&AudioClip::new(Vec::new(), 16_000))
            .unwrap();
        assert!(contour.is_empty());
    }
}
