//! Scalar acoustic descriptors: energy, danceability, loudness
//!
//! The three formulas are heuristic and intentionally preserved as-is,
//! including the 1e-6 epsilons and the -60..0 dB loudness window. They are
//! not interpreted further here; the recommender only needs them to be
//! computed consistently for the query track and the catalog.

use crate::models::ScalarFeatures;

use super::audio_decoder::DecodedAudio;
use super::spectrogram::{frame_count, mel_power_spectrogram, pad_center, power_to_db};
use super::spectrogram::{FRAME_LENGTH, HOP_LENGTH};

/// Mel band count of the onset-strength spectrogram
const ONSET_MEL_BANDS: usize = 128;

/// dB window mapped onto the [0, 1] loudness range
const LOUDNESS_DB_MIN: f64 = -60.0;
const LOUDNESS_DB_MAX: f64 = 0.0;

/// Extract the scalar descriptors for one decoded track
///
/// Degenerate inputs (silence, sub-frame clips) saturate to the boundary
/// values rather than failing.
pub fn scalar_features(audio: &DecodedAudio) -> ScalarFeatures {
    let mean_rms = mean_frame_rms(&audio.samples);

    // energy: mean of the short-time RMS envelope
    let energy = mean_rms;

    // danceability: onset-envelope mean over its spread, a crude
    // beat-regularity proxy (large when onsets are strong and uniform)
    let onset_env = onset_strength_envelope(&audio.samples, audio.sample_rate);
    let danceability = if onset_env.is_empty() {
        0.0
    } else {
        let mean = onset_env.iter().sum::<f64>() / onset_env.len() as f64;
        let variance = onset_env
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / onset_env.len() as f64;
        mean / (variance.sqrt() + 1e-6)
    };

    // loudness: mean RMS in dB, rescaled from [-60, 0] dB to [0, 1].
    // Values outside the window saturate; the epsilon keeps silence finite.
    let loudness_db = 20.0 * (mean_rms + 1e-6).log10();
    let loudness =
        ((loudness_db - LOUDNESS_DB_MIN) / (LOUDNESS_DB_MAX - LOUDNESS_DB_MIN)).clamp(0.0, 1.0);

    tracing::debug!(
        energy = format!("{:.4}", energy),
        danceability = format!("{:.4}", danceability),
        loudness_db = format!("{:.2}", loudness_db),
        loudness = format!("{:.4}", loudness),
        "Scalar features extracted"
    );

    ScalarFeatures::new(energy, danceability, loudness)
}

/// Mean of the frame-wise RMS envelope (centered 2048/512 framing)
fn mean_frame_rms(samples: &[f32]) -> f64 {
    let padded = pad_center(samples);
    let num_frames = frame_count(samples.len());

    let mut total = 0.0f64;
    for frame_idx in 0..num_frames {
        let start = frame_idx * HOP_LENGTH;
        let frame = &padded[start..start + FRAME_LENGTH];
        let mean_square =
            frame.iter().map(|&s| s as f64 * s as f64).sum::<f64>() / FRAME_LENGTH as f64;
        total += mean_square.sqrt();
    }
    total / num_frames as f64
}

/// Onset-strength envelope: per-frame mean of the positive first difference
/// of the dB mel spectrogram across bands
fn onset_strength_envelope(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    let db = power_to_db(&mel_power_spectrogram(samples, sample_rate, ONSET_MEL_BANDS));
    let (bands, frames) = db.dim();
    if frames < 2 {
        return Vec::new();
    }

    let mut envelope = Vec::with_capacity(frames - 1);
    for t in 1..frames {
        let mut rise = 0.0f64;
        for b in 0..bands {
            let diff = db[[b, t]] - db[[b, t - 1]];
            if diff > 0.0 {
                rise += diff as f64;
            }
        }
        envelope.push(rise / bands as f64);
    }
    envelope
}
