//! Mel spectrogram computation and the fixed-shape classifier input
//!
//! Short-time analysis uses 2048-sample frames with a 512-sample hop and
//! centered framing (the signal is zero-padded by half a frame on each
//! side), so even sub-second clips produce at least one frame. Mel filters
//! use the HTK mel scale with triangular float weights.
//!
//! The classifier consumes a (1, 210, 210, 1) tensor: 210 mel bands, the
//! time axis padded or truncated to exactly 210 frames, values min-max
//! normalized per file into [0, 1].

use ndarray::{s, Array2, Array4};
use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

use super::audio_decoder::DecodedAudio;

/// STFT frame length in samples
pub const FRAME_LENGTH: usize = 2048;
/// STFT hop in samples
pub const HOP_LENGTH: usize = 512;
/// Mel band count of the classifier input
pub const CLASSIFIER_MEL_BANDS: usize = 210;
/// Time-axis length of the classifier input
pub const CLASSIFIER_FRAMES: usize = 210;

/// Build the fixed-shape classifier input tensor for a decoded track
pub fn classifier_tensor(audio: &DecodedAudio) -> Array4<f32> {
    let mel = mel_power_spectrogram(&audio.samples, audio.sample_rate, CLASSIFIER_MEL_BANDS);
    let mut db = power_to_db(&mel);
    min_max_normalize(&mut db);
    normalize_to_fixed_shape(&db, CLASSIFIER_FRAMES)
}

/// Zero-pad half a frame on each side for centered framing
pub(crate) fn pad_center(samples: &[f32]) -> Vec<f32> {
    let pad = FRAME_LENGTH / 2;
    let mut padded = vec![0.0; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);
    padded
}

/// Frame count of a centered short-time analysis over `len` input samples
pub(crate) fn frame_count(len: usize) -> usize {
    1 + len / HOP_LENGTH
}

/// Mel-scaled power spectrogram, shape (n_mels, frames)
pub fn mel_power_spectrogram(samples: &[f32], sample_rate: u32, n_mels: usize) -> Array2<f32> {
    let power = power_spectrogram(samples);
    let filterbank = mel_filterbank(sample_rate, n_mels);
    filterbank.dot(&power)
}

/// Power spectrogram |STFT|^2, shape (FRAME_LENGTH/2 + 1, frames)
fn power_spectrogram(samples: &[f32]) -> Array2<f32> {
    let padded = pad_center(samples);
    let num_frames = frame_count(samples.len());
    let num_bins = FRAME_LENGTH / 2 + 1;

    let window: Vec<f32> = (0..FRAME_LENGTH)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / FRAME_LENGTH as f32).cos()))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(FRAME_LENGTH);

    let mut power = Array2::<f32>::zeros((num_bins, num_frames));
    let mut buffer = vec![Complex { re: 0.0f32, im: 0.0f32 }; FRAME_LENGTH];

    for frame_idx in 0..num_frames {
        let start = frame_idx * HOP_LENGTH;
        for i in 0..FRAME_LENGTH {
            let sample = padded.get(start + i).copied().unwrap_or(0.0);
            buffer[i] = Complex { re: sample * window[i], im: 0.0 };
        }
        fft.process(&mut buffer);
        for (bin, value) in buffer[..num_bins].iter().enumerate() {
            power[[bin, frame_idx]] = value.norm_sqr();
        }
    }

    power
}

/// Triangular mel filterbank (HTK mel scale), shape (n_mels, FRAME_LENGTH/2 + 1)
fn mel_filterbank(sample_rate: u32, n_mels: usize) -> Array2<f32> {
    fn hz_to_mel(hz: f32) -> f32 {
        2595.0 * (1.0 + hz / 700.0).log10()
    }
    fn mel_to_hz(mel: f32) -> f32 {
        700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
    }

    let f_max = sample_rate as f32 / 2.0;
    let mel_max = hz_to_mel(f_max);
    let num_bins = FRAME_LENGTH / 2 + 1;

    // n_mels + 2 band edges, evenly spaced on the mel axis
    let hz_points: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f32 / (n_mels + 1) as f32))
        .collect();

    let mut filters = Array2::<f32>::zeros((n_mels, num_bins));
    for m in 0..n_mels {
        let lower = hz_points[m];
        let center = hz_points[m + 1];
        let upper = hz_points[m + 2];
        let rising = (center - lower).max(f32::EPSILON);
        let falling = (upper - center).max(f32::EPSILON);

        for bin in 0..num_bins {
            let freq = bin as f32 * sample_rate as f32 / FRAME_LENGTH as f32;
            let weight = ((freq - lower) / rising).min((upper - freq) / falling);
            if weight > 0.0 {
                filters[[m, bin]] = weight;
            }
        }
    }

    filters
}

/// Power to decibels, referenced to the matrix's own peak, floored at -80 dB
pub fn power_to_db(power: &Array2<f32>) -> Array2<f32> {
    const AMIN: f32 = 1e-10;
    const TOP_DB: f32 = 80.0;

    let reference = power.iter().copied().fold(AMIN, f32::max);
    let ref_db = 10.0 * reference.log10();
    power.mapv(|p| (10.0 * p.max(AMIN).log10() - ref_db).max(-TOP_DB))
}

/// In-place min-max normalization into [0, 1]
///
/// A flat matrix (e.g. digital silence) maps to all zeros rather than NaN.
pub fn min_max_normalize(matrix: &mut Array2<f32>) {
    let min = matrix.iter().copied().fold(f32::INFINITY, f32::min);
    let max = matrix.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if !range.is_finite() || range <= f32::EPSILON {
        matrix.fill(0.0);
    } else {
        matrix.mapv_inplace(|v| (v - min) / range);
    }
}

/// Force the time axis to exactly `target_frames` and add batch/channel axes
///
/// Shorter spectrograms are zero-padded on the right; longer ones keep only
/// the first `target_frames` frames. Output shape: (1, bands, target, 1).
pub fn normalize_to_fixed_shape(matrix: &Array2<f32>, target_frames: usize) -> Array4<f32> {
    let (bands, frames) = matrix.dim();
    let mut fixed = Array2::<f32>::zeros((bands, target_frames));
    let keep = frames.min(target_frames);
    if keep > 0 {
        fixed
            .slice_mut(s![.., ..keep])
            .assign(&matrix.slice(s![.., ..keep]));
    }
    fixed
        .insert_axis(ndarray::Axis(0))
        .insert_axis(ndarray::Axis(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    #[test]
    fn short_spectrogram_is_right_padded() {
        let matrix = Array2::from_elem((210, 5), 0.5f32);
        let tensor = normalize_to_fixed_shape(&matrix, 210);
        assert_eq!(tensor.shape(), &[1, 210, 210, 1]);
        assert_eq!(tensor[[0, 0, 4, 0]], 0.5);
        assert_eq!(tensor[[0, 0, 5, 0]], 0.0);
        assert_eq!(tensor[[0, 209, 209, 0]], 0.0);
    }

    #[test]
    fn long_spectrogram_keeps_first_frames() {
        let matrix = Array::from_shape_fn((210, 400), |(_, t)| t as f32);
        let tensor = normalize_to_fixed_shape(&matrix, 210);
        assert_eq!(tensor.shape(), &[1, 210, 210, 1]);
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert_eq!(tensor[[0, 0, 209, 0]], 209.0);
    }

    #[test]
    fn min_max_normalize_spans_unit_interval() {
        let mut matrix = ndarray::array![[1.0f32, 3.0], [5.0, 2.0]];
        min_max_normalize(&mut matrix);
        assert_eq!(matrix[[0, 0]], 0.0);
        assert_eq!(matrix[[1, 0]], 1.0);
        assert!(matrix.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn flat_matrix_normalizes_to_zeros() {
        let mut matrix = Array2::from_elem((4, 4), 7.0f32);
        min_max_normalize(&mut matrix);
        assert!(matrix.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn power_to_db_is_peak_referenced_and_floored() {
        let power = ndarray::array![[1.0f32, 0.1], [0.0, 1e-12]];
        let db = power_to_db(&power);
        assert_eq!(db[[0, 0]], 0.0);
        assert!((db[[0, 1]] + 10.0).abs() < 1e-4);
        assert_eq!(db[[1, 0]], -80.0);
        assert_eq!(db[[1, 1]], -80.0);
    }

    #[test]
    fn centered_framing_covers_short_signals() {
        // 0.1s at 22050 Hz: still at least one frame
        assert!(frame_count(2205) >= 1);
        assert_eq!(frame_count(0), 1);
        // ~4.9s at 22050 Hz lands right at the classifier's 210 frames
        assert_eq!(frame_count(512 * 209), 210);
    }

    #[test]
    fn silence_produces_all_zero_tensor() {
        let audio = DecodedAudio {
            samples: vec![0.0; 22_050],
            sample_rate: 22_050,
            channels: 1,
            duration_seconds: 1.0,
        };
        let tensor = classifier_tensor(&audio);
        assert_eq!(tensor.shape(), &[1, 210, 210, 1]);
        assert!(tensor.iter().all(|&v| v == 0.0));
    }
}
