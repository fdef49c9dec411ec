//! Per-segment audio feature extraction and deterministic k-means
//! clustering.

/// One segment's 6-dimensional acoustic feature vector: pitch mean/std/range,
/// RMS energy, spectral centroid, zero-crossing rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub pitch_mean: f32,
    pub pitch_std: f32,
    pub pitch_range: f32,
    pub rms_energy: f32,
    pub spectral_centroid: f32,
    pub zero_crossing_rate: f32,
}

impl FeatureVector {
    fn as_array(&self) -> [f32; 6] {
        [self.pitch_mean, self.pitch_std, self.pitch_range, self.rms_energy, self.spectral_centroid, self.zero_crossing_rate]
    }
}

/// Estimate pitch track, RMS energy, spectral centroid and zero-crossing
/// rate for one segment's raw samples at `sample_rate` and reduce to a
/// single [`FeatureVector`]. Pitch is estimated via time-domain
/// autocorrelation, which is adequate for distinguishing two speakers'
/// registers without a full pitch-tracking model.
pub fn extract_features(samples: &[f32], sample_rate: u32) -> FeatureVector {
    let pitches = estimate_pitch_track(samples, sample_rate);
    let (pitch_mean, pitch_std, pitch_range) = pitch_stats(&pitches);

    FeatureVector {
        pitch_mean,
        pitch_std,
        pitch_range,
        rms_energy: rms_energy(samples),
        spectral_centroid: spectral_centroid(samples, sample_rate),
        zero_crossing_rate: zero_crossing_rate(samples),
    }
}

fn pitch_stats(pitches: &[f32]) -> (f32, f32, f32) {
    if pitches.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let mean = pitches.iter().sum::<f32>() / pitches.len() as f32;
    let variance = pitches.iter().map(|p| (p - mean).powi(2)).sum::<f32>() / pitches.len() as f32;
    let min = pitches.iter().cloned().fold(f32::MAX, f32::min);
    let max = pitches.iter().cloned().fold(f32::MIN, f32::max);
    (mean, variance.sqrt(), max - min)
}

/// Frame-wise autocorrelation pitch estimate over a human-voice range
/// (70-400 Hz), one estimate per 30ms frame.
fn estimate_pitch_track(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    let frame_len = (sample_rate as f32 * 0.03) as usize;
    if frame_len == 0 || samples.len() < frame_len {
        return Vec::new();
    }
    let min_lag = (sample_rate as f32 / 400.0) as usize;
    let max_lag = (sample_rate as f32 / 70.0) as usize;

    samples
        .chunks(frame_len)
        .filter(|frame| frame.len() == frame_len)
        .filter_map(|frame| autocorrelation_pitch(frame, sample_rate, min_lag.max(1), max_lag.min(frame_len - 1)))
        .collect()
}

fn autocorrelation_pitch(frame: &[f32], sample_rate: u32, min_lag: usize, max_lag: usize) -> Option<f32> {
    if min_lag >= max_lag {
        return None;
    }
    let mut best_lag = 0usize;
    let mut best_corr = 0.0f32;
    for lag in min_lag..=max_lag {
        let corr: f32 = frame.iter().zip(frame.iter().skip(lag)).map(|(a, b)| a * b).sum();
        if corr > best_corr {
            best_corr = corr;
            best_lag = lag;
        }
    }
    if best_lag == 0 || best_corr <= 0.0 {
        return None;
    }
    Some(sample_rate as f32 / best_lag as f32)
}

fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let crossings = samples.windows(2).filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0)).count();
    crossings as f32 / (samples.len() - 1) as f32
}

/// Magnitude-weighted mean frequency of a coarse DFT. Samples are short
/// enough (segment-level, not frame-level) that an exact FFT isn't
/// warranted; a direct O(n*k) DFT over a fixed bin count is.
fn spectral_centroid(samples: &[f32], sample_rate: u32) -> f32 {
    const BINS: usize = 32;
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len();
    let mut weighted_sum = 0.0f32;
    let mut magnitude_sum = 0.0f32;
    for k in 1..=BINS {
        let freq = k as f32 * sample_rate as f32 / (2.0 * BINS as f32);
        let omega = std::f32::consts::PI * k as f32 / BINS as f32;
        let (mut re, mut im) = (0.0f32, 0.0f32);
        for (i, s) in samples.iter().enumerate() {
            let angle = omega * i as f32 / n as f32 * BINS as f32;
            re += s * angle.cos();
            im -= s * angle.sin();
        }
        let magnitude = (re * re + im * im).sqrt();
        weighted_sum += freq * magnitude;
        magnitude_sum += magnitude;
    }
    if magnitude_sum == 0.0 {
        0.0
    } else {
        weighted_sum / magnitude_sum
    }
}

fn normalize_columns(vectors: &mut [FeatureVector]) {
    if vectors.is_empty() {
        return;
    }
    let arrays: Vec<[f32; 6]> = vectors.iter().map(|v| v.as_array()).collect();
    for dim in 0..6 {
        let values: Vec<f32> = arrays.iter().map(|a| a[dim]).collect();
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32).sqrt();
        if std <= 1e-6 {
            continue;
        }
        for (i, v) in vectors.iter_mut().enumerate() {
            let normalized = (arrays[i][dim] - mean) / std;
            set_dim(v, dim, normalized);
        }
    }
}

fn set_dim(v: &mut FeatureVector, dim: usize, value: f32) {
    match dim {
        0 => v.pitch_mean = value,
        1 => v.pitch_std = value,
        2 => v.pitch_range = value,
        3 => v.rms_energy = value,
        4 => v.spectral_centroid = value,
        _ => v.zero_crossing_rate = value,
    }
}

/// Deterministic 2-means clustering over normalized feature vectors.
/// Seeded by picking the two points with the greatest Euclidean
/// separation rather than random initialization, so results are
/// reproducible across runs. Returns a cluster label (0 or 1) per input
/// vector, and the label-to-median-pitch-mean mapping the caller uses to
/// resolve role assignment.
pub fn cluster_two(segments: &[FeatureVector]) -> Vec<usize> {
    if segments.len() < 2 {
        return vec![0; segments.len()];
    }
    let mut normalized = segments.to_vec();
    normalize_columns(&mut normalized);

    let (seed_a, seed_b) = farthest_pair(&normalized);
    let mut centroids = [normalized[seed_a].as_array(), normalized[seed_b].as_array()];
    let mut labels = vec![0usize; normalized.len()];

    for _ in 0..16 {
        let mut changed = false;
        for (i, v) in normalized.iter().enumerate() {
            let d0 = euclidean(&v.as_array(), &centroids[0]);
            let d1 = euclidean(&v.as_array(), &centroids[1]);
            let label = if d0 <= d1 { 0 } else { 1 };
            if labels[i] != label {
                changed = true;
            }
            labels[i] = label;
        }
        for cluster in 0..2 {
            let members: Vec<[f32; 6]> = normalized
                .iter()
                .zip(labels.iter())
                .filter(|(_, l)| **l == cluster)
                .map(|(v, _)| v.as_array())
                .collect();
            if !members.is_empty() {
                centroids[cluster] = mean_array(&members);
            }
        }
        if !changed {
            break;
        }
    }
    labels
}

fn farthest_pair(vectors: &[FeatureVector]) -> (usize, usize) {
    let mut best = (0, 1.min(vectors.len() - 1));
    let mut best_dist = -1.0f32;
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            let d = euclidean(&vectors[i].as_array(), &vectors[j].as_array());
            if d > best_dist {
                best_dist = d;
                best = (i, j);
            }
        }
    }
    best
}

fn euclidean(a: &[f32; 6], b: &[f32; 6]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f32>().sqrt()
}

fn mean_array(vectors: &[[f32; 6]]) -> [f32; 6] {
    let mut out = [0.0f32; 6];
    for v in vectors {
        for (i, x) in v.iter().enumerate() {
            out[i] += x;
        }
    }
    for x in out.iter_mut() {
        *x /= vectors.len() as f32;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_energy_of_silence_is_zero() {
        assert_eq!(rms_energy(&[0.0; 100]), 0.0);
    }

    #[test]
    fn cluster_two_separates_obviously_distinct_groups() {
        let low = FeatureVector { pitch_mean: 100.0, pitch_std: 5.0, pitch_range: 10.0, rms_energy: 0.1, spectral_centroid: 500.0, zero_crossing_rate: 0.05 };
        let high = FeatureVector { pitch_mean: 250.0, pitch_std: 5.0, pitch_range: 10.0, rms_energy: 0.1, spectral_centroid: 500.0, zero_crossing_rate: 0.05 };
        let segments = vec![low, low, high, high];
        let labels = cluster_two(&segments);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn cluster_two_is_deterministic() {
        let a = FeatureVector { pitch_mean: 120.0, pitch_std: 4.0, pitch_range: 8.0, rms_energy: 0.2, spectral_centroid: 400.0, zero_crossing_rate: 0.1 };
        let b = FeatureVector { pitch_mean: 220.0, pitch_std: 6.0, pitch_range: 12.0, rms_energy: 0.15, spectral_centroid: 600.0, zero_crossing_rate: 0.08 };
        let segments = vec![a, b, a, b];
        let first = cluster_two(&segments);
        let second = cluster_two(&segments);
        assert_eq!(first, second);
    }
}
