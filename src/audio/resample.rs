//! Channel mixing and resampling utilities.
//!
//! The hosted speech service expects **16 kHz mono `f32`** audio.  This
//! module provides the two conversion steps applied to every captured chunk:
//!
//! 1. [`mix_to_mono`] — downmix any number of interleaved channels to mono.
//! 2. [`resample_to_16khz`] — resample from the device's native rate using
//!    linear interpolation (fast and good enough for speech uploads).

/// Target sample rate for uploaded audio.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// mix_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all
/// channels.
///
/// The output length is `samples.len() / channels`.
///
/// * If `channels == 1` the input slice is returned as an owned `Vec` with
///   no averaging.
/// * If `channels == 0` an empty vector is returned.
///
/// # Example
///
/// ```rust
/// use pronounce_coach::audio::mix_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = mix_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// assert!((mono[1] - 0.0).abs() < 1e-6);
/// ```
pub fn mix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample_to_16khz
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to 16 000 Hz using linear
/// interpolation.
///
/// Returns the input unchanged when `source_rate` is already 16 000 Hz.
/// Empty input and a zero source rate both yield an empty vector.
pub fn resample_to_16khz(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if samples.is_empty() || source_rate == 0 {
        return Vec::new();
    }
    if source_rate == TARGET_SAMPLE_RATE {
        return samples.to_vec();
    }

    let ratio = source_rate as f64 / TARGET_SAMPLE_RATE as f64;
    let out_len = ((samples.len() as f64) / ratio).floor() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let a = samples[idx];
        let b = if idx + 1 < samples.len() {
            samples[idx + 1]
        } else {
            a
        };

        out.push(a + (b - a) * frac);
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- mix_to_mono ---

    #[test]
    fn mono_passthrough() {
        let samples = vec![0.1_f32, 0.2, 0.3];
        let out = mix_to_mono(&samples, 1);
        assert_eq!(out, samples);
    }

    #[test]
    fn stereo_averages_channels() {
        let stereo = vec![1.0_f32, 0.0, 0.5, 0.5];
        let mono = mix_to_mono(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.5).abs() < 1e-6);
        assert!((mono[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_channels_yields_empty() {
        assert!(mix_to_mono(&[0.1, 0.2], 0).is_empty());
    }

    // ---- resample_to_16khz ---

    #[test]
    fn same_rate_passthrough() {
        let samples = vec![0.1_f32; 160];
        let out = resample_to_16khz(&samples, 16_000);
        assert_eq!(out.len(), samples.len());
    }

    #[test]
    fn downsample_48k_halves_thrice() {
        // 48 kHz → 16 kHz is a 3:1 reduction.
        let samples = vec![0.25_f32; 4_800]; // 100 ms at 48 kHz
        let out = resample_to_16khz(&samples, 48_000);
        assert_eq!(out.len(), 1_600); // 100 ms at 16 kHz
                                      // Constant signal stays constant under linear interpolation.
        assert!(out.iter().all(|s| (s - 0.25).abs() < 1e-6));
    }

    #[test]
    fn downsample_44100_length() {
        let samples = vec![0.0_f32; 44_100]; // 1 s
        let out = resample_to_16khz(&samples, 44_100);
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn empty_input_yields_empty() {
        assert!(resample_to_16khz(&[], 48_000).is_empty());
        assert!(resample_to_16khz(&[0.1], 0).is_empty());
    }

    #[test]
    fn interpolates_between_samples() {
        // 32 kHz ramp downsampled 2:1 — every output sample lands exactly on
        // an input sample, so the ramp is preserved.
        let samples: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let out = resample_to_16khz(&samples, 32_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 2.0).abs() < 1e-6);
        assert!((out[3] - 6.0).abs() < 1e-6);
    }
}
