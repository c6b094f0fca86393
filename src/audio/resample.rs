//! Channel mixing and sample-rate conversion to 16 kHz mono.
//!
//! Both recognisers expect 16 kHz mono `f32`; microphones usually deliver
//! 44.1 or 48 kHz, often in stereo.  Linear interpolation is enough for
//! short spoken stock names.

/// Sample rate every recogniser consumes.
pub const TARGET_RATE: u32 = 16_000;

/// Average interleaved channels down to one.
///
/// `channels == 0` yields an empty vector; a trailing partial frame is
/// dropped.
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
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

/// Resample `samples` from `source_rate` Hz to [`TARGET_RATE`].
///
/// Output length is `ceil(len * 16000 / source_rate)`.
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    if source_rate == TARGET_RATE || source_rate == 0 {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = TARGET_RATE as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = src_pos as usize;
            let frac = (src_pos - idx as f64) as f32;
            match (samples.get(idx), samples.get(idx + 1)) {
                (Some(a), Some(b)) => a * (1.0 - frac) + b * frac,
                (Some(a), None) => *a,
                _ => 0.0,
            }
        })
        .collect()
}
