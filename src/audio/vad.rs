//! Energy-based voice activity detection.
//!
//! Audio is judged in 30 ms frames (480 samples at 16 kHz).  A frame counts
//! as speech when its RMS amplitude is above the configured threshold.  The
//! speech adapter uses this to notice when the user starts talking and when
//! they have stopped.

/// Frame length in samples: 30 ms at 16 kHz.
pub const FRAME_SAMPLES: usize = 480;

/// Root-mean-square amplitude of `frame`; `0.0` for an empty slice.
pub fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
}

/// Threshold-based speech/silence classifier.
///
/// ```rust
/// use warehouse_voice::audio::VadDetector;
///
/// let vad = VadDetector::new(0.02);
/// assert!(!vad.is_voice(&[0.0; 480]));
/// assert!(vad.is_voice(&[0.3; 480]));
/// ```
#[derive(Debug, Clone)]
pub struct VadDetector {
    rms_threshold: f32,
    frame_size: usize,
}

impl VadDetector {
    /// `rms_threshold` is in `[0.0, 1.0]`; `0.01`–`0.02` suits a quiet
    /// room, a noisy warehouse floor needs more.
    pub fn new(rms_threshold: f32) -> Self {
        Self {
            rms_threshold,
            frame_size: FRAME_SAMPLES,
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// `true` when `frame` is loud enough to be speech.
    pub fn is_voice(&self, frame: &[f32]) -> bool {
        !frame.is_empty() && rms(frame) > self.rms_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_constant_signal_is_its_magnitude() {
        assert!((rms(&[0.5; 480]) - 0.5).abs() < 1e-6);
        assert!((rms(&[-0.5; 480]) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn silence_is_not_voice() {
        let vad = VadDetector::new(0.01);
        assert!(!vad.is_voice(&[0.0; FRAME_SAMPLES]));
        assert!(!vad.is_voice(&[]));
    }

    #[test]
    fn loud_frame_is_voice() {
        let vad = VadDetector::new(0.01);
        assert!(vad.is_voice(&[0.2; FRAME_SAMPLES]));
    }

    #[test]
    fn threshold_is_exclusive() {
        let vad = VadDetector::new(0.25);
        assert!(!vad.is_voice(&[0.25; FRAME_SAMPLES]));
        assert!(vad.is_voice(&[0.26; FRAME_SAMPLES]));
    }

    #[test]
    fn default_frame_is_30ms() {
        let vad = VadDetector::new(0.05);
        assert_eq!(vad.frame_size(), FRAME_SAMPLES);
    }
}
