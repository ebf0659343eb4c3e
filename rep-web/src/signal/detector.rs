//! Smoothed z-score spike detector
//!
//! Flags samples that stray more than `threshold` standard deviations from a
//! trailing baseline. Flagged samples only enter the baseline with weight
//! `influence`, so one spike does not drag the mean along with it. Slow
//! drift (camera repositioning, subject shuffling) is absorbed naturally.

use serde::Serialize;

use super::ring_buffer::RingBuffer;
use crate::config::DetectorConfig;

/// Deviations smaller than this never count, even over a flat window
const MIN_DEVIATION: f32 = 1e-6;

/// Per-sample detector output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Negative,
    Neutral,
    Positive,
}

impl Verdict {
    /// -1, 0 or +1
    pub fn as_i8(&self) -> i8 {
        match self {
            Verdict::Negative => -1,
            Verdict::Neutral => 0,
            Verdict::Positive => 1,
        }
    }
}

/// Online peak detector over one scalar signal
#[derive(Clone, Debug)]
pub struct ZScoreDetector {
    /// z-score needed to flag a sample
    threshold: f32,
    /// Weight of flagged samples in the filtered series (0-1)
    influence: f32,
    /// Filtered series, capacity = lag
    filtered: RingBuffer,
}

impl ZScoreDetector {
    pub fn new(lag: usize, threshold: f32, influence: f32) -> Self {
        Self {
            threshold,
            influence: influence.clamp(0.0, 1.0),
            filtered: RingBuffer::new(lag),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.lag, config.threshold, config.influence)
    }

    pub fn lag(&self) -> usize {
        self.filtered.capacity()
    }

    /// Window is full and verdicts are meaningful
    pub fn is_primed(&self) -> bool {
        self.filtered.is_full()
    }

    /// Feed one sample and classify it
    pub fn update(&mut self, x: f32) -> Verdict {
        if !self.filtered.is_full() {
            self.filtered.push(x);
            return Verdict::Neutral;
        }

        let (Some(mean), Some(std), Some(last)) = (
            self.filtered.mean(),
            self.filtered.std_dev(),
            self.filtered.latest(),
        ) else {
            self.filtered.push(x);
            return Verdict::Neutral;
        };

        let deviation = x - mean;
        if deviation.abs() > self.threshold * std && deviation.abs() > MIN_DEVIATION {
            self.filtered
                .push(self.influence * x + (1.0 - self.influence) * last);
            if deviation > 0.0 {
                Verdict::Positive
            } else {
                Verdict::Negative
            }
        } else {
            self.filtered.push(x);
            Verdict::Neutral
        }
    }

    /// Drop all history (new calibration, new subject)
    pub fn reset(&mut self) {
        self.filtered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_until_primed() {
        let mut detector = ZScoreDetector::new(5, 3.0, 0.0);
        for i in 0..5 {
            // Wild values, but no history yet
            assert_eq!(detector.update(i as f32 * 100.0), Verdict::Neutral);
        }
        assert!(detector.is_primed());
    }

    #[test]
    fn test_constant_signal_never_fires() {
        let mut detector = ZScoreDetector::new(8, 2.0, 0.5);
        for _ in 0..200 {
            assert_eq!(detector.update(0.42), Verdict::Neutral);
        }
    }

    #[test]
    fn test_spike_after_flat_window() {
        let mut detector = ZScoreDetector::new(10, 3.0, 0.0);
        for _ in 0..10 {
            detector.update(1.0);
        }
        assert_eq!(detector.update(1.5), Verdict::Positive);
    }

    #[test]
    fn test_spike_above_threshold_std() {
        let lag = 6;
        let threshold = 2.0;
        let mut detector = ZScoreDetector::new(lag, threshold, 0.0);
        let window = [1.0, 1.2, 0.8, 1.0, 1.2, 0.8];
        for v in window {
            detector.update(v);
        }
        let mean: f32 = window.iter().sum::<f32>() / lag as f32;
        let std = (window.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / lag as f32).sqrt();

        assert_eq!(detector.update(mean + threshold * std * 0.9), Verdict::Neutral);
        assert_eq!(detector.update(mean + threshold * std * 1.5), Verdict::Positive);
    }

    #[test]
    fn test_negative_spike() {
        let mut detector = ZScoreDetector::new(4, 3.0, 0.0);
        for v in [0.5, 0.52, 0.48, 0.5] {
            detector.update(v);
        }
        assert_eq!(detector.update(0.0), Verdict::Negative);
        assert_eq!(Verdict::Negative.as_i8(), -1);
    }

    #[test]
    fn test_zero_influence_keeps_baseline() {
        // With influence 0 a sustained plateau keeps firing
        let mut detector = ZScoreDetector::new(5, 3.0, 0.0);
        for _ in 0..5 {
            detector.update(0.0);
        }
        for _ in 0..20 {
            assert_eq!(detector.update(1.0), Verdict::Positive);
        }
    }

    #[test]
    fn test_full_influence_absorbs_plateau() {
        let mut detector = ZScoreDetector::new(5, 3.0, 1.0);
        for _ in 0..5 {
            detector.update(0.0);
        }
        assert_eq!(detector.update(1.0), Verdict::Positive);
        let later: Vec<_> = (0..10).map(|_| detector.update(1.0)).collect();
        assert_eq!(later.last(), Some(&Verdict::Neutral));
    }

    #[test]
    fn test_reset_requires_repriming() {
        let mut detector = ZScoreDetector::new(3, 3.0, 0.0);
        for _ in 0..3 {
            detector.update(0.0);
        }
        detector.reset();
        assert!(!detector.is_primed());
        assert_eq!(detector.update(10.0), Verdict::Neutral);
    }
}
