use serde::{Serialize, Deserialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase`, where one cycle spans `0.0..1.0`
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => if phase < 0.5 { 1.0 } else { -1.0 },
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    -4.0 + 4.0 * phase
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_hits_its_peaks() {
        assert!(Waveform::Sine.sample(0.0).abs() < 1e-6);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-6);
        assert!((Waveform::Sine.sample(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn shapes_stay_in_range() {
        for waveform in [Waveform::Sine, Waveform::Square, Waveform::Saw, Waveform::Triangle] {
            for i in 0..100 {
                let value = waveform.sample(i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&value), "{:?} out of range: {}", waveform, value);
            }
        }
    }

    #[test]
    fn deserializes_lowercase_names() {
        let waveform: Waveform = serde_json::from_str("\"triangle\"").unwrap();
        assert_eq!(waveform, Waveform::Triangle);
    }
}
