use crate::config::ToneConfig;
use crate::core::engine::ToneHandle;
use crate::core::oscillator::{GainParam, Oscillator};

/// An oscillator wired through a gain stage
pub struct Voice {
    pub handle: ToneHandle,
    pub oscillator: Oscillator,
    pub gain: GainParam,
    /// Sample clock value at which the voice halts, once released
    pub halt_at: Option<u64>,
}

impl Voice {
    pub fn new(handle: ToneHandle, frequency: f32, tone: &ToneConfig) -> Self {
        Self {
            handle,
            oscillator: Oscillator::new(tone.waveform, frequency),
            gain: GainParam::new(tone.gain),
            halt_at: None,
        }
    }

    pub fn is_releasing(&self) -> bool {
        self.halt_at.is_some()
    }

    /// Start the release ramp and schedule the halt. Returns false if the
    /// voice was already releasing.
    pub fn release(&mut self, now: u64, sample_rate: f32, tone: &ToneConfig) -> bool {
        if self.is_releasing() {
            return false;
        }
        self.gain.exponential_ramp_to(tone.floor, tone.decay_seconds);
        let delay = (tone.decay_seconds * sample_rate).round() as u64;
        self.halt_at = Some(now + delay);
        true
    }

    pub fn is_finished(&self, now: u64) -> bool {
        matches!(self.halt_at, Some(at) if now >= at)
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let gain = self.gain.advance(1.0 / sample_rate);
        self.oscillator.next_sample(sample_rate) * gain
    }
}
