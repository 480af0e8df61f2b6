mod envelope;
mod waveform;

pub use self::envelope::GainParam;
pub use self::waveform::Waveform;

/// A free-running oscillator at a fixed frequency
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Produce the current sample and advance the phase by one sample period
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let value = self.waveform.sample(self.phase);
        self.phase = (self.phase + self.frequency / sample_rate) % 1.0;
        value
    }
}
