use crate::config::ToneConfig;
use crate::core::engine::ToneHandle;
use crate::core::voice::Voice;

/// Mixes every live voice into a mono signal
pub struct Synth {
    pub sample_rate: f32,
    pub tone: ToneConfig,
    voices: Vec<Voice>,
    /// Samples rendered since the synth was created
    clock: u64,
}

impl Synth {
    pub fn new(sample_rate: f32, tone: ToneConfig) -> Self {
        Synth {
            sample_rate,
            tone,
            voices: Vec::new(),
            clock: 0,
        }
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn voice(&self, handle: ToneHandle) -> Option<&Voice> {
        self.voices.iter().find(|v| v.handle == handle)
    }

    /// Begin a voice for `handle`. A handle that is already live is left alone.
    pub fn start_tone(&mut self, handle: ToneHandle, frequency: f32) {
        if self.voice(handle).is_some() {
            log::warn!("Tone {:?} already started", handle);
            return;
        }
        self.voices.push(Voice::new(handle, frequency, &self.tone));
    }

    /// Schedule the release of `handle`. Unknown or already released handles are ignored.
    pub fn stop_tone(&mut self, handle: ToneHandle) {
        let now = self.clock;
        let sample_rate = self.sample_rate;
        let tone = &self.tone;
        if let Some(voice) = self.voices.iter_mut().find(|v| v.handle == handle) {
            if voice.release(now, sample_rate, tone) {
                log::debug!("Tone {:?} releasing, halts at sample {:?}", handle, voice.halt_at);
            }
        }
    }

    /// Drop every voice at once, including those with a pending halt
    pub fn silence_all(&mut self) {
        self.voices.clear();
    }

    /// Generate one audio sample
    pub fn next_sample(&mut self) -> f32 {
        let sample_rate = self.sample_rate;
        let mut output = 0.0;
        for voice in &mut self.voices {
            output += voice.next_sample(sample_rate);
        }

        self.clock += 1;
        let now = self.clock;
        self.voices.retain(|voice| !voice.is_finished(now));

        output
    }
}
