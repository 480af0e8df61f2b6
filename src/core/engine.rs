/// Identifies one sounding voice inside the synth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToneHandle(pub u64);

/// Starts and stops tones. The input router drives whichever engine it owns.
pub trait ToneEngine {
    /// Begin a tone at `frequency` Hz, audible immediately
    fn start(&mut self, frequency: f32) -> ToneHandle;

    /// Fade out and release a tone. `None` and unknown handles are ignored.
    fn stop(&mut self, handle: Option<ToneHandle>);
}
