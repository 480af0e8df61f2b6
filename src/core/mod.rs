pub mod engine;
pub mod keys;
pub mod oscillator;
pub mod router;
pub mod synth;
pub mod voice;

pub use synth::Synth;
