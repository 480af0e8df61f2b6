use crate::core::engine::ToneHandle;

/// Message types for communication between UI and audio engine
#[derive(Debug, Clone, PartialEq)]
pub enum SynthMessage {
    StartTone(ToneHandle, f32), // (handle, frequency)
    StopTone(ToneHandle),
    SilenceAll,
}
