use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, RwLock};
use crate::core::engine::{ToneEngine, ToneHandle};
use crate::core::synth::Synth;
use super::SynthMessage;

/// MessageBus manages communication between UI and audio engine
pub struct MessageBus {
    sender: Sender<SynthMessage>,
    receiver: Receiver<SynthMessage>,
    synth_ref: Arc<RwLock<Synth>>,
}

impl MessageBus {
    /// Create a new message bus connected to the synth engine
    pub fn new(synth: Arc<RwLock<Synth>>) -> Self {
        let (sender, receiver) = unbounded();

        MessageBus {
            sender,
            receiver,
            synth_ref: synth,
        }
    }

    /// Get a sender that can be cloned and passed to UI components
    pub fn sender(&self) -> Sender<SynthMessage> {
        self.sender.clone()
    }

    /// Public method to send a message
    pub fn send(&self, msg: SynthMessage) -> Result<(), crossbeam_channel::SendError<SynthMessage>> {
        self.sender.send(msg)
    }

    /// Apply pending messages to the synth, at most `max_messages` per call
    pub fn process_messages(&self, max_messages: usize) -> usize {
        let mut count = 0;

        while count < max_messages {
            let Ok(msg) = self.receiver.try_recv() else {
                break;
            };
            count += 1;

            self.handle_message(msg);
        }

        count
    }

    fn handle_message(&self, msg: SynthMessage) {
        let Ok(mut synth) = self.synth_ref.write() else {
            log::error!("Synth lock poisoned, dropping {:?}", msg);
            return;
        };
        match msg {
            SynthMessage::StartTone(handle, frequency) => synth.start_tone(handle, frequency),
            SynthMessage::StopTone(handle) => synth.stop_tone(handle),
            SynthMessage::SilenceAll => synth.silence_all(),
        }
    }
}

/// The UI-side tone engine: hands out handles and forwards requests to the synth
pub struct ToneSender {
    sender: Sender<SynthMessage>,
    next_handle: u64,
}

impl ToneSender {
    pub fn new(sender: Sender<SynthMessage>) -> Self {
        Self { sender, next_handle: 0 }
    }

    fn send(&self, msg: SynthMessage) {
        // The receiver lives as long as the app; a failed send means we are shutting down
        if let Err(e) = self.sender.send(msg) {
            log::warn!("Synth is gone, dropped {:?}", e.into_inner());
        }
    }
}

impl ToneEngine for ToneSender {
    fn start(&mut self, frequency: f32) -> ToneHandle {
        self.next_handle += 1;
        let handle = ToneHandle(self.next_handle);
        self.send(SynthMessage::StartTone(handle, frequency));
        handle
    }

    fn stop(&mut self, handle: Option<ToneHandle>) {
        if let Some(handle) = handle {
            self.send(SynthMessage::StopTone(handle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToneConfig;
    use crate::core::router::InputRouter;

    fn bus() -> (MessageBus, Arc<RwLock<Synth>>) {
        let synth = Arc::new(RwLock::new(Synth::new(1000.0, ToneConfig::default())));
        (MessageBus::new(Arc::clone(&synth)), synth)
    }

    #[test]
    fn handles_are_unique() {
        let (bus, _synth) = bus();
        let mut tones = ToneSender::new(bus.sender());
        let a = tones.start(261.63);
        let b = tones.start(261.63);
        assert_ne!(a, b);
    }

    #[test]
    fn messages_reach_the_synth() {
        let (bus, synth) = bus();
        let mut tones = ToneSender::new(bus.sender());
        let handle = tones.start(261.63);
        assert_eq!(synth.read().unwrap().voice_count(), 0);

        assert_eq!(bus.process_messages(16), 1);
        {
            let synth = synth.read().unwrap();
            let voice = synth.voice(handle).unwrap();
            assert_eq!(voice.oscillator.frequency, 261.63);
        }

        tones.stop(Some(handle));
        bus.process_messages(16);
        assert!(synth.read().unwrap().voice(handle).unwrap().is_releasing());
    }

    #[test]
    fn stop_without_handle_sends_nothing() {
        let (bus, _synth) = bus();
        let mut tones = ToneSender::new(bus.sender());
        tones.stop(None);
        assert_eq!(bus.process_messages(16), 0);
    }

    #[test]
    fn processing_is_bounded_per_call() {
        let (bus, synth) = bus();
        let mut tones = ToneSender::new(bus.sender());
        for _ in 0..5 {
            tones.start(440.0);
        }
        assert_eq!(bus.process_messages(3), 3);
        assert_eq!(synth.read().unwrap().voice_count(), 3);
        assert_eq!(bus.process_messages(3), 2);

        bus.send(SynthMessage::SilenceAll).unwrap();
        bus.process_messages(16);
        assert_eq!(synth.read().unwrap().voice_count(), 0);
    }

    #[test]
    fn typing_a_plays_middle_c_until_decayed() {
        let (bus, synth) = bus();
        let mut router = InputRouter::new(ToneSender::new(bus.sender()));

        router.key_down('a', false);
        bus.process_messages(16);
        let handle = router.active_tone("C").unwrap().handle;
        assert_eq!(synth.read().unwrap().voice(handle).unwrap().oscillator.frequency, 261.63);

        router.key_up('a');
        bus.process_messages(16);
        assert!(!router.is_active("C"));
        {
            let mut synth = synth.write().unwrap();
            assert!(synth.voice(handle).unwrap().is_releasing());
            // 0.5 s at 1 kHz
            for _ in 0..500 {
                synth.next_sample();
            }
            assert_eq!(synth.voice_count(), 0);
        }
    }

    #[test]
    fn releasing_sharp_leaves_c_sounding() {
        let (bus, synth) = bus();
        let mut router = InputRouter::new(ToneSender::new(bus.sender()));

        router.key_down('a', false);
        router.key_down('w', false);
        router.key_up('w');
        bus.process_messages(16);

        let c = router.active_tone("C").unwrap().handle;
        let synth = synth.read().unwrap();
        assert_eq!(synth.voice_count(), 2);
        assert!(!synth.voice(c).unwrap().is_releasing());
    }
}
