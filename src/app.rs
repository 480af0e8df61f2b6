use anyhow::Result;
use eframe::egui;

use crate::audio::AudioOutput;
use crate::config::Config;
use crate::core::keys;
use crate::core::router::InputRouter;
use crate::messaging::{MessageBus, SynthMessage, ToneSender};
use crate::ui::KeyboardView;
use crate::utils::{format_frequency, format_time};

/// Messages applied to the synth per frame
const MAX_MESSAGES_PER_FRAME: usize = 64;

// Main app state
pub struct PianoApp {
    config: Config,
    router: InputRouter<ToneSender>,
    message_bus: MessageBus,
    keyboard: KeyboardView,
    audio: AudioOutput,
}

impl eframe::App for PianoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Virtual Piano");
            ui.label("Click a key or type the letter shown on it.");
            ui.add_space(12.0);

            self.keyboard.show(ui, &mut self.router);

            ui.add_space(12.0);
            ui.separator();
            self.render_status(ui);
        });

        // Apply whatever the router sent this frame before the next audio buffer
        self.message_bus.process_messages(MAX_MESSAGES_PER_FRAME);

        // Keep polling input while notes are sounding
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.router.release_all();
        if self.message_bus.send(SynthMessage::SilenceAll).is_ok() {
            self.message_bus.process_messages(usize::MAX);
        }
        log::info!("Piano closed");
    }
}

impl PianoApp {
    pub fn new(config: Config) -> Result<Self> {
        let audio = AudioOutput::open(config.tone.clone())?;
        let message_bus = MessageBus::new(audio.synth.clone());
        let router = InputRouter::new(ToneSender::new(message_bus.sender()));

        Ok(PianoApp {
            config,
            router,
            message_bus,
            keyboard: KeyboardView::new(),
            audio,
        })
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (focused, keys) = ctx.input(|i| {
            let keys: Vec<(char, bool, bool)> = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key { key, pressed, repeat, .. } => {
                        key_char(*key).map(|c| (c, *pressed, *repeat))
                    }
                    _ => None,
                })
                .collect();
            (i.focused, keys)
        });

        for (trigger, pressed, repeat) in keys {
            if pressed {
                self.router.key_down(trigger, repeat);
            } else {
                self.router.key_up(trigger);
            }
        }

        self.router.set_focused(focused);
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let playing: Vec<String> = self
            .router
            .active_notes()
            .into_iter()
            .filter_map(|name| {
                let (_, def) = keys::find_by_name(name)?;
                let tone = self.router.active_tone(name)?;
                Some(format!("{} {}", def.label(), format_frequency(tone.frequency)))
            })
            .collect();

        ui.horizontal(|ui| {
            ui.label("Playing:");
            if playing.is_empty() {
                ui.weak("nothing");
            } else {
                ui.label(playing.join(", "));
            }
        });

        // Includes voices still fading out after release
        let voices = self.audio.synth.read().map(|s| s.voice_count()).unwrap_or(0);
        let tone = &self.config.tone;
        ui.label(format!(
            "{:?} wave, release {}, {} voice(s)",
            tone.waveform,
            format_time(tone.decay_seconds),
            voices
        ));
    }
}

/// The character a letter key types, lowercased
fn key_char(key: egui::Key) -> Option<char> {
    let mut chars = key.name().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}
