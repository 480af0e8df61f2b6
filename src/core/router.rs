//! Turns pointer and keyboard input into note on/off calls.

use std::collections::HashMap;

use crate::core::engine::{ToneEngine, ToneHandle};
use crate::core::keys::{self, NoteDefinition, KEY_TABLE};

/// Pointer interaction with the key at the given table index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(usize),
    Release(usize),
    /// The pointer left the key while the button was still held
    Leave(usize),
}

/// A sounding note and the voice playing it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTone {
    pub handle: ToneHandle,
    pub frequency: f32,
}

pub struct InputRouter<E: ToneEngine> {
    engine: E,
    live: HashMap<&'static str, ActiveTone>,
    focused: bool,
}

impl<E: ToneEngine> InputRouter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            live: HashMap::new(),
            focused: true,
        }
    }

    pub fn dispatch(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Press(index) => {
                if let Some(def) = KEY_TABLE.get(index) {
                    self.note_on(def);
                }
            }
            KeyEvent::Release(index) => {
                if let Some(def) = KEY_TABLE.get(index) {
                    self.note_off(def);
                }
            }
            KeyEvent::Leave(index) => {
                if let Some(def) = KEY_TABLE.get(index) {
                    if self.is_active(def.name) {
                        self.note_off(def);
                    }
                }
            }
        }
    }

    /// Auto-repeat key downs are ignored so a held key sounds once
    pub fn key_down(&mut self, trigger: char, repeat: bool) {
        if repeat {
            return;
        }
        if let Some((_, def)) = keys::find_by_trigger(trigger) {
            self.note_on(def);
        }
    }

    pub fn key_up(&mut self, trigger: char) {
        if let Some((_, def)) = keys::find_by_trigger(trigger) {
            self.note_off(def);
        }
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.live.contains_key(name)
    }

    pub fn active_tone(&self, name: &str) -> Option<&ActiveTone> {
        self.live.get(name)
    }

    /// Names of every sounding note, in keyboard order
    pub fn active_notes(&self) -> Vec<&'static str> {
        KEY_TABLE
            .iter()
            .map(|def| def.name)
            .filter(|name| self.live.contains_key(name))
            .collect()
    }

    /// Track window focus. Key-up events never arrive once focus is gone,
    /// so losing it releases every sounding note.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused && !focused {
            log::debug!("Window lost focus, releasing held notes");
            self.release_all();
        }
        self.focused = focused;
    }

    /// Release every sounding note
    pub fn release_all(&mut self) {
        for def in KEY_TABLE.iter() {
            if self.is_active(def.name) {
                self.note_off(def);
            }
        }
    }

    fn note_on(&mut self, def: &'static NoteDefinition) {
        // Mouse and keyboard can both reach the same note; keep the voice we have
        if self.live.contains_key(def.name) {
            return;
        }
        let handle = self.engine.start(def.frequency);
        log::debug!("Note on {} ({} Hz) as {:?}", def.name, def.frequency, handle);
        self.live.insert(
            def.name,
            ActiveTone {
                handle,
                frequency: def.frequency,
            },
        );
    }

    fn note_off(&mut self, def: &NoteDefinition) {
        let tone = self.live.remove(def.name);
        if let Some(tone) = &tone {
            log::debug!("Note off {} ({:?})", def.name, tone.handle);
        }
        self.engine.stop(tone.map(|t| t.handle));
    }
}
