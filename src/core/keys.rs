//! The fixed one-octave key table.

/// Width of a white key, also the step between white keys
pub const WHITE_KEY_WIDTH: f32 = 60.0;
/// Black keys straddle the boundary between two white keys
pub const BLACK_KEY_HALF_WIDTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    White,
    Black,
}

/// A single playable key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteDefinition {
    pub name: &'static str,
    pub class: KeyClass,
    pub trigger: char,
    pub frequency: f32,
}

impl NoteDefinition {
    const fn new(name: &'static str, class: KeyClass, trigger: char, frequency: f32) -> Self {
        Self { name, class, trigger, frequency }
    }

    /// Text painted on the key, e.g. `C# (w)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.trigger)
    }
}

/// C4 up to C5, left to right
pub static KEY_TABLE: [NoteDefinition; 13] = [
    NoteDefinition::new("C", KeyClass::White, 'a', 261.63),
    NoteDefinition::new("C#", KeyClass::Black, 'w', 277.18),
    NoteDefinition::new("D", KeyClass::White, 's', 293.66),
    NoteDefinition::new("D#", KeyClass::Black, 'e', 311.13),
    NoteDefinition::new("E", KeyClass::White, 'd', 329.63),
    NoteDefinition::new("F", KeyClass::White, 'f', 349.23),
    NoteDefinition::new("F#", KeyClass::Black, 't', 369.99),
    NoteDefinition::new("G", KeyClass::White, 'g', 392.00),
    NoteDefinition::new("G#", KeyClass::Black, 'y', 415.30),
    NoteDefinition::new("A", KeyClass::White, 'h', 440.00),
    NoteDefinition::new("A#", KeyClass::Black, 'u', 466.16),
    NoteDefinition::new("B", KeyClass::White, 'j', 493.88),
    NoteDefinition::new("C2", KeyClass::White, 'k', 523.25),
];

/// Look up a key by its trigger character. Matching ignores case.
pub fn find_by_trigger(trigger: char) -> Option<(usize, &'static NoteDefinition)> {
    let trigger = trigger.to_ascii_lowercase();
    KEY_TABLE.iter().enumerate().find(|(_, def)| def.trigger == trigger)
}

/// Look up a key by its note name, e.g. `"C#"`. Names are case-sensitive.
pub fn find_by_name(name: &str) -> Option<(usize, &'static NoteDefinition)> {
    KEY_TABLE.iter().enumerate().find(|(_, def)| def.name == name)
}

/// Number of white keys that come before `index` in the table
pub fn white_keys_before(index: usize) -> usize {
    KEY_TABLE
        .iter()
        .take(index)
        .filter(|def| def.class == KeyClass::White)
        .count()
}

/// Horizontal offset of a black key from the left edge of the keyboard.
/// White keys are laid out in sequence and have no offset of their own.
pub fn black_key_offset(index: usize) -> Option<f32> {
    match KEY_TABLE.get(index)?.class {
        KeyClass::Black => {
            Some(white_keys_before(index) as f32 * WHITE_KEY_WIDTH - BLACK_KEY_HALF_WIDTH)
        }
        KeyClass::White => None,
    }
}
