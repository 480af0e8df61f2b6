//! On-screen keyboard: geometry, painting and pointer tracking.
//!
//! Keys hold no note data of their own. Every shape refers back to its index
//! in the key table, and the pressed look comes from the input router.

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};

use crate::core::engine::ToneEngine;
use crate::core::keys::{self, KeyClass, KEY_TABLE, WHITE_KEY_WIDTH};
use crate::core::router::{InputRouter, KeyEvent};
use crate::utils::format_frequency;

const WHITE_KEY_HEIGHT: f32 = 200.0;
const BLACK_KEY_WIDTH: f32 = 40.0;
const BLACK_KEY_HEIGHT: f32 = 120.0;

/// Where one key sits, relative to the keyboard's top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct KeyShape {
    pub index: usize,
    pub class: KeyClass,
    pub rect: Rect,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    keys: Vec<KeyShape>,
    size: Vec2,
}

impl KeyboardLayout {
    pub fn new() -> Self {
        let mut keys = Vec::with_capacity(KEY_TABLE.len());
        let mut white_count = 0;

        for (index, def) in KEY_TABLE.iter().enumerate() {
            let rect = match keys::black_key_offset(index) {
                Some(offset) => Rect::from_min_size(
                    Pos2::new(offset, 0.0),
                    Vec2::new(BLACK_KEY_WIDTH, BLACK_KEY_HEIGHT),
                ),
                None => {
                    let x = white_count as f32 * WHITE_KEY_WIDTH;
                    white_count += 1;
                    Rect::from_min_size(
                        Pos2::new(x, 0.0),
                        Vec2::new(WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT),
                    )
                }
            };
            keys.push(KeyShape {
                index,
                class: def.class,
                rect,
                label: def.label(),
            });
        }

        Self {
            keys,
            size: Vec2::new(white_count as f32 * WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn keys(&self) -> &[KeyShape] {
        &self.keys
    }

    /// Keys in paint order: white first so black keys land on top
    fn paint_order(&self) -> impl Iterator<Item = &KeyShape> {
        let whites = self.keys().iter().filter(|k| k.class == KeyClass::White);
        let blacks = self.keys().iter().filter(|k| k.class == KeyClass::Black);
        whites.chain(blacks)
    }

    /// Key under a point in keyboard coordinates. Black keys win where they overlap.
    pub fn key_at(&self, pos: Pos2) -> Option<usize> {
        self.keys()
            .iter()
            .filter(|k| k.class == KeyClass::Black)
            .chain(self.keys().iter().filter(|k| k.class == KeyClass::White))
            .find(|k| k.rect.contains(pos))
            .map(|k| k.index)
    }
}

/// Follows the primary pointer button across keys.
///
/// A press starts the key under the pointer. Dragging off that key while held
/// counts as leaving it; dragging onto another key does not start it.
#[derive(Debug, Default)]
pub struct PointerTracker {
    held: Option<usize>,
}

impl PointerTracker {
    #[cfg(test)]
    pub fn held(&self) -> Option<usize> {
        self.held
    }

    pub fn update(&mut self, over: Option<usize>, pressed: bool, released: bool) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        if pressed {
            if let Some(index) = over {
                events.push(KeyEvent::Press(index));
                self.held = Some(index);
            }
        }

        if let Some(held) = self.held {
            if over != Some(held) {
                events.push(KeyEvent::Leave(held));
                self.held = None;
            }
        }

        if released {
            if let Some(index) = over {
                events.push(KeyEvent::Release(index));
            }
            self.held = None;
        }

        events
    }
}

pub struct KeyboardView {
    layout: KeyboardLayout,
    pointer: PointerTracker,
}

impl KeyboardView {
    pub fn new() -> Self {
        Self {
            layout: KeyboardLayout::new(),
            pointer: PointerTracker::default(),
        }
    }

    pub fn show<E: ToneEngine>(&mut self, ui: &mut Ui, router: &mut InputRouter<E>) {
        let (rect, response) = ui.allocate_exact_size(self.layout.size(), Sense::click_and_drag());

        let (hover, pressed, released) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });
        let over = hover
            .filter(|pos| rect.contains(*pos))
            .and_then(|pos| self.layout.key_at(pos - rect.min.to_vec2()));

        for event in self.pointer.update(over, pressed, released) {
            router.dispatch(event);
        }

        if ui.is_rect_visible(rect) {
            self.paint(ui, rect, router);
        }

        if let Some(index) = over {
            let def = &KEY_TABLE[index];
            response.on_hover_text(format!("{}: {}", def.name, format_frequency(def.frequency)));
        }
    }

    fn paint<E: ToneEngine>(&self, ui: &Ui, rect: Rect, router: &InputRouter<E>) {
        let painter = ui.painter();
        let origin = rect.min.to_vec2();

        for key in self.layout.paint_order() {
            let key_rect = key.rect.translate(origin);
            let active = router.is_active(KEY_TABLE[key.index].name);

            let (fill, text_color) = match (key.class, active) {
                (KeyClass::White, false) => (Color32::WHITE, Color32::from_gray(51)),
                (KeyClass::White, true) => (Color32::from_rgb(100, 150, 255), Color32::BLACK),
                (KeyClass::Black, false) => (Color32::BLACK, Color32::from_gray(200)),
                (KeyClass::Black, true) => (Color32::from_rgb(50, 100, 200), Color32::WHITE),
            };

            painter.rect_filled(key_rect, 2.0, fill);
            painter.rect_stroke(
                key_rect,
                2.0,
                Stroke::new(1.0, Color32::BLACK),
                StrokeKind::Middle,
            );
            painter.text(
                Pos2::new(key_rect.center().x, key_rect.bottom() - 16.0),
                Align2::CENTER_CENTER,
                &key.label,
                FontId::proportional(12.0),
                text_color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_places_eight_white_keys() {
        let layout = KeyboardLayout::new();
        assert_eq!(layout.keys().len(), 13);
        assert_eq!(layout.size(), Vec2::new(480.0, 200.0));

        let whites: Vec<f32> = layout
            .keys()
            .iter()
            .filter(|k| k.class == KeyClass::White)
            .map(|k| k.rect.min.x)
            .collect();
        assert_eq!(whites, vec![0.0, 60.0, 120.0, 180.0, 240.0, 300.0, 360.0, 420.0]);
    }

    #[test]
    fn black_keys_use_table_offsets() {
        let layout = KeyboardLayout::new();
        for key in layout.keys().iter().filter(|k| k.class == KeyClass::Black) {
            assert_eq!(Some(key.rect.min.x), keys::black_key_offset(key.index));
            assert_eq!(key.rect.width(), 40.0);
        }
    }

    #[test]
    fn labels_come_from_the_table() {
        let layout = KeyboardLayout::new();
        assert_eq!(layout.keys()[0].label, "C (a)");
        assert_eq!(layout.keys()[10].label, "A# (u)");
    }

    #[test]
    fn black_keys_win_hit_tests() {
        let layout = KeyboardLayout::new();
        // Over C# (40..80), high enough to hit the black key
        assert_eq!(layout.key_at(Pos2::new(50.0, 50.0)), Some(1));
        // Same column below the black key falls through to C
        assert_eq!(layout.key_at(Pos2::new(50.0, 150.0)), Some(0));
        assert_eq!(layout.key_at(Pos2::new(10.0, 50.0)), Some(0));
        assert_eq!(layout.key_at(Pos2::new(450.0, 10.0)), Some(12));
        assert_eq!(layout.key_at(Pos2::new(500.0, 10.0)), None);
    }

    #[test]
    fn press_and_release_on_same_key() {
        let mut pointer = PointerTracker::default();
        assert_eq!(pointer.update(Some(3), true, false), vec![KeyEvent::Press(3)]);
        assert_eq!(pointer.held(), Some(3));
        assert!(pointer.update(Some(3), false, false).is_empty());
        assert_eq!(pointer.update(Some(3), false, true), vec![KeyEvent::Release(3)]);
        assert_eq!(pointer.held(), None);
    }

    #[test]
    fn quick_click_in_one_frame() {
        let mut pointer = PointerTracker::default();
        assert_eq!(
            pointer.update(Some(0), true, true),
            vec![KeyEvent::Press(0), KeyEvent::Release(0)]
        );
    }

    #[test]
    fn dragging_off_leaves_without_starting_next() {
        let mut pointer = PointerTracker::default();
        pointer.update(Some(0), true, false);
        assert_eq!(pointer.update(Some(2), false, false), vec![KeyEvent::Leave(0)]);
        assert!(pointer.update(Some(4), false, false).is_empty());
        assert_eq!(pointer.update(Some(4), false, true), vec![KeyEvent::Release(4)]);
    }

    #[test]
    fn leaving_the_keyboard_releases_held_key() {
        let mut pointer = PointerTracker::default();
        pointer.update(Some(5), true, false);
        assert_eq!(pointer.update(None, false, false), vec![KeyEvent::Leave(5)]);
        assert!(pointer.update(None, false, true).is_empty());
    }

    #[test]
    fn press_outside_does_nothing() {
        let mut pointer = PointerTracker::default();
        assert!(pointer.update(None, true, false).is_empty());
        assert_eq!(pointer.held(), None);
    }
}
