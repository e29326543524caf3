use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};
use super::Modifiers;

/// Current keyboard state for the window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered while unfocused; drop held keys
                    // so nothing stays stuck down.
                    for key in self.keys_down.drain() {
                        frame.keys_released.insert(key);
                    }
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `+1.0`, `-1.0` or `0.0` for a pair of opposing keys.
    ///
    /// Holding both keys cancels out.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut v = 0.0;
        if self.key_down(positive) {
            v += 1.0;
        }
        if self.key_down(negative) {
            v -= 1.0;
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    fn apply(state: &mut InputState, frame: &mut InputFrame, ev: InputEvent) {
        state.apply_event(frame, ev);
    }

    // ── key transitions ──────────────────────────────────────────────────

    #[test]
    fn press_marks_down_and_pressed() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, key(Key::W, KeyState::Pressed));
        assert!(s.key_down(Key::W));
        assert!(f.pressed(Key::W));
        assert_eq!(f.events.len(), 1);
    }

    #[test]
    fn repeat_press_is_not_a_new_transition() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, key(Key::W, KeyState::Pressed));
        f.clear();
        apply(
            &mut s,
            &mut f,
            InputEvent::Key { key: Key::W, state: KeyState::Pressed, repeat: true },
        );
        assert!(s.key_down(Key::W));
        assert!(!f.pressed(Key::W));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, key(Key::Q, KeyState::Released));
        assert!(!f.released(Key::Q));
    }

    #[test]
    fn press_and_release_in_same_frame_records_both() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, key(Key::R, KeyState::Pressed));
        apply(&mut s, &mut f, key(Key::R, KeyState::Released));
        assert!(f.pressed(Key::R));
        assert!(f.released(Key::R));
        assert!(!s.key_down(Key::R));
    }

    // ── focus ────────────────────────────────────────────────────────────

    #[test]
    fn focus_loss_releases_held_keys() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, InputEvent::Focused(true));
        apply(&mut s, &mut f, key(Key::ArrowLeft, KeyState::Pressed));
        f.clear();
        apply(&mut s, &mut f, InputEvent::Focused(false));
        assert!(!s.focused);
        assert!(s.keys_down.is_empty());
        assert!(f.released(Key::ArrowLeft));
    }

    // ── axis ─────────────────────────────────────────────────────────────

    #[test]
    fn axis_reports_direction() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        assert_eq!(s.axis(Key::ArrowLeft, Key::ArrowRight), 0.0);
        apply(&mut s, &mut f, key(Key::ArrowRight, KeyState::Pressed));
        assert_eq!(s.axis(Key::ArrowLeft, Key::ArrowRight), 1.0);
        apply(&mut s, &mut f, key(Key::ArrowLeft, KeyState::Pressed));
        assert_eq!(s.axis(Key::ArrowLeft, Key::ArrowRight), 0.0);
        apply(&mut s, &mut f, key(Key::ArrowRight, KeyState::Released));
        assert_eq!(s.axis(Key::ArrowLeft, Key::ArrowRight), -1.0);
    }

    #[test]
    fn modifiers_tracked() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        let m = Modifiers { shift: true, ..Default::default() };
        apply(&mut s, &mut f, InputEvent::ModifiersChanged(m));
        assert!(s.modifiers.any());
    }
}
