// src/app/input.rs
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

/// Held movement keys.
#[derive(Default, Clone, Copy)]
pub struct KeyState {
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
    pub space: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyState {
    pub fn set(&mut self, code: KeyCode, down: bool) {
        match code {
            KeyCode::KeyW => self.w = down,
            KeyCode::KeyA => self.a = down,
            KeyCode::KeyS => self.s = down,
            KeyCode::KeyD => self.d = down,
            KeyCode::Space => self.space = down,
            KeyCode::AltLeft | KeyCode::AltRight => self.alt = down,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.shift = down,
            _ => {}
        }
    }
}

/// One-shot parameter controls, fired on key press (not on repeat).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleFilter,
    DepthDown,
    DepthUp,
    SamplesDown,
    SamplesUp,
    CycleDebugView,
    RegenerateWorld,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Action> {
        Some(match code {
            KeyCode::KeyF => Action::ToggleFilter,
            KeyCode::BracketLeft => Action::DepthDown,
            KeyCode::BracketRight => Action::DepthUp,
            KeyCode::Minus => Action::SamplesDown,
            KeyCode::Equal => Action::SamplesUp,
            KeyCode::KeyV => Action::CycleDebugView,
            KeyCode::KeyR => Action::RegenerateWorld,
            _ => return None,
        })
    }
}

#[derive(Default)]
pub struct InputState {
    pub keys: KeyState,
    pub focused: bool,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    actions: Vec<Action>,
}

impl InputState {
    pub fn on_device_event(&mut self, event: &DeviceEvent) {
        if !self.focused {
            return;
        }
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse_dx += delta.0 as f32;
            self.mouse_dy += delta.1 as f32;
        }
    }

    /// Returns true if event is fully handled/consumed.
    pub fn on_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        match event {
            WindowEvent::Focused(f) => {
                self.focused = *f;
                if self.focused {
                    let _ = window
                        .set_cursor_grab(CursorGrabMode::Locked)
                        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                    window.set_cursor_visible(false);
                } else {
                    release_cursor(window);
                }
                true
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    repeat,
                    ..
                } = event
                {
                    let down = *state == ElementState::Pressed;

                    if down && !*repeat {
                        if let Some(action) = Action::from_key(*code) {
                            self.actions.push(action);
                        }
                    }

                    self.keys.set(*code, down);

                    if down && *code == KeyCode::Escape {
                        self.focused = false;
                        release_cursor(window);
                        return true;
                    }
                }
                false
            }

            _ => false,
        }
    }

    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        let dx = self.mouse_dx;
        let dy = self.mouse_dy;
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        (dx, dy)
    }

    /// Pending actions in the order the keys were pressed.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }
}

fn release_cursor(window: &Window) {
    let _ = window.set_cursor_grab(CursorGrabMode::None);
    window.set_cursor_visible(true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_keys_map_to_actions() {
        assert_eq!(Action::from_key(KeyCode::KeyF), Some(Action::ToggleFilter));
        assert_eq!(Action::from_key(KeyCode::BracketRight), Some(Action::DepthUp));
        assert_eq!(Action::from_key(KeyCode::Minus), Some(Action::SamplesDown));
        assert_eq!(Action::from_key(KeyCode::KeyR), Some(Action::RegenerateWorld));
        assert_eq!(Action::from_key(KeyCode::KeyW), None);
    }

    #[test]
    fn movement_keys_track_held_state() {
        let mut k = KeyState::default();
        k.set(KeyCode::ShiftRight, true);
        k.set(KeyCode::KeyA, true);
        k.set(KeyCode::KeyA, false);
        assert!(k.shift);
        assert!(!k.a);
    }
}
