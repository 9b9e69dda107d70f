//! Gamepad input via gilrs, mapped onto the engine's logical keys.

use gilrs::{Button, Event, EventType, Gilrs};
use stoop_engine::{InputState, Key};

fn map_button(button: Button) -> Option<Key> {
    match button {
        Button::DPadLeft => Some(Key::Left),
        Button::DPadRight => Some(Key::Right),
        Button::South => Some(Key::Jump),
        Button::Start => Some(Key::Confirm),
        Button::West => Some(Key::Restart),
        Button::North => Some(Key::Next),
        Button::Select => Some(Key::Settings),
        _ => None,
    }
}

pub struct Gamepads {
    gilrs: Option<Gilrs>,
    input: InputState,
}

impl Gamepads {
    /// Gamepad support is optional; failure to initialise only logs.
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => {
                for (_id, pad) in gilrs.gamepads() {
                    log::info!("Gamepad connected: {}", pad.name());
                }
                Some(gilrs)
            }
            Err(err) => {
                log::warn!("Gamepad input unavailable: {err}");
                None
            }
        };
        Self {
            gilrs,
            input: InputState::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            gilrs: None,
            input: InputState::new(),
        }
    }

    /// Drain pending gamepad events into the input state.
    pub fn poll(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };
        while let Some(Event { event, .. }) = gilrs.next_event() {
            match event {
                EventType::ButtonPressed(button, _) => {
                    if let Some(key) = map_button(button) {
                        self.input.key_down(key);
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(key) = map_button(button) {
                        self.input.key_up(key);
                    }
                }
                EventType::Disconnected => self.input.release_all(),
                _ => {}
            }
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn end_frame(&mut self) {
        self.input.end_frame();
    }
}
