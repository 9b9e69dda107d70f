//! Input state shared by every input source.
//!
//! The host loop feeds keyboard events, the game may feed gamepad events,
//! and gameplay code only ever asks "is this key held" or "was it pressed
//! this frame".

use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Logical keys the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Confirm,
    Restart,
    Next,
    Settings,
    Escape,
}

/// Map a physical keyboard key to an engine key.
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(Key::Left),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(Key::Right),
        KeyCode::Space | KeyCode::ArrowUp | KeyCode::KeyW => Some(Key::Jump),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Confirm),
        KeyCode::KeyR => Some(Key::Restart),
        KeyCode::KeyN => Some(Key::Next),
        KeyCode::KeyS => Some(Key::Settings),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Auto-repeat presses of a held key do not re-trigger
    /// the edge.
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Drop every held key, e.g. when the window loses focus.
    /// Edges already recorded this frame survive until `end_frame`.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Clear edge-triggered state. Called by the host after each frame.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}
