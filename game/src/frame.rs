//! Per-frame movement rules.

use glam::Vec2;

use crate::config::MovementCfg;

/// Input sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    /// Edge-triggered; only true on the frame the jump was pressed.
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerState {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl PlayerState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn is_grounded(&self, epsilon: f32) -> bool {
        self.velocity.y.abs() < epsilon
    }
}

/// What the frame asks the physics collaborator to do with the player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Movement {
    pub velocity_x: f32,
    pub impulse_y: Option<f32>,
}

/// Right wins when both directions are held.
pub fn horizontal_intent(input: &FrameInput, speed: f32) -> f32 {
    if input.right {
        speed
    } else if input.left {
        -speed
    } else {
        0.0
    }
}

/// A jump pressed while airborne is dropped, not buffered.
pub fn jump_impulse(
    input: &FrameInput,
    player: &PlayerState,
    movement: &MovementCfg,
) -> Option<f32> {
    (input.jump && player.is_grounded(movement.grounded_epsilon))
        .then_some(movement.jump_impulse)
}

pub fn movement(input: &FrameInput, player: &PlayerState, cfg: &MovementCfg) -> Movement {
    Movement {
        velocity_x: horizontal_intent(input, cfg.speed),
        impulse_y: jump_impulse(input, player, cfg),
    }
}
