//! HUD presenter.
//!
//! Gameplay code never touches the display. It emits [`Change`]s, and the
//! HUD folds them into what is shown: a status line (the window title) and
//! the camera position.

use glam::Vec2;

use crate::state::GameState;

const TOAST_SECONDS: f32 = 1.4;
const BAR_CELLS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    Score(u32),
    Meter(f32),
    /// Horizontal camera target; the camera's height is fixed.
    Camera(f32),
    Screen(GameState),
    Toast(&'static str),
}

#[derive(Debug)]
pub struct Hud {
    title: String,
    view: Vec2,
    low_threshold: f32,
    screen: GameState,
    score: u32,
    meter: f32,
    camera: Vec2,
    toast: Option<(&'static str, f32)>,
}

impl Hud {
    pub fn new(title: impl Into<String>, view: Vec2, low_threshold: f32) -> Self {
        Self {
            title: title.into(),
            view,
            low_threshold,
            screen: GameState::Menu,
            score: 0,
            meter: 0.0,
            camera: Vec2::new(view.x * 0.5, view.y * 0.5),
            toast: None,
        }
    }

    pub fn apply(&mut self, changes: &[Change]) {
        for change in changes {
            match *change {
                Change::Score(score) => self.score = score,
                Change::Meter(meter) => self.meter = meter,
                Change::Camera(x) => self.camera = Vec2::new(x, self.view.y * 0.5),
                Change::Screen(screen) => self.screen = screen,
                Change::Toast(text) => self.toast = Some((text, TOAST_SECONDS)),
            }
        }
    }

    /// Age the toast.
    pub fn tick(&mut self, delta: f32) {
        if let Some((_, remaining)) = &mut self.toast {
            *remaining -= delta;
            if *remaining <= 0.0 {
                self.toast = None;
            }
        }
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn screen(&self) -> GameState {
        self.screen
    }

    pub fn is_meter_low(&self) -> bool {
        self.meter <= self.low_threshold
    }

    pub fn meter_bar(&self) -> String {
        let filled = ((self.meter * BAR_CELLS as f32).round() as usize).min(BAR_CELLS);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_CELLS - filled))
    }

    pub fn status_line(&self) -> String {
        let body = match self.screen {
            GameState::Menu => "Enter: start, S: settings".to_string(),
            GameState::Playing => {
                let warn = if self.is_meter_low() { " !" } else { "" };
                format!(
                    "Score: {} | Meter {} {}%{}",
                    self.score,
                    self.meter_bar(),
                    (self.meter * 100.0).round() as u32,
                    warn
                )
            }
            GameState::GameOver => format!("Game Over | Score: {} | R: restart", self.score),
            GameState::LevelComplete => format!(
                "Level Complete | Score: {} | R: restart, N: next level",
                self.score
            ),
        };
        match self.toast {
            Some((text, _)) => format!("{} | {} | {}", self.title, body, text),
            None => format!("{} | {}", self.title, body),
        }
    }
}
