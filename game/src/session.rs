//! One play-through.
//!
//! The session owns the state machine, meter, score and the player's last
//! known state. Its operations are pure with respect to the outside world:
//! they return descriptions of what physics and the HUD should do.

use glam::Vec2;
use stoop_engine::BodyId;

use crate::config::GameConfig;
use crate::contact::{self, Contact, ContactOutcome};
use crate::frame::{self, FrameInput, Movement, PlayerState};
use crate::hud::Change;
use crate::meter::{Meter, Score};
use crate::state::{Command, GameState, RunEnd, StateMachine, Transition};

#[derive(Debug, Default, PartialEq)]
pub struct CommandOutcome {
    pub changes: Vec<Change>,
    /// The caller should replace this session with [`Session::fresh`].
    pub fresh_session: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct FrameReport {
    /// `None` when the session is not playing.
    pub movement: Option<Movement>,
    pub changes: Vec<Change>,
}

#[derive(Debug, PartialEq)]
pub struct ContactReport {
    pub outcome: ContactOutcome,
    /// Body the physics world should drop.
    pub remove: Option<BodyId>,
    pub changes: Vec<Change>,
}

impl ContactReport {
    fn ignored() -> Self {
        Self {
            outcome: ContactOutcome::Ignored,
            remove: None,
            changes: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    machine: StateMachine,
    meter: Meter,
    score: Score,
    start: Vec2,
    player: PlayerState,
}

impl Session {
    /// A new session waiting in the menu.
    pub fn new(config: &GameConfig, start: Vec2) -> Self {
        Self {
            config: config.clone(),
            machine: StateMachine::new(),
            meter: Meter::new(config.meter.start),
            score: Score::default(),
            start,
            player: PlayerState::at(start),
        }
    }

    /// A new session that has already been started.
    pub fn fresh(config: &GameConfig, start: Vec2) -> Self {
        let mut session = Self::new(config, start);
        session.command(Command::Start);
        session
    }

    pub fn state(&self) -> GameState {
        self.machine.state()
    }

    pub fn is_playing(&self) -> bool {
        self.machine.is_playing()
    }

    pub fn meter(&self) -> Meter {
        self.meter
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn player(&self) -> PlayerState {
        self.player
    }

    /// Everything the HUD needs to draw this session from scratch.
    pub fn hud_changes(&self) -> Vec<Change> {
        vec![
            Change::Screen(self.state()),
            Change::Score(self.score.value()),
            Change::Meter(self.meter.value()),
            Change::Camera(self.player.position.x),
        ]
    }

    pub fn command(&mut self, command: Command) -> CommandOutcome {
        let mut outcome = CommandOutcome::default();
        match self.machine.command(command) {
            Some(Transition::Entered(GameState::Playing)) => {
                self.score = Score::default();
                self.meter = Meter::new(self.config.meter.start);
                self.player = PlayerState::at(self.start);
                outcome.changes = self.hud_changes();
            }
            Some(Transition::Entered(state)) => outcome.changes.push(Change::Screen(state)),
            Some(Transition::FreshSession) => outcome.fresh_session = true,
            Some(Transition::Toast(text)) => outcome.changes.push(Change::Toast(text)),
            None => {}
        }
        outcome
    }

    /// The per-frame update. `player` is the body state physics reports for
    /// this frame.
    pub fn frame(&mut self, delta: f32, input: &FrameInput, player: PlayerState) -> FrameReport {
        if !self.machine.is_playing() {
            return FrameReport::default();
        }
        self.player = player;

        let movement = frame::movement(input, &player, &self.config.movement);
        if movement.impulse_y.is_some() {
            log::debug!("jump at x={:.1}", player.position.x);
        }

        self.meter.drain(delta.max(0.0) * self.config.meter.decay_per_second);
        let mut changes = vec![Change::Meter(self.meter.value())];

        if self.meter.is_empty() {
            if let Some(Transition::Entered(state)) = self.machine.end_run(RunEnd::MeterEmpty) {
                changes.push(Change::Screen(state));
            }
        }

        changes.push(Change::Camera(player.position.x));
        FrameReport {
            movement: Some(movement),
            changes,
        }
    }

    /// Apply a contact-begin event. Ignored unless playing, since physics may
    /// still report contacts from the step that ended the run.
    pub fn contact(&mut self, contact: &Contact) -> ContactReport {
        if !self.machine.is_playing() {
            return ContactReport::ignored();
        }

        let outcome = contact::resolve(contact, self.config.scoring.stomp_height_ratio);
        let mut report = ContactReport {
            outcome,
            remove: None,
            changes: Vec::new(),
        };
        match outcome {
            ContactOutcome::Collected { item } => {
                self.meter.fill(self.config.meter.collectible_bonus);
                report.remove = Some(item);
                report.changes.push(Change::Meter(self.meter.value()));
            }
            ContactOutcome::Stomped { enemy } => {
                self.score.add(self.config.scoring.stomp_points);
                log::info!("stomped {:?}, score {}", enemy, self.score.value());
                report.remove = Some(enemy);
                report.changes.push(Change::Score(self.score.value()));
            }
            ContactOutcome::Hit { .. } => self.end(RunEnd::Hit, &mut report.changes),
            ContactOutcome::ReachedGoal => self.end(RunEnd::Goal, &mut report.changes),
            ContactOutcome::Ignored => {}
        }
        report
    }

    fn end(&mut self, reason: RunEnd, changes: &mut Vec<Change>) {
        if let Some(Transition::Entered(state)) = self.machine.end_run(reason) {
            changes.push(Change::Screen(state));
        }
    }
}
