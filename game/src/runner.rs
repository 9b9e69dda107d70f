//! Glue between the session and the engine collaborators.
//!
//! Frame order: commands, session frame (intent, decay, terminal check),
//! physics step, contact resolution, HUD. Contacts from one frame are fully
//! resolved before the next frame's decay runs.

use glam::Vec2;
use stoop_engine::{BodyId, Game, InputState, Key, PhysicsWorld};

use crate::config::GameConfig;
use crate::frame::{FrameInput, Movement, PlayerState};
use crate::gamepad::Gamepads;
use crate::hud::{Change, Hud};
use crate::level::{EntityTag, LevelLayout};
use crate::session::Session;
use crate::state::Command;

const COMMAND_KEYS: [(Key, Command); 4] = [
    (Key::Confirm, Command::Start),
    (Key::Restart, Command::Restart),
    (Key::Next, Command::Next),
    (Key::Settings, Command::Settings),
];

fn build_world(layout: &LevelLayout, gravity: f32) -> (PhysicsWorld<EntityTag>, BodyId) {
    let mut world = PhysicsWorld::new(gravity);
    for placement in layout.placements() {
        let id = match placement.tag {
            EntityTag::Ground => world.add_solid(placement.tag, placement.position, placement.size),
            _ => world.add_sensor(placement.tag, placement.position, placement.size),
        };
        if let Some(patrol) = placement.patrol {
            world.set_patrol(id, patrol.into());
        }
    }
    let spawn = layout.player();
    let player = world.add_dynamic(EntityTag::Player, spawn.position, spawn.size);
    (world, player)
}

pub struct Runner {
    config: GameConfig,
    layout: LevelLayout,
    world: PhysicsWorld<EntityTag>,
    player: BodyId,
    session: Session,
    hud: Hud,
    gamepads: Gamepads,
}

impl Runner {
    pub fn new(config: GameConfig, layout: LevelLayout, gamepads: Gamepads) -> Self {
        let (world, player) = build_world(&layout, config.movement.gravity);
        let session = Session::new(&config, layout.player().position);
        let mut hud = Hud::new(
            config.window.title.clone(),
            Vec2::new(config.window.width, config.window.height),
            config.meter.low_threshold,
        );
        hud.apply(&session.hud_changes());
        log::info!(
            "Level '{}' ready: {} placements",
            layout.name(),
            layout.placements().len()
        );
        Self {
            config,
            layout,
            world,
            player,
            session,
            hud,
            gamepads,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn world(&self) -> &PhysicsWorld<EntityTag> {
        &self.world
    }

    /// Throw away the current session and scene and start playing again.
    fn fresh_session(&mut self) {
        let (world, player) = build_world(&self.layout, self.config.movement.gravity);
        self.world = world;
        self.player = player;
        self.session = Session::fresh(&self.config, self.layout.player().position);
        self.hud.apply(&self.session.hud_changes());
        log::info!("Fresh session on '{}'", self.layout.name());
    }

    fn player_state(&self) -> PlayerState {
        self.world
            .body(self.player)
            .map(|body| PlayerState {
                position: body.position,
                velocity: body.velocity,
            })
            .unwrap_or_else(|| self.session.player())
    }

    fn apply_movement(&mut self, movement: Movement) {
        self.world.set_velocity_x(self.player, movement.velocity_x);
        if let Some(impulse) = movement.impulse_y {
            self.world.apply_impulse(self.player, Vec2::new(0.0, impulse));
        }
    }

    fn present(&mut self, changes: &[Change]) {
        self.hud.apply(changes);
    }

    /// One frame with already merged input.
    pub fn step(&mut self, delta: f32, input: &FrameInput, commands: &[Command]) {
        self.hud.tick(delta);

        for &command in commands {
            let outcome = self.session.command(command);
            self.present(&outcome.changes);
            if outcome.fresh_session {
                self.fresh_session();
            }
        }

        if !self.session.is_playing() {
            return;
        }

        let report = self.session.frame(delta, input, self.player_state());
        if let Some(movement) = report.movement {
            self.apply_movement(movement);
        }
        self.present(&report.changes);

        // The scene freezes once the run is over
        if !self.session.is_playing() {
            return;
        }

        for contact in self.world.step(delta) {
            let report = self.session.contact(&contact.into());
            if let Some(id) = report.remove {
                self.world.remove(id);
            }
            self.present(&report.changes);
        }
    }
}

/// Merge keyboard and gamepad into this frame's movement input and commands.
fn read_controls(keyboard: &InputState, pad: &InputState) -> (FrameInput, Vec<Command>) {
    let held = |key| keyboard.is_held(key) || pad.is_held(key);
    let pressed = |key| keyboard.is_just_pressed(key) || pad.is_just_pressed(key);

    let input = FrameInput {
        left: held(Key::Left),
        right: held(Key::Right),
        jump: pressed(Key::Jump),
    };
    let commands = COMMAND_KEYS
        .iter()
        .filter(|(key, _)| pressed(*key))
        .map(|&(_, command)| command)
        .collect();
    (input, commands)
}

impl Game for Runner {
    fn frame(&mut self, delta_time: f32, input: &InputState) {
        self.gamepads.poll();
        let (frame_input, commands) = read_controls(input, self.gamepads.input());
        self.gamepads.end_frame();
        self.step(delta_time, &frame_input, &commands);
    }

    fn status_line(&self) -> String {
        self.hud.status_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Placement, PlayerSpawn};
    use crate::state::GameState;

    const DT: f32 = 1.0 / 60.0;

    fn place(tag: EntityTag, center: (f32, f32), size: (f32, f32)) -> Placement {
        Placement::new(tag, Vec2::from(center), Vec2::from(size))
    }

    fn street() -> Placement {
        place(EntityTag::Ground, (500.0, 0.0), (2000.0, 40.0))
    }

    /// Flat street: player standing at x=0, a pickup to the right, a roach
    /// further right, a goal beyond that.
    fn alley() -> LevelLayout {
        LevelLayout::new(
            "Alley",
            PlayerSpawn {
                position: Vec2::new(0.0, 56.0),
                size: Vec2::new(48.0, 72.0),
            },
            vec![
                street(),
                place(EntityTag::Collectible, (100.0, 41.0), (24.0, 42.0)),
                place(EntityTag::Enemy, (300.0, 34.0), (48.0, 28.0)),
                place(EntityTag::Goal, (600.0, 70.0), (40.0, 100.0)),
            ],
        )
        .unwrap()
    }

    fn runner() -> Runner {
        Runner::new(GameConfig::default(), alley(), Gamepads::disabled())
    }

    fn run(runner: &mut Runner, frames: usize, input: FrameInput) {
        for _ in 0..frames {
            runner.step(DT, &input, &[]);
        }
    }

    const RIGHT: FrameInput = FrameInput {
        left: false,
        right: true,
        jump: false,
    };
    const IDLE: FrameInput = FrameInput {
        left: false,
        right: false,
        jump: false,
    };

    fn count(runner: &Runner, tag: EntityTag) -> usize {
        runner.world().bodies().filter(|b| b.tag == tag).count()
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut r = runner();
        run(&mut r, 30, RIGHT);
        assert_eq!(r.session().state(), GameState::Menu);
        let spawn = r.world().body(r.player).unwrap().position;
        assert_eq!(spawn, Vec2::new(0.0, 56.0));
        assert!(r.hud().status_line().contains("Enter: start"));

        r.step(DT, &IDLE, &[Command::Start]);
        assert_eq!(r.session().state(), GameState::Playing);
        assert!(r.hud().status_line().contains("Score: 0"));
    }

    #[test]
    fn test_walking_into_pickup_refills_meter() {
        let mut r = runner();
        r.step(DT, &IDLE, &[Command::Start]);
        run(&mut r, 40, RIGHT);

        assert_eq!(count(&r, EntityTag::Collectible), 0);
        let meter = r.session().meter().value();
        assert!(meter > 0.85 && meter < 0.9, "meter {meter}");
        assert_eq!(r.session().state(), GameState::Playing);
        assert!(r.hud().camera().x > 50.0);
    }

    #[test]
    fn test_walking_into_roach_ends_run_and_freezes() {
        let mut r = runner();
        r.step(DT, &IDLE, &[Command::Start]);
        run(&mut r, 120, RIGHT);

        assert_eq!(r.session().state(), GameState::GameOver);
        assert_eq!(count(&r, EntityTag::Enemy), 1);
        assert!(r.hud().status_line().contains("Game Over"));

        let frozen = r.world().body(r.player).unwrap().position;
        run(&mut r, 30, RIGHT);
        assert_eq!(r.world().body(r.player).unwrap().position, frozen);
    }

    #[test]
    fn test_restart_builds_fresh_scene() {
        let mut r = runner();
        r.step(DT, &IDLE, &[Command::Start]);
        run(&mut r, 120, RIGHT);
        assert_eq!(r.session().state(), GameState::GameOver);

        // Start is not a way out of game over
        r.step(DT, &IDLE, &[Command::Start]);
        assert_eq!(r.session().state(), GameState::GameOver);

        r.step(DT, &IDLE, &[Command::Restart]);
        assert_eq!(r.session().state(), GameState::Playing);
        assert_eq!(count(&r, EntityTag::Collectible), 1);
        let player = r.world().body(r.player).unwrap();
        assert!(player.position.x < 5.0);
        assert!((r.session().meter().value() - 0.7).abs() < 0.01);
    }

    #[test]
    fn test_reaching_goal_then_next() {
        let layout = LevelLayout::new(
            "Straight",
            alley().player(),
            vec![
                street(),
                place(EntityTag::Goal, (200.0, 70.0), (40.0, 100.0)),
            ],
        )
        .unwrap();
        let mut r = Runner::new(GameConfig::default(), layout, Gamepads::disabled());
        r.step(DT, &IDLE, &[Command::Start]);
        run(&mut r, 90, RIGHT);

        assert_eq!(r.session().state(), GameState::LevelComplete);
        assert!(r.hud().status_line().contains("Level Complete"));

        r.step(DT, &IDLE, &[Command::Next]);
        assert_eq!(r.session().state(), GameState::Playing);
        assert_eq!(r.session().score().value(), 0);
    }

    #[test]
    fn test_jump_from_ground_only() {
        let mut r = runner();
        r.step(DT, &IDLE, &[Command::Start]);
        run(&mut r, 5, IDLE);

        let jump = FrameInput { jump: true, ..IDLE };
        r.step(DT, &jump, &[]);
        let vy = r.world().body(r.player).unwrap().velocity.y;
        assert!(vy > 500.0, "vy {vy}");

        // Mid-air press is dropped
        run(&mut r, 5, IDLE);
        let before = r.world().body(r.player).unwrap().velocity.y;
        r.step(DT, &jump, &[]);
        let after = r.world().body(r.player).unwrap().velocity.y;
        assert!(after < before);
    }

    #[test]
    fn test_stalled_frame_keeps_player_on_street() {
        let mut r = runner();
        r.step(DT, &IDLE, &[Command::Start]);
        r.step(0.25, &IDLE, &[]);
        run(&mut r, 30, IDLE);

        let player = r.world().body(r.player).unwrap().position;
        assert!((player.y - 56.0).abs() < 1e-3, "fell to {player:?}");
        assert!(r.session().is_playing());
    }

    #[test]
    fn test_settings_toast_from_menu() {
        let mut r = runner();
        r.step(DT, &IDLE, &[Command::Settings]);
        assert!(r.hud().status_line().contains("Coming Soon"));
        assert_eq!(r.session().state(), GameState::Menu);
    }

    #[test]
    fn test_read_controls_merges_sources() {
        let mut keyboard = InputState::new();
        let mut pad = InputState::new();
        keyboard.key_down(Key::Left);
        pad.key_down(Key::Right);
        pad.key_down(Key::Jump);
        keyboard.key_down(Key::Restart);

        let (input, commands) = read_controls(&keyboard, &pad);
        assert!(input.left && input.right && input.jump);
        assert_eq!(commands, vec![Command::Restart]);
    }
}
