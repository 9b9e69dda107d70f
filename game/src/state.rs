//! Top-level game state machine.
//!
//! ```text
//!   Menu --Start--> Playing --meter empty / hit--> GameOver
//!                           --goal---------------> LevelComplete
//!
//!   GameOver      --Restart--------> fresh session
//!   LevelComplete --Restart | Next--> fresh session
//! ```
//!
//! The machine decides *that* a fresh session is needed; building one is up
//! to the caller. Every other (state, trigger) pair is a no-op.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
    LevelComplete,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Menu => "menu",
            GameState::Playing => "playing",
            GameState::GameOver => "game over",
            GameState::LevelComplete => "level complete",
        };
        f.write_str(name)
    }
}

/// Discrete player commands (menu buttons, restart keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    Next,
    Settings,
}

/// Why a run left the Playing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    MeterEmpty,
    Hit,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Entered(GameState),
    /// Discard this session and start a new one.
    FreshSession,
    /// Show a short message; state unchanged.
    Toast(&'static str),
}

#[derive(Debug, Default)]
pub struct StateMachine {
    state: GameState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    pub fn command(&mut self, command: Command) -> Option<Transition> {
        let from = self.state;
        let transition = match (self.state, command) {
            (GameState::Menu, Command::Start) => {
                self.state = GameState::Playing;
                Transition::Entered(GameState::Playing)
            }
            (GameState::Menu, Command::Settings) => Transition::Toast("Coming Soon"),
            (GameState::GameOver, Command::Restart)
            | (GameState::LevelComplete, Command::Restart | Command::Next) => {
                Transition::FreshSession
            }
            (state, command) => {
                log::debug!("ignoring {command:?} in {state}");
                return None;
            }
        };
        log::info!("{command:?} in {from} -> {transition:?}");
        Some(transition)
    }

    /// Leave Playing. Has no effect in any other state, so a run can only
    /// end once.
    pub fn end_run(&mut self, reason: RunEnd) -> Option<Transition> {
        if self.state != GameState::Playing {
            return None;
        }
        self.state = match reason {
            RunEnd::MeterEmpty | RunEnd::Hit => GameState::GameOver,
            RunEnd::Goal => GameState::LevelComplete,
        };
        log::info!("run ended ({reason:?}) -> {}", self.state);
        Some(Transition::Entered(self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: [Command; 4] = [
        Command::Start,
        Command::Restart,
        Command::Next,
        Command::Settings,
    ];
    const ENDS: [RunEnd; 3] = [RunEnd::MeterEmpty, RunEnd::Hit, RunEnd::Goal];

    fn in_state(state: GameState) -> StateMachine {
        StateMachine { state }
    }

    #[test]
    fn test_starts_in_menu() {
        assert_eq!(StateMachine::new().state(), GameState::Menu);
    }

    #[test]
    fn test_only_start_leaves_menu() {
        for command in COMMANDS {
            let mut machine = in_state(GameState::Menu);
            let transition = machine.command(command);
            match command {
                Command::Start => {
                    assert_eq!(transition, Some(Transition::Entered(GameState::Playing)));
                    assert!(machine.is_playing());
                }
                Command::Settings => {
                    assert_eq!(transition, Some(Transition::Toast("Coming Soon")));
                    assert_eq!(machine.state(), GameState::Menu);
                }
                _ => {
                    assert_eq!(transition, None);
                    assert_eq!(machine.state(), GameState::Menu);
                }
            }
        }
        for reason in ENDS {
            let mut machine = in_state(GameState::Menu);
            assert_eq!(machine.end_run(reason), None);
            assert_eq!(machine.state(), GameState::Menu);
        }
    }

    #[test]
    fn test_commands_do_not_leave_playing() {
        for command in COMMANDS {
            let mut machine = in_state(GameState::Playing);
            assert_eq!(machine.command(command), None);
            assert!(machine.is_playing());
        }
    }

    #[test]
    fn test_run_end_targets() {
        let cases = [
            (RunEnd::MeterEmpty, GameState::GameOver),
            (RunEnd::Hit, GameState::GameOver),
            (RunEnd::Goal, GameState::LevelComplete),
        ];
        for (reason, target) in cases {
            let mut machine = in_state(GameState::Playing);
            assert_eq!(machine.end_run(reason), Some(Transition::Entered(target)));
            assert_eq!(machine.state(), target);
            // Second end is ignored
            for again in ENDS {
                assert_eq!(machine.end_run(again), None);
                assert_eq!(machine.state(), target);
            }
        }
    }

    #[test]
    fn test_terminal_states_need_restart_or_next() {
        let mut over = in_state(GameState::GameOver);
        assert_eq!(over.command(Command::Start), None);
        assert_eq!(over.command(Command::Next), None);
        assert_eq!(over.command(Command::Settings), None);
        assert_eq!(
            over.command(Command::Restart),
            Some(Transition::FreshSession)
        );

        for command in [Command::Restart, Command::Next] {
            let mut done = in_state(GameState::LevelComplete);
            assert_eq!(done.command(command), Some(Transition::FreshSession));
        }
        let mut done = in_state(GameState::LevelComplete);
        assert_eq!(done.command(Command::Start), None);
        assert_eq!(done.state(), GameState::LevelComplete);
    }
}
