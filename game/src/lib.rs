//! Stoop Runner: a small side-scrolling platformer.
//!
//! The gameplay core (meter, level layout, contact rules, state machine and
//! the per-frame loop) lives in [`session`] and the modules it uses. It
//! never touches a window or a physics world; [`runner`] wires it to the
//! engine collaborators.

pub mod config;
pub mod contact;
pub mod frame;
pub mod gamepad;
pub mod hud;
pub mod level;
pub mod meter;
pub mod runner;
pub mod session;
pub mod state;
