//! Engine sidekick for the game: a window host loop, input state, a small
//! box physics world and the sign-in request type.

pub mod auth;
pub mod context;
pub mod input;
pub mod physics;

pub use context::{init_logging, EngineContext, EngineError, Game, WindowSettings};
pub use input::{InputState, Key};
pub use physics::{BodyId, Contact, Patrol, PhysicsWorld};
