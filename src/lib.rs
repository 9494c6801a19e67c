//! Simulation core for a Flappy Bird style arcade game.
//!
//! The core knows nothing about drawing, sound or input devices. A front end
//! feeds it intents (`request_flap`, `pause`, ...) and one [`Game::frame`] per
//! display refresh, reads back the [`Session`], and hears about flaps, score
//! changes and game over through a [`GameListener`].
//!
//! Physics constants are per-step increments tuned for ~60 steps per second.

pub mod config;
pub mod driver;
pub mod entities;
pub mod events;
pub mod game;
pub mod physics;
pub mod session;
pub mod spawner;
pub mod store;
pub mod world;

pub use config::Tuning;
pub use driver::{Driver, FrameClock, FrameTicket};
pub use entities::{Avatar, Hitbox, Obstacle};
pub use events::{EventLog, GameEvent, GameListener, NullListener};
pub use game::{Game, GameState};
pub use physics::{Collision, StepOutcome};
pub use session::Session;
pub use spawner::ObstacleSpawner;
pub use store::{JsonFileStore, MemoryStore, ScoreStore};
pub use world::WorldBounds;
