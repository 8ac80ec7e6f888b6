//! Simulation module
//!
//! All gameplay logic lives here. This module must stay platform free:
//! - Seeded RNG only
//! - Obstacles iterated in spawn order
//! - No rendering, audio or DOM dependencies

pub mod autopilot;
pub mod avatar;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use avatar::{Avatar, BoundsContact};
pub use collision::{Bounds, CollisionKind, avatar_obstacle_collision, has_passed};
pub use obstacle::Obstacle;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{FrameStatus, TickInput, frame, tick};
