//! Sky Flap - a side-scrolling flap-through-the-gaps arcade game
//!
//! Core modules:
//! - `sim`: Simulation (avatar physics, obstacles, collisions, session state)
//! - `renderer`: Scene building and WebGPU rendering
//! - `platform`: Browser input mapping
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::BestScore;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Avatar defaults
    pub const AVATAR_RADIUS: f32 = 20.0;
    /// Horizontal avatar position as a fraction of the screen width
    pub const AVATAR_X_FRACTION: f32 = 0.2;
    /// Velocity increment per simulated frame (px/frame²)
    pub const GRAVITY: f32 = 0.25;
    /// Velocity set by a flap (negative is up)
    pub const IMPULSE_VELOCITY: f32 = -5.5;

    /// Idle bobbing on the welcome screen
    pub const BOB_RATE: f32 = 0.005; // radians per ms
    pub const BOB_AMPLITUDE: f32 = 10.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_GAP: f32 = 170.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 50.0;
    pub const OBSTACLE_SPEED: f32 = 2.0; // px per frame
    /// Time between obstacle spawns (ms)
    pub const SPAWN_INTERVAL_MS: f32 = 2200.0;

    /// Maximum avatar tilt while running (radians)
    pub const MAX_TILT: f32 = std::f32::consts::FRAC_PI_4;
    /// Tilt per unit of vertical velocity
    pub const TILT_PER_VELOCITY: f32 = 0.1;

    /// Nominal display refresh, used by the headless runner
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
}
