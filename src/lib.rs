//! Bingo Drop - a bingo board with physics-driven ball draws
//!
//! Core modules:
//! - `sim`: Deterministic game logic (board, lines, draw sequencing, messages)
//! - `physics`: Engine boundary, built-in fixed-step engine, world adapter
//! - `render`: Ball rendering boundary and a headless surface
//! - `platform`: Browser bindings (wasm32 only)
//! - `settings`: Data-driven session configuration

pub mod error;
pub mod physics;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use settings::Settings;
pub use sim::GameController;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the stepper (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward gravity (pixels/s²)
    pub const GRAVITY: f32 = 980.0;

    /// Boundary walls sit just outside the container
    pub const WALL_THICKNESS: f32 = 30.0;
    pub const WALL_RESTITUTION: f32 = 0.6;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    /// Horizontal inset for spawn positions
    pub const SPAWN_MARGIN: f32 = 20.0;
    /// Spawn height below the container top
    pub const SPAWN_Y: f32 = 10.0;

    pub const BALL_FRICTION: f32 = 0.05;
    /// Linear damping (fraction of velocity lost per second)
    pub const BALL_AIR_FRICTION: f32 = 0.06;
    pub const BALL_RESTITUTION_MIN: f32 = 0.5;
    pub const BALL_RESTITUTION_MAX: f32 = 0.9;
    pub const BALL_DENSITY_MIN: f32 = 0.001;
    pub const BALL_DENSITY_MAX: f32 = 0.004;

    /// Initial horizontal speed range (pixels/s, symmetric)
    pub const BALL_LAUNCH_SPREAD_X: f32 = 60.0;
    /// Initial downward speed range (pixels/s)
    pub const BALL_LAUNCH_MIN_Y: f32 = 60.0;
    pub const BALL_LAUNCH_MAX_Y: f32 = 180.0;
    /// Initial spin range (radians/s, symmetric)
    pub const BALL_SPIN_SPREAD: f32 = 3.0;
}
