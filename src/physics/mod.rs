//! Physics boundary
//!
//! The game only needs a handful of engine operations: static rectangles,
//! circle bodies, velocity setters, a fixed step and per-body pose readout.
//! `PhysicsEngine` captures exactly that; `World` is the built-in engine.

pub mod adapter;
pub mod collision;
pub mod world;

use glam::Vec2;
use rand::Rng;
use slotmap::new_key_type;

use crate::consts::*;

pub use adapter::{Ball, PhysicsAdapter, Stepper};
pub use collision::{Contact, Rect, circle_vs_circle, circle_vs_rect};
pub use world::World;

new_key_type! {
    /// Generational key to a body in a physics engine
    pub struct BodyHandle;
}

/// Material and motion parameters for a dynamic circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    /// Bounciness (0 = none, 1 = perfect)
    pub restitution: f32,
    /// Tangential velocity lost per contact (0..1)
    pub friction: f32,
    /// Mass per unit area
    pub density: f32,
    /// Fraction of velocity lost per second
    pub air_friction: f32,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            restitution: BALL_RESTITUTION_MIN,
            friction: BALL_FRICTION,
            density: BALL_DENSITY_MIN,
            air_friction: BALL_AIR_FRICTION,
        }
    }
}

impl BodyParams {
    /// Random bouncy ball within the fixed tuning bounds
    pub fn random_ball<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            restitution: rng.random_range(BALL_RESTITUTION_MIN..BALL_RESTITUTION_MAX),
            friction: BALL_FRICTION,
            density: rng.random_range(BALL_DENSITY_MIN..BALL_DENSITY_MAX),
            air_friction: BALL_AIR_FRICTION,
        }
    }
}

/// Initial motion for a freshly introduced ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

impl Launch {
    /// Small sideways drift, downward push, gentle spin
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            velocity: Vec2::new(
                rng.random_range(-BALL_LAUNCH_SPREAD_X..BALL_LAUNCH_SPREAD_X),
                rng.random_range(BALL_LAUNCH_MIN_Y..BALL_LAUNCH_MAX_Y),
            ),
            angular_velocity: rng.random_range(-BALL_SPIN_SPREAD..BALL_SPIN_SPREAD),
        }
    }
}

/// Position (pixels, y down) and rotation (radians) of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: Vec2,
    pub angle: f32,
}

impl BodyPose {
    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }
}

/// The operations the game needs from a physics engine
pub trait PhysicsEngine {
    /// Fresh, empty world with the given gravity
    fn with_gravity(gravity: Vec2) -> Self
    where
        Self: Sized;

    /// Immovable axis-aligned rectangle
    fn add_static_rect(&mut self, center: Vec2, size: Vec2, restitution: f32) -> BodyHandle;

    /// Dynamic circle body
    fn add_circle(&mut self, center: Vec2, radius: f32, params: &BodyParams) -> BodyHandle;

    /// Returns false if the body does not exist
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> bool;

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32) -> bool;

    /// Returns false if the body was not in the world
    fn remove(&mut self, body: BodyHandle) -> bool;

    fn contains(&self, body: BodyHandle) -> bool;

    fn pose(&self, body: BodyHandle) -> Option<BodyPose>;

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Remove every body, static or not
    fn clear(&mut self);

    fn body_count(&self) -> usize;
}
