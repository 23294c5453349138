//! Physics adapter
//!
//! Owns the active physics world: boundary walls sized to the container, a
//! fixed 60 Hz stepper, and the body-to-element map that is synced to the
//! rendering surface after every step. Reinitializing tears all of that down
//! first, so nothing from an old world is ever stepped or synced again.

use glam::Vec2;
use rand::Rng;
use slotmap::SecondaryMap;

use super::{BodyHandle, BodyParams, Launch, PhysicsEngine};
use crate::consts::*;
use crate::error::GameError;
use crate::render::{BallSurface, BallVisual, Bounds, ElementHandle};

/// A drawn ball: physics body, number label and rendering handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    pub body: BodyHandle,
    pub label: u8,
    pub element: ElementHandle,
}

/// Fixed-timestep accumulator
///
/// Lives inside the active world, so dropping the world stops it.
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f32,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fixed steps owed for a frame of `dt` seconds
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }
}

struct ActiveWorld<E> {
    id: u32,
    engine: E,
    bounds: Bounds,
    stepper: Stepper,
    balls: SecondaryMap<BodyHandle, Ball>,
}

/// Lifecycle wrapper around a `PhysicsEngine`
pub struct PhysicsAdapter<E: PhysicsEngine> {
    gravity: Vec2,
    world: Option<ActiveWorld<E>>,
    worlds_created: u32,
}

impl<E: PhysicsEngine> Default for PhysicsAdapter<E> {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, GRAVITY))
    }
}

impl<E: PhysicsEngine> PhysicsAdapter<E> {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            world: None,
            worlds_created: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    /// Id of the active world (increments on every initialize)
    pub fn world_id(&self) -> Option<u32> {
        self.world.as_ref().map(|w| w.id)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.world.as_ref().map(|w| w.bounds)
    }

    pub fn engine(&self) -> Option<&E> {
        self.world.as_ref().map(|w| &w.engine)
    }

    /// Tear down any previous world and build a new one for `bounds`
    pub fn initialize<S: BallSurface + ?Sized>(&mut self, bounds: Bounds, surface: &mut S) {
        self.shutdown(surface);

        let mut engine = E::with_gravity(self.gravity);
        add_boundary_walls(&mut engine, bounds);
        self.worlds_created += 1;

        log::info!(
            "Physics world {} initialized ({}x{})",
            self.worlds_created,
            bounds.width,
            bounds.height
        );

        self.world = Some(ActiveWorld {
            id: self.worlds_created,
            engine,
            bounds,
            stepper: Stepper::new(),
            balls: SecondaryMap::new(),
        });
    }

    /// Remove every ball element and drop the world along with its stepper
    pub fn shutdown<S: BallSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(mut old) = self.world.take() else {
            return;
        };
        let removed = old.balls.len();
        for ball in old.balls.values() {
            surface.remove(ball.element);
        }
        old.engine.clear();
        log::debug!("Physics world {} torn down ({} balls removed)", old.id, removed);
    }

    /// Create a ball element and its body, then give it an initial push
    pub fn spawn_ball<S: BallSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        label: u8,
        visual: &BallVisual,
        center: Vec2,
        params: &BodyParams,
        launch: &Launch,
    ) -> Result<Ball, GameError> {
        let world = self.world.as_mut().ok_or(GameError::PhysicsNotInitialized)?;

        let element = surface.create_ball(label, visual, center);
        let body = world.engine.add_circle(center, visual.diameter / 2.0, params);
        world.engine.set_velocity(body, launch.velocity);
        world.engine.set_angular_velocity(body, launch.angular_velocity);

        let ball = Ball {
            body,
            label,
            element,
        };
        world.balls.insert(body, ball);

        // Place once immediately so the element never shows at a stale spot
        if let Some(pose) = world.engine.pose(body) {
            surface.place(element, &pose);
        }
        Ok(ball)
    }

    /// Remove every ball from the world and the surface; walls stay
    pub fn clear_balls<S: BallSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let Some(world) = self.world.as_mut() else {
            return 0;
        };
        let count = world.balls.len();
        for (body, ball) in world.balls.drain() {
            world.engine.remove(body);
            if surface.is_attached(ball.element) {
                surface.remove(ball.element);
            }
        }
        count
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.world.iter().flat_map(|w| w.balls.values())
    }

    pub fn ball_count(&self) -> usize {
        self.world.as_ref().map_or(0, |w| w.balls.len())
    }

    /// Run the fixed steps owed for `dt` seconds, syncing after each one
    ///
    /// Returns the number of steps taken.
    pub fn advance<S: BallSurface + ?Sized>(&mut self, dt: f32, surface: &mut S) -> u32 {
        let Some(world) = self.world.as_mut() else {
            return 0;
        };
        let steps = world.stepper.advance(dt);
        for _ in 0..steps {
            world.engine.step(SIM_DT);
            world.sync(surface);
        }
        steps
    }
}

impl<E: PhysicsEngine> ActiveWorld<E> {
    /// Copy each tracked body's pose onto its element
    fn sync<S: BallSurface + ?Sized>(&self, surface: &mut S) {
        for ball in self.balls.values() {
            if !surface.is_attached(ball.element) {
                log::trace!("Ball {} element detached, skipping", ball.label);
                continue;
            }
            if let Some(pose) = self.engine.pose(ball.body) {
                surface.place(ball.element, &pose);
            }
        }
    }
}

/// Floor and side walls just outside the container (no ceiling)
fn add_boundary_walls<E: PhysicsEngine>(engine: &mut E, bounds: Bounds) {
    let (w, h, t) = (bounds.width, bounds.height, WALL_THICKNESS);
    engine.add_static_rect(
        Vec2::new(w / 2.0, h + t / 2.0),
        Vec2::new(w, t),
        WALL_RESTITUTION,
    );
    engine.add_static_rect(
        Vec2::new(-t / 2.0, h / 2.0),
        Vec2::new(t, h),
        WALL_RESTITUTION,
    );
    engine.add_static_rect(
        Vec2::new(w + t / 2.0, h / 2.0),
        Vec2::new(t, h),
        WALL_RESTITUTION,
    );
}

/// Random spawn point along the top of the container
pub fn spawn_point<R: Rng + ?Sized>(bounds: &Bounds, rng: &mut R) -> Vec2 {
    let (lo, hi) = (SPAWN_MARGIN, bounds.width - SPAWN_MARGIN);
    let x = if hi > lo {
        rng.random_range(lo..hi)
    } else {
        bounds.width / 2.0
    };
    Vec2::new(x, SPAWN_Y)
}
