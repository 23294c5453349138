//! Rendering boundary
//!
//! A `BallSurface` creates one element per ball, positions it on every
//! physics tick and removes it on clear. The browser implementation lives in
//! `platform::web`; `HeadlessSurface` keeps everything in memory.

pub mod headless;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use slotmap::new_key_type;

use crate::consts::BALL_RADIUS;
use crate::physics::BodyPose;

pub use headless::{HeadlessBall, HeadlessSurface};

new_key_type! {
    /// Key to a ball element on a surface
    pub struct ElementHandle;
}

/// Ball colours
pub const PALETTE: [&str; 20] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEEAD", "#D4A5A5", "#FF9F43", "#A3CB38",
    "#786FA6", "#F8C291", "#63CDDA", "#EA8685", "#778BEB", "#F19066", "#E77F67", "#CF6A87",
    "#786FA6", "#FDA7DF", "#4834D4", "#6AB04C",
];

/// Size of the container the balls fall into (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// How a ball element should look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallVisual {
    /// CSS colour
    pub color: &'static str,
    /// Element diameter (pixels), also the body's diameter
    pub diameter: f32,
}

impl BallVisual {
    pub fn new(color: &'static str) -> Self {
        Self {
            color,
            diameter: BALL_RADIUS * 2.0,
        }
    }

    /// Standard-size ball in a random palette colour
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(PALETTE.choose(rng).copied().unwrap_or(PALETTE[0]))
    }
}

/// Where ball elements live
pub trait BallSurface {
    /// Create and attach an element for a ball labelled `label`
    fn create_ball(&mut self, label: u8, visual: &BallVisual, position: Vec2) -> ElementHandle;

    /// Move an element to a body's pose (centre position plus rotation)
    fn place(&mut self, element: ElementHandle, pose: &BodyPose);

    /// Whether the element is still on the visible surface
    fn is_attached(&self, element: ElementHandle) -> bool;

    /// Detach and forget an element; unknown handles are ignored
    fn remove(&mut self, element: ElementHandle);
}
