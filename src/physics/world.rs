//! Built-in fixed-step physics engine
//!
//! Semi-implicit Euler integration, positional correction and impulse
//! response. Good enough for a handful of balls tumbling into a tray.

use std::f32::consts::PI;

use glam::Vec2;
use slotmap::SlotMap;

use super::collision::{Rect, bounce, circle_vs_circle, circle_vs_rect};
use super::{BodyHandle, BodyParams, BodyPose, PhysicsEngine};

#[derive(Debug, Clone, Copy)]
enum Shape {
    Circle { radius: f32 },
    StaticRect(Rect),
}

#[derive(Debug, Clone)]
struct Body {
    shape: Shape,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    angular_velocity: f32,
    restitution: f32,
    friction: f32,
    air_friction: f32,
    inv_mass: f32,
}

impl Body {
    fn is_static(&self) -> bool {
        matches!(self.shape, Shape::StaticRect(_))
    }
}

/// The physics world
pub struct World {
    gravity: Vec2,
    bodies: SlotMap<BodyHandle, Body>,
}

impl World {
    fn integrate(&mut self, dt: f32) {
        for (_, body) in self.bodies.iter_mut().filter(|(_, b)| !b.is_static()) {
            body.velocity += self.gravity * dt;
            body.velocity *= (1.0 - body.air_friction * dt).max(0.0);
            body.position += body.velocity * dt;
            body.angle += body.angular_velocity * dt;
        }
    }

    fn resolve_static_contacts(&mut self) {
        let walls: Vec<(Rect, f32)> = self
            .bodies
            .values()
            .filter_map(|b| match b.shape {
                Shape::StaticRect(rect) => Some((rect, b.restitution)),
                Shape::Circle { .. } => None,
            })
            .collect();

        for body in self.bodies.values_mut() {
            let Shape::Circle { radius } = body.shape else {
                continue;
            };
            for (rect, wall_restitution) in &walls {
                let Some(contact) = circle_vs_rect(body.position, radius, rect) else {
                    continue;
                };
                body.position += contact.normal * contact.penetration;

                let restitution = body.restitution.max(*wall_restitution);
                body.velocity = bounce(body.velocity, contact.normal, restitution);

                // Friction bleeds tangential speed and spin
                let normal_part = contact.normal * body.velocity.dot(contact.normal);
                let tangent = body.velocity - normal_part;
                body.velocity = normal_part + tangent * (1.0 - body.friction);
                body.angular_velocity *= 1.0 - body.friction;
            }
        }
    }

    fn resolve_ball_contacts(&mut self) {
        let keys: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, b)| !b.is_static())
            .map(|(k, _)| k)
            .collect();

        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let Some([a, b]) = self.bodies.get_disjoint_mut([keys[i], keys[j]]) else {
                    continue;
                };
                let (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) =
                    (a.shape, b.shape)
                else {
                    continue;
                };
                let Some(contact) = circle_vs_circle(a.position, ra, b.position, rb) else {
                    continue;
                };

                let inv_sum = a.inv_mass + b.inv_mass;
                if inv_sum <= 0.0 {
                    continue;
                }
                let correction = contact.normal * (contact.penetration / inv_sum);
                a.position -= correction * a.inv_mass;
                b.position += correction * b.inv_mass;

                let vn = (b.velocity - a.velocity).dot(contact.normal);
                if vn < 0.0 {
                    let restitution = a.restitution.max(b.restitution);
                    let impulse = -(1.0 + restitution) * vn / inv_sum;
                    a.velocity -= contact.normal * impulse * a.inv_mass;
                    b.velocity += contact.normal * impulse * b.inv_mass;
                }
            }
        }
    }
}

impl PhysicsEngine for World {
    fn with_gravity(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: SlotMap::with_key(),
        }
    }

    fn add_static_rect(&mut self, center: Vec2, size: Vec2, restitution: f32) -> BodyHandle {
        self.bodies.insert(Body {
            shape: Shape::StaticRect(Rect::new(center, size)),
            position: center,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            restitution,
            friction: 0.0,
            air_friction: 0.0,
            inv_mass: 0.0,
        })
    }

    fn add_circle(&mut self, center: Vec2, radius: f32, params: &BodyParams) -> BodyHandle {
        let mass = params.density * PI * radius * radius;
        self.bodies.insert(Body {
            shape: Shape::Circle { radius },
            position: center,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            restitution: params.restitution,
            friction: params.friction.clamp(0.0, 1.0),
            air_friction: params.air_friction,
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
        })
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) -> bool {
        match self.bodies.get_mut(body) {
            Some(b) if !b.is_static() => {
                b.velocity = velocity;
                true
            }
            _ => false,
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32) -> bool {
        match self.bodies.get_mut(body) {
            Some(b) if !b.is_static() => {
                b.angular_velocity = omega;
                true
            }
            _ => false,
        }
    }

    fn remove(&mut self, body: BodyHandle) -> bool {
        self.bodies.remove(body).is_some()
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(body)
    }

    fn pose(&self, body: BodyHandle) -> Option<BodyPose> {
        self.bodies.get(body).map(|b| BodyPose {
            position: b.position,
            angle: b.angle,
        })
    }

    fn step(&mut self, dt: f32) {
        self.integrate(dt);
        self.resolve_static_contacts();
        self.resolve_ball_contacts();
    }

    fn clear(&mut self) {
        self.bodies.clear();
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
