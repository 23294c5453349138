//! Contact generation for the built-in engine
//!
//! Only two shape pairs exist in a bingo drum: ball against wall and ball
//! against ball. Screen coordinates, y down.

use glam::Vec2;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

/// Overlap between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pushing the first shape out of the second
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

/// Circle against a static rectangle
///
/// The normal points from the rectangle toward the circle centre.
pub fn circle_vs_rect(center: Vec2, radius: f32, rect: &Rect) -> Option<Contact> {
    let closest = center.clamp(rect.min(), rect.max());
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 1e-8 {
        // Centre outside the rectangle
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some(Contact {
            normal: delta / dist,
            penetration: radius - dist,
        });
    }

    // Centre inside: push out through the nearest face
    let local = center - rect.center;
    let overlap = rect.half_extents - local.abs();
    if overlap.x < overlap.y {
        let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
        Some(Contact {
            normal: Vec2::new(sign, 0.0),
            penetration: overlap.x + radius,
        })
    } else {
        let sign = if local.y < 0.0 { -1.0 } else { 1.0 };
        Some(Contact {
            normal: Vec2::new(0.0, sign),
            penetration: overlap.y + radius,
        })
    }
}

/// Circle against circle; the normal points from `a` toward `b`
pub fn circle_vs_circle(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> Option<Contact> {
    let delta = b - a;
    let dist_sq = delta.length_squared();
    let min_dist = radius_a + radius_b;

    if dist_sq >= min_dist * min_dist {
        return None;
    }
    if dist_sq < 1e-8 {
        // Perfectly stacked; separate vertically
        return Some(Contact {
            normal: Vec2::Y,
            penetration: min_dist,
        });
    }
    let dist = dist_sq.sqrt();
    Some(Contact {
        normal: delta / dist,
        penetration: min_dist - dist,
    })
}

/// Reflect velocity off a surface, scaling the normal part by restitution
pub fn bounce(vel: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let vn = vel.dot(normal);
    if vn >= 0.0 {
        return vel;
    }
    vel - normal * vn * (1.0 + restitution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Rect {
        // 400 wide, 30 thick, top edge at y = 300
        Rect::new(Vec2::new(200.0, 315.0), Vec2::new(400.0, 30.0))
    }

    #[test]
    fn test_circle_resting_on_floor() {
        let contact = circle_vs_rect(Vec2::new(100.0, 290.0), 15.0, &floor()).unwrap();
        assert!((contact.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert!((contact.penetration - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_clear_of_floor() {
        assert!(circle_vs_rect(Vec2::new(100.0, 280.0), 15.0, &floor()).is_none());
    }

    #[test]
    fn test_circle_inside_rect_pushed_out_nearest_face() {
        let contact = circle_vs_rect(Vec2::new(100.0, 305.0), 15.0, &floor()).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));
        // 5 px to the top face plus the radius
        assert!((contact.penetration - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_vs_circle() {
        let contact = circle_vs_circle(Vec2::ZERO, 15.0, Vec2::new(20.0, 0.0), 15.0).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!((contact.penetration - 10.0).abs() < 1e-5);

        assert!(circle_vs_circle(Vec2::ZERO, 15.0, Vec2::new(31.0, 0.0), 15.0).is_none());

        let stacked = circle_vs_circle(Vec2::ONE, 15.0, Vec2::ONE, 15.0).unwrap();
        assert_eq!(stacked.penetration, 30.0);
    }

    #[test]
    fn test_bounce() {
        // Falling onto a floor whose normal points up (negative y)
        let out = bounce(Vec2::new(10.0, 100.0), Vec2::new(0.0, -1.0), 0.5);
        assert!((out.x - 10.0).abs() < 1e-5);
        assert!((out.y - (-50.0)).abs() < 1e-4);

        // Already separating: untouched
        let away = Vec2::new(0.0, -20.0);
        assert_eq!(bounce(away, Vec2::new(0.0, -1.0), 0.5), away);
    }
}
