//! In-memory ball surface for native runs and tests

use glam::Vec2;
use slotmap::SlotMap;

use super::{BallSurface, BallVisual, ElementHandle};
use crate::physics::BodyPose;

/// Record of one ball element
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessBall {
    pub label: u8,
    pub color: &'static str,
    pub diameter: f32,
    pub pose: BodyPose,
    pub attached: bool,
    /// Number of `place` calls received
    pub updates: u32,
}

/// Surface that just remembers what it was told
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    elements: SlotMap<ElementHandle, HeadlessBall>,
    stray_updates: u32,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: ElementHandle) -> Option<&HeadlessBall> {
        self.elements.get(element)
    }

    /// Simulate the element being pulled off the page by someone else
    pub fn detach(&mut self, element: ElementHandle) {
        if let Some(ball) = self.elements.get_mut(element) {
            ball.attached = false;
        }
    }

    /// Elements on the surface (attached or not)
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Labels of attached elements, ascending
    pub fn labels(&self) -> Vec<u8> {
        let mut labels: Vec<u8> = self
            .elements
            .values()
            .filter(|b| b.attached)
            .map(|b| b.label)
            .collect();
        labels.sort_unstable();
        labels
    }

    /// `place` calls that targeted a removed or detached element
    pub fn stray_updates(&self) -> u32 {
        self.stray_updates
    }
}

impl BallSurface for HeadlessSurface {
    fn create_ball(&mut self, label: u8, visual: &BallVisual, position: Vec2) -> ElementHandle {
        self.elements.insert(HeadlessBall {
            label,
            color: visual.color,
            diameter: visual.diameter,
            pose: BodyPose {
                position,
                angle: 0.0,
            },
            attached: true,
            updates: 0,
        })
    }

    fn place(&mut self, element: ElementHandle, pose: &BodyPose) {
        match self.elements.get_mut(element) {
            Some(ball) if ball.attached => {
                ball.pose = *pose;
                ball.updates += 1;
            }
            _ => self.stray_updates += 1,
        }
    }

    fn is_attached(&self, element: ElementHandle) -> bool {
        self.elements.get(element).is_some_and(|b| b.attached)
    }

    fn remove(&mut self, element: ElementHandle) {
        self.elements.remove(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_detach() {
        let mut surface = HeadlessSurface::new();
        let el = surface.create_ball(12, &BallVisual::new("#4ECDC4"), Vec2::new(5.0, 10.0));
        assert!(surface.is_attached(el));
        assert_eq!(surface.labels(), vec![12]);

        let pose = BodyPose {
            position: Vec2::new(50.0, 60.0),
            angle: 0.5,
        };
        surface.place(el, &pose);
        assert_eq!(surface.get(el).unwrap().pose, pose);
        assert_eq!(surface.get(el).unwrap().updates, 1);

        surface.detach(el);
        assert!(!surface.is_attached(el));
        surface.place(el, &pose);
        assert_eq!(surface.get(el).unwrap().updates, 1);
        assert_eq!(surface.stray_updates(), 1);

        surface.remove(el);
        assert!(surface.is_empty());
        surface.remove(el);
    }
}
