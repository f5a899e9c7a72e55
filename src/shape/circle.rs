use crate::shape::Aabb;
use crate::Vec2;

/// Circle geometry, the shape position is its center.
#[derive(Clone, Debug)]
pub struct Circle {
    radius: f32,
}

impl Circle {
    pub fn new(radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "negative circle radius {}", radius);
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub(crate) fn set_radius(&mut self, radius: f32) {
        debug_assert!(radius >= 0.0, "negative circle radius {}", radius);
        self.radius = radius;
    }

    pub(crate) fn aabb(&self, center: Vec2) -> Aabb {
        Aabb::new(
            center.sub_scalar(self.radius),
            Vec2::new(self.radius, self.radius) * 2.0,
        )
    }
}
