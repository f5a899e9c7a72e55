use crate::Vec2;

/// Axis-aligned bounding box.
///
/// `position` is the top-left corner and `size` the width and height,
/// which are never negative.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub position: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0);
        Aabb { position, size }
    }

    /// Smallest box containing both points, in any order
    pub fn from_corners(p1: Vec2, p2: Vec2) -> Self {
        let position = p1.min(p2);
        Aabb {
            position,
            size: p1.max(p2) - position,
        }
    }

    /// A zero sized box sitting on `p`
    pub fn point(p: Vec2) -> Self {
        Aabb {
            position: p,
            size: Vec2::ZERO,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.position
    }

    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    /// Grows this box to the union of itself and `other`
    pub fn expand(&mut self, other: &Aabb) {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        self.position = min;
        self.size = max - min;
    }

    /// Grows this box as little as possible so it contains `p`
    pub fn absorb_point(&mut self, p: Vec2) {
        let min = self.min().min(p);
        let max = self.max().max(p);
        self.position = min;
        self.size = max - min;
    }

    /// Inclusive containment, points on the border are inside
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.position.x && p.y >= self.position.y && p.x <= max.x && p.y <= max.y
    }

    /// Touching boxes intersect
    pub fn intersects(&self, b: &Aabb) -> bool {
        let (amin, amax) = (self.min(), self.max());
        let (bmin, bmax) = (b.min(), b.max());
        let x = f32::abs((amin.x + amax.x) - (bmin.x + bmax.x))
            <= (amax.x - amin.x + bmax.x - bmin.x);
        let y = f32::abs((amin.y + amax.y) - (bmin.y + bmax.y))
            <= (amax.y - amin.y + bmax.y - bmin.y);

        x && y
    }
}
