use crate::shape::{Aabb, Line};
use crate::Vec2;
use std::cell::OnceCell;

/// Absolute corners and center of a rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
    pub center: Vec2,
}

impl Corners {
    fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            top_left: position,
            top_right: position + Vec2::new(size.x, 0.0),
            bottom_left: position + Vec2::new(0.0, size.y),
            bottom_right: position + size,
            center: position + size / 2.0,
        }
    }

    pub fn left(&self) -> Line {
        [self.top_left, self.bottom_left]
    }

    pub fn right(&self) -> Line {
        [self.top_right, self.bottom_right]
    }

    pub fn top(&self) -> Line {
        [self.top_left, self.top_right]
    }

    pub fn bottom(&self) -> Line {
        [self.bottom_left, self.bottom_right]
    }

    /// Left, right, top, bottom
    pub fn edges(&self) -> [Line; 4] {
        [self.left(), self.right(), self.top(), self.bottom()]
    }

    /// Inclusive containment, the border is inside
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.top_left.x
            && p.y >= self.top_left.y
            && p.x <= self.bottom_right.x
            && p.y <= self.bottom_right.y
    }
}

/// Rectangle geometry, the shape position is its top-left corner.
#[derive(Clone, Debug)]
pub struct Rectangle {
    size: Vec2,
    corners: OnceCell<Corners>,
}

impl Rectangle {
    pub fn new(size: Vec2) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0, "negative size {:?}", size);
        Self {
            size,
            corners: OnceCell::new(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: Vec2) {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0, "negative size {:?}", size);
        self.size = size;
        self.invalidate();
    }

    pub(crate) fn corners(&self, position: Vec2) -> &Corners {
        self.corners
            .get_or_init(|| Corners::new(position, self.size))
    }

    pub(crate) fn invalidate(&mut self) {
        self.corners.take();
    }

    pub(crate) fn aabb(&self, position: Vec2) -> Aabb {
        Aabb::new(position, self.size)
    }
}
