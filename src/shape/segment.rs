use crate::shape::{Aabb, Line};
use crate::Vec2;
use std::cell::OnceCell;

/// Segment geometry.
///
/// The shape position is the source endpoint and `dest` the offset of the
/// other endpoint from it, so moving a segment moves both ends.
#[derive(Clone, Debug)]
pub struct Segment {
    dest: Vec2,
    line: OnceCell<Line>,
}

impl Segment {
    pub fn new(dest: Vec2) -> Self {
        Self {
            dest,
            line: OnceCell::new(),
        }
    }

    pub fn dest(&self) -> Vec2 {
        self.dest
    }

    pub(crate) fn set_dest(&mut self, dest: Vec2) {
        self.dest = dest;
        self.invalidate();
    }

    /// Both absolute endpoints
    pub(crate) fn line(&self, source: Vec2) -> &Line {
        self.line.get_or_init(|| [source, source + self.dest])
    }

    pub(crate) fn invalidate(&mut self) {
        self.line.take();
    }

    pub(crate) fn aabb(&self, source: Vec2) -> Aabb {
        Aabb::from_corners(source, source + self.dest)
    }
}
