use crate::error::{CollisionError, Result};
use crate::shape::{Aabb, Line};
use crate::Vec2;
use std::cell::OnceCell;

/// A strip of connected segments.
///
/// Points are offsets from the shape position (the anchor). A closed polyline
/// repeats its first point at the end.
#[derive(Clone, Debug)]
pub struct Polyline {
    points: Vec<Vec2>,
    abs_points: OnceCell<Vec<Vec2>>,
    abs_lines: OnceCell<Vec<Line>>,
}

impl Polyline {
    pub fn new(mut points: Vec<Vec2>, closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(CollisionError::InvalidGeometry(format!(
                "a polyline needs at least two points, got {}",
                points.len()
            )));
        }
        if closed {
            points.push(points[0]);
        }
        Ok(Self {
            points,
            abs_points: OnceCell::new(),
            abs_lines: OnceCell::new(),
        })
    }

    /// Points relative to the anchor
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub(crate) fn abs_points(&self, anchor: Vec2) -> &[Vec2] {
        self.abs_points
            .get_or_init(|| self.points.iter().map(|&p| p + anchor).collect())
    }

    pub(crate) fn abs_lines(&self, anchor: Vec2) -> &[Line] {
        self.abs_lines.get_or_init(|| {
            self.abs_points(anchor)
                .windows(2)
                .map(|w| [w[0], w[1]])
                .collect()
        })
    }

    pub(crate) fn invalidate(&mut self) {
        self.abs_points.take();
        self.abs_lines.take();
    }

    /// The anchor itself is part of the box, as if it were an extra point
    pub(crate) fn aabb(&self, anchor: Vec2) -> Aabb {
        let mut ret = Aabb::point(anchor);
        for &p in self.abs_points(anchor) {
            ret.absorb_point(p);
        }
        ret
    }
}
