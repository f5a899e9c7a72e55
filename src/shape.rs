use crate::collide::{self, Collider};
use crate::error::{CollisionError, Result};
use crate::render::{RenderColors, Rgba};
use crate::tags::TagMask;
use crate::Vec2;
use std::cell::OnceCell;
use std::fmt;

mod aabb;
mod circle;
mod composite;
mod polyline;
mod rectangle;
mod segment;

pub use aabb::*;
pub use circle::*;
pub use composite::*;
pub use polyline::*;
pub use rectangle::*;
pub use segment::*;

/// Two absolute endpoints
pub type Line = [Vec2; 2];

/// The kind of a collision operand, points included
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Point,
    Circle,
    Rectangle,
    Segment,
    Polyline,
    Composite,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeType::Point => "point",
            ShapeType::Circle => "circle",
            ShapeType::Rectangle => "rectangle",
            ShapeType::Segment => "segment",
            ShapeType::Polyline => "polyline",
            ShapeType::Composite => "composite",
        })
    }
}

#[derive(Clone, Debug)]
pub enum Geometry {
    Circle(Circle),
    Rectangle(Rectangle),
    Segment(Segment),
    Polyline(Polyline),
    Composite(Composite),
}

/// A collision shape.
///
/// What `position` means depends on the geometry: the center of a circle,
/// the top-left corner of a rectangle, the source endpoint of a segment and
/// the anchor of polylines and composites.
///
/// The bounding box and the absolute points are computed on first access and
/// cached until the position or the geometry changes.
///
/// ```rust
/// use flat_collide::{Shape, Vec2};
///
/// let mut c = Shape::circle([0.0, 0.0], 5.0);
/// assert!(c.collides_with(&Shape::circle([8.0, 0.0], 5.0)).unwrap());
///
/// c.move_by(Vec2::new(-5.0, 0.0));
/// assert_eq!(c.aabb().position, Vec2::new(-10.0, -5.0));
/// ```
#[derive(Clone, Debug)]
pub struct Shape {
    position: Vec2,
    tags: TagMask,
    colors: RenderColors,
    geometry: Geometry,
    aabb: OnceCell<Aabb>,
}

impl Shape {
    fn new(position: Vec2, geometry: Geometry) -> Self {
        Self {
            position,
            tags: TagMask::ALL,
            colors: RenderColors::default(),
            geometry,
            aabb: OnceCell::new(),
        }
    }

    pub fn circle(center: impl Into<Vec2>, radius: f32) -> Self {
        Self::new(center.into(), Geometry::Circle(Circle::new(radius)))
    }

    pub fn rectangle(position: impl Into<Vec2>, size: impl Into<Vec2>) -> Self {
        Self::new(
            position.into(),
            Geometry::Rectangle(Rectangle::new(size.into())),
        )
    }

    /// A segment from `source` to `source + dest`
    pub fn segment(source: impl Into<Vec2>, dest: impl Into<Vec2>) -> Self {
        Self::new(source.into(), Geometry::Segment(Segment::new(dest.into())))
    }

    /// Fails with [`CollisionError::InvalidGeometry`] for less than two points
    pub fn polyline(position: impl Into<Vec2>, points: Vec<Vec2>, closed: bool) -> Result<Self> {
        Ok(Self::new(
            position.into(),
            Geometry::Polyline(Polyline::new(points, closed)?),
        ))
    }

    pub fn composite(position: impl Into<Vec2>) -> Self {
        Self::new(position.into(), Geometry::Composite(Composite::default()))
    }

    /// A composite holding `children`, each pinned at its current position
    /// relative to `position`
    pub fn composite_of(position: impl Into<Vec2>, children: impl IntoIterator<Item = Shape>) -> Self {
        let position = position.into();
        let mut composite = Composite::default();
        for child in children {
            composite.push(position, TagMask::ALL, child);
        }
        Self::new(position, Geometry::Composite(composite))
    }

    pub fn shape_type(&self) -> ShapeType {
        match self.geometry {
            Geometry::Circle(_) => ShapeType::Circle,
            Geometry::Rectangle(_) => ShapeType::Rectangle,
            Geometry::Segment(_) => ShapeType::Segment,
            Geometry::Polyline(_) => ShapeType::Polyline,
            Geometry::Composite(_) => ShapeType::Composite,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the shape, composites drag their children along.
    ///
    /// On a shape inserted in a world use [`World::set_position`](crate::World::set_position)
    /// so the grid follows.
    pub fn set_position(&mut self, position: impl Into<Vec2>) {
        self.position = position.into();
        self.reset_position_caches();
        if let Geometry::Composite(c) = &mut self.geometry {
            c.follow(self.position);
        }
    }

    pub fn move_by(&mut self, delta: impl Into<Vec2>) {
        let p = self.position + delta.into();
        self.set_position(p);
    }

    /// The bounding box, built on first call after a change
    pub fn aabb(&self) -> Aabb {
        *self.aabb.get_or_init(|| self.build_aabb())
    }

    fn build_aabb(&self) -> Aabb {
        let p = self.position;
        match &self.geometry {
            Geometry::Circle(c) => c.aabb(p),
            Geometry::Rectangle(r) => r.aabb(p),
            Geometry::Segment(s) => s.aabb(p),
            Geometry::Polyline(l) => l.aabb(p),
            Geometry::Composite(c) => c.aabb(p),
        }
    }

    /// Forgets the cached bounding box
    pub fn reset_aabb(&mut self) {
        self.aabb.take();
    }

    fn reset_position_caches(&mut self) {
        self.reset_aabb();
        match &mut self.geometry {
            Geometry::Rectangle(r) => r.invalidate(),
            Geometry::Segment(s) => s.invalidate(),
            Geometry::Polyline(l) => l.invalidate(),
            Geometry::Circle(_) | Geometry::Composite(_) => {}
        }
    }

    pub fn tags(&self) -> TagMask {
        self.tags
    }

    /// Tag bits come from a world, see [`World::set_tags`](crate::World::set_tags)
    pub(crate) fn set_tag_mask(&mut self, tags: TagMask) {
        self.tags = tags;
        if let Geometry::Composite(c) = &mut self.geometry {
            c.set_tag_mask(tags);
        }
    }

    /// Whether this shape shares at least one tag bit with `mask`
    pub fn matches(&self, mask: TagMask) -> bool {
        self.tags.matches(mask)
    }

    pub fn collides_with<'a>(&self, other: impl Into<Collider<'a>>) -> Result<bool> {
        collide::test(Collider::Shape(self), other.into())
    }

    fn not_implemented<T>(&self, operation: &'static str) -> Result<T> {
        Err(CollisionError::NotImplemented {
            operation,
            shape: self.shape_type(),
        })
    }

    pub fn radius(&self) -> Option<f32> {
        match &self.geometry {
            Geometry::Circle(c) => Some(c.radius()),
            _ => None,
        }
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        match &mut self.geometry {
            Geometry::Circle(c) => c.set_radius(radius),
            _ => return self.not_implemented("set_radius"),
        }
        self.reset_aabb();
        Ok(())
    }

    pub fn size(&self) -> Option<Vec2> {
        match &self.geometry {
            Geometry::Rectangle(r) => Some(r.size()),
            _ => None,
        }
    }

    pub fn set_size(&mut self, size: impl Into<Vec2>) -> Result<()> {
        match &mut self.geometry {
            Geometry::Rectangle(r) => r.set_size(size.into()),
            _ => return self.not_implemented("set_size"),
        }
        self.reset_aabb();
        Ok(())
    }

    /// Absolute corners of a rectangle
    pub fn corners(&self) -> Option<&Corners> {
        match &self.geometry {
            Geometry::Rectangle(r) => Some(r.corners(self.position)),
            _ => None,
        }
    }

    pub fn dest(&self) -> Option<Vec2> {
        match &self.geometry {
            Geometry::Segment(s) => Some(s.dest()),
            _ => None,
        }
    }

    pub fn set_dest(&mut self, dest: impl Into<Vec2>) -> Result<()> {
        match &mut self.geometry {
            Geometry::Segment(s) => s.set_dest(dest.into()),
            _ => return self.not_implemented("set_dest"),
        }
        self.reset_aabb();
        Ok(())
    }

    /// Points of a polyline, relative to its anchor
    pub fn points(&self) -> Option<&[Vec2]> {
        match &self.geometry {
            Geometry::Polyline(l) => Some(l.points()),
            _ => None,
        }
    }

    pub fn set_points(&mut self, points: Vec<Vec2>, closed: bool) -> Result<()> {
        match &mut self.geometry {
            Geometry::Polyline(l) => *l = Polyline::new(points, closed)?,
            _ => return self.not_implemented("set_points"),
        }
        self.reset_aabb();
        Ok(())
    }

    /// Absolute points of a segment or a polyline
    pub fn abs_points(&self) -> Option<&[Vec2]> {
        match &self.geometry {
            Geometry::Segment(s) => Some(&s.line(self.position)[..]),
            Geometry::Polyline(l) => Some(l.abs_points(self.position)),
            _ => None,
        }
    }

    /// Absolute consecutive point pairs of a segment or a polyline
    pub fn abs_lines(&self) -> Option<&[Line]> {
        match &self.geometry {
            Geometry::Segment(s) => Some(std::slice::from_ref(s.line(self.position))),
            Geometry::Polyline(l) => Some(l.abs_lines(self.position)),
            _ => None,
        }
    }

    /// Every straight edge of the shape, in absolute coordinates
    pub fn outline(&self) -> Result<Vec<Line>> {
        match &self.geometry {
            Geometry::Rectangle(r) => Ok(r.corners(self.position).edges().to_vec()),
            Geometry::Segment(_) | Geometry::Polyline(_) => {
                Ok(self.abs_lines().map(<[Line]>::to_vec).unwrap_or_default())
            }
            Geometry::Circle(_) | Geometry::Composite(_) => self.not_implemented("outline"),
        }
    }

    pub fn children(&self) -> Option<&[Child]> {
        match &self.geometry {
            Geometry::Composite(c) => Some(c.children()),
            _ => None,
        }
    }

    /// Adds `child` to a composite, returning its index.
    ///
    /// The child's current position becomes its offset from the composite and
    /// it takes the composite's tags.
    pub fn add_child(&mut self, child: Shape) -> Result<usize> {
        let (position, tags) = (self.position, self.tags);
        let index = match &mut self.geometry {
            Geometry::Composite(c) => c.push(position, tags, child),
            _ => return self.not_implemented("add_child"),
        };
        self.reset_aabb();
        Ok(index)
    }

    /// Takes a child out of a composite
    pub fn remove_child(&mut self, index: usize) -> Result<Shape> {
        let removed = match &mut self.geometry {
            Geometry::Composite(c) => c.remove(index),
            _ => return self.not_implemented("remove_child"),
        };
        let child = removed.ok_or_else(|| {
            CollisionError::NotAMember(format!("no child at index {} in composite shape", index))
        })?;
        self.reset_aabb();
        Ok(child)
    }

    pub fn render_colors(&self) -> RenderColors {
        self.colors
    }

    /// `None` falls back to the tag-derived colour
    pub fn set_render_colors(&mut self, fill: Option<Rgba>, stroke: Option<Rgba>) {
        self.colors = RenderColors { fill, stroke };
    }

    pub fn fill_color(&self, opacity: f32) -> Rgba {
        self.colors
            .fill
            .unwrap_or_else(|| Rgba::from_tags(self.tags, opacity))
    }

    pub fn stroke_color(&self, opacity: f32) -> Rgba {
        self.colors
            .stroke
            .unwrap_or_else(|| Rgba::from_tags(self.tags, opacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_aabbs() {
        let c = Shape::circle([10.0, 10.0], 5.0);
        assert_eq!(c.aabb(), Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0)));

        let r = Shape::rectangle([1.0, 2.0], [3.0, 4.0]);
        assert_eq!(r.aabb(), Aabb::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)));

        let s = Shape::segment([10.0, 10.0], [-5.0, 3.0]);
        assert_eq!(s.aabb(), Aabb::new(Vec2::new(5.0, 10.0), Vec2::new(5.0, 3.0)));

        let l = Shape::polyline(
            [100.0, 100.0],
            vec![Vec2::new(5.0, 5.0), Vec2::new(10.0, -5.0)],
            false,
        )
        .unwrap();
        // the anchor is part of the box
        assert_eq!(l.aabb(), Aabb::new(Vec2::new(100.0, 95.0), Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_composite_aabb() {
        let empty = Shape::composite([7.0, 8.0]);
        assert_eq!(empty.aabb(), Aabb::point(Vec2::new(7.0, 8.0)));

        let c = Shape::composite_of(
            [0.0, 0.0],
            vec![
                Shape::circle([0.0, 0.0], 1.0),
                Shape::rectangle([10.0, 10.0], [5.0, 5.0]),
            ],
        );
        assert_eq!(c.aabb(), Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(16.0, 16.0)));
    }

    #[test]
    fn test_aabb_cache() {
        let mut c = Shape::circle([0.0, 0.0], 2.0);
        assert!(c.aabb.get().is_none());
        let a = c.aabb();
        assert!(c.aabb.get().is_some());
        assert_eq!(a, c.aabb());

        c.set_position([10.0, 0.0]);
        assert!(c.aabb.get().is_none());
        assert_eq!(c.aabb().position, Vec2::new(8.0, -2.0));

        c.set_radius(4.0).unwrap();
        assert_eq!(c.aabb().position, Vec2::new(6.0, -4.0));
    }

    #[test]
    fn test_derived_caches_follow_position() {
        let mut r = Shape::rectangle([0.0, 0.0], [10.0, 20.0]);
        assert_eq!(r.corners().unwrap().center, Vec2::new(5.0, 10.0));
        r.move_by([1.0, 1.0]);
        assert_eq!(r.corners().unwrap().bottom_right, Vec2::new(11.0, 21.0));
        r.set_size([2.0, 2.0]).unwrap();
        assert_eq!(r.corners().unwrap().bottom_right, Vec2::new(3.0, 3.0));

        let mut s = Shape::segment([0.0, 0.0], [10.0, 0.0]);
        assert_eq!(s.abs_points().unwrap()[1], Vec2::new(10.0, 0.0));
        s.set_position([5.0, 5.0]);
        assert_eq!(s.abs_lines().unwrap(), &[[Vec2::new(5.0, 5.0), Vec2::new(15.0, 5.0)]]);
        s.set_dest([0.0, 1.0]).unwrap();
        assert_eq!(s.abs_points().unwrap()[1], Vec2::new(5.0, 6.0));

        let mut l = Shape::polyline(
            [0.0, 0.0],
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            true,
        )
        .unwrap();
        assert_eq!(l.abs_lines().unwrap().len(), 3);
        l.set_position([1.0, 0.0]);
        assert_eq!(l.abs_points().unwrap()[3], Vec2::new(1.0, 0.0));
        l.set_points(vec![Vec2::ZERO, Vec2::ONE], false).unwrap();
        assert_eq!(l.abs_lines().unwrap(), &[[Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0)]]);
    }

    #[test]
    fn test_polyline_needs_two_points() {
        assert!(matches!(
            Shape::polyline([0.0, 0.0], vec![Vec2::ZERO], true),
            Err(CollisionError::InvalidGeometry(_))
        ));
        let mut l = Shape::polyline([0.0, 0.0], vec![Vec2::ZERO, Vec2::ONE], false).unwrap();
        assert!(l.set_points(vec![], false).is_err());
        assert_eq!(l.points().unwrap().len(), 2);
    }

    #[test]
    fn test_composite_moves_children() {
        let mut c = Shape::composite([0.0, 0.0]);
        c.add_child(Shape::circle([5.0, 5.0], 1.0)).unwrap();
        c.set_position([100.0, 100.0]);

        let child = &c.children().unwrap()[0];
        assert_eq!(child.offset(), Vec2::new(5.0, 5.0));
        assert_eq!(child.shape().position(), Vec2::new(105.0, 105.0));
        assert_eq!(c.aabb().position, Vec2::new(104.0, 104.0));
    }

    #[test]
    fn test_composite_children_take_tags() {
        let mut c = Shape::composite([0.0, 0.0]);
        c.set_tag_mask(TagMask(4));
        c.add_child(Shape::circle([1.0, 1.0], 1.0)).unwrap();
        assert_eq!(c.children().unwrap()[0].shape().tags(), TagMask(4));

        c.set_tag_mask(TagMask(8));
        assert_eq!(c.children().unwrap()[0].shape().tags(), TagMask(8));
    }

    #[test]
    fn test_remove_child() {
        let mut c = Shape::composite([10.0, 0.0]);
        c.add_child(Shape::circle([0.0, 0.0], 1.0)).unwrap();
        c.add_child(Shape::circle([20.0, 0.0], 1.0)).unwrap();
        assert_eq!(c.aabb().size.x, 22.0);

        let removed = c.remove_child(1).unwrap();
        assert_eq!(removed.position(), Vec2::new(30.0, 0.0));
        assert_eq!(c.aabb().size.x, 2.0);
        assert!(matches!(
            c.remove_child(5),
            Err(CollisionError::NotAMember(_))
        ));
    }

    #[test]
    fn test_not_implemented() {
        let mut c = Shape::circle([0.0, 0.0], 1.0);
        assert_eq!(
            c.add_child(Shape::circle([0.0, 0.0], 1.0)),
            Err(CollisionError::NotImplemented {
                operation: "add_child",
                shape: ShapeType::Circle,
            })
        );
        assert!(c.set_size([1.0, 1.0]).is_err());
        assert!(c.outline().is_err());
        assert!(Shape::composite([0.0, 0.0]).outline().is_err());
        assert_eq!(
            Shape::rectangle([0.0, 0.0], [1.0, 1.0]).outline().unwrap().len(),
            4
        );
    }

    #[test]
    fn test_render_colors() {
        let mut c = Shape::circle([0.0, 0.0], 1.0);
        assert_eq!(c.fill_color(0.3), Rgba::from_tags(TagMask::ALL, 0.3));
        let white = Rgba::new(255, 255, 255, 1.0);
        c.set_render_colors(Some(white), None);
        assert_eq!(c.fill_color(0.3), white);
        assert_eq!(c.stroke_color(0.7), Rgba::from_tags(TagMask::ALL, 0.7));
    }
}
