//! Narrow phase: exact intersection tests between two shapes or a shape and a point.
//!
//! There is one test per unordered pair of kinds. Operands are sorted by kind
//! before dispatch so `test(a, b)` and `test(b, a)` run the same code.
//! Composites are unrolled first: a composite collides when any of its
//! children does.

use crate::error::{CollisionError, Result};
use crate::math::{distance, distance_to_segment, is_on_segment, segments_intersect};
use crate::shape::{Child, Corners, Geometry, Line, Shape, ShapeType};
use crate::Vec2;

/// Either side of a collision test
#[derive(Clone, Copy, Debug)]
pub enum Collider<'a> {
    Point(Vec2),
    Shape(&'a Shape),
}

impl Collider<'_> {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Collider::Point(_) => ShapeType::Point,
            Collider::Shape(s) => s.shape_type(),
        }
    }
}

impl From<Vec2> for Collider<'_> {
    fn from(p: Vec2) -> Self {
        Collider::Point(p)
    }
}

impl From<[f32; 2]> for Collider<'_> {
    fn from(p: [f32; 2]) -> Self {
        Collider::Point(p.into())
    }
}

impl<'a> From<&'a Shape> for Collider<'a> {
    fn from(s: &'a Shape) -> Self {
        Collider::Shape(s)
    }
}

/// Whether `a` and `b` intersect.
///
/// ```rust
/// use flat_collide::{collide, Shape};
///
/// let rect = Shape::rectangle([0.0, 0.0], [10.0, 10.0]);
/// assert!(collide::test(&rect, [10.0, 10.0]).unwrap());
/// assert!(!collide::test([10.5, 10.0], &rect).unwrap());
/// ```
pub fn test<'a, 'b>(a: impl Into<Collider<'a>>, b: impl Into<Collider<'b>>) -> Result<bool> {
    let (a, b) = (a.into(), b.into());

    if let Some(children) = composite_children(a) {
        return test_children(children, b);
    }
    if let Some(children) = composite_children(b) {
        return test_children(children, a);
    }

    let (a, b) = (Operand::new(a), Operand::new(b));
    if a.rank() <= b.rank() {
        dispatch(a, b)
    } else {
        dispatch(b, a)
    }
}

fn composite_children(c: Collider<'_>) -> Option<&[Child]> {
    match c {
        Collider::Shape(s) => match s.geometry() {
            Geometry::Composite(comp) => Some(comp.children()),
            _ => None,
        },
        Collider::Point(_) => None,
    }
}

fn test_children(children: &[Child], other: Collider<'_>) -> Result<bool> {
    for child in children {
        if test(child.shape(), other)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// What each test needs from a non composite collider, caches included
#[derive(Clone, Copy)]
enum Operand<'a> {
    Point(Vec2),
    Circle { center: Vec2, radius: f32 },
    Rectangle(&'a Corners),
    Segment(&'a Line),
    Polyline { points: &'a [Vec2], lines: &'a [Line] },
    Composite,
}

impl<'a> Operand<'a> {
    fn new(c: Collider<'a>) -> Self {
        let s = match c {
            Collider::Point(p) => return Operand::Point(p),
            Collider::Shape(s) => s,
        };
        let position = s.position();
        match s.geometry() {
            Geometry::Circle(c) => Operand::Circle {
                center: position,
                radius: c.radius(),
            },
            Geometry::Rectangle(r) => Operand::Rectangle(r.corners(position)),
            Geometry::Segment(seg) => Operand::Segment(seg.line(position)),
            Geometry::Polyline(l) => Operand::Polyline {
                points: l.abs_points(position),
                lines: l.abs_lines(position),
            },
            Geometry::Composite(_) => Operand::Composite,
        }
    }

    fn shape_type(&self) -> ShapeType {
        match self {
            Operand::Point(_) => ShapeType::Point,
            Operand::Circle { .. } => ShapeType::Circle,
            Operand::Rectangle(_) => ShapeType::Rectangle,
            Operand::Segment(_) => ShapeType::Segment,
            Operand::Polyline { .. } => ShapeType::Polyline,
            Operand::Composite => ShapeType::Composite,
        }
    }

    fn rank(&self) -> u8 {
        self.shape_type() as u8
    }
}

/// `a` never ranks above `b` here
fn dispatch<'c>(a: Operand<'c>, b: Operand<'c>) -> Result<bool> {
    use Operand::*;

    Ok(match (a, b) {
        (Point(a), Point(b)) => a == b,
        (Point(p), Circle { center, radius }) => circle_point(center, radius, p),
        (Point(p), Rectangle(r)) => r.contains(p),
        (Point(p), Segment(l)) => is_on_segment(p, l[0], l[1]),
        (Point(p), Polyline { lines, .. }) => lines.iter().any(|l| is_on_segment(p, l[0], l[1])),

        (Circle { center: c1, radius: r1 }, Circle { center: c2, radius: r2 }) => {
            distance(c1, c2) <= r1 + r2
        }
        (Circle { center, radius }, Rectangle(r)) => circle_rect(center, radius, r),
        (Circle { center, radius }, Segment(l)) => circle_line(center, radius, l),
        (Circle { center, radius }, Polyline { lines, .. }) => {
            lines.iter().any(|l| circle_line(center, radius, l))
        }

        (Rectangle(a), Rectangle(b)) => rect_rect(a, b),
        (Rectangle(r), Segment(l)) => {
            r.contains(l[0]) || r.contains(l[1]) || rect_edges_cross(r, l)
        }
        (Rectangle(r), Polyline { points, lines }) => {
            points.iter().any(|&p| r.contains(p)) || lines.iter().any(|l| rect_edges_cross(r, l))
        }

        (Segment(a), Segment(b)) => lines_cross(a, b),
        (Segment(a), Polyline { lines, .. }) => lines.iter().any(|b| lines_cross(a, b)),

        (Polyline { lines: l1, .. }, Polyline { lines: l2, .. }) => {
            l1.iter().any(|a| l2.iter().any(|b| lines_cross(a, b)))
        }

        (a, b) => {
            return Err(CollisionError::UnsupportedShapePair {
                a: a.shape_type(),
                b: b.shape_type(),
            })
        }
    })
}

fn circle_point(center: Vec2, radius: f32, p: Vec2) -> bool {
    distance(center, p) <= radius
}

fn circle_line(center: Vec2, radius: f32, l: &Line) -> bool {
    distance_to_segment(center, l[0], l[1]) <= radius
}

fn lines_cross(a: &Line, b: &Line) -> bool {
    segments_intersect(a[0], a[1], b[0], b[1])
}

fn rect_edges_cross(r: &Corners, l: &Line) -> bool {
    r.edges().iter().any(|e| lines_cross(l, e))
}

/// Center inside the rectangle, rectangle center inside the circle, or else
/// the circle reaches one of the two edges facing it.
fn circle_rect(center: Vec2, radius: f32, r: &Corners) -> bool {
    if r.contains(center) || circle_point(center, radius, r.center) {
        return true;
    }

    let vertical = if r.center.x > center.x {
        r.left()
    } else {
        r.right()
    };
    let horizontal = if r.center.y > center.y {
        r.top()
    } else {
        r.bottom()
    };

    circle_line(center, radius, &vertical) || circle_line(center, radius, &horizontal)
}

/// Touching edges count as overlapping
fn rect_rect(a: &Corners, b: &Corners) -> bool {
    !(b.top_left.x > a.bottom_right.x
        || b.bottom_right.x < a.top_left.x
        || b.top_left.y > a.bottom_right.y
        || b.bottom_right.y < a.top_left.y)
}

#[cfg(test)]
mod tests {
    use super::{test, Collider};
    use crate::shape::{Shape, ShapeType};
    use crate::{CollisionError, Vec2};

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Shape::circle([5.0, 5.0], 3.0),
            Shape::circle([30.0, 30.0], 1.0),
            Shape::rectangle([0.0, 0.0], [10.0, 10.0]),
            Shape::rectangle([8.0, 2.0], [4.0, 4.0]),
            Shape::rectangle([50.0, 50.0], [2.0, 2.0]),
            Shape::segment([-5.0, 5.0], [20.0, 0.0]),
            Shape::segment([40.0, 0.0], [0.0, 60.0]),
            Shape::polyline([0.0, 0.0], vec![v(12.0, -3.0), v(12.0, 12.0), v(-3.0, 12.0)], false)
                .unwrap(),
            Shape::polyline([45.0, 45.0], vec![v(0.0, 0.0), v(10.0, 0.0), v(5.0, 10.0)], true)
                .unwrap(),
            Shape::composite_of(
                [0.0, 0.0],
                vec![Shape::circle([60.0, 60.0], 5.0), Shape::rectangle([1.0, 1.0], [1.0, 1.0])],
            ),
            Shape::composite([100.0, 100.0]),
        ]
    }

    #[test]
    fn test_symmetry() {
        let shapes = sample_shapes();
        let points = [v(5.0, 5.0), v(40.0, 30.0), v(46.0, 46.0), v(0.0, 0.0)];

        for a in &shapes {
            for b in &shapes {
                assert_eq!(
                    test(a, b).unwrap(),
                    test(b, a).unwrap(),
                    "{} vs {}",
                    a.shape_type(),
                    b.shape_type()
                );
            }
            for &p in &points {
                assert_eq!(test(a, p).unwrap(), test(p, a).unwrap());
            }
        }
    }

    #[test]
    fn test_point_point() {
        assert!(test(v(1.0, 2.0), v(1.0, 2.0)).unwrap());
        assert!(!test(v(1.0, 2.0), v(1.0, 2.0001)).unwrap());
    }

    #[test]
    fn test_circle_circle() {
        let a = Shape::circle([0.0, 0.0], 5.0);
        assert!(test(&a, &Shape::circle([8.0, 0.0], 5.0)).unwrap());
        assert!(test(&a, &Shape::circle([10.0, 0.0], 5.0)).unwrap());
        assert!(!test(&a, &Shape::circle([11.0, 0.0], 5.0)).unwrap());
    }

    #[test]
    fn test_circle_point() {
        let c = Shape::circle([0.0, 0.0], 5.0);
        assert!(test(&c, v(3.0, 4.0)).unwrap());
        assert!(!test(&c, v(3.0, 4.1)).unwrap());
    }

    #[test]
    fn test_rect_point_inclusive() {
        let r = Shape::rectangle([0.0, 0.0], [10.0, 10.0]);
        assert!(test(&r, v(10.0, 10.0)).unwrap());
        assert!(test(&r, v(0.0, 0.0)).unwrap());
        assert!(!test(&r, v(10.0001, 10.0)).unwrap());
        assert!(!test(&r, v(-0.5, 5.0)).unwrap());
    }

    #[test]
    fn test_rect_rect() {
        let r = Shape::rectangle([0.0, 0.0], [10.0, 10.0]);
        assert!(test(&r, &Shape::rectangle([5.0, 5.0], [10.0, 10.0])).unwrap());
        // touching edges collide
        assert!(test(&r, &Shape::rectangle([10.0, 0.0], [10.0, 10.0])).unwrap());
        assert!(!test(&r, &Shape::rectangle([10.5, 0.0], [10.0, 10.0])).unwrap());
        // one inside the other
        assert!(test(&r, &Shape::rectangle([2.0, 2.0], [1.0, 1.0])).unwrap());
    }

    #[test]
    fn test_circle_rect() {
        let r = Shape::rectangle([0.0, 0.0], [10.0, 10.0]);
        // center inside
        assert!(test(&Shape::circle([5.0, 5.0], 1.0), &r).unwrap());
        // big circle swallowing the rectangle
        assert!(test(&Shape::circle([5.0, 30.0], 40.0), &r).unwrap());
        // reaching the left edge
        assert!(test(&Shape::circle([-2.0, 5.0], 2.0), &r).unwrap());
        assert!(!test(&Shape::circle([-2.1, 5.0], 2.0), &r).unwrap());
        // reaching the bottom edge
        assert!(test(&Shape::circle([5.0, 12.0], 2.5), &r).unwrap());
        // near a corner but outside
        assert!(!test(&Shape::circle([12.0, 12.0], 2.5), &r).unwrap());
        assert!(test(&Shape::circle([12.0, 12.0], 3.0), &r).unwrap());
    }

    #[test]
    fn test_segments() {
        let a = Shape::segment([0.0, 0.0], [10.0, 10.0]);
        let b = Shape::segment([0.0, 10.0], [10.0, -10.0]);
        assert!(test(&a, &b).unwrap());

        let c = Shape::segment([0.0, 0.0], [10.0, 0.0]);
        let d = Shape::segment([0.0, 5.0], [10.0, 0.0]);
        assert!(!test(&c, &d).unwrap());
    }

    #[test]
    fn test_point_segment_tolerance() {
        let s = Shape::segment([0.0, 0.0], [10.0, 0.0]);
        assert!(test(&s, v(5.0, 4.0)).unwrap());
        assert!(test(&s, v(15.0, 0.0)).unwrap());
        assert!(!test(&s, v(5.0, 6.0)).unwrap());
    }

    #[test]
    fn test_circle_segment() {
        let s = Shape::segment([0.0, 0.0], [10.0, 0.0]);
        assert!(test(&Shape::circle([5.0, 3.0], 3.0), &s).unwrap());
        assert!(!test(&Shape::circle([5.0, 3.0], 2.9), &s).unwrap());
        assert!(test(&Shape::circle([12.0, 0.0], 2.0), &s).unwrap());
    }

    #[test]
    fn test_rect_segment() {
        let r = Shape::rectangle([0.0, 0.0], [10.0, 10.0]);
        // endpoint inside
        assert!(test(&r, &Shape::segment([5.0, 5.0], [50.0, 0.0])).unwrap());
        // crossing through without endpoints inside
        assert!(test(&r, &Shape::segment([-5.0, 5.0], [20.0, 0.0])).unwrap());
        assert!(!test(&r, &Shape::segment([-5.0, 15.0], [20.0, 0.0])).unwrap());
    }

    #[test]
    fn test_polylines() {
        let square = Shape::polyline(
            [0.0, 0.0],
            vec![v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)],
            true,
        )
        .unwrap();

        // a small rectangle inside the outline touches no edge and holds no point
        assert!(!test(&square, &Shape::rectangle([4.0, 4.0], [2.0, 2.0])).unwrap());
        assert!(test(&square, &Shape::rectangle([8.0, 4.0], [4.0, 2.0])).unwrap());
        assert!(test(&square, &Shape::rectangle([-1.0, -1.0], [2.0, 2.0])).unwrap());

        assert!(test(&square, &Shape::circle([5.0, -2.0], 2.0)).unwrap());
        assert!(!test(&square, &Shape::circle([5.0, 5.0], 2.0)).unwrap());

        assert!(test(&square, &Shape::segment([5.0, 5.0], [10.0, 0.0])).unwrap());
        assert!(!test(&square, &Shape::segment([2.0, 5.0], [5.0, 0.0])).unwrap());

        assert!(test(&square, v(0.0, 5.0)).unwrap());
        assert!(!test(&square, v(30.0, 5.0)).unwrap());

        let zigzag = Shape::polyline([-5.0, 5.0], vec![v(0.0, 0.0), v(3.0, 3.0), v(6.0, 0.0)], false)
            .unwrap();
        assert!(test(&square, &zigzag).unwrap());
        let far = Shape::polyline([50.0, 50.0], vec![v(0.0, 0.0), v(3.0, 3.0)], false).unwrap();
        assert!(!test(&square, &far).unwrap());
    }

    #[test]
    fn test_composites() {
        let comp = Shape::composite_of(
            [0.0, 0.0],
            vec![Shape::circle([0.0, 0.0], 2.0), Shape::rectangle([20.0, 0.0], [5.0, 5.0])],
        );
        assert!(test(&comp, v(1.0, 1.0)).unwrap());
        assert!(test(&comp, v(22.0, 2.0)).unwrap());
        assert!(!test(&comp, v(10.0, 0.0)).unwrap());
        assert!(test(&comp, &Shape::circle([10.0, 0.0], 8.0)).unwrap());

        let other = Shape::composite_of([0.0, 0.0], vec![Shape::segment([24.0, -5.0], [0.0, 20.0])]);
        assert!(test(&comp, &other).unwrap());
        let nested = Shape::composite_of([100.0, 0.0], vec![other.clone()]);
        assert!(!test(&comp, &nested).unwrap());
        assert!(test(&Shape::composite_of([-100.0, 0.0], vec![nested]), &comp).unwrap());

        assert!(!test(&Shape::composite([0.0, 0.0]), v(0.0, 0.0)).unwrap());
    }

    #[test]
    fn test_collider_types() {
        assert_eq!(Collider::from(v(0.0, 0.0)).shape_type(), ShapeType::Point);
        let s = Shape::segment([0.0, 0.0], [1.0, 1.0]);
        assert_eq!(Collider::from(&s).shape_type(), ShapeType::Segment);
    }

    #[test]
    fn test_misordered_pair_is_unsupported() {
        use super::{dispatch, Operand};

        let err = dispatch(
            Operand::Circle {
                center: v(0.0, 0.0),
                radius: 1.0,
            },
            Operand::Point(v(0.0, 0.0)),
        );
        assert_eq!(
            err,
            Err(CollisionError::UnsupportedShapePair {
                a: ShapeType::Circle,
                b: ShapeType::Point,
            })
        );
    }
}
