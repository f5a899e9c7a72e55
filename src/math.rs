//! Scalar geometry helpers shared by the shapes and the collision tests.

use crate::Vec2;

/// How far a point may be from a segment and still be considered on it.
/// Used by the point/segment and point/polyline tests.
pub const ON_SEGMENT_TOLERANCE: f32 = 5.0;

pub fn to_radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

pub fn to_degrees(radians: f32) -> f32 {
    radians.to_degrees()
}

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    distance2(a, b).sqrt()
}

pub fn distance2(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.dot(d)
}

/// Angle in degrees of the direction from `a` to `b`
pub fn angle(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.y.atan2(d.x).to_degrees()
}

/// Minimum distance from `p` to the segment `[v, w]`.
///
/// A zero length segment is treated as the point `v`.
pub fn distance_to_segment(p: Vec2, v: Vec2, w: Vec2) -> f32 {
    let l2 = distance2(v, w);
    if l2 == 0.0 {
        return distance(p, v);
    }
    let t = (p - v).dot(w - v) / l2;
    if t < 0.0 {
        return distance(p, v);
    }
    if t > 1.0 {
        return distance(p, w);
    }
    distance(p, v + (w - v) * t)
}

/// Whether the finite segments `[p0, p1]` and `[p2, p3]` intersect.
///
/// Endpoints touching count as intersecting. Parallel segments, collinear
/// overlapping ones included, never intersect.
pub fn segments_intersect(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> bool {
    let s1 = p1 - p0;
    let s2 = p3 - p2;

    let denom = -s2.x * s1.y + s1.x * s2.y;
    if denom == 0.0 {
        return false;
    }

    let s = (-s1.y * (p0.x - p2.x) + s1.x * (p0.y - p2.y)) / denom;
    let t = (s2.x * (p0.y - p2.y) - s2.y * (p0.x - p2.x)) / denom;

    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// Whether `p` lies within [`ON_SEGMENT_TOLERANCE`] of the segment `[a, b]`
pub fn is_on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    distance_to_segment(p, a, b) <= ON_SEGMENT_TOLERANCE
}
