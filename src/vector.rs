use mint::Point2;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2d vector, also used as a point.
///
/// Operators return new values, the `*Assign` operators and the `*_mut` helpers
/// mutate in place and return `&mut Self` so calls can be chained.
/// Y grows downward, like screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);
    pub const ONE: Vec2 = Vec2::new(1.0, 1.0);
    pub const UP: Vec2 = Vec2::new(0.0, -1.0);
    pub const DOWN: Vec2 = Vec2::new(0.0, 1.0);
    pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
    pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);
    pub const UP_LEFT: Vec2 = Vec2::new(-1.0, -1.0);
    pub const DOWN_LEFT: Vec2 = Vec2::new(-1.0, 1.0);
    pub const UP_RIGHT: Vec2 = Vec2::new(1.0, -1.0);
    pub const DOWN_RIGHT: Vec2 = Vec2::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` (radians)
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn distance(self, other: Vec2) -> f32 {
        crate::math::distance(self, other)
    }

    /// Squared distance, avoids the square root
    pub fn distance2(self, other: Vec2) -> f32 {
        crate::math::distance2(self, other)
    }

    /// Angle in degrees of the direction from `self` to `other`
    pub fn angle_to(self, other: Vec2) -> f32 {
        crate::math::angle(self, other)
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Componentwise product
    pub fn mul_elem(self, other: Vec2) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Componentwise quotient
    pub fn div_elem(self, other: Vec2) -> Self {
        Self::new(self.x / other.x, self.y / other.y)
    }

    pub fn mul_elem_mut(&mut self, other: Vec2) -> &mut Self {
        *self = self.mul_elem(other);
        self
    }

    pub fn div_elem_mut(&mut self, other: Vec2) -> &mut Self {
        *self = self.div_elem(other);
        self
    }

    pub fn add_scalar(self, v: f32) -> Self {
        Self::new(self.x + v, self.y + v)
    }

    pub fn sub_scalar(self, v: f32) -> Self {
        Self::new(self.x - v, self.y - v)
    }

    pub fn add_scalar_mut(&mut self, v: f32) -> &mut Self {
        *self = self.add_scalar(v);
        self
    }

    pub fn sub_scalar_mut(&mut self, v: f32) -> &mut Self {
        *self = self.sub_scalar(v);
        self
    }

    /// Clamps both components to `[min, max]`
    pub fn clamp(self, min: f32, max: f32) -> Self {
        self.map(|v| v.max(min).min(max))
    }

    pub fn clamp_mut(&mut self, min: f32, max: f32) -> &mut Self {
        *self = self.clamp(min, max);
        self
    }

    /// Applies `f` on both components
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y))
    }

    pub fn map_mut(&mut self, f: impl Fn(f32) -> f32) -> &mut Self {
        *self = self.map(f);
        self
    }

    pub fn abs(self) -> Self {
        self.map(f32::abs)
    }

    pub fn min(self, other: Vec2) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Vec2) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl DivAssign<f32> for Vec2 {
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point2<f32>> for Vec2 {
    fn from(p: Point2<f32>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Vec2> for Point2<f32> {
    fn from(v: Vec2) -> Self {
        Point2 { x: v.x, y: v.y }
    }
}

#[cfg(feature = "euclid")]
impl<U> From<euclid::Point2D<f32, U>> for Vec2 {
    fn from(p: euclid::Point2D<f32, U>) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(feature = "euclid")]
impl<U> From<Vec2> for euclid::Point2D<f32, U> {
    fn from(v: Vec2) -> Self {
        euclid::Point2D::new(v.x, v.y)
    }
}
