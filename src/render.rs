//! Colour hints for drawing shapes. Nothing in the collision code reads them.

use crate::tags::TagMask;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Stable colour derived from a tag mask, so shapes sharing tags share a colour
    pub fn from_tags(tags: TagMask, opacity: f32) -> Self {
        let v = tags.bits() as f64;
        let r = (v.sin().abs() * 255.0).round() as u8;
        let g = (v.cos().abs() * 255.0).round() as u8;
        Self::new(r, g, r ^ g, opacity)
    }
}

/// Optional colours overriding the tag-derived ones
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderColors {
    pub fill: Option<Rgba>,
    pub stroke: Option<Rgba>,
}

#[cfg(test)]
mod tests {
    use super::Rgba;
    use crate::tags::TagMask;

    #[test]
    fn test_tag_color() {
        let c = Rgba::from_tags(TagMask(0), 0.5);
        assert_eq!((c.r, c.g, c.b), (0, 255, 255));
        assert_eq!(c.a, 0.5);
        assert_eq!(
            Rgba::from_tags(TagMask(4), 1.0),
            Rgba::from_tags(TagMask(4), 1.0)
        );
    }
}
