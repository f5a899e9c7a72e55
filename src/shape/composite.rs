use crate::shape::{Aabb, Shape};
use crate::tags::TagMask;
use crate::Vec2;

/// A shape owned by a composite, pinned at a fixed offset from it
#[derive(Clone, Debug)]
pub struct Child {
    pub(crate) shape: Shape,
    pub(crate) offset: Vec2,
}

impl Child {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// Several shapes moving and colliding as one.
#[derive(Clone, Debug, Default)]
pub struct Composite {
    children: Vec<Child>,
}

impl Composite {
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// The child keeps its current position as offset from the anchor
    pub(crate) fn push(&mut self, anchor: Vec2, tags: TagMask, mut shape: Shape) -> usize {
        let offset = shape.position();
        shape.set_position(anchor + offset);
        shape.set_tag_mask(tags);
        self.children.push(Child { shape, offset });
        self.children.len() - 1
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Shape> {
        if index >= self.children.len() {
            return None;
        }
        Some(self.children.remove(index).shape)
    }

    pub(crate) fn follow(&mut self, anchor: Vec2) {
        for child in &mut self.children {
            child.shape.set_position(anchor + child.offset);
        }
    }

    pub(crate) fn set_tag_mask(&mut self, tags: TagMask) {
        for child in &mut self.children {
            child.shape.set_tag_mask(tags);
        }
    }

    /// An empty composite is a zero sized box on its anchor
    pub(crate) fn aabb(&self, anchor: Vec2) -> Aabb {
        let mut children = self.children.iter();
        let mut ret = match children.next() {
            Some(c) => c.shape.aabb(),
            None => return Aabb::point(anchor),
        };
        for c in children {
            ret.expand(&c.shape.aabb());
        }
        ret
    }
}
