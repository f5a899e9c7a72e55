use crate::world::ShapeKey;

/// A single cell of the world grid, can be empty
#[derive(Default, Clone, Debug)]
pub struct ShapeCell {
    pub objs: Vec<ShapeKey>,
}

impl ShapeCell {
    /// Returns false if the key was not bucketed here
    pub fn remove(&mut self, key: ShapeKey) -> bool {
        match self.objs.iter().position(|&x| x == key) {
            Some(p) => {
                self.objs.swap_remove(p);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }
}
