use crate::shape::Aabb;
use crate::Vec2;
use fnv::FnvHashMap;

/// Column and row of a grid cell
pub type CellId = (i32, i32);

/// Inclusive rectangle of cell ids
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    pub min: CellId,
    pub max: CellId,
}

impl CellRange {
    pub fn single(id: CellId) -> Self {
        Self { min: id, max: id }
    }

    pub fn iter(&self) -> XYRange {
        let (x1, y1) = (self.min.0 as i64, self.min.1 as i64);
        XYRange {
            x1,
            x2: self.max.0 as i64 + 1,
            y2: self.max.1 as i64 + 1,
            x: x1,
            y: y1,
        }
    }

    pub fn contains(&self, (x, y): CellId) -> bool {
        x >= self.min.0 && x <= self.max.0 && y >= self.min.1 && y <= self.max.1
    }

    /// Number of cells covered
    pub fn len(&self) -> usize {
        let w = (self.max.0 as i64 - self.min.0 as i64 + 1) as u64;
        let h = (self.max.1 as i64 - self.min.1 as i64 + 1) as u64;
        w.saturating_mul(h).try_into().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// SparseStorage stores cells in a HashMap keyed by cell id.
/// It is Sparse because cells are lazily allocated, and only pruned when asked to.
#[derive(Clone, Debug)]
pub struct SparseStorage<T: Default> {
    cell_size: f32,
    cells: FnvHashMap<CellId, T>,
}

impl<T: Default> SparseStorage<T> {
    pub fn new(cell_size: f32) -> Self {
        assert!(
            cell_size > 0.0,
            "Cell size ({}) cannot be less than or equal to zero",
            cell_size
        );
        Self {
            cell_size,
            cells: Default::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cells(&self) -> &FnvHashMap<CellId, T> {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&T> {
        self.cells.get(&id)
    }

    /// Allocates the cell if needed
    pub fn cell_mut(&mut self, id: CellId) -> &mut T {
        self.cells.entry(id).or_default()
    }

    pub fn cell_mut_existing(&mut self, id: CellId) -> Option<&mut T> {
        self.cells.get_mut(&id)
    }

    /// Cell holding `pos`. Coordinates beyond the `i32` cell range saturate
    /// to the outermost cell.
    pub fn cell_id(&self, pos: Vec2) -> CellId {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Cells touched by a box, borders included
    pub fn cell_range(&self, aabb: &Aabb) -> CellRange {
        CellRange {
            min: self.cell_id(aabb.min()),
            max: self.cell_id(aabb.max()),
        }
    }

    pub fn cell_aabb(&self, (x, y): CellId) -> Aabb {
        Aabb::new(
            Vec2::new(x as f32 * self.cell_size, y as f32 * self.cell_size),
            Vec2::new(self.cell_size, self.cell_size),
        )
    }

    /// Drops the cells for which `f` returns true, returning how many went away
    pub fn prune(&mut self, mut f: impl FnMut(&T) -> bool) -> usize {
        let before = self.cells.len();
        self.cells.retain(move |_, cell| !f(cell));
        before - self.cells.len()
    }
}

/// Row-major walk over a [`CellRange`]. Bounds are kept in `i64` so ranges
/// ending on `i32::MAX` do not overflow.
pub struct XYRange {
    x1: i64,
    x2: i64,
    y2: i64,
    x: i64,
    y: i64,
}

impl Iterator for XYRange {
    type Item = CellId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.y2 {
            return None;
        }

        let v = (self.x as i32, self.y as i32);
        self.x += 1;
        if self.x == self.x2 {
            self.x = self.x1;
            self.y += 1;
        }

        Some(v)
    }
}

#[cfg(test)]
mod tests;
