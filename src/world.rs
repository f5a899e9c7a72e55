use crate::cell::ShapeCell;
use crate::collide;
use crate::error::{CollisionError, Result};
use crate::shape::{Aabb, Shape};
use crate::storage::{CellId, CellRange, SparseStorage};
use crate::tags::{TagMask, TagNames, TagRegistry};
use crate::Vec2;
use fnv::FnvHashSet;
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicU32, Ordering};

new_key_type! {
    /// Slot of a shape inside a world.
    pub struct ShapeKey;
}

static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(0);

/// This handle is used to reach an inserted shape, to move it or to remove it.
/// It is returned by the _insert_ method of a World.
///
/// A handle remembers which world gave it out, so using it with another world
/// fails with [`CollisionError::NotAMember`] instead of reaching an unrelated shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeHandle {
    world: u32,
    key: ShapeKey,
}

impl ShapeHandle {
    pub fn key(&self) -> ShapeKey {
        self.key
    }
}

/// The actual object stored in the world
struct StoreObject<D> {
    shape: Shape,
    payload: Option<D>,
    /// Cells the shape is bucketed in
    range: CellRange,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Width and height of a grid cell
    pub cell_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { cell_size: 512.0 }
    }
}

/// What a query tests against.
#[derive(Clone, Copy, Debug)]
pub enum Probe<'a> {
    Point(Vec2),
    /// A shape that may or may not live in the world. It is never reported as
    /// colliding with itself.
    Shape(&'a Shape),
    /// A shape already inserted in the world. Its bucketed cell range is reused.
    Member(ShapeHandle),
}

impl From<Vec2> for Probe<'_> {
    fn from(p: Vec2) -> Self {
        Probe::Point(p)
    }
}

impl From<[f32; 2]> for Probe<'_> {
    fn from(p: [f32; 2]) -> Self {
        Probe::Point(p.into())
    }
}

impl<'a> From<&'a Shape> for Probe<'a> {
    fn from(s: &'a Shape) -> Self {
        Probe::Shape(s)
    }
}

impl From<ShapeHandle> for Probe<'_> {
    fn from(h: ShapeHandle) -> Self {
        Probe::Member(h)
    }
}

/// World is a sparse uniform grid of shapes, answering collision queries
/// against the shapes it owns.
///
/// ## Buckets
/// Each shape is bucketed in every cell its bounding box touches, so a query
/// only has to look at the cells its own bounding box touches. The grid has no
/// log costs, but the cell size has to be adapted to the problem: about the size
/// of the typical shape. Shapes spanning many cells make insertion and movement
/// expensive.
///
/// ## Ownership
/// Inserting a shape moves it into the world. It can then only be changed
/// through the world (`set_position`, `move_by`, `set_tags`, `modify`) so its
/// buckets always follow its bounding box. Removing it gives it back.
///
/// ## Tags
/// Tag names map to bits of a [`TagMask`]. A query only considers shapes
/// sharing at least one bit with its mask. Shapes and filters default to
/// [`TagMask::ALL`].
///
/// ## Examples
/// ```rust
/// use flat_collide::{Shape, TagMask, World};
///
/// let mut w: World = World::new(100.0);
/// let wall = w.insert(Shape::rectangle([0.0, 0.0], [200.0, 20.0]));
/// let ball = w.insert(Shape::circle([50.0, 25.0], 10.0));
/// w.set_tags(wall, "wall").unwrap();
///
/// // The ball touches the wall
/// assert_eq!(w.find_all(ball, TagMask::ALL).unwrap(), vec![wall]);
/// assert!(w.test(ball, w.mask("wall")).unwrap());
///
/// // Not anymore
/// w.move_by(ball, [0.0, 100.0]).unwrap();
/// assert!(!w.test(ball, TagMask::ALL).unwrap());
///
/// let shape = w.remove(wall).unwrap();
/// assert_eq!(shape.position().x, 0.0);
/// assert!(!w.contains(wall));
/// ```
pub struct World<D = ()> {
    id: u32,
    storage: SparseStorage<ShapeCell>,
    objects: SlotMap<ShapeKey, StoreObject<D>>,
    tags: TagRegistry,
}

impl<D> Default for World<D> {
    fn default() -> Self {
        Self::with_config(WorldConfig::default())
    }
}

impl<D> World<D> {
    /// Creates an empty world.
    /// The cell size should be about the same magnitude as your shapes.
    ///
    /// # Panics
    /// If `cell_size` is not strictly positive.
    pub fn new(cell_size: f32) -> Self {
        Self::with_config(WorldConfig { cell_size })
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            storage: SparseStorage::new(config.cell_size),
            objects: SlotMap::with_key(),
            tags: TagRegistry::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.storage.cell_size()
    }

    fn handle(&self, key: ShapeKey) -> ShapeHandle {
        ShapeHandle {
            world: self.id,
            key,
        }
    }

    fn key(&self, handle: ShapeHandle) -> Result<ShapeKey> {
        if handle.world != self.id {
            return Err(CollisionError::NotAMember(format!(
                "{:?} belongs to another world",
                handle.key
            )));
        }
        if !self.objects.contains_key(handle.key) {
            return Err(CollisionError::NotAMember(format!(
                "{:?} is not in this world anymore",
                handle.key
            )));
        }
        Ok(handle.key)
    }

    fn register(storage: &mut SparseStorage<ShapeCell>, key: ShapeKey, range: CellRange) {
        for id in range.iter() {
            storage.cell_mut(id).objs.push(key);
        }
    }

    fn unregister(storage: &mut SparseStorage<ShapeCell>, key: ShapeKey, range: CellRange) {
        for id in range.iter() {
            let removed = storage
                .cell_mut_existing(id)
                .map_or(false, |cell| cell.remove(key));
            debug_assert!(removed, "{:?} was not bucketed in cell {:?}", key, id);
        }
    }

    /// Moves a shape out of its old buckets and into the ones of its current box
    fn rebucket(&mut self, key: ShapeKey) {
        let Self {
            storage, objects, ..
        } = self;
        let obj = &mut objects[key];
        let range = storage.cell_range(&obj.shape.aabb());

        Self::unregister(storage, key, obj.range);
        Self::register(storage, key, range);
        log::trace!("rebucket {:?}: {:?} -> {:?}", key, obj.range, range);
        obj.range = range;
    }

    /// Inserts a shape, taking ownership of it.
    /// Returns the unique and stable handle to reach it
    ///
    /// # Example
    /// ```rust
    /// use flat_collide::{Shape, World};
    /// let mut w: World = World::new(10.0);
    /// let h = w.insert(Shape::circle([2.0, 2.0], 3.0));
    /// assert!(w.contains(h));
    /// ```
    pub fn insert(&mut self, shape: Shape) -> ShapeHandle {
        self.insert_inner(shape, None)
    }

    /// Inserts a shape along with a user payload
    pub fn insert_with(&mut self, shape: Shape, payload: D) -> ShapeHandle {
        self.insert_inner(shape, Some(payload))
    }

    fn insert_inner(&mut self, shape: Shape, payload: Option<D>) -> ShapeHandle {
        let range = self.storage.cell_range(&shape.aabb());
        let key = self.objects.insert(StoreObject {
            shape,
            payload,
            range,
        });
        Self::register(&mut self.storage, key, range);
        log::trace!("insert {:?} into {} cell(s)", key, range.len());
        self.handle(key)
    }

    /// Removes a shape from the world and gives it back. Its payload is dropped.
    ///
    /// # Example
    /// ```rust
    /// use flat_collide::{CollisionError, Shape, World};
    /// let mut w: World = World::new(10.0);
    /// let h = w.insert(Shape::circle([2.0, 2.0], 3.0));
    /// assert!(w.remove(h).is_ok());
    /// assert!(matches!(w.remove(h), Err(CollisionError::NotAMember(_))));
    /// ```
    pub fn remove(&mut self, handle: ShapeHandle) -> Result<Shape> {
        self.take(handle).map(|(shape, _)| shape)
    }

    /// Removes a shape from the world, giving back the shape and its payload
    pub fn take(&mut self, handle: ShapeHandle) -> Result<(Shape, Option<D>)> {
        let key = self.key(handle)?;
        let st = self
            .objects
            .remove(key)
            .ok_or_else(|| CollisionError::NotAMember(format!("{:?}", key)))?;
        Self::unregister(&mut self.storage, key, st.range);
        log::trace!("remove {:?}", key);
        Ok((st.shape, st.payload))
    }

    pub fn contains(&self, handle: ShapeHandle) -> bool {
        self.key(handle).is_ok()
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&Shape> {
        let key = self.key(handle).ok()?;
        self.objects.get(key).map(|x| &x.shape)
    }

    /// Cells the shape is currently bucketed in
    pub fn cell_range(&self, handle: ShapeHandle) -> Result<CellRange> {
        let key = self.key(handle)?;
        Ok(self.objects[key].range)
    }

    pub fn set_position(&mut self, handle: ShapeHandle, position: impl Into<Vec2>) -> Result<()> {
        let position = position.into();
        self.modify(handle, |s| s.set_position(position))
    }

    /// Moves a shape by a delta
    pub fn move_by(&mut self, handle: ShapeHandle, delta: impl Into<Vec2>) -> Result<()> {
        let delta = delta.into();
        self.modify(handle, |s| s.move_by(delta))
    }

    /// Runs `f` on a shape, then re-buckets it so any geometry change is seen
    /// by later queries.
    ///
    /// # Example
    /// ```rust
    /// use flat_collide::{Shape, TagMask, World};
    /// let mut w: World = World::new(10.0);
    /// let h = w.insert(Shape::circle([0.0, 0.0], 1.0));
    /// w.modify(h, |s| s.set_radius(30.0)).unwrap().unwrap();
    /// assert!(w.test([25.0, 0.0], TagMask::ALL).unwrap());
    /// ```
    pub fn modify<R>(&mut self, handle: ShapeHandle, f: impl FnOnce(&mut Shape) -> R) -> Result<R> {
        let key = self.key(handle)?;
        let ret = f(&mut self.objects[key].shape);
        self.rebucket(key);
        Ok(ret)
    }

    /// Replaces the tags of a shape (and of its children), defining unseen names.
    /// No names at all means the shape matches every filter.
    pub fn set_tags(&mut self, handle: ShapeHandle, names: impl TagNames) -> Result<TagMask> {
        let key = self.key(handle)?;
        let mask = self.tags.resolve(names)?;
        self.objects[key].shape.set_tag_mask(mask);
        Ok(mask)
    }

    /// Whether a shape shares a bit with the given names, defining unseen ones
    pub fn matches_tags(&mut self, handle: ShapeHandle, names: impl TagNames) -> Result<bool> {
        let key = self.key(handle)?;
        let mask = self.tags.resolve(names)?;
        Ok(self.objects[key].shape.matches(mask))
    }

    /// Mask of the given names, defining unseen ones
    pub fn tags(&mut self, names: impl TagNames) -> Result<TagMask> {
        self.tags.resolve(names)
    }

    /// Mask of the given names without defining anything.
    ///
    /// An unknown name matches the shapes whose tags were never set, like a
    /// freshly defined tag would.
    pub fn mask(&self, names: impl TagNames) -> TagMask {
        self.tags.lookup(names)
    }

    /// Explicitly defines a tag, failing if it already exists
    pub fn define_tag(&mut self, name: &str) -> Result<TagMask> {
        self.tags.define(name)
    }

    pub fn tag(&self, name: &str) -> Option<TagMask> {
        self.tags.get(name)
    }

    /// Names of the tags set in `mask`
    pub fn tag_names(&self, mask: TagMask) -> Vec<&str> {
        self.tags.names(mask)
    }

    pub fn tag_registry(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn payload(&self, handle: ShapeHandle) -> Option<&D> {
        let key = self.key(handle).ok()?;
        self.objects[key].payload.as_ref()
    }

    pub fn payload_mut(&mut self, handle: ShapeHandle) -> Option<&mut D> {
        let key = self.key(handle).ok()?;
        self.objects[key].payload.as_mut()
    }

    /// Sets the payload of a shape, returning the previous one
    pub fn attach_payload(&mut self, handle: ShapeHandle, payload: D) -> Result<Option<D>> {
        let key = self.key(handle)?;
        Ok(self.objects[key].payload.replace(payload))
    }

    pub fn detach_payload(&mut self, handle: ShapeHandle) -> Result<Option<D>> {
        let key = self.key(handle)?;
        Ok(self.objects[key].payload.take())
    }

    /// Whether anything matching `mask` collides with the probe
    pub fn test<'a>(&self, probe: impl Into<Probe<'a>>, mask: TagMask) -> Result<bool> {
        Ok(!self.query(probe.into(), mask, Some(1))?.is_empty())
    }

    /// The first shape matching `mask` found colliding with the probe.
    /// Which one is first depends on bucket order and is unspecified.
    pub fn pick_first_match<'a>(
        &self,
        probe: impl Into<Probe<'a>>,
        mask: TagMask,
    ) -> Result<Option<ShapeHandle>> {
        Ok(self.query(probe.into(), mask, Some(1))?.pop())
    }

    /// Every shape matching `mask` colliding with the probe, each reported once.
    ///
    /// # Example
    /// ```rust
    /// use flat_collide::{Shape, TagMask, World};
    ///
    /// let mut w: World = World::new(10.0);
    /// let a = w.insert(Shape::circle([2.0, 2.0], 3.0));
    /// let b = w.insert(Shape::circle([25.0, 2.0], 3.0));
    ///
    /// let probe = Shape::rectangle([0.0, 0.0], [50.0, 5.0]);
    /// let mut found = w.find_all(&probe, TagMask::ALL).unwrap();
    /// found.sort_by_key(|h| h.key());
    /// assert_eq!(found, vec![a, b]);
    /// ```
    pub fn find_all<'a>(
        &self,
        probe: impl Into<Probe<'a>>,
        mask: TagMask,
    ) -> Result<Vec<ShapeHandle>> {
        self.query(probe.into(), mask, None)
    }

    /// Every shape bucketed in the cells the probe touches, each reported once,
    /// before any tag or collision test. A member probe is not reported.
    pub fn query_broad<'a>(&self, probe: impl Into<Probe<'a>>) -> Result<Vec<ShapeHandle>> {
        let (range, skip) = match probe.into() {
            Probe::Point(p) => (CellRange::single(self.storage.cell_id(p)), None),
            Probe::Shape(s) => (self.storage.cell_range(&s.aabb()), None),
            Probe::Member(h) => {
                let key = self.key(h)?;
                (self.objects[key].range, Some(key))
            }
        };

        let mut seen = FnvHashSet::default();
        Ok(range
            .iter()
            .flat_map(|id| self.storage.cell(id))
            .flat_map(|cell| cell.objs.iter().copied())
            .filter(|&key| Some(key) != skip && seen.insert(key))
            .map(|key| self.handle(key))
            .collect())
    }

    fn query(&self, probe: Probe<'_>, mask: TagMask, limit: Option<usize>) -> Result<Vec<ShapeHandle>> {
        match probe {
            Probe::Point(p) => self.query_point(p, mask, limit),
            Probe::Shape(s) => self.query_shape(s, self.storage.cell_range(&s.aabb()), mask, limit),
            Probe::Member(h) => {
                let key = self.key(h)?;
                let obj = &self.objects[key];
                self.query_shape(&obj.shape, obj.range, mask, limit)
            }
        }
    }

    fn query_point(&self, p: Vec2, mask: TagMask, limit: Option<usize>) -> Result<Vec<ShapeHandle>> {
        let mut found = Vec::new();
        let cell = match self.storage.cell(self.storage.cell_id(p)) {
            Some(x) => x,
            None => return Ok(found),
        };

        for &key in &cell.objs {
            let shape = &self.objects[key].shape;
            if !shape.matches(mask) || !collide::test(shape, p)? {
                continue;
            }
            found.push(self.handle(key));
            if limit.map_or(false, |l| found.len() >= l) {
                break;
            }
        }
        Ok(found)
    }

    fn query_shape(
        &self,
        probe: &Shape,
        range: CellRange,
        mask: TagMask,
        limit: Option<usize>,
    ) -> Result<Vec<ShapeHandle>> {
        let mut found = Vec::new();
        let mut seen = FnvHashSet::default();

        for id in range.iter() {
            let cell = match self.storage.cell(id) {
                Some(x) => x,
                None => continue,
            };
            for &key in &cell.objs {
                if !seen.insert(key) {
                    continue;
                }
                let shape = &self.objects[key].shape;
                if std::ptr::eq(shape, probe) || !shape.matches(mask) {
                    continue;
                }
                if !collide::test(shape, probe)? {
                    continue;
                }
                found.push(self.handle(key));
                if limit.map_or(false, |l| found.len() >= l) {
                    return Ok(found);
                }
            }
        }
        Ok(found)
    }

    /// Drops the empty cells, returning how many were dropped.
    /// Queries give the same answers before and after.
    pub fn cleanup(&mut self) -> usize {
        let pruned = self.storage.prune(ShapeCell::is_empty);
        log::debug!(
            "cleanup pruned {} cell(s), {} left",
            pruned,
            self.storage.cells().len()
        );
        pruned
    }

    /// Every allocated cell with its bounds and how many shapes it holds
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellId, Aabb, usize)> + '_ {
        self.storage
            .cells()
            .iter()
            .map(move |(&id, cell)| (id, self.storage.cell_aabb(id), cell.len()))
    }

    /// Iterate over all handles
    pub fn handles(&self) -> impl Iterator<Item = ShapeHandle> + '_ {
        self.objects.keys().map(move |key| self.handle(key))
    }

    /// Iterate over all shapes with their handle
    pub fn iter(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> + '_ {
        self.objects
            .iter()
            .map(move |(key, obj)| (self.handle(key), &obj.shape))
    }

    /// The underlying storage
    pub fn storage(&self) -> &SparseStorage<ShapeCell> {
        &self.storage
    }

    /// Returns the number of shapes in the world
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
