//!
//! flat_collide is a 2D collision crate built on a flat sparse grid instead of a tree.
//!
//! A [`World`] owns shapes (circles, rectangles, segments, polylines and composites of those)
//! and buckets each of them in every grid cell its bounding box touches. Queries look at the
//! cells around the probe, filter candidates by [`TagMask`] and run the exact pairwise test
//! from [`collide`].
//!
//! Coordinates are screen-like: y grows downward.
//!
//! ```rust
//! use flat_collide::{Shape, World};
//!
//! let mut w: World = World::new(64.0);
//! let player = w.insert(Shape::circle([10.0, 10.0], 5.0));
//! w.set_tags(player, "player").unwrap();
//! let enemy = w.insert(Shape::rectangle([12.0, 8.0], [20.0, 20.0]));
//! w.set_tags(enemy, "enemy").unwrap();
//!
//! let enemies = w.mask("enemy");
//! assert_eq!(w.pick_first_match(player, enemies).unwrap(), Some(enemy));
//! assert!(!w.test(player, w.mask("player")).unwrap());
//! ```

mod cell;
pub mod collide;
mod error;
pub mod math;
mod render;
pub mod shape;
pub mod storage;
mod tags;
mod vector;
mod world;

pub use cell::ShapeCell;
pub use collide::Collider;
pub use error::{CollisionError, Result};
pub use render::{RenderColors, Rgba};
pub use shape::{Aabb, Child, Corners, Geometry, Line, Shape, ShapeType};
pub use storage::{CellId, CellRange};
pub use tags::{TagMask, TagNames, TagRegistry};
pub use vector::Vec2;
pub use world::{Probe, ShapeHandle, ShapeKey, World, WorldConfig};
