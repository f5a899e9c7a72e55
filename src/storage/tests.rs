use super::{CellRange, SparseStorage};
use crate::shape::Aabb;
use crate::Vec2;

#[test]
fn cell_id_floors_negatives() {
    let s = SparseStorage::<()>::new(10.0);

    assert_eq!(s.cell_id(Vec2::new(15.0, 15.0)), (1, 1));
    assert_eq!(s.cell_id(Vec2::new(5.0, 15.0)), (0, 1));
    assert_eq!(s.cell_id(Vec2::new(-5.0, 5.0)), (-1, 0));
    assert_eq!(s.cell_id(Vec2::new(-10.0, -10.5)), (-1, -2));
    assert_eq!(s.cell_id(Vec2::new(10.0, 0.0)), (1, 0));
}

#[test]
fn distinct_cells_never_collide() {
    let mut s = SparseStorage::<Vec<u8>>::new(1.0);
    s.cell_mut((1, 2)).push(1);
    s.cell_mut((2, 1)).push(2);
    assert_eq!(s.cell((1, 2)), Some(&vec![1]));
    assert_eq!(s.cell((2, 1)), Some(&vec![2]));
}

#[test]
fn test_cell_range_iter() {
    let r = CellRange {
        min: (-1, 0),
        max: (1, 1),
    };

    assert_eq!(
        r.iter().collect::<Vec<_>>(),
        vec![(-1, 0), (0, 0), (1, 0), (-1, 1), (0, 1), (1, 1)]
    );
    assert_eq!(r.len(), 6);
    assert!(r.contains((0, 1)));
    assert!(!r.contains((2, 1)));
    assert_eq!(CellRange::single((3, 3)).iter().count(), 1);
}

#[test]
fn test_cell_range_of_box() {
    let s = SparseStorage::<()>::new(10.0);
    let r = s.cell_range(&Aabb::new(Vec2::new(-5.0, 5.0), Vec2::new(20.0, 5.0)));
    assert_eq!(r.min, (-1, 0));
    assert_eq!(r.max, (1, 1));

    assert_eq!(s.cell_aabb((-1, 2)).position, Vec2::new(-10.0, 20.0));
}

#[test]
fn test_prune() {
    let mut s = SparseStorage::<Vec<u8>>::new(1.0);
    s.cell_mut((0, 0));
    s.cell_mut((1, 0)).push(3);
    assert_eq!(s.prune(|c| c.is_empty()), 1);
    assert_eq!(s.cells().len(), 1);
}

#[test]
#[should_panic]
fn zero_cell_size() {
    SparseStorage::<()>::new(0.0);
}

#[test]
fn test_cell_range_at_i32_edges() {
    let r = CellRange {
        min: (i32::MAX - 1, i32::MIN),
        max: (i32::MAX, i32::MIN + 1),
    };
    assert_eq!(
        r.iter().collect::<Vec<_>>(),
        vec![
            (i32::MAX - 1, i32::MIN),
            (i32::MAX, i32::MIN),
            (i32::MAX - 1, i32::MIN + 1),
            (i32::MAX, i32::MIN + 1)
        ]
    );
    assert_eq!(r.len(), 4);
    assert_eq!(CellRange::single((i32::MAX, i32::MAX)).iter().count(), 1);

    let s = SparseStorage::<()>::new(1.0);
    assert_eq!(s.cell_id(Vec2::new(3.0e9, -3.0e9)), (i32::MAX, i32::MIN));
}
