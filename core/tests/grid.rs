//! Grid tests: canonical identity and neighbourhood enumeration.

use geocoin_core::{
    board::{Board, Cell},
    config::GameConfig,
    geo::LatLng,
};
use std::{collections::HashSet, rc::Rc};

fn board() -> Board {
    let config = GameConfig::default_test();
    Board::new(config.quantizer(), config.visibility_radius)
}

#[test]
fn canonical_cell_identity_is_stable() {
    let mut board = board();
    for (i, j) in [(0, 0), (1, 2), (-7, 3), (369_894, -1_220_627)] {
        let first = board.canonical_cell(i, j);
        for _ in 0..3 {
            let again = board.canonical_cell(i, j);
            assert!(Rc::ptr_eq(&first, &again), "({i},{j}) lost identity");
            assert_eq!(*first, *again);
        }
    }
    assert_ne!(*board.canonical_cell(1, 2), *board.canonical_cell(2, 1));
}

#[test]
fn point_lookup_returns_canonical_instance() {
    let mut board = board();
    let point = LatLng::new(36.98949379578401, -122.06277128548504);
    let by_point = board.cell_for_point(point);
    let by_index = board.canonical_cell(by_point.i, by_point.j);
    assert!(Rc::ptr_eq(&by_point, &by_index));
    assert!(board.cell_bounds(&by_point).contains(point));
}

#[test]
fn neighbourhood_has_exact_size_and_no_duplicates() {
    let mut board = board();
    let point = LatLng::new(36.98949379578401, -122.06277128548504);
    for r in 0..=8u32 {
        let cells = board.cells_near_point(point, r);
        let side = (2 * r + 1) as usize;
        assert_eq!(cells.len(), side * side, "radius {r}");
        let unique: HashSet<Cell> = cells.iter().map(|c| **c).collect();
        assert_eq!(unique.len(), cells.len(), "radius {r} produced duplicates");
    }
}

#[test]
fn radius_zero_is_the_containing_cell() {
    let mut board = board();
    let point = LatLng::new(-12.34567, 98.76543);
    let cells = board.cells_near_point(point, 0);
    assert_eq!(cells.len(), 1);
    let center = board.cell_for_point(point);
    assert!(Rc::ptr_eq(&cells[0], &center));
    assert!(board.cell_bounds(&cells[0]).contains(point));
}

#[test]
fn neighbourhood_is_centred_on_the_point() {
    let mut board = board();
    let point = LatLng::new(0.00125, -0.00125);
    let center = board.cell_for_point(point);
    let cells = board.cells_near_point(point, 3);
    let middle = &cells[cells.len() / 2];
    assert!(Rc::ptr_eq(middle, &center));
    assert_eq!((cells[0].i, cells[0].j), (center.i - 3, center.j - 3));
    let last = cells.last().unwrap();
    assert_eq!((last.i, last.j), (center.i + 3, center.j + 3));
}
