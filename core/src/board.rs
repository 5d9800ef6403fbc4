//! Cell registry: canonical identity for every grid cell ever referenced.
//!
//! RULE: a cell for (i, j) is created at most once per session.
//! Every later lookup hands out a clone of the same `Rc`, so callers may
//! compare cells with `Rc::ptr_eq` as well as by value.

use crate::{
    geo::{CellBounds, LatLng, Quantizer},
    types::GridIndex,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: GridIndex,
    pub j: GridIndex,
}

impl Cell {
    pub const fn new(i: GridIndex, j: GridIndex) -> Self {
        Self { i, j }
    }

    /// Stable string identity, "i,j". Shared by the registry and the
    /// cache store so the two can never disagree on a key.
    pub fn key(&self) -> String {
        format!("{},{}", self.i, self.j)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

pub struct Board {
    quantizer:         Quantizer,
    visibility_radius: u32,
    known_cells:       HashMap<String, Rc<Cell>>,
}

impl Board {
    pub fn new(quantizer: Quantizer, visibility_radius: u32) -> Self {
        Self {
            quantizer,
            visibility_radius,
            known_cells: HashMap::new(),
        }
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    pub fn visibility_radius(&self) -> u32 {
        self.visibility_radius
    }

    pub fn canonical_cell(&mut self, i: GridIndex, j: GridIndex) -> Rc<Cell> {
        let cell = Cell::new(i, j);
        Rc::clone(
            self.known_cells
                .entry(cell.key())
                .or_insert_with(|| Rc::new(cell)),
        )
    }

    pub fn cell_for_point(&mut self, point: LatLng) -> Rc<Cell> {
        let (i, j) = self.quantizer.cell_indices(point);
        self.canonical_cell(i, j)
    }

    pub fn cell_bounds(&self, cell: &Cell) -> CellBounds {
        self.quantizer.cell_bounds(cell.i, cell.j)
    }

    /// Every cell in the (2r+1) x (2r+1) square centred on the cell
    /// containing `point`, row-major by i then j.
    pub fn cells_near_point(&mut self, point: LatLng, radius: u32) -> Vec<Rc<Cell>> {
        let (ci, cj) = self.quantizer.cell_indices(point);
        let r = radius as GridIndex;
        let side = 2 * radius as usize + 1;
        let mut cells = Vec::with_capacity(side * side);
        for di in -r..=r {
            for dj in -r..=r {
                cells.push(self.canonical_cell(ci + di, cj + dj));
            }
        }
        cells
    }

    /// `cells_near_point` at the configured visibility radius.
    pub fn visible_cells(&mut self, point: LatLng) -> Vec<Rc<Cell>> {
        self.cells_near_point(point, self.visibility_radius)
    }

    /// Whether `cell` lies inside the visibility square around `point`.
    pub fn is_visible_from(&self, cell: &Cell, point: LatLng) -> bool {
        let (ci, cj) = self.quantizer.cell_indices(point);
        let r = i64::from(self.visibility_radius);
        (i64::from(cell.i) - i64::from(ci)).abs() <= r
            && (i64::from(cell.j) - i64::from(cj)).abs() <= r
    }

    /// Whether the whole visibility square around `point` has indices
    /// representable as `GridIndex`.
    pub fn fits(&self, point: LatLng) -> bool {
        let Some((ci, cj)) = self.quantizer.checked_cell_indices(point) else {
            return false;
        };
        let r = i64::from(self.visibility_radius);
        let range = i64::from(GridIndex::MIN)..=i64::from(GridIndex::MAX);
        [ci, cj].into_iter().all(|c| {
            range.contains(&(i64::from(c) - r)) && range.contains(&(i64::from(c) + r))
        })
    }

    pub fn known_cell_count(&self) -> usize {
        self.known_cells.len()
    }
}
