//! Coordinate quantization: continuous (lat, lng) to integer grid indices.
//!
//! The grid is anchored at a fixed origin. Cell (i, j) covers
//!   lat in [origin.lat + i * cell_size, origin.lat + (i + 1) * cell_size)
//!   lng in [origin.lng + j * cell_size, origin.lng + (j + 1) * cell_size)
//!
//! RULE: indices are derived once, here, and are integers from then on.
//! Nothing downstream keys on floating-point coordinates.

use crate::types::GridIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180]. NaN fails.
    pub fn is_on_globe(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Axis-aligned rectangle covering one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl CellBounds {
    /// Inclusive on both edges, so a point on a shared edge is
    /// contained by both neighbours.
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// Fixed-origin quantizer. Pure; holds no per-cell state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    pub origin:    LatLng,
    pub cell_size: f64,
}

impl Quantizer {
    pub fn new(origin: LatLng, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be > 0");
        Self { origin, cell_size }
    }

    /// Indices of the cell containing `point`. Saturates at the ends of
    /// `GridIndex`; use `checked_cell_indices` when the point is untrusted.
    pub fn cell_indices(&self, point: LatLng) -> (GridIndex, GridIndex) {
        let i = self.axis_index(point.lat, self.origin.lat) as GridIndex;
        let j = self.axis_index(point.lng, self.origin.lng) as GridIndex;
        (i, j)
    }

    /// `None` if either index falls outside `GridIndex`.
    pub fn checked_cell_indices(&self, point: LatLng) -> Option<(GridIndex, GridIndex)> {
        let i = to_grid_index(self.axis_index(point.lat, self.origin.lat))?;
        let j = to_grid_index(self.axis_index(point.lng, self.origin.lng))?;
        Some((i, j))
    }

    pub fn cell_bounds(&self, i: GridIndex, j: GridIndex) -> CellBounds {
        let size = self.cell_size;
        CellBounds {
            south_west: LatLng::new(
                self.origin.lat + i as f64 * size,
                self.origin.lng + j as f64 * size,
            ),
            north_east: LatLng::new(
                self.origin.lat + (i as f64 + 1.0) * size,
                self.origin.lng + (j as f64 + 1.0) * size,
            ),
        }
    }

    /// Integral, but kept in f64 until the range is known.
    fn axis_index(&self, value: f64, origin: f64) -> f64 {
        let raw = ((value - origin) / self.cell_size).floor();
        // Division can land a hair below an exact edge; nudge so the
        // returned cell's bounds always contain the point.
        if value < origin + raw * self.cell_size {
            raw - 1.0
        } else if value > origin + (raw + 1.0) * self.cell_size {
            raw + 1.0
        } else {
            raw
        }
    }
}

fn to_grid_index(raw: f64) -> Option<GridIndex> {
    (GridIndex::MIN as f64..=GridIndex::MAX as f64)
        .contains(&raw)
        .then(|| raw as GridIndex)
}
