// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid binding: snap dragged positions to a fixed-size grid.
//!
//! ```
//! use kurbo::Point;
//! use understory_drag_drop::grid::GridSnap;
//!
//! let grid = GridSnap::default();
//! assert_eq!(grid.cell_size(), 4.0);
//! assert_eq!(grid.snap_point(Point::new(13.0, 22.0)), Point::new(12.0, 24.0));
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`
use kurbo::Point;

/// Round `coordinate` to the nearest multiple of `cell_size`.
///
/// Halfway values round away from zero. `cell_size` must be positive; use
/// [`GridSnap`] to have that checked once up front.
#[must_use]
pub fn snap(coordinate: f64, cell_size: f64) -> f64 {
    (coordinate / cell_size).round() * cell_size
}

/// A validated grid cell size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSnap {
    cell_size: f64,
}

impl GridSnap {
    /// Cell size used when none is configured.
    pub const DEFAULT_CELL_SIZE: f64 = 4.0;

    /// Create a grid with the given cell size.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not finite and strictly positive.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "grid cell size must be finite and positive, got {cell_size}"
        );
        Self { cell_size }
    }

    /// The current cell size.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Change the cell size.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not finite and strictly positive.
    pub fn set_cell_size(&mut self, cell_size: f64) {
        *self = Self::new(cell_size);
    }

    /// Snap a single coordinate.
    #[must_use]
    pub fn snap(&self, coordinate: f64) -> f64 {
        snap(coordinate, self.cell_size)
    }

    /// Snap both axes of `point` independently.
    #[must_use]
    pub fn snap_point(&self, point: Point) -> Point {
        Point::new(self.snap(point.x), self.snap(point.y))
    }
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }
}
