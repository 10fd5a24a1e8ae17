//! Sand physics: one gravity + diagonal-slide pass over the grid.

use crate::grid::{Cell, Grid};

impl Grid {
    /// Advance every grain at most one row. Returns true if anything moved.
    ///
    /// Rows run bottom-up (the floor row never falls), columns left to right, reading and
    /// writing the same buffer. A grain falls straight down when it can; otherwise it slides
    /// down-right, then down-left, but only when both the diagonal target and the lateral
    /// neighbour on that side are empty, so grains never squeeze through a corner.
    pub fn step(&mut self) -> bool {
        let mut moved = false;
        for y in (0..self.height() - 1).rev() {
            for x in 0..self.width() {
                let Some(cell @ Cell::Sand(_)) = self.get(x, y) else {
                    continue;
                };

                let target = if self.is_free(x, y + 1) {
                    Some(x)
                } else if self.is_free(x + 1, y + 1) && self.is_free(x + 1, y) {
                    Some(x + 1)
                } else if self.is_free(x - 1, y + 1) && self.is_free(x - 1, y) {
                    Some(x - 1)
                } else {
                    None
                };

                if let Some(tx) = target {
                    self.set(x, y, Cell::Empty);
                    self.set(tx, y + 1, cell);
                    moved = true;
                }
            }
        }
        moved
    }
}
