//! Clear sweep: removes a connected region left to right with a ragged trailing edge.

use crate::grid::{Cell, Grid, Position};
use crate::scan::ConnectedRegion;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Ticks before the front starts moving.
const WAIT_BEFORE_SWEEP: i32 = 10;
/// Pixels behind the front within which a cell may still linger.
const MAX_LINGER: i32 = 16;

#[derive(Debug, Clone)]
pub struct ClearSweep {
    pending: Vec<Position>,
    timer: i32,
    total: usize,
    rng: Pcg32,
}

impl ClearSweep {
    /// Queue every cell of `regions` for removal.
    pub fn new(regions: &[ConnectedRegion], seed: u64) -> Self {
        let pending: Vec<Position> = regions
            .iter()
            .flat_map(|r| r.positions.iter().copied())
            .collect();
        Self {
            total: pending.len(),
            pending,
            timer: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Current x of the sweep front. Negative during the initial wait.
    pub fn front(&self) -> i32 {
        (self.timer - WAIT_BEFORE_SWEEP) * 2
    }

    /// Cells queued at creation.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Cells not yet removed.
    pub fn pending(&self) -> &[Position] {
        &self.pending
    }

    /// Advance one tick. Returns true once the sweep has finished and every cell is gone.
    pub fn advance(&mut self, grid: &mut Grid) -> bool {
        self.timer += 1;
        let front = self.front();

        self.pending.retain(|pos| {
            if pos.x >= front {
                return true;
            }
            let spread = (MAX_LINGER - (front - pos.x)).max(0) as u32;
            if self.rng.random_range(0..=spread) == 0 {
                grid.set(pos.x, pos.y, Cell::Empty);
                false
            } else {
                true
            }
        });

        if front > grid.width() + MAX_LINGER {
            for pos in self.pending.drain(..) {
                grid.set(pos.x, pos.y, Cell::Empty);
            }
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_from_rows;
    use crate::scan::scan;

    fn run_to_end(sweep: &mut ClearSweep, grid: &mut Grid) -> usize {
        let mut ticks = 1;
        while !sweep.advance(grid) {
            ticks += 1;
            assert!(ticks < 1_000, "sweep never finished");
        }
        ticks
    }

    #[test]
    fn test_sweep_removes_every_region_cell_and_nothing_else() {
        let mut grid = grid_from_rows(&["2.....", "111111", "222222"]);
        let regions = scan(&mut grid);
        assert_eq!(regions.len(), 2);
        let mut sweep = ClearSweep::new(&regions, 5);
        assert_eq!(sweep.total(), 12);

        run_to_end(&mut sweep, &mut grid);
        assert!(sweep.pending().is_empty());
        assert_eq!(grid.to_string(), "2.....\n......\n......\n");
    }

    #[test]
    fn test_nothing_removed_before_front_arrives() {
        let mut grid = grid_from_rows(&["1111111111"]);
        let regions = scan(&mut grid);
        let mut sweep = ClearSweep::new(&regions, 1);
        for _ in 0..WAIT_BEFORE_SWEEP {
            assert!(!sweep.advance(&mut grid));
        }
        assert_eq!(sweep.front(), 0);
        assert_eq!(grid.occupied_count(), 10);
    }

    #[test]
    fn test_cells_far_behind_front_are_certainly_removed() {
        let mut grid = grid_from_rows(&["1111111111"]);
        let regions = scan(&mut grid);
        let mut sweep = ClearSweep::new(&regions, 3);
        // Front at 18: column 0 is 18 behind, past the linger distance.
        for _ in 0..WAIT_BEFORE_SWEEP + 9 {
            sweep.advance(&mut grid);
        }
        assert!(grid.is_free(0, 0));
        assert!(grid.is_free(1, 0));
    }

    #[test]
    fn test_finish_time_depends_on_width_only() {
        let mut grid = grid_from_rows(&["1111", "...."]);
        let regions = scan(&mut grid);
        let ticks = run_to_end(&mut ClearSweep::new(&regions, 0), &mut grid);
        // Front passes 4 + 16 at timer 21.
        assert_eq!(ticks, 21);
    }

    #[test]
    fn test_same_seed_same_order() {
        let rows = ["1111111111", "1111111111"];
        let snapshot = |seed| {
            let mut grid = grid_from_rows(&rows);
            let regions = scan(&mut grid);
            let mut sweep = ClearSweep::new(&regions, seed);
            for _ in 0..WAIT_BEFORE_SWEEP + 4 {
                sweep.advance(&mut grid);
            }
            grid.to_string()
        };
        assert_eq!(snapshot(11), snapshot(11));
    }
}
