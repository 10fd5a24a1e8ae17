//! Edge-to-edge clear detection: flood fill from the left wall through same-kind sand.

use crate::grid::{Grid, Position};

/// 4-neighbourhood in push order: left, right, up, down.
const NEIGHBOURS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A same-kind cluster that touches both the left and the right wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedRegion {
    pub kind: u8,
    /// Every cell of the cluster, in visit order starting from its left-wall seed.
    pub positions: Vec<Position>,
}

impl ConnectedRegion {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.positions.contains(&Position::new(x, y))
    }
}

/// Find every cluster spanning the board, seeding from the left wall bottom-up.
///
/// Resets the grid's visited marks first; cells are only marked, never removed.
/// A seed row whose wall cell was already reached by an earlier fill is skipped.
pub fn scan(grid: &mut Grid) -> Vec<ConnectedRegion> {
    grid.reset_visited();
    let right_edge = grid.width() - 1;
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for y in (0..grid.height()).rev() {
        let Some(kind) = grid.get(0, y).and_then(|c| c.kind()) else {
            continue;
        };
        if grid.is_visited(0, y) {
            continue;
        }

        grid.mark_visited(0, y);
        stack.push(Position::new(0, y));
        let mut positions = Vec::new();
        let mut connected = false;

        while let Some(pos) = stack.pop() {
            positions.push(pos);
            if pos.x == right_edge {
                connected = true;
            }
            for (dx, dy) in NEIGHBOURS_4 {
                let (nx, ny) = (pos.x + dx, pos.y + dy);
                if grid.is_visited(nx, ny) {
                    continue;
                }
                if grid.get(nx, ny).and_then(|c| c.kind()) == Some(kind) {
                    grid.mark_visited(nx, ny);
                    stack.push(Position::new(nx, ny));
                }
            }
        }

        if connected {
            log::debug!("kind {} spans the board from row {} ({} cells)", kind, y, positions.len());
            regions.push(ConnectedRegion { kind, positions });
        }
    }
    regions
}
