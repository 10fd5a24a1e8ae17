//! Grid: fixed-size pixel buffer of sand cells. y=0 is the top (spawn side).
//!
//! Every accessor is bounds-checked. Shapes and grains probe one cell past the
//! border all the time, so off-grid reads return `None` and off-grid writes do nothing.

use crate::palette::Rgb;
use std::fmt;

/// A grid coordinate. Signed so probes past the left/top border are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One settled particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grain {
    /// Colour class used for connectivity matching.
    pub kind: u8,
    /// Display colour, copied in at freeze time.
    pub color: Rgb,
}

/// Single cell: either empty or sand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Sand(Grain),
}

impl Cell {
    pub fn sand(kind: u8, color: Rgb) -> Self {
        Self::Sand(Grain { kind, color })
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Sand(_))
    }

    /// Colour class, or `None` for an empty cell.
    #[inline]
    pub fn kind(&self) -> Option<u8> {
        match self {
            Self::Empty => None,
            Self::Sand(g) => Some(g.kind),
        }
    }
}

/// The sand buffer. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major cells (y * width + x).
    cells: Vec<Cell>,
    /// Scan-only flags, parallel to `cells`.
    visited: Vec<bool>,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width: i32::from(width),
            height: i32::from(height),
            cells: vec![Cell::Empty; len],
            visited: vec![false; len],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid_position(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// On the grid and holding sand.
    #[inline]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|c| c.is_occupied())
    }

    /// On the grid and empty.
    #[inline]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(Cell::Empty)
    }

    /// Empty every cell and drop all scan marks.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
        self.visited.fill(false);
    }

    /// Drop scan marks, leaving sand untouched.
    pub fn reset_visited(&mut self) {
        self.visited.fill(false);
    }

    #[inline]
    pub fn is_visited(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.visited[i])
    }

    #[inline]
    pub fn mark_visited(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.visited[i] = true;
        }
    }

    /// Topmost row holding sand, or `height` on an empty board.
    pub fn highest_point(&self) -> i32 {
        self.cells
            .iter()
            .position(Cell::is_occupied)
            .map_or(self.height, |i| i as i32 / self.width)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Every grain with its position, row by row from the top.
    pub fn iter_sand(&self) -> impl Iterator<Item = (Position, Grain)> + '_ {
        let w = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, c)| match c {
            Cell::Sand(g) => Some((Position::new(i as i32 % w, i as i32 / w), *g)),
            Cell::Empty => None,
        })
    }
}

/// One text line per row: `.` for empty, the kind digit (base 36) for sand.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for cell in row {
                let ch = match cell.kind() {
                    None => '.',
                    Some(k) => char::from_digit(u32::from(k) % 36, 36).unwrap_or('#'),
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build a grid from text rows, as printed by `Display`. Test helper.
#[cfg(test)]
pub(crate) fn grid_from_rows(rows: &[&str]) -> Grid {
    let height = rows.len() as u16;
    let width = rows.first().map_or(0, |r| r.len()) as u16;
    let mut grid = Grid::new(width, height);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), width as usize, "ragged row {y}");
        for (x, ch) in row.chars().enumerate() {
            if let Some(k) = ch.to_digit(36) {
                grid.set(x as i32, y as i32, Cell::sand(k as u8, Rgb::default()));
            }
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_sentinel_and_noop() {
        let mut grid = Grid::new(4, 3);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.get(0, -1), None);

        grid.set(-1, 0, Cell::sand(1, Rgb::default()));
        grid.set(4, 2, Cell::sand(1, Rgb::default()));
        assert_eq!(grid.occupied_count(), 0);
        assert!(!grid.is_occupied(-1, 0));
        assert!(!grid.is_free(-1, 0));
    }

    #[test]
    fn test_set_then_get() {
        let mut grid = Grid::new(4, 3);
        let cell = Cell::sand(2, Rgb(1, 2, 3));
        grid.set(3, 2, cell);
        assert_eq!(grid.get(3, 2), Some(cell));
        assert_eq!(grid.get(3, 2).and_then(|c| c.kind()), Some(2));
        assert!(grid.is_occupied(3, 2));
        assert!(grid.is_free(2, 2));
    }

    #[test]
    fn test_reset_visited_keeps_sand() {
        let mut grid = grid_from_rows(&["1.", ".2"]);
        grid.mark_visited(0, 0);
        grid.mark_visited(1, 1);
        assert!(grid.is_visited(0, 0));
        grid.reset_visited();
        assert!(!grid.is_visited(0, 0));
        assert!(!grid.is_visited(1, 1));
        assert_eq!(grid.occupied_count(), 2);

        grid.mark_visited(0, 0);
        grid.reset();
        assert_eq!(grid.occupied_count(), 0);
        assert!(!grid.is_visited(0, 0));
    }

    #[test]
    fn test_highest_point() {
        assert_eq!(Grid::new(3, 5).highest_point(), 5);
        let grid = grid_from_rows(&["...", "...", ".1.", "111"]);
        assert_eq!(grid.highest_point(), 2);
    }

    #[test]
    fn test_display_round_trips_rows() {
        let rows = ["..1", ".23", "444"];
        let grid = grid_from_rows(&rows);
        assert_eq!(grid.to_string(), "..1\n.23\n444\n");
        let sand: Vec<_> = grid.iter_sand().map(|(p, g)| (p.x, p.y, g.kind)).collect();
        assert_eq!(sand[0], (2, 0, 1));
        assert_eq!(sand.len(), 6);
    }
}
