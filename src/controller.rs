//! Falling shape: spawn, swept movement, rotation with wall correction, freeze into sand.
//!
//! Positions are continuous (sub-pixel) and only touch the grid in floored form. Each
//! bitmap cell covers `tile_size x tile_size` grid pixels.

use crate::grid::{Cell, Grid};
use crate::palette::{BLOCK_STYLES, Palette};
use crate::shapes::{ShapeKind, ShapeRect};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

/// A freshly spawned shape overlapped settled sand. Ends the round, not the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("board full: new shape overlaps settled sand at spawn")]
pub struct BoardFull;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDir {
    Clockwise,
    CounterClockwise,
}

/// Result of [`ShapeController::move_by`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No active shape.
    Idle,
    Falling,
    /// Hit sand or the floor and froze; carries the shape as it was stamped.
    Landed(FallingShape),
}

/// The active polyomino.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingShape {
    pub kind: ShapeKind,
    pub rotation: usize,
    /// Colour class; becomes the grain kind on freeze.
    pub color: u8,
    pub style: u8,
    /// Top-left of the bitmap square, in grid pixels.
    pub x: f32,
    pub y: f32,
}

impl FallingShape {
    pub fn new(kind: ShapeKind, color: u8, style: u8) -> Self {
        Self {
            kind,
            rotation: 0,
            color,
            style,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Discretised top-left.
    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Top-left pixel of every filled tile.
    fn tiles(&self, tile: i32) -> impl Iterator<Item = (i32, i32)> {
        let (ox, oy) = self.origin();
        self.kind
            .filled_cells(self.rotation)
            .map(move |(cx, cy)| (ox + cx * tile, oy + cy * tile))
    }

    /// Tight pixel rectangle of the filled cells as (left, top, right, bottom), right/bottom exclusive.
    pub fn pixel_bounds(&self, tile: i32) -> (i32, i32, i32, i32) {
        let (ox, oy) = self.origin();
        let ShapeRect { x, y, w, h } = self.kind.bounds(self.rotation);
        (
            ox + x * tile,
            oy + y * tile,
            ox + (x + w) * tile,
            oy + (y + h) * tile,
        )
    }

    /// Any filled pixel overlaps sand. Pixels off the grid never collide.
    pub fn collides(&self, grid: &Grid, tile: i32) -> bool {
        self.tiles(tile).any(|(px, py)| {
            (py..py + tile).any(|y| (px..px + tile).any(|x| grid.is_occupied(x, y)))
        })
    }

    /// Whole-pixel shift that brings every filled cell inside `[0, width)`.
    fn wall_shift(&self, grid: &Grid, tile: i32) -> i32 {
        let (left, _, right, _) = self.pixel_bounds(tile);
        if left < 0 {
            -left
        } else if right > grid.width() {
            grid.width() - right
        } else {
            0
        }
    }

    /// How far the filled cells reach below the floor.
    fn floor_overflow(&self, grid: &Grid, tile: i32) -> i32 {
        let (_, _, _, bottom) = self.pixel_bounds(tile);
        (bottom - grid.height()).max(0)
    }

    fn on_floor(&self, grid: &Grid, tile: i32) -> bool {
        self.pixel_bounds(tile).3 >= grid.height()
    }

    /// Tight rectangle pokes outside the grid on any side.
    pub fn is_out_of_bounds(&self, grid: &Grid, tile: i32) -> bool {
        let (left, top, right, bottom) = self.pixel_bounds(tile);
        left < 0 || top < 0 || right > grid.width() || bottom > grid.height()
    }

    /// Write one grain per filled pixel; pixels off the grid are dropped.
    pub fn stamp(&self, grid: &mut Grid, tile: i32, palette: &Palette) {
        for (px, py) in self.tiles(tile) {
            for dy in 0..tile {
                for dx in 0..tile {
                    let color = palette.grain_color(self.color, self.style, dx, dy, tile);
                    grid.set(px + dx, py + dy, Cell::sand(self.color, color));
                }
            }
        }
    }
}

/// Seeded source of new shapes: uniform kind, colour below the level's limit, any style.
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: Pcg32,
    max_colors: u8,
}

impl ShapeGenerator {
    pub fn new(seed: u64, max_colors: u8) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            max_colors: max_colors.max(1),
        }
    }

    pub fn next_shape(&mut self) -> FallingShape {
        let kind = ShapeKind::ALL[self.rng.random_range(0..ShapeKind::ALL.len())];
        let color = self.rng.random_range(0..self.max_colors);
        let style = self.rng.random_range(0..BLOCK_STYLES);
        FallingShape::new(kind, color, style)
    }
}

/// Owns the active shape and the one-deep "next" queue.
#[derive(Debug, Clone)]
pub struct ShapeController {
    tile_size: i32,
    palette: Palette,
    generator: ShapeGenerator,
    current: Option<FallingShape>,
    next: FallingShape,
}

impl ShapeController {
    pub fn new(tile_size: u16, palette: Palette, mut generator: ShapeGenerator) -> Self {
        let next = generator.next_shape();
        Self {
            tile_size: i32::from(tile_size.max(1)),
            palette,
            generator,
            current: None,
            next,
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn current(&self) -> Option<&FallingShape> {
        self.current.as_ref()
    }

    pub fn next(&self) -> &FallingShape {
        &self.next
    }

    pub fn is_falling(&self) -> bool {
        self.current.is_some()
    }

    /// Replace the active shape as-is, without spawn placement.
    pub fn set_current(&mut self, shape: FallingShape) {
        self.current = Some(shape);
    }

    /// Promote the queued shape, centred horizontally with its top row on row 0.
    ///
    /// If it overlaps sand it is frozen in place and `BoardFull` is returned.
    pub fn spawn(&mut self, grid: &mut Grid) -> Result<(), BoardFull> {
        let upcoming = self.generator.next_shape();
        let mut shape = std::mem::replace(&mut self.next, upcoming);
        let rect = shape.kind.bounds(shape.rotation);
        let tile = self.tile_size as f32;
        shape.x = (grid.width() / 2) as f32 - (rect.x as f32 + rect.w as f32 / 2.0) * tile;
        shape.y = (-rect.y * self.tile_size) as f32;
        shape.x += shape.wall_shift(grid, self.tile_size) as f32;
        self.current = Some(shape);

        if shape.collides(grid, self.tile_size) {
            log::warn!("spawn blocked for {:?} at ({}, {})", shape.kind, shape.x, shape.y);
            self.freeze(grid);
            return Err(BoardFull);
        }
        log::debug!("spawned {:?} colour {} at ({}, {})", shape.kind, shape.color, shape.x, shape.y);
        Ok(())
    }

    /// Move by a continuous displacement, one pixel at a time per axis (x first).
    ///
    /// Each increment is clamped to the walls/floor and collision-checked; the first
    /// colliding increment is undone and ends that axis. Reaching the floor or hitting
    /// sand while moving down freezes the shape. A displacement longer than the grid on
    /// its axis is cut to the grid's extent.
    pub fn move_by(&mut self, grid: &mut Grid, dx: f32, dy: f32) -> MoveOutcome {
        let Some(mut shape) = self.current else {
            return MoveOutcome::Idle;
        };
        let tile = self.tile_size;

        let (w, h) = (grid.width() as f32, grid.height() as f32);
        let dx = dx.clamp(-w, w);
        for i in 0..dx.abs().ceil() as u32 {
            let d = (dx.abs() - i as f32).min(1.0);
            let before = shape.x;
            shape.x += d.copysign(dx);
            let shift = shape.wall_shift(grid, tile);
            shape.x += shift as f32;
            if shape.collides(grid, tile) {
                shape.x = before;
                break;
            }
            if shift != 0 {
                break;
            }
        }

        let mut landed = false;
        let dy = dy.clamp(-h, h);
        for i in 0..dy.abs().ceil() as u32 {
            let d = (dy.abs() - i as f32).min(1.0);
            let before = shape.y;
            shape.y += d.copysign(dy);
            shape.y -= shape.floor_overflow(grid, tile) as f32;
            if shape.collides(grid, tile) {
                shape.y = before;
                landed = dy > 0.0;
                break;
            }
            if dy > 0.0 && shape.on_floor(grid, tile) {
                landed = true;
                break;
            }
        }

        self.current = Some(shape);
        if landed {
            self.freeze(grid);
            MoveOutcome::Landed(shape)
        } else {
            MoveOutcome::Falling
        }
    }

    /// Step the rotation state; keep it only if the new orientation fits.
    ///
    /// A colliding orientation is rejected outright. Otherwise the shape is nudged
    /// sideways back inside the walls, and rejected if it then collides or pokes
    /// through the floor. Returns whether the rotation was kept.
    pub fn rotate(&mut self, grid: &Grid, dir: RotationDir) -> bool {
        let Some(mut shape) = self.current else {
            return false;
        };
        let count = shape.kind.rotation_count();
        if count < 2 {
            return false;
        }
        let tile = self.tile_size;
        shape.rotation = match dir {
            RotationDir::Clockwise => (shape.rotation + 1) % count,
            RotationDir::CounterClockwise => (shape.rotation + count - 1) % count,
        };
        if shape.collides(grid, tile) {
            return false;
        }
        shape.x += shape.wall_shift(grid, tile) as f32;
        if shape.collides(grid, tile) || shape.floor_overflow(grid, tile) > 0 {
            return false;
        }
        self.current = Some(shape);
        true
    }

    pub fn is_colliding(&self, grid: &Grid) -> bool {
        self.current
            .is_some_and(|s| s.collides(grid, self.tile_size))
    }

    pub fn is_shape_invalid(&self, grid: &Grid) -> bool {
        self.current
            .is_some_and(|s| s.is_out_of_bounds(grid, self.tile_size))
    }

    /// Stamp the active shape into the grid as sand and clear it.
    pub fn freeze(&mut self, grid: &mut Grid) -> Option<FallingShape> {
        let shape = self.current.take()?;
        shape.stamp(grid, self.tile_size, &self.palette);
        log::debug!("froze {:?} at {:?}", shape.kind, shape.origin());
        Some(shape)
    }
}
