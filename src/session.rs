//! One play session: owns the board and the falling shape, and advances both per tick.

use crate::clearing::ClearSweep;
use crate::config::{ConfigError, GameConfig};
use crate::controller::{MoveOutcome, ShapeController, ShapeGenerator};
use crate::grid::Grid;
use crate::input::TickInput;
use crate::levels::{LEVELS, Level, is_last};
use crate::palette::Palette;
use crate::scan::scan;
use crate::shapes::ShapeKind;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Ticks a combo stays alive after a clear.
pub const COMBO_TICKS: u32 = 120;

/// Score for a clear made while `combo` earlier clears are still chained.
pub fn clear_points(combo: u32) -> u64 {
    3u64.saturating_pow(combo).saturating_mul(100)
}

#[derive(Debug, Clone)]
pub enum Phase {
    Playing,
    /// A region is being swept away; the simulation is paused.
    Clearing(ClearSweep),
    GameOver,
    /// The last level was finished.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned(ShapeKind),
    ShapeFrozen(ShapeKind),
    RegionsFound { regions: usize, cells: usize },
    ClearFinished { points: u64 },
    LevelUp { level: usize },
    BoardFull,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Carried across levels; reset by `restart`.
    pub score: u64,
    /// Clears in the current level.
    pub clears: u32,
    pub combo: u32,
    pub combo_timer: u32,
    pub ticks: u64,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    controller: ShapeController,
    palette: Palette,
    tile_size: u16,
    sand_interval: u32,
    since_sand: u32,
    level: usize,
    stats: Stats,
    phase: Phase,
    rng: Pcg32,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.palette()?;
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let level = config.start_level;
        let generator = ShapeGenerator::new(rng.random(), LEVELS[level].max_colors);
        let grid = Grid::new(
            config.width_tiles * config.tile_size,
            config.height_tiles * config.tile_size,
        );
        log::info!(
            "new session: {}x{} grid, tile {}, level {}, seed {}",
            grid.width(),
            grid.height(),
            config.tile_size,
            level + 1,
            config.seed
        );
        Ok(Self {
            grid,
            controller: ShapeController::new(config.tile_size, palette, generator),
            palette,
            tile_size: config.tile_size,
            sand_interval: config.sand_interval,
            since_sand: 0,
            level,
            stats: Stats::default(),
            phase: Phase::Playing,
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn controller(&self) -> &ShapeController {
        &self.controller
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn level(&self) -> &'static Level {
        &LEVELS[self.level]
    }

    /// Game over or completed: further ticks do nothing until `restart`.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver | Phase::Completed)
    }

    /// New round at the current level with the score zeroed.
    pub fn restart(&mut self) {
        self.stats = Stats::default();
        self.start_round();
    }

    /// Empty board, fresh shape queue for the current level's colours.
    fn start_round(&mut self) {
        self.grid.reset();
        let generator = ShapeGenerator::new(self.rng.random(), self.level().max_colors);
        self.controller = ShapeController::new(self.tile_size, self.palette, generator);
        self.since_sand = 0;
        self.stats.clears = 0;
        self.stats.combo = 0;
        self.stats.combo_timer = 0;
        self.phase = Phase::Playing;
        log::info!("round started at level {}", self.level + 1);
    }

    pub fn tick(&mut self, input: TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_over() {
            return events;
        }
        self.stats.ticks += 1;

        if let Phase::Clearing(sweep) = &mut self.phase {
            if sweep.advance(&mut self.grid) {
                let cells = sweep.total();
                self.finish_clear(&mut events);
                log::debug!("sweep removed {cells} cells");
            }
            return events;
        }

        if !self.controller.is_falling() {
            let kind = self.controller.next().kind;
            if self.controller.spawn(&mut self.grid).is_err() {
                self.phase = Phase::GameOver;
                events.push(GameEvent::BoardFull);
                return events;
            }
            events.push(GameEvent::Spawned(kind));
        }

        let (dx, dy) = input.displacement(self.level());
        if let MoveOutcome::Landed(shape) = self.controller.move_by(&mut self.grid, dx, dy) {
            events.push(GameEvent::ShapeFrozen(shape.kind));
        } else if let Some(dir) = input.rotate {
            self.controller.rotate(&self.grid, dir);
        }

        self.since_sand += 1;
        if self.since_sand >= self.sand_interval {
            self.grid.step();
            self.since_sand = 0;
        }

        let regions = scan(&mut self.grid);
        if !regions.is_empty() {
            let cells = regions.iter().map(|r| r.len()).sum();
            log::info!("{} region(s) span the board, {cells} cells", regions.len());
            events.push(GameEvent::RegionsFound {
                regions: regions.len(),
                cells,
            });
            self.phase = Phase::Clearing(ClearSweep::new(&regions, self.rng.random()));
        }

        if self.stats.combo_timer > 0 {
            self.stats.combo_timer -= 1;
        } else {
            self.stats.combo = 0;
        }
        events
    }

    /// Score the finished sweep, then advance the level if its quota is met.
    fn finish_clear(&mut self, events: &mut Vec<GameEvent>) {
        let points = clear_points(self.stats.combo);
        self.stats.score += points;
        self.stats.clears += 1;
        self.stats.combo += 1;
        self.stats.combo_timer = COMBO_TICKS;
        self.phase = Phase::Playing;
        log::info!(
            "clear scored {points} (combo {}, {}/{} clears)",
            self.stats.combo,
            self.stats.clears,
            self.level().required_clears
        );
        events.push(GameEvent::ClearFinished { points });

        if self.stats.clears < self.level().required_clears {
            return;
        }
        if is_last(self.level) {
            log::info!("final level finished with score {}", self.stats.score);
            self.phase = Phase::Completed;
            events.push(GameEvent::Completed);
        } else {
            self.level += 1;
            self.start_round();
            events.push(GameEvent::LevelUp { level: self.level });
        }
    }
}
