//! desert-sand: run a seeded autoplay session of the falling-sand puzzle and report it.

use anyhow::{Context, Result};
use clap::Parser;
use desert_sand::{Action, GameConfig, GameEvent, GameSession, Phase, TickInput};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = GameConfig::load(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    args.apply(&mut config);
    config.validate().context("invalid command-line overrides")?;

    let mut session = GameSession::new(&config)?;
    let mut pilot = Autopilot::new(config.seed);
    let mut summary = Summary::default();

    for _ in 0..args.ticks {
        let input = pilot.input(&session);
        for event in session.tick(input) {
            summary.record(event);
            if matches!(event, GameEvent::Spawned(_)) {
                pilot.retarget(session.grid().width());
            }
        }
        if session.is_over() {
            break;
        }
    }

    summary.print(&session);
    if args.dump {
        print!("{}", session.grid());
    }
    Ok(())
}

/// Falling-sand polyomino puzzle, played by a seeded autopilot.
#[derive(Debug, Parser)]
#[command(
    name = "desert-sand",
    version,
    about = "Falling-sand polyomino puzzle. Shapes turn into sand; connect one colour wall to wall to clear it.",
    long_about = "Runs a headless, reproducible session driven by a seeded autopilot and prints a summary.\n\n\
        Settings come from an optional JSON config file; flags override individual fields.\n\
        Set RUST_LOG=debug to trace spawns, freezes and clears."
)]
pub struct Args {
    /// JSON config file. Missing fields use defaults.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board width in tiles.
    #[arg(long, value_name = "TILES")]
    pub width: Option<u16>,

    /// Board height in tiles.
    #[arg(long, value_name = "TILES")]
    pub height: Option<u16>,

    /// Grid pixels per shape cell.
    #[arg(long, value_name = "PX")]
    pub tile_size: Option<u16>,

    /// Seed for shapes, clears and the autopilot.
    #[arg(short, long, value_name = "N")]
    pub seed: Option<u64>,

    /// Starting level (1-based).
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub level: Option<u16>,

    /// Ticks to simulate before stopping.
    #[arg(short, long, default_value = "5000", value_name = "N")]
    pub ticks: u64,

    /// Print the final board.
    #[arg(long)]
    pub dump: bool,
}

impl Args {
    fn apply(&self, config: &mut GameConfig) {
        if let Some(w) = self.width {
            config.width_tiles = w;
        }
        if let Some(h) = self.height {
            config.height_tiles = h;
        }
        if let Some(t) = self.tile_size {
            config.tile_size = t;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        if let Some(l) = self.level {
            config.start_level = usize::from(l - 1);
        }
    }
}

/// Steers each shape towards a random column with a random number of turns, then drops it.
struct Autopilot {
    rng: Pcg32,
    target_x: i32,
    turns: u32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            target_x: 0,
            turns: 0,
        }
    }

    fn retarget(&mut self, width: i32) {
        self.target_x = self.rng.random_range(0..width.max(1));
        self.turns = self.rng.random_range(0..4);
    }

    fn input(&mut self, session: &GameSession) -> TickInput {
        let mut input = TickInput::default();
        let Some(shape) = session.controller().current() else {
            return input;
        };
        if self.turns > 0 {
            self.turns -= 1;
            input.apply(Action::RotateCw);
        }
        let (left, _, right, _) = shape.pixel_bounds(session.controller().tile_size());
        let centre = (left + right) / 2;
        if centre < self.target_x - 1 {
            input.apply(Action::MoveRight);
        } else if centre > self.target_x + 1 {
            input.apply(Action::MoveLeft);
        } else {
            input.apply(Action::SoftDrop);
        }
        input
    }
}

#[derive(Debug, Default)]
struct Summary {
    shapes: u32,
    clears: u32,
    cells_cleared: usize,
    level_ups: u32,
}

impl Summary {
    fn record(&mut self, event: GameEvent) {
        match event {
            GameEvent::Spawned(_) => self.shapes += 1,
            GameEvent::RegionsFound { cells, .. } => self.cells_cleared += cells,
            GameEvent::ClearFinished { .. } => self.clears += 1,
            GameEvent::LevelUp { level } => {
                self.level_ups += 1;
                log::info!("reached level {}", level + 1);
            }
            GameEvent::BoardFull => log::warn!("board full, game over"),
            GameEvent::ShapeFrozen(_) | GameEvent::Completed => {}
        }
    }

    fn print(&self, session: &GameSession) {
        let outcome = match session.phase() {
            Phase::Playing | Phase::Clearing(_) => "stopped",
            Phase::GameOver => "game over",
            Phase::Completed => "completed",
        };
        let stats = session.stats();
        println!("outcome:   {outcome}");
        println!("ticks:     {}", stats.ticks);
        println!("score:     {}", stats.score);
        println!("level:     {}", session.level_index() + 1);
        println!("clears:    {} ({} cells, {} level-ups)", self.clears, self.cells_cleared, self.level_ups);
        println!("shapes:    {}", self.shapes);
        println!("sand:      {} grains", session.grid().occupied_count());
    }
}
