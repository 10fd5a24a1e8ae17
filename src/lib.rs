//! Desert Sand: falling-sand polyomino puzzle core. Shapes dissolve into sand on landing;
//! a same-colour path of sand touching both walls is swept away.

pub mod clearing;
pub mod config;
pub mod controller;
pub mod grid;
pub mod input;
pub mod levels;
pub mod palette;
pub mod sand;
pub mod scan;
pub mod session;
pub mod shapes;

pub use config::{ConfigError, GameConfig};
pub use controller::{BoardFull, FallingShape, RotationDir, ShapeController, ShapeGenerator};
pub use grid::{Cell, Grid, Position};
pub use input::{Action, TickInput};
pub use scan::{ConnectedRegion, scan};
pub use session::{GameEvent, GameSession, Phase, Stats};
