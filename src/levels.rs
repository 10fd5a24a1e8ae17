//! Level table: speeds, colour count and clears needed to advance.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    /// Pixels per tick the shape falls (doubled while soft dropping).
    pub fall_speed: f32,
    /// Pixels per tick the shape slides while left or right is held.
    pub horizontal_speed: f32,
    /// Colour classes new shapes draw from.
    pub max_colors: u8,
    /// Clears needed to finish the level.
    pub required_clears: u32,
}

pub const LEVELS: [Level; 6] = [
    Level { fall_speed: 1.0, horizontal_speed: 2.0, max_colors: 2, required_clears: 2 },
    Level { fall_speed: 1.2, horizontal_speed: 2.1, max_colors: 3, required_clears: 8 },
    Level { fall_speed: 1.5, horizontal_speed: 2.2, max_colors: 4, required_clears: 12 },
    Level { fall_speed: 2.0, horizontal_speed: 2.4, max_colors: 4, required_clears: 16 },
    Level { fall_speed: 2.4, horizontal_speed: 2.5, max_colors: 4, required_clears: 24 },
    Level { fall_speed: 3.0, horizontal_speed: 2.6, max_colors: 5, required_clears: 32 },
];

/// Level at `index`, or `None` past the last one.
pub fn level(index: usize) -> Option<&'static Level> {
    LEVELS.get(index)
}

pub fn is_last(index: usize) -> bool {
    index + 1 >= LEVELS.len()
}
