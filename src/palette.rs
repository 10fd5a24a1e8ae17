//! Sand colours: hex parsing and the per-pixel shading baked into grains at freeze time.

use thiserror::Error;

/// Number of colour classes a level can draw from.
pub const SAND_COLORS: usize = 5;

/// Number of block styles (flat, bevelled, dithered).
pub const BLOCK_STYLES: u8 = 3;

/// A display colour. Purely cosmetic; matching uses the grain kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scale every channel by `percent` / 100, saturating at 255.
    pub fn shade(self, percent: u16) -> Self {
        let f = |c: u8| ((c as u16 * percent) / 100).min(255) as u8;
        Self(f(self.0), f(self.1), f(self.2))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("expected 5 sand colours, got {0}")]
    WrongLength(usize),
}

/// Base colour for each colour class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub sand: [Rgb; SAND_COLORS],
}

impl Default for Palette {
    fn default() -> Self {
        Self::desert()
    }
}

impl Palette {
    /// Warm desert tones.
    pub const fn desert() -> Self {
        Self {
            sand: [
                Rgb(0xE1, 0x6E, 0x33), // orange
                Rgb(0xE5, 0xC0, 0x7B), // dune yellow
                Rgb(0x8B, 0x1C, 0x03), // rust
                Rgb(0x61, 0xAF, 0xEF), // oasis blue
                Rgb(0x98, 0xC3, 0x79), // cactus green
            ],
        }
    }

    /// Build from exactly [`SAND_COLORS`] hex strings (`#RRGGBB` or `#RGB`).
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, PaletteError> {
        if colors.len() != SAND_COLORS {
            return Err(PaletteError::WrongLength(colors.len()));
        }
        let mut sand = [Rgb::default(); SAND_COLORS];
        for (slot, hex) in sand.iter_mut().zip(colors) {
            *slot = parse_hex(hex.as_ref())?;
        }
        Ok(Self { sand })
    }

    /// Colour of the pixel at (`dx`, `dy`) inside one `tile`-sized block.
    ///
    /// Style 0 is flat, style 1 has a lit top-left edge and a shadowed bottom-right edge,
    /// style 2 is a checker dither. Out-of-range colour indices wrap.
    pub fn grain_color(&self, color: u8, style: u8, dx: i32, dy: i32, tile: i32) -> Rgb {
        let base = self.sand[color as usize % SAND_COLORS];
        let last = tile - 1;
        match style % BLOCK_STYLES {
            0 => base,
            1 => {
                if dy == last || dx == last {
                    base.shade(70)
                } else if dy == 0 || dx == 0 {
                    base.shade(125)
                } else {
                    base
                }
            }
            _ => {
                if (dx + dy) % 2 == 0 {
                    base
                } else {
                    base.shade(85)
                }
            }
        }
    }
}

/// Parse hex colour: "#RRGGBB" or "#RGB".
pub fn parse_hex(s: &str) -> Result<Rgb, PaletteError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || PaletteError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match s.len() {
        6 => Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(parse_hex("#E16E33"), Ok(Rgb(0xE1, 0x6E, 0x33)));
    }

    #[test]
    fn test_parse_hex_3() {
        assert_eq!(parse_hex("#FFF"), Ok(Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("#12345"), Err(PaletteError::InvalidHex(_))));
        assert!(matches!(parse_hex("#GGGGGG"), Err(PaletteError::InvalidHex(_))));
    }

    #[test]
    fn test_from_hex_needs_every_colour() {
        assert_eq!(
            Palette::from_hex(&["#000", "#fff"]),
            Err(PaletteError::WrongLength(2))
        );
        let p = Palette::from_hex(&["#000", "#111", "#222", "#333", "#444"]).unwrap();
        assert_eq!(p.sand[4], Rgb(0x44, 0x44, 0x44));
    }

    #[test]
    fn test_bevel_style_shades_edges() {
        let p = Palette::desert();
        let base = p.sand[0];
        assert_eq!(p.grain_color(0, 1, 3, 3, 8), base);
        assert_eq!(p.grain_color(0, 1, 7, 3, 8), base.shade(70));
        assert_eq!(p.grain_color(0, 1, 0, 3, 8), base.shade(125));
        assert_eq!(p.grain_color(0, 0, 7, 7, 8), base);
    }
}
