//! Static terrain cells and the per-cell flag set.
use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Boolean states carried by tiles, features, items, and actors.
    ///
    /// `LIT` and `VISIBLE` are transient and rebuilt from scratch on every
    /// lighting pass. `SEEN` is monotonic: once set it is never cleared.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Flag: u8 {
        /// Can be moved over.
        const CROSSABLE    = 1 << 0;
        /// Illuminated by a light source this turn.
        const LIT          = 1 << 1;
        /// Inside the player's field of view this turn.
        const VISIBLE      = 1 << 2;
        /// Has been visible at least once.
        const SEEN         = 1 << 3;
        /// Stops light and sight.
        const BLOCKS_LIGHT = 1 << 4;
        /// Marks an item that turns its cell non-crossable (e.g. a corpse).
        const BLOCKING     = 1 << 5;
    }
}

impl Flag {
    /// Flags rebuilt by every lighting pass.
    pub const TRANSIENT: Self = Self::LIT.union(Self::VISIBLE);
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Flag::CROSSABLE, "Crossable"),
            (Flag::LIT, "Lit"),
            (Flag::VISIBLE, "Visible"),
            (Flag::SEEN, "Seen"),
            (Flag::BLOCKS_LIGHT, "BlocksLight"),
            (Flag::BLOCKING, "Blocking"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            write!(f, "<Flag None>")
        } else {
            write!(f, "<Flag {}>", names.join("|"))
        }
    }
}

/// Terminal palette used for glyphs. Rendering is outside the core; this is
/// only the logical color a renderer maps to its backend.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// A single grid cell's static terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    glyph: char,
    color: Color,
    flags: Flag,
}

impl Tile {
    /// Sentinel returned for out-of-bounds reads.
    pub const INVALID: Tile = Tile {
        glyph: ' ',
        color: Color::Black,
        flags: Flag::BLOCKS_LIGHT,
    };

    pub const fn new(glyph: char, color: Color, flags: Flag) -> Self {
        Self {
            glyph,
            color,
            flags,
        }
    }

    pub const fn floor() -> Self {
        Self::new('.', Color::White, Flag::CROSSABLE)
    }

    pub const fn wall() -> Self {
        Self::new('#', Color::Yellow, Flag::BLOCKS_LIGHT)
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn flags(&self) -> Flag {
        self.flags
    }

    pub fn crossable(&self) -> bool {
        self.flags.contains(Flag::CROSSABLE)
    }

    pub fn lit(&self) -> bool {
        self.flags.contains(Flag::LIT)
    }

    pub fn visible(&self) -> bool {
        self.flags.contains(Flag::VISIBLE)
    }

    pub fn seen(&self) -> bool {
        self.flags.contains(Flag::SEEN)
    }

    pub fn blocks_light(&self) -> bool {
        self.flags.contains(Flag::BLOCKS_LIGHT)
    }

    pub(crate) fn set(&mut self, flag: Flag) {
        self.flags |= flag;
    }

    pub(crate) fn clear(&mut self, flag: Flag) {
        self.flags &= !flag;
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Tile c:{} flags:{}>", self.glyph, self.flags)
    }
}
