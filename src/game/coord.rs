//! Board coordinates and diamond-arena geometry.

use serde::{Deserialize, Serialize};

/// Width and height of the arena bounding box.
pub const ARENA_SIZE: u8 = 28;

/// Half of the arena; rows `0..HALF_ARENA` belong to us.
pub const HALF_ARENA: u8 = ARENA_SIZE / 2;

/// Highest x (or y) still considered on our side of the midline.
pub const MIDLINE: u8 = HALF_ARENA - 1;

/// A cell on the board.
///
/// Serialized as a two-element `[x, y]` array, which is how the game host
/// writes locations in frames and submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct Coord {
    /// X coordinate (column).
    pub x: u8,
    /// Y coordinate (row, 0 is our back edge).
    pub y: u8,
}

impl From<[u8; 2]> for Coord {
    fn from([x, y]: [u8; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for [u8; 2] {
    fn from(coord: Coord) -> Self {
        [coord.x, coord.y]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether the cell lies inside the diamond-shaped arena.
    #[must_use]
    pub const fn in_arena(self) -> bool {
        if self.x >= ARENA_SIZE || self.y >= ARENA_SIZE {
            return false;
        }
        // Each row widens by one cell per side until the midline, then narrows.
        let (start, end) = if self.y < HALF_ARENA {
            (MIDLINE - self.y, HALF_ARENA + self.y)
        } else {
            (self.y - HALF_ARENA, ARENA_SIZE + MIDLINE - self.y)
        };
        self.x >= start && self.x <= end
    }

    /// Whether the cell is on the left half of the board (`x <= 13`).
    #[must_use]
    pub const fn is_left_half(self) -> bool {
        self.x <= MIDLINE
    }

    /// Whether the cell is in our half of the board (`y <= 13`).
    #[must_use]
    pub const fn is_own_half(self) -> bool {
        self.y <= MIDLINE
    }

    /// Whether the cell is in the quadrant our left flank defends.
    ///
    /// Both components must be at or below the midline.
    #[must_use]
    pub const fn in_defended_quadrant(self) -> bool {
        self.x <= MIDLINE && self.y <= MIDLINE
    }

    /// Whether mobile units of ours may enter the board here.
    #[must_use]
    pub const fn is_own_edge(self) -> bool {
        if !self.is_own_half() {
            return false;
        }
        let bottom_left = self.x <= MIDLINE && self.x + self.y == MIDLINE;
        let bottom_right = self.x >= self.y && self.x - self.y == HALF_ARENA;
        bottom_left || bottom_right
    }
}
