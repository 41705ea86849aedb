use serde::{Deserialize, Serialize};

/// Ground truth stored on the secret board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MineOrCount {
    Mine,
    Count(u8),
}

impl MineOrCount {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for MineOrCount {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// What the player knows about a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCellState {
    Unknown,
    Flagged,
    Revealed(u8),
    Exploded,
}

impl PlayerCellState {
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Adjacent mine count of a revealed cell, `None` for anything else.
    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }

    /// Revealed cells with at least one adjacent mine; the only cells clues come from.
    pub const fn clue(self) -> Option<u8> {
        match self {
            Self::Revealed(count) if count > 0 => Some(count),
            _ => None,
        }
    }
}

impl Default for PlayerCellState {
    fn default() -> Self {
        Self::Unknown
    }
}
