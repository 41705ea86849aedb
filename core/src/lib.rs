#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use snapshot::*;
pub use solver::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod game;
mod generator;
mod snapshot;
mod solver;
mod types;

/// Cells the guaranteed-safe opening may need: the start cell and its eight neighbors.
pub const SAFE_OPENING_CELLS: CellCount = 9;

/// How the game treats a flag placed on a cell that holds no mine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagPolicy {
    /// Every flag is accepted; a wrong flag only shows up when the game cannot be finished.
    #[default]
    Trusting,
    /// A flag on a safe cell ends the game as a loss.
    Validating,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    #[serde(default)]
    pub flag_policy: FlagPolicy,
}

impl GameConfig {
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self {
            size,
            mines,
            flag_policy: FlagPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self {
            size: (9, 9),
            mines: 10,
            flag_policy: FlagPolicy::Trusting,
        }
    }

    pub const fn intermediate() -> Self {
        Self {
            size: (16, 16),
            mines: 40,
            flag_policy: FlagPolicy::Trusting,
        }
    }

    pub const fn expert() -> Self {
        Self {
            size: (30, 16),
            mines: 99,
            flag_policy: FlagPolicy::Trusting,
        }
    }

    pub const fn with_flag_policy(self, flag_policy: FlagPolicy) -> Self {
        Self {
            flag_policy,
            ..self
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Largest mine count that still leaves a free cell outside the safe opening.
    pub const fn max_mines(&self) -> CellCount {
        self.total_cells().saturating_sub(SAFE_OPENING_CELLS + 1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        let max = self.max_mines();
        if self.mines > max || self.total_cells() <= SAFE_OPENING_CELLS {
            return Err(GameError::TooManyMines {
                mines: self.mines,
                max,
            });
        }
        Ok(())
    }
}
