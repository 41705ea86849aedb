use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: &GameConfig) -> Result<Minefield>;
}

/// Secret board plus the cell the game opens first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    secret: Board<MineOrCount>,
    mine_count: CellCount,
    start: Coord2,
}

impl Minefield {
    /// Builds the secret board from an explicit list of mine coordinates.
    ///
    /// The start cell is not required to be safe, a game started on a mine is lost immediately.
    pub fn from_mine_coords(size: Coord2, mines: &[Coord2], start: Coord2) -> Result<Self> {
        let mut mask = Board::filled(size, false)?;
        for &coords in mines {
            mask.set(coords, true)?;
        }
        mask.validate_coords(start)?;
        Ok(Self::from_mine_mask(&mask, start))
    }

    pub(crate) fn from_mine_mask(mask: &Board<bool>, start: Coord2) -> Self {
        let secret = mask.map_indexed(|coords, is_mine| {
            if is_mine {
                MineOrCount::Mine
            } else {
                MineOrCount::Count(mask.count_neighbors(coords, |is_mine| is_mine))
            }
        });
        Self {
            mine_count: mask.count(|is_mine| is_mine),
            secret,
            start,
        }
    }

    pub fn secret(&self) -> &Board<MineOrCount> {
        &self.secret
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub(crate) fn into_parts(self) -> (Board<MineOrCount>, Coord2) {
        (self.secret, self.start)
    }
}
