use smallvec::SmallVec;

use crate::*;

pub type CoordList = SmallVec<[Coord2; 8]>;

/// Unknown and flagged cells around one revealed cell of the visible board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Neighborhood {
    pub unknown: CoordList,
    pub flagged: u8,
}

impl Neighborhood {
    pub fn of(board: &Board<PlayerCellState>, coords: Coord2) -> Self {
        let mut hood = Self::default();
        for (pos, cell) in board.neighbors(coords) {
            match cell {
                PlayerCellState::Unknown => hood.unknown.push(pos),
                PlayerCellState::Flagged => hood.flagged += 1,
                _ => {}
            }
        }
        hood
    }

    /// Mines still to be found among the unknown neighbors of a cell showing `count`.
    pub fn remaining(&self, count: u8) -> i16 {
        i16::from(count) - i16::from(self.flagged)
    }

    pub fn is_subset_of(&self, other: &[Coord2]) -> bool {
        self.unknown.iter().all(|pos| other.contains(pos))
    }
}

/// Revealed cells around `coords` that show a nonzero count.
pub fn clue_neighbors(board: &Board<PlayerCellState>, coords: Coord2) -> SmallVec<[(Coord2, u8); 8]> {
    board
        .neighbors(coords)
        .into_iter()
        .filter_map(|(pos, cell)| cell.clue().map(|count| (pos, count)))
        .collect()
}
