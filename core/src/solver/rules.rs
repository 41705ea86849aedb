use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::layouts::{apply_layout, forced_layout};
use super::neighborhood::{CoordList, Neighborhood, clue_neighbors};
use crate::*;

/// One category of logical inference over the visible board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Unknown neighbors exactly fill the missing mine count: flag them all.
    ForceMark,
    /// Flags already satisfy the count: open every unknown neighbor.
    ForceOpen,
    /// Neighbors whose unknowns nest inside ours account for all our mines: open the rest.
    SubsetReduction,
    /// Flag cells that hold a mine in every feasible local layout.
    ExactCover,
    /// As many unknown cells left as unflagged mines: flag everything.
    Endgame,
}

impl Rule {
    /// Cheapest and most certain first.
    pub const DEFAULT_ORDER: [Rule; 5] = [
        Rule::ForceMark,
        Rule::ForceOpen,
        Rule::SubsetReduction,
        Rule::ExactCover,
        Rule::Endgame,
    ];

    /// Rules that look at the whole board once per pass instead of at each clue.
    pub const fn is_global(self) -> bool {
        matches!(self, Self::Endgame)
    }

    /// Applies a per-clue rule to the cell at `at` showing `count`.
    pub fn deduce(self, board: &Board<PlayerCellState>, at: Coord2, count: u8) -> Option<Deduction> {
        let hood = Neighborhood::of(board, at);
        if hood.unknown.is_empty() {
            return None;
        }

        let (mines, safe) = match self {
            Self::ForceMark => (force_mark(&hood, count)?, CoordList::new()),
            Self::ForceOpen => (CoordList::new(), force_open(&hood, count)?),
            Self::SubsetReduction => (CoordList::new(), subset_reduction(board, at, &hood, count)?),
            Self::ExactCover => (exact_cover(board, &hood, count)?, CoordList::new()),
            Self::Endgame => return None,
        };
        Some(Deduction {
            rule: self,
            mines,
            safe,
        })
    }

    /// Applies a global rule given the game's counters.
    pub fn deduce_global(
        self,
        board: &Board<PlayerCellState>,
        mines_left: isize,
        unknowns_left: CellCount,
    ) -> Option<Deduction> {
        match self {
            Self::Endgame => endgame(board, mines_left, unknowns_left),
            _ => None,
        }
    }
}

/// Cells a rule proved to be mines or safe.
#[derive(Clone, Debug, PartialEq)]
pub struct Deduction {
    pub rule: Rule,
    pub mines: CoordList,
    pub safe: CoordList,
}

fn force_mark(hood: &Neighborhood, count: u8) -> Option<CoordList> {
    (hood.unknown.len() as i16 == hood.remaining(count)).then(|| hood.unknown.clone())
}

fn force_open(hood: &Neighborhood, count: u8) -> Option<CoordList> {
    (hood.remaining(count) == 0).then(|| hood.unknown.clone())
}

/// Greedy: sharing clues are taken in discovery order, and the first one whose unknowns nest inside ours and avoid
/// those already consumed is used.
fn subset_reduction(
    board: &Board<PlayerCellState>,
    at: Coord2,
    hood: &Neighborhood,
    count: u8,
) -> Option<CoordList> {
    let mut sharing: SmallVec<[(Coord2, u8); 16]> = SmallVec::new();
    for &unknown in &hood.unknown {
        for (clue, clue_count) in clue_neighbors(board, unknown) {
            if clue != at && !sharing.iter().any(|&(seen, _)| seen == clue) {
                sharing.push((clue, clue_count));
            }
        }
    }

    let mut consumed = CoordList::new();
    let mut capacity = hood.remaining(count);

    for (clue, clue_count) in sharing {
        let sub = Neighborhood::of(board, clue);
        if sub.unknown.is_empty()
            || !sub.is_subset_of(&hood.unknown)
            || sub.unknown.iter().any(|pos| consumed.contains(pos))
        {
            continue;
        }

        capacity -= sub.remaining(clue_count);
        consumed.extend(sub.unknown.iter().copied());

        if capacity == 0 {
            let free: CoordList = hood
                .unknown
                .iter()
                .filter(|pos| !consumed.contains(pos))
                .copied()
                .collect();
            return (!free.is_empty()).then_some(free);
        }
    }
    None
}

fn exact_cover(board: &Board<PlayerCellState>, hood: &Neighborhood, count: u8) -> Option<CoordList> {
    let mines = hood.remaining(count);
    // mines == unknowns is force-mark's job, and nothing fits when mines exceed unknowns
    if mines < 0 || mines as usize >= hood.unknown.len() {
        return None;
    }

    let forced = forced_layout(board, &hood.unknown, mines as u32)?;
    (forced != 0).then(|| apply_layout(&hood.unknown, forced).collect())
}

fn endgame(board: &Board<PlayerCellState>, mines_left: isize, unknowns_left: CellCount) -> Option<Deduction> {
    if mines_left <= 0 || mines_left != unknowns_left as isize {
        return None;
    }
    let mines = board
        .iter()
        .filter(|&(_, cell)| cell.is_unknown())
        .map(|(coords, _)| coords)
        .collect();
    Some(Deduction {
        rule: Rule::Endgame,
        mines,
        safe: CoordList::new(),
    })
}
