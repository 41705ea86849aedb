use serde::{Deserialize, Serialize};

use super::neighborhood::Neighborhood;
use crate::*;

/// Lower bound on the chance that `coords` holds a mine.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskEstimate {
    pub coords: Coord2,
    pub probability: f64,
}

/// Per-cell mine probability estimate of every unknown cell next to a clue. Higher means more dangerous.
///
/// A clue showing `count` with `flagged` flags and `unknown` unknown neighbors puts each of them at
/// `(count - flagged) / unknown`; a cell touching several clues keeps the smallest of those. Cells with no clue next
/// to them stay `None`.
pub fn estimate_risks(board: &Board<PlayerCellState>) -> Board<Option<f64>> {
    let mut risks = board.map(|_| None);

    for (coords, cell) in board.iter() {
        let Some(count) = cell.clue() else {
            continue;
        };
        let hood = Neighborhood::of(board, coords);
        if hood.unknown.is_empty() {
            continue;
        }

        let local = (f64::from(hood.remaining(count)) / hood.unknown.len() as f64).clamp(0.0, 1.0);
        for &pos in &hood.unknown {
            let risk = &mut risks[pos];
            *risk = Some(risk.map_or(local, |known: f64| known.min(local)));
        }
    }

    risks
}

/// Unknown cell with the lowest estimate, the first in row-major order on ties.
pub fn safest_cell(board: &Board<PlayerCellState>) -> Option<RiskEstimate> {
    estimate_risks(board)
        .iter()
        .filter_map(|(coords, risk)| risk.map(|probability| RiskEstimate { coords, probability }))
        .fold(None, |best: Option<RiskEstimate>, candidate| match best {
            Some(best) if best.probability <= candidate.probability => Some(best),
            _ => Some(candidate),
        })
}
