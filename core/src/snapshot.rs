use serde::{Deserialize, Serialize};

use crate::*;

/// Detached, read-only copy of everything a renderer may show.
///
/// While the game is active only the visible board is carried. Once it is over the mine layout comes along so the
/// renderer can show where the mines were.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: Board<PlayerCellState>,
    pub total_mines: CellCount,
    pub mines_left: isize,
    pub unknowns_left: CellCount,
    pub state: GameState,
    pub triggered_mine: Option<Coord2>,
    pub mine_layout: Option<Board<bool>>,
}

impl Snapshot {
    pub fn from_game(game: &Game) -> Self {
        Self {
            cells: game.visible().clone(),
            total_mines: game.total_mines(),
            mines_left: game.mines_left(),
            unknowns_left: game.unknowns_left(),
            state: game.state(),
            triggered_mine: game.triggered_mine(),
            mine_layout: game
                .secret_if_finished()
                .map(|secret| secret.map(MineOrCount::is_mine)),
        }
    }

    pub fn size(&self) -> Coord2 {
        self.cells.size()
    }

    /// Whether a mine sits at `coords`; always `false` while the game is active.
    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout
            .as_ref()
            .is_some_and(|layout| layout.get(coords).unwrap_or(false))
    }
}

impl From<&Game> for Snapshot {
    fn from(game: &Game) -> Self {
        Self::from_game(game)
    }
}
