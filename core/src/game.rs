use alloc::collections::VecDeque;
use core::num::Saturating;
use core::ops::BitOr;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    /// Number of cells newly revealed, the flood fill included.
    Revealed(CellCount),
    Exploded,
    Won,
}

impl OpenOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merges outcomes when several cells are opened in one go.
impl BitOr for OpenOutcome {
    type Output = OpenOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use OpenOutcome::*;
        match (self, rhs) {
            (Exploded, _) | (_, Exploded) => Exploded,
            (Won, _) | (_, Won) => Won,
            (Revealed(a), Revealed(b)) => Revealed(a.saturating_add(b)),
            (Revealed(a), NoChange) | (NoChange, Revealed(a)) => Revealed(a),
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Won,
    /// Only under [`FlagPolicy::Validating`]: the flagged cell was safe and the game is lost.
    WrongFlag,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// A game in progress: the secret board it was generated with and what the player has uncovered so far.
///
/// Both boards are owned here and never handed out mutably. The secret board is fixed at construction, the visible
/// board only changes through [`Game::open`] and [`Game::mark`], and neither accepts moves once the game is over.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    secret: Board<MineOrCount>,
    visible: Board<PlayerCellState>,
    total_mines: CellCount,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    start: Coord2,
    flag_policy: FlagPolicy,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Game {
    /// Generates a fresh board and opens its start cell.
    pub fn new(config: &GameConfig, generator: impl MinefieldGenerator) -> Result<Self> {
        let minefield = generator.generate(config)?;
        Self::from_minefield(minefield, config.flag_policy)
    }

    /// Game over a fixed mine layout, opened at `start`.
    pub fn from_mines(
        size: Coord2,
        mines: &[Coord2],
        start: Coord2,
        flag_policy: FlagPolicy,
    ) -> Result<Self> {
        let minefield = Minefield::from_mine_coords(size, mines, start)?;
        Self::from_minefield(minefield, flag_policy)
    }

    pub fn from_minefield(minefield: Minefield, flag_policy: FlagPolicy) -> Result<Self> {
        let total_mines = minefield.mine_count();
        let (secret, start) = minefield.into_parts();
        let visible = Board::filled(secret.size(), PlayerCellState::Unknown)?;
        let mut game = Self {
            secret,
            visible,
            total_mines,
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            start,
            flag_policy,
            state: GameState::Active,
            triggered_mine: None,
        };
        game.open(start)?;
        Ok(game)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.visible.size()
    }

    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn flag_policy(&self) -> FlagPolicy {
        self.flag_policy
    }

    pub fn total_mines(&self) -> CellCount {
        self.total_mines
    }

    /// Mines not yet flagged; negative once more flags than mines were placed.
    pub fn mines_left(&self) -> isize {
        (self.total_mines as isize) - (self.flagged_count.0 as isize)
    }

    /// Cells neither revealed nor flagged.
    pub fn unknowns_left(&self) -> CellCount {
        self.visible.total_cells() - self.revealed_count.0 - self.flagged_count.0
    }

    pub fn cell_at(&self, coords: Coord2) -> PlayerCellState {
        self.visible[coords]
    }

    /// Read-only view of the player-visible board.
    pub fn visible(&self) -> &Board<PlayerCellState> {
        &self.visible
    }

    /// The secret board, but only once there is nothing left to play.
    pub fn secret_if_finished(&self) -> Option<&Board<MineOrCount>> {
        self.state.is_finished().then_some(&self.secret)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn is_solved(&self) -> bool {
        self.mines_left() == 0 && self.unknowns_left() == 0
    }

    /// Opens an unknown cell, flooding through connected zero-count cells.
    pub fn open(&mut self, coords: Coord2) -> Result<OpenOutcome> {
        let coords = self.visible.validate_coords(coords)?;
        self.check_active()?;

        if !self.visible[coords].is_unknown() {
            return Ok(OpenOutcome::NoChange);
        }

        if self.secret[coords].is_mine() {
            self.detonate(coords);
            return Ok(OpenOutcome::Exploded);
        }

        let opened = self.flood_reveal(coords);
        Ok(if self.check_solved() {
            OpenOutcome::Won
        } else {
            OpenOutcome::Revealed(opened)
        })
    }

    /// Flags an unknown cell as a mine.
    pub fn mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.visible.validate_coords(coords)?;
        self.check_active()?;

        if !self.visible[coords].is_unknown() {
            return Ok(MarkOutcome::NoChange);
        }

        if matches!(self.flag_policy, FlagPolicy::Validating) && !self.secret[coords].is_mine() {
            log::info!("Flag at {:?} holds no mine", coords);
            self.detonate(coords);
            return Ok(MarkOutcome::WrongFlag);
        }

        self.visible[coords] = PlayerCellState::Flagged;
        self.flagged_count += 1;
        Ok(if self.check_solved() {
            MarkOutcome::Won
        } else {
            MarkOutcome::Flagged
        })
    }

    /// Reveals `origin` and keeps going through every zero-count cell it reaches, returning how many cells were
    /// revealed. Uses a work list, so region size never affects stack depth.
    fn flood_reveal(&mut self, origin: Coord2) -> CellCount {
        use PlayerCellState::*;

        let mut opened: CellCount = 0;
        let mut to_visit = VecDeque::from([origin]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !self.visible[visit_coords].is_unknown() {
                continue;
            }
            let MineOrCount::Count(count) = self.secret[visit_coords] else {
                continue;
            };

            self.visible[visit_coords] = Revealed(count);
            opened += 1;
            log::trace!("Opened {:?}, mine count: {}", visit_coords, count);

            if count == 0 {
                to_visit.extend(
                    self.visible
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.visible[pos].is_unknown()),
                );
            }
        }

        self.revealed_count += opened;
        opened
    }

    fn check_solved(&mut self) -> bool {
        if self.is_solved() {
            log::debug!("All mines flagged and all safe cells revealed");
            self.state = GameState::Won;
            true
        } else {
            false
        }
    }

    fn detonate(&mut self, coords: Coord2) {
        self.visible[coords] = PlayerCellState::Exploded;
        self.triggered_mine = Some(coords);
        self.state = GameState::Lost;
        log::debug!("Detonated at {:?}", coords);
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, mines: &[Coord2], start: Coord2) -> Game {
        Game::from_mines(size, mines, start, FlagPolicy::Trusting).unwrap()
    }

    #[test]
    fn row_opening_stops_at_numbered_border() {
        let game = game((4, 1), &[(3, 0)], (0, 0));

        assert_eq!(game.cell_at((0, 0)), PlayerCellState::Revealed(0));
        assert_eq!(game.cell_at((1, 0)), PlayerCellState::Revealed(0));
        assert_eq!(game.cell_at((2, 0)), PlayerCellState::Revealed(1));
        assert_eq!(game.cell_at((3, 0)), PlayerCellState::Unknown);
        assert_eq!(game.unknowns_left(), 1);
        assert_eq!(game.mines_left(), 1);
        assert_eq!(game.state(), GameState::Active);
    }

    #[test]
    fn flagging_last_mine_wins() {
        let mut game = game((4, 1), &[(3, 0)], (0, 0));

        assert_eq!(game.mark((3, 0)), Ok(MarkOutcome::Won));
        assert!(game.is_solved());
        assert_eq!(game.state(), GameState::Won);
        assert_eq!(game.mark((3, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn opening_a_mine_is_a_loss() {
        let mut game = game((5, 5), &[(4, 4), (4, 3)], (0, 0));

        assert_eq!(game.open((4, 4)), Ok(OpenOutcome::Exploded));
        assert_eq!(game.cell_at((4, 4)), PlayerCellState::Exploded);
        assert_eq!(game.triggered_mine(), Some((4, 4)));
        assert_eq!(game.state(), GameState::Lost);
        assert!(game.secret_if_finished().is_some());
        assert_eq!(game.open((0, 4)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn all_safe_cells_revealed_still_needs_flags() {
        let mut game = game((3, 3), &[(2, 2)], (0, 0));

        assert_eq!(game.unknowns_left(), 1);
        assert_eq!(game.state(), GameState::Active);
        assert!(game.secret_if_finished().is_none());
        assert_eq!(game.mark((2, 2)), Ok(MarkOutcome::Won));
    }

    #[test]
    fn flood_fill_covers_zero_region_and_border_only() {
        let mines = [(0, 4), (4, 0), (2, 2)];
        let game = game((5, 5), &mines, (0, 0));
        let secret = game.secret.clone();

        for (coords, cell) in game.visible().iter() {
            match cell {
                PlayerCellState::Revealed(count) => {
                    assert_eq!(secret[coords], MineOrCount::Count(count));
                }
                PlayerCellState::Unknown => {}
                other => panic!("unexpected {other:?} at {coords:?}"),
            }
            if cell == PlayerCellState::Revealed(0) {
                for pos in game.visible().iter_neighbors(coords) {
                    assert!(!game.cell_at(pos).is_unknown(), "{pos:?} next to zero {coords:?}");
                }
            }
        }
        assert_eq!(game.cell_at((1, 1)), PlayerCellState::Revealed(1));
        assert_eq!(game.cell_at((2, 2)), PlayerCellState::Unknown);
        assert_eq!(game.cell_at((4, 4)), PlayerCellState::Unknown);
    }

    #[test]
    fn open_on_revealed_or_flagged_is_no_change() {
        let mut game = game((4, 1), &[(3, 0)], (0, 0));

        assert_eq!(game.open((1, 0)), Ok(OpenOutcome::NoChange));
        assert_eq!(game.mark((1, 0)), Ok(MarkOutcome::NoChange));
        assert_eq!(game.open((4, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn trusting_policy_accepts_wrong_flag() {
        let mut game = game((6, 1), &[(5, 0), (2, 0)], (0, 0));

        assert_eq!(game.cell_at((1, 0)), PlayerCellState::Revealed(1));
        assert_eq!(game.mark((3, 0)), Ok(MarkOutcome::Flagged));
        assert_eq!(game.mines_left(), 1);
        assert_eq!(game.unknowns_left(), 3);
        assert_eq!(game.state(), GameState::Active);
    }

    #[test]
    fn validating_policy_rejects_wrong_flag() {
        let mut game = Game::from_mines((6, 1), &[(5, 0), (2, 0)], (0, 0), FlagPolicy::Validating).unwrap();

        assert_eq!(game.mark((2, 0)), Ok(MarkOutcome::Flagged));
        assert_eq!(game.mark((3, 0)), Ok(MarkOutcome::WrongFlag));
        assert_eq!(game.cell_at((3, 0)), PlayerCellState::Exploded);
        assert_eq!(game.state(), GameState::Lost);
    }

    #[test]
    fn outcomes_merge_by_priority() {
        use OpenOutcome::*;

        assert_eq!(Revealed(2) | Revealed(3), Revealed(5));
        assert_eq!(NoChange | Revealed(1), Revealed(1));
        assert_eq!(Won | Revealed(1), Won);
        assert_eq!(Won | Exploded, Exploded);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
