use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use layouts::*;
pub use neighborhood::*;
pub use risk::*;
pub use rules::*;

use crate::*;

mod layouts;
mod neighborhood;
mod risk;
mod rules;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Rules in priority order; a pass restarts from the first one after any of them fires.
    pub rules: Vec<Rule>,
    /// Safety cap on rule passes over a whole solve, derived from the board size when `None`.
    pub max_passes: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rules: Rule::DEFAULT_ORDER.to_vec(),
            max_passes: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Flag,
    Open,
    /// Open picked by the risk estimate rather than proven safe.
    Guess,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub coords: Coord2,
    pub kind: MoveKind,
    pub rule: Option<Rule>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    Solved,
    Detonated { at: Coord2 },
    /// Deductions ran dry and no unknown cell borders a clue.
    NoMove,
    PassLimit,
}

impl SolveOutcome {
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Solved)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub outcome: SolveOutcome,
    pub moves: Vec<Move>,
    pub passes: usize,
    pub guesses: usize,
}

/// Plays a [`Game`] to the end: rule passes until nothing fires, then one risk-based guess, and again.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs rule passes until a fixpoint or the end of the game, never guessing.
    pub fn deduce(&self, game: &mut Game) -> Result<Vec<Move>> {
        let mut session = Session::new(game, self.max_passes(game));
        self.run_to_fixpoint(&mut session)?;
        Ok(session.moves)
    }

    pub fn solve(&self, game: &mut Game) -> Result<SolveReport> {
        let mut session = Session::new(game, self.max_passes(game));

        let outcome = loop {
            if !self.run_to_fixpoint(&mut session)? {
                log::warn!("Gave up after {} passes", session.passes);
                break SolveOutcome::PassLimit;
            }

            match session.game.state() {
                GameState::Won => break SolveOutcome::Solved,
                GameState::Lost => {
                    let at = session.game.triggered_mine().unwrap_or(session.game.start());
                    break SolveOutcome::Detonated { at };
                }
                GameState::Active => {}
            }

            let Some(guess) = safest_cell(session.game.visible()) else {
                break SolveOutcome::NoMove;
            };
            log::info!(
                "No deduction left, guessing {:?} at estimated risk {:.3}",
                guess.coords,
                guess.probability
            );
            session.guesses += 1;
            session.open(guess.coords, MoveKind::Guess, None)?;
        };

        log::info!(
            "{:?} after {} moves, {} passes and {} guesses",
            outcome,
            session.moves.len(),
            session.passes,
            session.guesses
        );
        Ok(SolveReport {
            outcome,
            moves: session.moves,
            passes: session.passes,
            guesses: session.guesses,
        })
    }

    fn max_passes(&self, game: &Game) -> usize {
        // every productive pass or guess changes at least one cell
        self.config
            .max_passes
            .unwrap_or_else(|| 2 * usize::from(game.visible().total_cells()) + 2)
    }

    /// Returns `false` when the pass cap was hit first.
    fn run_to_fixpoint(&self, session: &mut Session) -> Result<bool> {
        'passes: loop {
            if session.game.is_finished() {
                return Ok(true);
            }
            if session.passes >= session.max_passes {
                return Ok(false);
            }
            session.passes += 1;

            for &rule in &self.config.rules {
                if session.sweep(rule)? {
                    continue 'passes;
                }
            }
            return Ok(true);
        }
    }
}

/// Mutable state of one solve: the game being played and the moves made on it.
struct Session<'a> {
    game: &'a mut Game,
    moves: Vec<Move>,
    passes: usize,
    max_passes: usize,
    guesses: usize,
}

impl<'a> Session<'a> {
    fn new(game: &'a mut Game, max_passes: usize) -> Self {
        Self {
            game,
            moves: Vec::new(),
            passes: 0,
            max_passes,
            guesses: 0,
        }
    }

    /// Applies `rule` across the board once, returning whether it changed anything.
    fn sweep(&mut self, rule: Rule) -> Result<bool> {
        if rule.is_global() {
            let deduction =
                rule.deduce_global(self.game.visible(), self.game.mines_left(), self.game.unknowns_left());
            return match deduction {
                Some(deduction) => self.apply(deduction),
                None => Ok(false),
            };
        }

        let mut fired = false;
        for coords in self.game.visible().coords() {
            if self.game.is_finished() {
                break;
            }
            let Some(count) = self.game.cell_at(coords).clue() else {
                continue;
            };
            if let Some(deduction) = rule.deduce(self.game.visible(), coords, count) {
                fired |= self.apply(deduction)?;
            }
        }
        Ok(fired)
    }

    fn apply(&mut self, deduction: Deduction) -> Result<bool> {
        log::debug!(
            "{:?}: mines {:?}, safe {:?}",
            deduction.rule,
            deduction.mines,
            deduction.safe
        );
        let mut changed = false;
        for coords in deduction.mines {
            changed |= self.flag(coords, deduction.rule)?;
        }
        for coords in deduction.safe {
            changed |= self.open(coords, MoveKind::Open, Some(deduction.rule))?;
        }
        Ok(changed)
    }

    fn flag(&mut self, coords: Coord2, rule: Rule) -> Result<bool> {
        if self.game.is_finished() {
            return Ok(false);
        }
        let outcome = self.game.mark(coords)?;
        if outcome.has_update() {
            self.moves.push(Move {
                coords,
                kind: MoveKind::Flag,
                rule: Some(rule),
            });
        }
        Ok(outcome.has_update())
    }

    fn open(&mut self, coords: Coord2, kind: MoveKind, rule: Option<Rule>) -> Result<bool> {
        if self.game.is_finished() {
            return Ok(false);
        }
        let outcome = self.game.open(coords)?;
        if outcome.has_update() {
            self.moves.push(Move { coords, kind, rule });
        }
        Ok(outcome.has_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trusting(size: Coord2, mines: &[Coord2], start: Coord2) -> Game {
        Game::from_mines(size, mines, start, FlagPolicy::Trusting).unwrap()
    }

    fn only(rules: &[Rule]) -> Solver {
        Solver::new(SolverConfig {
            rules: rules.to_vec(),
            max_passes: None,
        })
    }

    #[test]
    fn single_row_is_solved_by_force_mark() {
        let mut game = trusting((4, 1), &[(3, 0)], (0, 0));

        let report = Solver::default().solve(&mut game).unwrap();

        assert_eq!(report.outcome, SolveOutcome::Solved);
        assert_eq!(
            report.moves,
            [Move {
                coords: (3, 0),
                kind: MoveKind::Flag,
                rule: Some(Rule::ForceMark),
            }]
        );
        assert_eq!(report.guesses, 0);
        assert!(game.is_solved());
    }

    #[test]
    fn force_open_alone_stalls_before_the_flag() {
        let mut game = trusting((4, 1), &[(3, 0)], (0, 0));

        let moves = only(&[Rule::ForceOpen]).deduce(&mut game).unwrap();

        assert!(moves.is_empty());
        assert_eq!(game.cell_at((3, 0)), PlayerCellState::Unknown);
        assert_eq!(game.state(), GameState::Active);
    }

    #[test]
    fn endgame_flags_everything_left() {
        // two isolated mines in the far corner behind a wall of numbers
        let mut game = trusting((5, 5), &[(4, 4), (3, 4)], (0, 0));
        let unknown_before = game.unknowns_left();
        assert_eq!(game.mines_left(), unknown_before as isize);

        let moves = only(&[Rule::Endgame]).deduce(&mut game).unwrap();

        assert_eq!(game.state(), GameState::Won);
        assert!(moves.iter().all(|m| m.kind == MoveKind::Flag && m.rule == Some(Rule::Endgame)));
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn subset_reduction_opens_in_game() {
        // ```
        //   .  M  .
        //   1  1  1
        // ```
        let mut game = trusting((3, 2), &[(1, 0)], (0, 1));
        game.open((1, 1)).unwrap();
        game.open((2, 1)).unwrap();

        let moves = only(&[Rule::SubsetReduction]).deduce(&mut game).unwrap();

        assert_eq!(
            moves.first(),
            Some(&Move {
                coords: (2, 0),
                kind: MoveKind::Open,
                rule: Some(Rule::SubsetReduction),
            })
        );
        assert_eq!(game.cell_at((2, 0)), PlayerCellState::Revealed(1));
    }

    #[test]
    fn deductions_only_flag_mines() {
        let config = GameConfig::intermediate();
        for seed in 0..20 {
            let minefield = RandomMinefieldGenerator::new(seed).generate(&config).unwrap();
            let secret = minefield.secret().clone();
            let mut game = Game::from_minefield(minefield, FlagPolicy::Trusting).unwrap();

            Solver::default().deduce(&mut game).unwrap();

            assert_ne!(game.state(), GameState::Lost, "seed {seed}");
            for (coords, cell) in game.visible().iter() {
                match cell {
                    PlayerCellState::Flagged => assert!(secret[coords].is_mine(), "seed {seed}, {coords:?}"),
                    PlayerCellState::Revealed(count) => assert_eq!(secret[coords], MineOrCount::Count(count)),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn same_seed_same_moves() {
        let config = GameConfig::expert();
        let play = |seed| {
            let mut game = Game::new(&config, RandomMinefieldGenerator::new(seed)).unwrap();
            Solver::default().solve(&mut game).unwrap()
        };

        for seed in [1, 2, 3] {
            assert_eq!(play(seed), play(seed));
        }
    }

    #[test]
    fn full_games_end_in_a_terminal_outcome() {
        for seed in 0..10 {
            let mut game = Game::new(&GameConfig::beginner(), RandomMinefieldGenerator::new(seed)).unwrap();

            let report = Solver::default().solve(&mut game).unwrap();

            match report.outcome {
                SolveOutcome::Solved => assert!(game.is_solved()),
                SolveOutcome::Detonated { at } => {
                    assert_eq!(game.cell_at(at), PlayerCellState::Exploded);
                    assert_eq!(report.moves.last().map(|m| m.kind), Some(MoveKind::Guess));
                }
                SolveOutcome::NoMove => assert_eq!(game.state(), GameState::Active),
                SolveOutcome::PassLimit => panic!("seed {seed} hit the pass cap"),
            }
        }
    }

    #[test]
    fn pass_cap_stops_the_loop() {
        let mut game = trusting((4, 1), &[(3, 0)], (0, 0));
        let solver = Solver::new(SolverConfig {
            max_passes: Some(0),
            ..SolverConfig::default()
        });

        let report = solver.solve(&mut game).unwrap();

        assert_eq!(report.outcome, SolveOutcome::PassLimit);
        assert!(report.moves.is_empty());
    }

    #[test]
    fn unreachable_unknowns_mean_no_move() {
        // ```
        //   0  1  M  .  .  .  M
        // ```
        // once the first mine is flagged no clue borders the cells behind it
        let mut game = trusting((7, 1), &[(2, 0), (6, 0)], (0, 0));

        let report = Solver::default().solve(&mut game).unwrap();

        assert_eq!(report.outcome, SolveOutcome::NoMove);
        assert_eq!(report.moves.len(), 1);
        assert_eq!(game.cell_at((2, 0)), PlayerCellState::Flagged);
        assert_eq!(game.state(), GameState::Active);
    }

    #[test]
    fn start_on_a_mine_reports_detonation() {
        let mut game = trusting((5, 1), &[(4, 0)], (4, 0));
        assert_eq!(game.state(), GameState::Lost);

        let report = Solver::default().solve(&mut game).unwrap();

        assert_eq!(report.outcome, SolveOutcome::Detonated { at: (4, 0) });
        assert!(report.moves.is_empty());
    }
}
