use autosweep_core::*;

const RESET: &str = "\x1b[0m";
const MARKER: &str = "\x1b[1;39m";
const ZERO: &str = "\x1b[1;30m";
const HIDDEN: &str = "\x1b[1;37m";
const BOOM: &str = "\x1b[0;31m";
const COUNT_COLORS: [&str; 8] = [
    "\x1b[1;34m",
    "\x1b[1;32m",
    "\x1b[0;31m",
    "\x1b[1;33m",
    "\x1b[1;35m",
    "\x1b[1;36m",
    "\x1b[1;30m",
    "\x1b[1;37m",
];

const FLAG: char = '\u{2691}';
const MINE: char = '\u{2623}';

/// Draws a [`Snapshot`] as rows of space-separated glyphs.
#[derive(Copy, Clone, Debug)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn board(&self, snapshot: &Snapshot) -> String {
        let width = snapshot.size().0;
        let mut out = String::new();

        for (coords, cell) in snapshot.cells.iter() {
            let (glyph, color) = glyph(snapshot, coords, cell);
            if self.color {
                out.push_str(color);
                out.push(glyph);
                out.push_str(RESET);
            } else {
                out.push(glyph);
            }
            out.push(if coords.0 + 1 == width { '\n' } else { ' ' });
        }
        out
    }

    pub fn summary(&self, snapshot: &Snapshot) -> String {
        format!(
            "cells: {}/{}, mines: {}/{}",
            snapshot.unknowns_left,
            snapshot.cells.total_cells(),
            snapshot.mines_left,
            snapshot.total_mines
        )
    }
}

fn glyph(snapshot: &Snapshot, coords: Coord2, cell: PlayerCellState) -> (char, &'static str) {
    match cell {
        PlayerCellState::Unknown if snapshot.has_mine_at(coords) => (MINE, MARKER),
        PlayerCellState::Unknown => ('?', HIDDEN),
        PlayerCellState::Flagged => (FLAG, MARKER),
        PlayerCellState::Exploded => (MINE, BOOM),
        PlayerCellState::Revealed(0) => ('0', ZERO),
        PlayerCellState::Revealed(count) => {
            let digit = char::from(b'0' + count);
            let color = COUNT_COLORS
                .get(usize::from(count) - 1)
                .copied()
                .unwrap_or(HIDDEN);
            (digit, color)
        }
    }
}

pub fn describe(outcome: SolveOutcome, passes: usize) -> String {
    match outcome {
        SolveOutcome::Solved => "Solved!".to_owned(),
        SolveOutcome::Detonated { at: (x, y) } => format!("Boom at ({x}, {y})"),
        SolveOutcome::NoMove => "Stuck: no unknown cell borders a clue".to_owned(),
        SolveOutcome::PassLimit => format!("Gave up after {passes} passes"),
    }
}
