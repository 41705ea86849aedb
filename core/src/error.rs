use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board width and height must be positive")]
    InvalidSize,
    #[error("Too many mines: requested {mines}, at most {max} leave room for a safe opening")]
    TooManyMines { mines: CellCount, max: CellCount },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
