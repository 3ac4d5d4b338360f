use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board needs at least one row and one column")]
    InvalidSize,
    #[error("Board needs at least one bomb")]
    NoBombs,
    #[error("Too many bombs, at least one cell must stay safe")]
    TooManyBombs,
    #[error("Bomb layout does not fit the board config")]
    LayoutMismatch,
}

pub type Result<T> = core::result::Result<T, GameError>;
