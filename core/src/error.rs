use thiserror::Error;

/// Reason a board configuration or fixed layout was rejected.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("board has no cells")]
    EmptyBoard,
    #[error("palette is empty")]
    EmptyPalette,
    #[error("palette contains the same symbol twice")]
    DuplicateSymbol,
    #[error("pair matching needs an even number of cells")]
    OddCellCount,
    #[error("palette has too few symbols to fill every pair")]
    PaletteTooSmall,
    #[error("symbols do not fill the declared board size")]
    ShapeMismatch,
    #[error("a symbol does not appear exactly twice")]
    UnpairedSymbol,
    #[error("target symbol is missing from the board")]
    MissingTarget,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board configuration: {0}")]
    InvalidConfig(#[from] ConfigIssue),
    #[error("Coordinates are outside the board")]
    OutOfBounds,
}

pub type Result<T> = core::result::Result<T, GameError>;
