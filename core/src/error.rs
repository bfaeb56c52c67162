use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell state does not satisfy the operation precondition")]
    InvalidState,
    #[error("Board cannot be made playable")]
    Unresolvable,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board width and height must be at least 1")]
    InvalidSize,
    #[error("At least one color is required")]
    NoColors,
    #[error("Tier thresholds must satisfy 1 <= a <= b <= c")]
    InvalidTiers,
    #[error("Palette has fewer colors than the level requests")]
    PaletteTooSmall,
}

pub type Result<T> = core::result::Result<T, BoardError>;
