use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("space out of bounds")]
    InvalidCoords,
    #[error("more mines than the board can hold")]
    TooManyMines,
}

pub type Result<T> = std::result::Result<T, BoardError>;
