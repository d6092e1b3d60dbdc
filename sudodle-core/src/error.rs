use thiserror::Error;

use crate::grid::Coord;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("grid order N={0} outside the supported range 1..=16")]
    InvalidGridSize(u8),

    #[error("coordinate {at} out of range for N={n}")]
    CoordOutOfRange { n: u8, at: Coord },

    #[error("value {value} out of range 1..={n}")]
    ValueOutOfRange { n: u8, value: u8 },

    #[error("grid rows have unequal lengths")]
    RaggedRows,

    #[error("cell count {got} does not match order {n}")]
    WrongCellCount { n: u8, got: usize },

    #[error("guess and solution have different orders ({guess} vs {solution})")]
    OrderMismatch { guess: u8, solution: u8 },
}
