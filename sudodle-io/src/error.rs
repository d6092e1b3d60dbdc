use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Core(#[from] sudodle_core::CoreError),

    #[error("malformed tile list: {0:?}")]
    MalformedTileList(String),

    #[error("compacted puzzle is empty")]
    EmptyCompactPuzzle,

    #[error("grid size {0} cannot be compacted to a single digit")]
    UncompactableGridSize(u8),

    #[error("compacted puzzle has invalid grid-size character {0:?}")]
    InvalidGridSizeChar(char),

    #[error("compacted puzzle payload has odd length")]
    OddPayloadLength,

    #[error("invalid hex digit {0:?} in compacted puzzle")]
    InvalidHexDigit(char),

    #[error("cell index {index} out of range for N={n}")]
    CellIndexOutOfRange { n: u8, index: usize },

    #[error("catalog header is missing the {0:?} column")]
    MissingColumn(&'static str),

    #[error("catalog has no header line")]
    MissingHeader,
}
