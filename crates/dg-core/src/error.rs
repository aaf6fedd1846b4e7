//! Error types for configuration and floor generation

use thiserror::Error;

use crate::layout::Side;

/// Problems with a generator configuration, reported before any packing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cell size catalog is empty")]
    EmptyCatalog,

    #[error("Cell size {width}x{height} has a zero dimension")]
    ZeroSizedCell { width: u32, height: u32 },

    #[error("Cell size {width}x{height} exceeds the maximum wall length of {max}")]
    CellTooLarge { width: u32, height: u32, max: u32 },

    #[error("Invalid {axis} range {start}-{end}")]
    InvalidRange {
        axis: &'static str,
        start: u32,
        end: u32,
    },

    #[error("No cell size fits within a {width}x{height} grid")]
    NoFittingCell { width: u32, height: u32 },

    #[error("Attempt limit must be at least 1")]
    NoAttempts,
}

/// Failures of a single generation run or of the retry loop
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Start point ({x}, {y}) is not covered by any cell")]
    StartUncovered { x: u32, y: u32 },

    #[error("End point ({x}, {y}) is not covered by any cell")]
    EndUncovered { x: u32, y: u32 },

    #[error("End cell {end} is unreachable from start cell {start}")]
    Unreachable { start: usize, end: usize },

    #[error("Cells {a} and {b} do not share a wall")]
    NotAdjacent { a: usize, b: usize },

    #[error("Generation failed after {attempts} attempts, last error: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Whether a fresh seed could make this failure go away
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::StartUncovered { .. }
                | GenerationError::EndUncovered { .. }
                | GenerationError::Unreachable { .. }
        )
    }
}

/// A floor, or part of one, that breaks the shape a generated floor has
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FloorError {
    #[error("Door mask of length {len} exceeds the maximum wall length of {max}")]
    MaskTooLong { len: u32, max: u32 },

    #[error("Door mask of length {len} has openings past its end (bits {bits:#x})")]
    MaskBitsPastEnd { len: u32, bits: u64 },

    #[error("Floor has no cells")]
    NoCells,

    #[error("Cell {cell} does not fit within the {width}x{height} grid")]
    CellOutOfBounds { cell: usize, width: u32, height: u32 },

    #[error("Cell {cell} {side} wall has {found} units, expected {expected}")]
    WallLength {
        cell: usize,
        side: Side,
        expected: u32,
        found: u32,
    },

    #[error("{what} refers to cell {index} of {count}")]
    BadIndex {
        what: &'static str,
        index: usize,
        count: usize,
    },
}
