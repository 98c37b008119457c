//! Error types shared by the board model, layouts and the state machine.

use thiserror::Error;

/// Failures raised by the board model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A coordinate fell outside the fixed grid.
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        /// Column of the rejected coordinate.
        x: usize,
        /// Row of the rejected coordinate.
        y: usize,
        /// Board width.
        width: usize,
        /// Board height.
        height: usize,
    },
    /// The layout has no rows or no playable cell.
    #[error("layout contains no playable cells")]
    EmptyLayout,
    /// The layout text contained a character that is not a cell symbol.
    #[error("unknown cell symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        /// Zero-based row of the symbol.
        row: usize,
        /// Zero-based column of the symbol.
        column: usize,
        /// Offending character.
        symbol: char,
    },
    /// Serialized rows disagree with the declared width or height.
    #[error("board rows do not match the declared {width}x{height} size")]
    DimensionMismatch {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
    },
}

/// Failures raised while resolving a named layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// No built-in or configured layout carries this name.
    #[error("unknown layout '{0}'")]
    Unknown(String),
    /// The start text could not be parsed.
    #[error("invalid start board for layout '{name}': {source}")]
    InvalidStart {
        /// Layout name.
        name: String,
        /// Underlying parse failure.
        #[source]
        source: BoardError,
    },
    /// The target text could not be parsed.
    #[error("invalid target board for layout '{name}': {source}")]
    InvalidTarget {
        /// Layout name.
        name: String,
        /// Underlying parse failure.
        #[source]
        source: BoardError,
    },
    /// The target pattern has a different footprint than the start board.
    #[error("target board for layout '{0}' does not share the start board's shape")]
    TargetShapeMismatch(String),
}

/// Failures raised by the game state machine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// A restored board cannot replace the live one.
    #[error("loaded board does not match the shape of the current layout")]
    ShapeMismatch,
}
