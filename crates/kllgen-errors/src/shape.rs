//! Structural mismatch errors.

use crate::common::ErrorSeverity;

/// Shape error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Display map row with a different column count
    #[error("Display map row {row} has {actual} columns, expected {expected}")]
    DisplayRow {
        /// Row index
        row: usize,
        /// Column count of row 0
        expected: usize,
        /// Column count of this row
        actual: usize,
    },

    /// Wrong number of capability arguments
    #[error("'{symbol}' passes {actual} argument(s) to '{capability}' which declares {expected}")]
    ArgumentCount {
        /// Offending symbol
        symbol: String,
        /// Capability name
        capability: String,
        /// Declared argument count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// Encoded argument bytes differ from the declared width
    #[error("'{symbol}' encodes {actual} argument byte(s) for '{capability}' which declares {expected}")]
    ArgumentWidth {
        /// Offending symbol
        symbol: String,
        /// Capability name
        capability: String,
        /// Declared width in bytes
        expected: usize,
        /// Encoded width in bytes
        actual: usize,
    },

    /// Two pixels share one channel
    #[error("Channel {channel} (buffer {buffer}, offset {offset}) is used by pixel {first} and pixel {second}")]
    DuplicateChannel {
        /// Global channel index
        channel: u32,
        /// Buffer id
        buffer: usize,
        /// Offset inside the buffer
        offset: u32,
        /// First pixel id
        first: u16,
        /// Second pixel id
        second: u16,
    },

    /// Explicit buffer base disagrees with the cumulative layout
    #[error("Pixel buffer {buffer} declares base {declared} but the cumulative base is {computed}")]
    BufferBase {
        /// Buffer id
        buffer: usize,
        /// Base given by the configuration
        declared: u32,
        /// Base computed from preceding lengths
        computed: u32,
    },

    /// A trigger or result combo without elements
    #[error("'{symbol}' has an empty combo at step {step}")]
    EmptyCombo {
        /// Offending symbol
        symbol: String,
        /// Step index
        step: usize,
    },

    /// Change-op payload of the wrong width
    #[error("'{symbol}' carries {actual} payload byte(s), the frame format requires {expected}")]
    Payload {
        /// Offending symbol
        symbol: String,
        /// Required width
        expected: usize,
        /// Supplied width
        actual: usize,
    },

    /// Name declared twice within one symbol kind
    #[error("Duplicate {kind} '{name}'")]
    Duplicate {
        /// Symbol kind
        kind: String,
        /// Symbol name
        name: String,
    },

    /// Interconnect offsets that decrease
    #[error("Interconnect offset for board {board} ({offset}) is below the previous offset ({previous})")]
    InterconnectOrder {
        /// Board id
        board: usize,
        /// Offset of this board
        offset: u16,
        /// Offset of the previous board
        previous: u16,
    },

    /// Frame stream that does not end in exactly one End byte
    #[error("Frame '{frame}' is not terminated by a single End sentinel")]
    FrameTermination {
        /// Frame symbol
        frame: String,
    },

    /// Indices that are not contiguous from zero
    #[error("{kind} indices are not contiguous: expected {expected}, found {found}")]
    IndexGap {
        /// Symbol kind
        kind: String,
        /// Expected next index
        expected: usize,
        /// Index found
        found: usize,
    },
}

impl ShapeError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Display map row with the wrong column count.
    pub fn display_row(row: usize, expected: usize, actual: usize) -> Self {
        ShapeError::DisplayRow {
            row,
            expected,
            actual,
        }
    }

    /// Duplicate symbol within one kind.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        ShapeError::Duplicate {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Payload width mismatch.
    pub fn payload(symbol: impl Into<String>, expected: usize, actual: usize) -> Self {
        ShapeError::Payload {
            symbol: symbol.into(),
            expected,
            actual,
        }
    }
}
