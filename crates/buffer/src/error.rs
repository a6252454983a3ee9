// Chunk: docs/chunks/position_mapping - Offset/position conversion and error types

use thiserror::Error;

/// Failure of a rune read.
///
/// End of document is the ordinary stopping condition; an incomplete
/// sequence means the document's bytes run out in the middle of a
/// multi-byte rune while decoding in reverse, which the caller cannot
/// recover from by reading further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuneError {
    #[error("end of buffer")]
    Eof,
    #[error("incomplete UTF-8 sequence at offset {0}")]
    IncompleteUtf8(usize),
}

/// Failure to convert between byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("offset {0} is past the end of the buffer")]
    OutOfBounds(usize),
    #[error("offset {0} is not on a rune boundary")]
    NotOnRuneBoundary(usize),
    #[error("line {line} has fewer than {column} columns")]
    ColumnPastEndOfLine { line: usize, column: usize },
}
