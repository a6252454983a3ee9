// Chunk: docs/chunks/piece_table - Append-only store and linked piece list

//! seam-buffer: a piece-table text buffer for the seam editor.
//!
//! The document is stored Oberon-style: an append-only byte store plus a
//! circular list of pieces describing the document as a concatenation of
//! store ranges. Edits splice pieces instead of moving bytes, so inserts
//! and deletes cost O(pieces touched) regardless of document size, and
//! every byte ever written keeps its store index for the life of the
//! buffer.
//!
//! # Overview
//!
//! The main type is [`TextBuffer`], which provides:
//! - Byte-offset insertion and deletion with observer broadcast
//! - Line lookups backed by a single-slot memo
//! - Offset ↔ line/column conversion (1-indexed, rune columns)
//! - [`Reader`]: a seekable, bidirectional, UTF-8 aware cursor
//! - [`Marker`]: a stable position that adjusts itself under edits
//!
//! # Example
//!
//! ```
//! use seam_buffer::TextBuffer;
//!
//! let mut buffer = TextBuffer::new();
//! buffer.insert(0, b"Hello\nWorld\n");
//! assert_eq!(buffer.line_count(), 3);
//! assert_eq!(buffer.line_start(2), 6);
//!
//! let cursor = buffer.new_marker(6);
//! buffer.insert(0, b"> ");
//! assert_eq!(cursor.offset(), 8);
//!
//! let mut reader = buffer.reader_at(buffer.line_start(2));
//! assert_eq!(reader.read_rune().unwrap(), ('W', 1));
//! ```
//!
//! # Readers vs. markers
//!
//! A [`Reader`] borrows the buffer and is meant to live for one
//! traversal; the borrow makes editing while reading a compile error.
//! A [`Marker`] is the long-lived position abstraction: it is registered
//! as an observer and notified of every edit before it happens.

mod error;
mod line_cache;
mod marker;
mod piece;
mod reader;
mod text_buffer;
mod types;
mod utf8;

pub use error::{PositionError, RuneError};
pub use marker::{EditObserver, Marker, ObserverId};
pub use reader::Reader;
pub use text_buffer::TextBuffer;
pub use types::Position;
