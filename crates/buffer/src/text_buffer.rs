// Chunk: docs/chunks/piece_table - Append-only store and linked piece list

//! TextBuffer is the main public API for document edits and queries.
//!
//! It combines an append-only byte store with a circular piece list: the
//! logical document is the in-order concatenation of piece ranges into the
//! store. Inserting appends the new bytes and splices a fresh piece into
//! the list; deleting relinks around the removed range. Neither edit moves
//! any existing byte, which is what keeps markers and store indices stable
//! for the life of the buffer, and makes both edits O(pieces) regardless
//! of document size.
//!
//! Edits notify registered observers *before* the mutation, then
//! invalidate the line memos. Readers borrow the buffer, so any reader
//! still alive at edit time is a compile error rather than a dangling
//! cursor.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::rc::Rc;

use log::trace;

use crate::error::PositionError;
use crate::line_cache::LineCache;
use crate::marker::{EditObserver, Marker, ObserverId};
use crate::piece::{PieceId, PieceList, SENTINEL};
use crate::reader::Reader;
use crate::types::Position;

/// A text editor's document buffer, organized as a piece table.
///
/// All byte-level operations are encoding-agnostic; rune-level queries
/// (positions, rune reads through [`Reader`]) expect UTF-8 and degrade to
/// replacement characters on invalid bytes.
pub struct TextBuffer {
    /// Append-only. Holds every byte ever inserted, including bytes that
    /// have since been logically deleted.
    store: Vec<u8>,
    pieces: PieceList,
    len: usize,
    observers: HashMap<ObserverId, Rc<RefCell<dyn EditObserver>>>,
    next_observer_id: u64,
    line_cache: LineCache,
}

impl TextBuffer {
    /// Creates an empty buffer: length zero, one (empty) line.
    pub fn new() -> Self {
        Self {
            store: Vec::new(),
            pieces: PieceList::new(),
            len: 0,
            observers: HashMap::new(),
            next_observer_id: 0,
            line_cache: LineCache::new(),
        }
    }

    /// Creates a buffer initialized with `content`.
    ///
    /// Note: `FromStr` would force a `Result`, but building a buffer from
    /// a string cannot fail.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        let mut buffer = Self::new();
        buffer.insert(0, content.as_bytes());
        buffer
    }

    // ==================== Accessors ====================

    /// Logical byte length of the document.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the document holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Materializes the whole document by concatenating piece slices.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for piece in self.pieces.iter() {
            out.extend_from_slice(self.piece_slice(piece));
        }
        out
    }

    /// The document as a `String`, with invalid UTF-8 replaced.
    pub fn content(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    // ==================== Edits ====================

    /// Inserts `bytes` so that the first inserted byte lands at `offset`.
    ///
    /// Registered observers are notified before the document changes.
    /// Inserting nothing is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len()`; an out-of-range edit is a caller bug.
    pub fn insert(&mut self, offset: usize, bytes: &[u8]) {
        assert!(
            offset <= self.len,
            "insert: offset {offset} outside 0..={}",
            self.len
        );
        if bytes.is_empty() {
            return;
        }
        trace!("insert {} bytes at offset {offset}", bytes.len());
        self.line_cache.invalidate();
        for observer in self.observers.values() {
            observer.borrow_mut().on_insert(offset, bytes);
        }

        let b0 = self.store.len();
        self.store.extend_from_slice(bytes);
        let fresh = self.pieces.alloc(b0, b0 + bytes.len());

        let (piece_start, p) = self.find_piece(offset);
        let left = self.pieces.prev(p);
        if offset == piece_start {
            // Insert at a piece boundary (or append when `p` is the
            // sentinel): splice between the neighbors.
            self.pieces.link(fresh, p);
            self.pieces.link(left, fresh);
        } else {
            // Split the containing piece and splice the new piece between
            // the halves.
            let right_neighbor = self.pieces.next(p);
            let (first, second) = self.pieces.split(p, offset - piece_start);
            self.pieces.link(left, first);
            self.pieces.link(first, fresh);
            self.pieces.link(fresh, second);
            self.pieces.link(second, right_neighbor);
        }
        self.len += bytes.len();
        self.debug_validate();
    }

    /// Deletes the bytes in `[off1, off2)`.
    ///
    /// Registered observers are notified before the document changes.
    /// Deleting an empty range is a no-op. Fully covered pieces are
    /// unlinked; the byte store is never reclaimed.
    ///
    /// # Panics
    ///
    /// Panics unless `off1 <= off2 <= len()`.
    pub fn delete(&mut self, off1: usize, off2: usize) {
        assert!(
            off1 <= off2 && off2 <= self.len,
            "delete: range {off1}..{off2} outside 0..={}",
            self.len
        );
        if off1 == off2 {
            return;
        }
        trace!("delete range {off1}..{off2}");
        self.line_cache.invalidate();
        for observer in self.observers.values() {
            observer.borrow_mut().on_delete(off1, off2);
        }

        let (start1, p1) = self.find_piece(off1);
        let (start2, p2) = self.find_piece(off2);

        let left = if off1 == start1 {
            // The whole head piece goes; keep its predecessor.
            self.pieces.prev(p1)
        } else {
            let before = self.pieces.prev(p1);
            let (first, _) = self.pieces.split(p1, off1 - start1);
            self.pieces.link(before, first);
            first
        };

        let right = if off2 == start2 {
            // The delete stops just before `p2`, which survives whole.
            p2
        } else {
            let after = self.pieces.next(p2);
            let (_, second) = self.pieces.split(p2, off2 - start2);
            self.pieces.link(second, after);
            second
        };

        self.pieces.link(left, right);
        self.len -= off2 - off1;
        self.debug_validate();
    }

    // ==================== Readers and observers ====================

    /// Creates a forward reader positioned at `offset`.
    ///
    /// The reader borrows the buffer; edits while it is alive are
    /// rejected at compile time.
    pub fn reader_at(&self, offset: usize) -> Reader<'_> {
        Reader::new(self, offset)
    }

    /// Creates a marker at `offset` and registers it as an observer.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len()`.
    pub fn new_marker(&mut self, offset: usize) -> Marker {
        assert!(
            offset <= self.len,
            "new_marker: offset {offset} outside 0..={}",
            self.len
        );
        let id = self.next_id();
        let (marker, state) = Marker::new(offset, id);
        self.observers.insert(id, state);
        marker
    }

    /// Registers an observer and returns its id.
    pub fn add_observer(&mut self, observer: Rc<RefCell<dyn EditObserver>>) -> ObserverId {
        let id = self.next_id();
        self.observers.insert(id, observer);
        id
    }

    /// Removes the observer registered under `id`.
    ///
    /// Returns false if no such observer exists (e.g. it was already
    /// removed). Ids are never reused.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    fn next_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        id
    }

    // ==================== Line and position queries ====================

    /// Byte offset of the first character of line `n` (1-indexed).
    ///
    /// `line_start(1)` is 0. If `n` exceeds the line count, returns
    /// `len()`. Served from the single-slot line memo when possible:
    /// a direct hit returns immediately, a request past the cached line
    /// resumes scanning from it, and anything else scans from offset 0.
    ///
    /// # Panics
    ///
    /// Panics if `n` is 0; line numbers start at 1.
    pub fn line_start(&self, n: usize) -> usize {
        assert!(n >= 1, "line_start: line numbers are 1-indexed");
        let (mut start, to_skip) = match self.line_cache.slot() {
            Some((line, offset)) if line == n => return offset,
            Some((line, offset)) if line < n => (offset, n - line),
            _ => (0, n - 1),
        };
        let mut rd = self.reader_at(start);
        for _ in 0..to_skip {
            loop {
                match rd.read_rune() {
                    Ok(('\n', _)) => {
                        start = rd.offset();
                        break;
                    }
                    Ok(_) => {}
                    // Ran past the last line. Don't cache: the slot must
                    // only ever describe a line that exists.
                    Err(_) => return self.len,
                }
            }
        }
        self.line_cache.maybe_record(n, start);
        start
    }

    /// Number of lines in the document.
    ///
    /// The empty document has exactly one (empty) line; otherwise this is
    /// the newline count plus one. Memoized until the next edit.
    pub fn line_count(&self) -> usize {
        if let Some(count) = self.line_cache.count() {
            return count;
        }
        let newlines: usize = self
            .pieces
            .iter()
            .map(|p| self.piece_slice(p).iter().filter(|&&b| b == b'\n').count())
            .sum();
        let count = newlines + 1;
        self.line_cache.record_count(count);
        count
    }

    /// Translates a byte offset into a 1-indexed line/column position.
    ///
    /// Scans runes from the start of the document. Fails when `offset`
    /// is past the end or lands inside a multi-byte rune.
    pub fn position_from_offset(&self, offset: usize) -> Result<Position, PositionError> {
        if offset > self.len {
            return Err(PositionError::OutOfBounds(offset));
        }
        let mut pos = Position::new(1, 1);
        let mut rd = self.reader_at(0);
        while rd.offset() < offset {
            match rd.read_rune() {
                Ok(('\n', _)) => {
                    pos.line += 1;
                    pos.column = 1;
                }
                Ok(_) => pos.column += 1,
                Err(_) => return Err(PositionError::OutOfBounds(offset)),
            }
        }
        if rd.offset() != offset {
            return Err(PositionError::NotOnRuneBoundary(offset));
        }
        Ok(pos)
    }

    /// Translates a 1-indexed line/column position into a byte offset.
    ///
    /// Resolves the line via [`line_start`](Self::line_start), then
    /// advances `column - 1` runes; fails if the line ends first.
    ///
    /// # Panics
    ///
    /// Panics if `position.line` or `position.column` is 0.
    pub fn position_to_offset(&self, position: Position) -> Result<usize, PositionError> {
        assert!(
            position.column >= 1,
            "position_to_offset: columns are 1-indexed"
        );
        let start = self.line_start(position.line);
        let mut rd = self.reader_at(start);
        for _ in 1..position.column {
            match rd.read_rune() {
                Ok(('\n', _)) | Err(_) => {
                    return Err(PositionError::ColumnPastEndOfLine {
                        line: position.line,
                        column: position.column,
                    });
                }
                Ok(_) => {}
            }
        }
        Ok(rd.offset())
    }

    // ==================== Internals ====================

    /// Finds the piece containing `offset`, returning the piece and the
    /// absolute offset at which it starts.
    ///
    /// `offset == len()` (and beyond) resolves to the sentinel with
    /// `piece_start == len()`, which makes appends and end-of-document
    /// seeks fall out of the same path.
    pub(crate) fn find_piece(&self, offset: usize) -> (usize, PieceId) {
        let mut piece_start = 0;
        for piece in self.pieces.iter() {
            let len = self.pieces.len(piece);
            if offset < piece_start + len {
                return (piece_start, piece);
            }
            piece_start += len;
        }
        (piece_start, SENTINEL)
    }

    pub(crate) fn pieces(&self) -> &PieceList {
        &self.pieces
    }

    pub(crate) fn piece_slice(&self, piece: PieceId) -> &[u8] {
        let (off1, off2) = self.pieces.range(piece);
        &self.store[off1..off2]
    }

    /// Debug-build consistency check, run after every mutation: piece
    /// lengths sum to `len`, every range lies within the store, no linked
    /// piece is empty, and prev/next agree in both directions.
    #[cfg(debug_assertions)]
    fn debug_validate(&self) {
        let mut total = 0;
        let mut prev = SENTINEL;
        for piece in self.pieces.iter() {
            let (off1, off2) = self.pieces.range(piece);
            assert!(off1 < off2, "linked piece {piece:?} is empty");
            assert!(off2 <= self.store.len(), "piece {piece:?} outside store");
            assert_eq!(self.pieces.prev(piece), prev, "broken back link at {piece:?}");
            total += off2 - off1;
            prev = piece;
        }
        assert_eq!(self.pieces.prev(SENTINEL), prev, "broken back link at tail");
        assert_eq!(total, self.len, "piece lengths disagree with cached len");
    }

    #[cfg(not(debug_assertions))]
    fn debug_validate(&self) {}
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("len", &self.len)
            .field("pieces", &self.pieces.iter().count())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content())
    }
}

/// Writing appends at the end of the document, which is the seam for
/// loading a byte stream: `io::copy(&mut file, &mut buffer)`.
impl io::Write for TextBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.insert(self.len, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
