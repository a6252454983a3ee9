// Chunk: docs/chunks/bidirectional_reader - Seekable bidirectional UTF-8 reader

//! A transient, seekable, bidirectional cursor over the document.
//!
//! The reader walks the piece list directly, so byte reads are plain
//! slice copies and only rune decodes that straddle a piece boundary pay
//! for staging. It implements [`std::io::Read`] (forward bytes, so it
//! composes with `BufReader` and `read_to_end`) and [`std::io::Seek`].
//!
//! Reverse reading is rune-only: bytes are consumed backward one at a
//! time and accumulated until they form a valid rune, crossing piece
//! boundaries as needed. The reader borrows the buffer for its whole
//! lifetime, so it can never observe an edit.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::RuneError;
use crate::piece::{PieceId, SENTINEL};
use crate::text_buffer::TextBuffer;
use crate::utf8;

/// A bidirectional cursor over a [`TextBuffer`].
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a TextBuffer,
    piece: PieceId,
    /// Offset within the current piece.
    off_in_piece: usize,
    /// Absolute offset in the document.
    off: usize,
    /// Read direction; reverse affects rune reads only.
    reverse: bool,
    /// Size of the last rune read, or `None` if the previous operation
    /// was not a successful rune read.
    last_rune_size: Option<usize>,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a TextBuffer, offset: usize) -> Self {
        let (piece_start, piece) = buf.find_piece(offset);
        Self {
            buf,
            piece,
            off_in_piece: offset - piece_start,
            off: offset,
            reverse: false,
            last_rune_size: None,
        }
    }

    /// Current absolute position in the document.
    pub fn offset(&self) -> usize {
        self.off
    }

    /// Toggles the read direction. The position does not move.
    pub fn reverse(&mut self) {
        self.reverse = !self.reverse;
    }

    /// Reads one rune in the current direction.
    ///
    /// Returns the rune and its size in bytes. Invalid encodings yield
    /// `U+FFFD` with size 1 so that scans stay total over arbitrary
    /// bytes; running out of document yields [`RuneError::Eof`], and a
    /// reverse read that hits the start of the document in the middle of
    /// a multi-byte sequence yields [`RuneError::IncompleteUtf8`].
    pub fn read_rune(&mut self) -> Result<(char, usize), RuneError> {
        let result = if self.reverse {
            self.read_rune_backward()
        } else {
            self.read_rune_forward()
        };
        self.last_rune_size = result.ok().map(|(_, size)| size);
        result
    }

    /// Steps back over the rune returned by the last [`read_rune`](Self::read_rune).
    ///
    /// # Panics
    ///
    /// Panics unless the immediately preceding operation was a successful
    /// rune read; calling it at any other time is a caller bug.
    pub fn unread_rune(&mut self) {
        let size = self
            .last_rune_size
            .expect("unread_rune: previous operation was not a successful read_rune");
        let target = if self.reverse {
            self.off + size
        } else {
            self.off - size
        };
        self.reposition(target);
    }

    /// Moves to `offset` and re-resolves the piece position.
    ///
    /// Also forgets the last rune read, invalidating `unread_rune`.
    fn reposition(&mut self, offset: usize) {
        let (piece_start, piece) = self.buf.find_piece(offset);
        self.piece = piece;
        self.off_in_piece = offset - piece_start;
        self.off = offset;
        self.last_rune_size = None;
    }

    /// Forward byte read into `dst`, crossing pieces as needed.
    ///
    /// Returns the number of bytes copied; 0 means end of document (or an
    /// empty `dst`).
    fn read_bytes(&mut self, dst: &mut [u8]) -> usize {
        assert!(
            !self.reverse,
            "byte reads on a reversed reader are not supported"
        );
        self.last_rune_size = None;
        let mut copied = 0;
        loop {
            if self.piece == SENTINEL {
                return copied;
            }
            let bytes = &self.buf.piece_slice(self.piece)[self.off_in_piece..];
            let n = bytes.len().min(dst.len() - copied);
            dst[copied..copied + n].copy_from_slice(&bytes[..n]);
            copied += n;
            self.off += n;
            if copied == dst.len() {
                self.off_in_piece += n;
                return copied;
            }
            // Piece exhausted with space left in dst: step forward.
            self.piece = self.buf.pieces().next(self.piece);
            self.off_in_piece = 0;
        }
    }

    fn read_rune_forward(&mut self) -> Result<(char, usize), RuneError> {
        let slice = self.buf.piece_slice(self.piece);
        // A seek past the end can leave the in-piece offset beyond the
        // sentinel's empty slice; such a reader just reads nothing.
        let rest = &slice[self.off_in_piece.min(slice.len())..];
        // Common case: a one-byte rune inside the current piece.
        if let Some(&first) = rest.first() {
            if first < 0x80 {
                self.off += 1;
                self.off_in_piece += 1;
                return Ok((first as char, 1));
            }
            if let Some((ch, size)) = utf8::decode_head(rest) {
                self.off += size;
                self.off_in_piece += size;
                return Ok((ch, size));
            }
        }
        // The rune straddles a piece boundary (or the piece is spent):
        // stage up to a rune's worth of bytes, decode, then settle on the
        // decoded size, which may be shorter than what was staged.
        let start = self.off;
        let mut stage = [0u8; utf8::MAX_RUNE_LEN];
        let n = self.read_bytes(&mut stage);
        if n == 0 {
            return Err(RuneError::Eof);
        }
        let (ch, size) = utf8::decode_head(&stage[..n]).unwrap_or((char::REPLACEMENT_CHARACTER, 1));
        if self.off != start + size {
            self.reposition(start + size);
        }
        Ok((ch, size))
    }

    fn read_rune_backward(&mut self) -> Result<(char, usize), RuneError> {
        let start = self.off;
        let mut stage = [0u8; utf8::MAX_RUNE_LEN];
        let mut n = 0;
        loop {
            if self.off == 0 {
                return if n == 0 {
                    Err(RuneError::Eof)
                } else {
                    // The document begins in the middle of a sequence.
                    Err(RuneError::IncompleteUtf8(0))
                };
            }
            if self.off_in_piece == 0 {
                self.piece = self.buf.pieces().prev(self.piece);
                self.off_in_piece = self.buf.pieces().len(self.piece);
            }
            let byte = self.buf.piece_slice(self.piece)[self.off_in_piece - 1];
            self.off_in_piece -= 1;
            self.off -= 1;
            n += 1;
            // Keep the staging bytes in document order: newest byte first.
            stage[utf8::MAX_RUNE_LEN - n] = byte;
            if utf8::is_continuation(byte) && n < utf8::MAX_RUNE_LEN {
                continue;
            }
            return match utf8::decode_exact(&stage[utf8::MAX_RUNE_LEN - n..]) {
                Some(ch) => Ok((ch, n)),
                None => {
                    // Malformed accumulation. Give back everything except
                    // the byte nearest the starting position and report it
                    // as a replacement, mirroring the forward direction.
                    self.reposition(start - 1);
                    Ok((char::REPLACEMENT_CHARACTER, 1))
                }
            };
        }
    }
}

impl Read for Reader<'_> {
    /// Forward byte read. End of document reports `Ok(0)` once the tail
    /// has been drained by shorter reads.
    ///
    /// # Panics
    ///
    /// Panics if the reader is reversed; reverse byte reads are not
    /// implemented.
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_bytes(dst))
    }
}

impl Seek for Reader<'_> {
    /// Seeks relative to the start, current position, or end of the
    /// document. Seeking past the end is allowed; subsequent reads report
    /// end of document. A negative resolved position is an error.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::Current(d) => (self.off as u64).checked_add_signed(d),
            SeekFrom::End(d) => (self.buf.len() as u64).checked_add_signed(d),
        };
        match target {
            Some(n) => {
                self.reposition(n as usize);
                Ok(n)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative position",
            )),
        }
    }
}
