// Chunk: docs/chunks/motions - Cursor motions over buffer readers

//! seam-motion: cursor motions for the seam editor.
//!
//! A [`Motion`] is a rule for advancing a reader from the current cursor.
//! The caller hands `apply` a reader positioned at the cursor; on success
//! the reader's offset is the new cursor position, on failure the reader
//! is left wherever the attempt stranded it and the caller keeps its
//! cursor unchanged.
//!
//! Motions are a sum type so that callers can store, compare notes on,
//! and wrap them; [`Motion::Reversed`] flips the reader's direction
//! before delegating, and [`Motion::Custom`] lifts any predicate into a
//! motion.
//!
//! # Example
//!
//! ```
//! use seam_buffer::TextBuffer;
//! use seam_motion::Motion;
//!
//! let buffer = TextBuffer::from_str("Hello\nWorld");
//! let mut reader = buffer.reader_at(0);
//! assert!(Motion::RuneFind('o').apply(&buffer, &mut reader));
//! assert_eq!(reader.offset(), 5); // just past the needle
//! ```

use std::fmt;
use std::io::{Seek, SeekFrom};

use seam_buffer::{Position, Reader, TextBuffer};

/// A rule for advancing a reader from the current cursor position.
pub enum Motion {
    /// One rune forward; fails at end of document.
    RuneForward,
    /// One rune backward; fails at the start of the document.
    RuneBackward,
    /// Forward until the needle rune has been read; the reader stops just
    /// past it. Fails at end of document.
    RuneFind(char),
    /// Same column one line down, falling back to column 1 when the
    /// target line is shorter; fails on the last line.
    LineForward,
    /// Same column one line up, falling back to column 1; fails on line 1.
    LineBackward,
    /// Flips the reader's direction, then delegates.
    Reversed(Box<Motion>),
    /// A user-supplied predicate with the same contract as
    /// [`Motion::apply`].
    Custom(Box<dyn Fn(&TextBuffer, &mut Reader<'_>) -> bool>),
}

impl Motion {
    /// Wraps a predicate as a motion.
    pub fn custom(f: impl Fn(&TextBuffer, &mut Reader<'_>) -> bool + 'static) -> Self {
        Motion::Custom(Box::new(f))
    }

    /// Wraps a motion so it runs against a direction-flipped reader.
    pub fn reversed(motion: Motion) -> Self {
        Motion::Reversed(Box::new(motion))
    }

    /// Attempts the motion. Returns false if it is impossible (end of
    /// document, first/last line, failed find); the caller should then
    /// leave its cursor where it was.
    pub fn apply(&self, buffer: &TextBuffer, reader: &mut Reader<'_>) -> bool {
        match self {
            Motion::RuneForward => reader.read_rune().is_ok(),
            Motion::RuneBackward => {
                reader.reverse();
                reader.read_rune().is_ok()
            }
            Motion::RuneFind(needle) => loop {
                match reader.read_rune() {
                    Ok((ch, _)) if ch == *needle => break true,
                    Ok(_) => {}
                    Err(_) => break false,
                }
            },
            Motion::LineForward => line_motion(buffer, reader, Direction::Down),
            Motion::LineBackward => line_motion(buffer, reader, Direction::Up),
            Motion::Reversed(inner) => {
                reader.reverse();
                inner.apply(buffer, reader)
            }
            Motion::Custom(f) => f(buffer, reader),
        }
    }
}

impl fmt::Debug for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Motion::RuneForward => write!(f, "RuneForward"),
            Motion::RuneBackward => write!(f, "RuneBackward"),
            Motion::RuneFind(needle) => write!(f, "RuneFind({needle:?})"),
            Motion::LineForward => write!(f, "LineForward"),
            Motion::LineBackward => write!(f, "LineBackward"),
            Motion::Reversed(inner) => write!(f, "Reversed({inner:?})"),
            Motion::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

enum Direction {
    Up,
    Down,
}

/// Moves to the adjacent line, keeping the column when it exists and
/// falling back to column 1 otherwise.
fn line_motion(buffer: &TextBuffer, reader: &mut Reader<'_>, direction: Direction) -> bool {
    let pos = match buffer.position_from_offset(reader.offset()) {
        Ok(pos) => pos,
        Err(_) => return false,
    };
    let line = match direction {
        Direction::Down => {
            if pos.line >= buffer.line_count() {
                return false;
            }
            pos.line + 1
        }
        Direction::Up => {
            if pos.line == 1 {
                return false;
            }
            pos.line - 1
        }
    };
    let target = buffer
        .position_to_offset(Position::new(line, pos.column))
        .or_else(|_| buffer.position_to_offset(Position::new(line, 1)));
    match target {
        Ok(offset) => reader.seek(SeekFrom::Start(offset as u64)).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_at(buffer: &TextBuffer, motion: &Motion, offset: usize) -> Option<usize> {
        let mut reader = buffer.reader_at(offset);
        motion.apply(buffer, &mut reader).then(|| reader.offset())
    }

    #[test]
    fn test_rune_forward() {
        let buffer = TextBuffer::from_str("héllo");
        assert_eq!(apply_at(&buffer, &Motion::RuneForward, 0), Some(1));
        // Multi-byte runes advance by their full width.
        assert_eq!(apply_at(&buffer, &Motion::RuneForward, 1), Some(3));
        assert_eq!(apply_at(&buffer, &Motion::RuneForward, 6), None);
    }

    #[test]
    fn test_rune_backward() {
        let buffer = TextBuffer::from_str("héllo");
        assert_eq!(apply_at(&buffer, &Motion::RuneBackward, 3), Some(1));
        assert_eq!(apply_at(&buffer, &Motion::RuneBackward, 1), Some(0));
        assert_eq!(apply_at(&buffer, &Motion::RuneBackward, 0), None);
    }

    #[test]
    fn test_rune_find() {
        let buffer = TextBuffer::from_str("Hello World");
        assert_eq!(apply_at(&buffer, &Motion::RuneFind('W'), 0), Some(7));
        assert_eq!(apply_at(&buffer, &Motion::RuneFind('z'), 0), None);
        // The search starts at the cursor, not the document start.
        assert_eq!(apply_at(&buffer, &Motion::RuneFind('l'), 4), Some(10));
    }

    #[test]
    fn test_line_forward_keeps_column() {
        let buffer = TextBuffer::from_str("abcdef\nuvwxyz\n");
        assert_eq!(apply_at(&buffer, &Motion::LineForward, 3), Some(10));
    }

    #[test]
    fn test_line_forward_falls_back_to_column_one() {
        let buffer = TextBuffer::from_str("abcdef\nuv\nxyz");
        // Column 5 does not exist on line 2.
        assert_eq!(apply_at(&buffer, &Motion::LineForward, 4), Some(7));
    }

    #[test]
    fn test_line_forward_fails_on_last_line() {
        let buffer = TextBuffer::from_str("abc\ndef");
        assert_eq!(apply_at(&buffer, &Motion::LineForward, 5), None);
    }

    #[test]
    fn test_line_backward() {
        let buffer = TextBuffer::from_str("abcdef\nuvwxyz");
        assert_eq!(apply_at(&buffer, &Motion::LineBackward, 10), Some(3));
        assert_eq!(apply_at(&buffer, &Motion::LineBackward, 3), None);
    }

    #[test]
    fn test_line_backward_falls_back_to_column_one() {
        let buffer = TextBuffer::from_str("ab\nuvwxyz");
        assert_eq!(apply_at(&buffer, &Motion::LineBackward, 8), Some(0));
    }

    #[test]
    fn test_reversed_adapter() {
        let buffer = TextBuffer::from_str("Hello");
        // A reversed forward rune read walks backward.
        let motion = Motion::reversed(Motion::RuneForward);
        assert_eq!(apply_at(&buffer, &motion, 5), Some(4));
        assert_eq!(apply_at(&buffer, &motion, 0), None);
    }

    #[test]
    fn test_custom_motion() {
        let buffer = TextBuffer::from_str("Hello World");
        // Skip runes while they are alphabetic, then step back over the
        // first miss.
        let word_end = Motion::custom(|_, reader| {
            let mut moved = false;
            while let Ok((ch, _)) = reader.read_rune() {
                if !ch.is_alphabetic() {
                    reader.unread_rune();
                    break;
                }
                moved = true;
            }
            moved
        });
        assert_eq!(apply_at(&buffer, &word_end, 0), Some(5));
        assert_eq!(apply_at(&buffer, &word_end, 5), None);
    }

    #[test]
    fn test_motion_debug_names() {
        assert_eq!(format!("{:?}", Motion::RuneFind('x')), "RuneFind('x')");
        assert_eq!(
            format!("{:?}", Motion::reversed(Motion::LineForward)),
            "Reversed(LineForward)"
        );
    }
}
