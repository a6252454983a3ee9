// Chunk: docs/chunks/bidirectional_reader - Seekable bidirectional UTF-8 reader

//! Byte-level UTF-8 decode helpers for the reader.
//!
//! The buffer stores raw bytes, so the reader decodes runes from byte
//! slices that may start anywhere and may be truncated by piece
//! boundaries. Invalid encodings decode as `U+FFFD` with width 1, which
//! keeps scans total over arbitrary byte content.

/// Longest UTF-8 encoding of a single rune.
pub(crate) const MAX_RUNE_LEN: usize = 4;

/// Expected sequence length for a leading byte.
///
/// Returns `None` for continuation bytes and bytes that cannot begin a
/// valid sequence (0x80..=0xC1, 0xF5..).
pub(crate) fn sequence_len(byte: u8) -> Option<usize> {
    match byte {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// True for UTF-8 continuation bytes (`10xxxxxx`).
pub(crate) fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decodes one rune from the head of `bytes`.
///
/// Returns `None` when the slice is empty or holds an incomplete prefix
/// of a longer sequence (the caller should supply more bytes), and
/// `(U+FFFD, 1)` for encodings that can never become valid.
pub(crate) fn decode_head(bytes: &[u8]) -> Option<(char, usize)> {
    let first = *bytes.first()?;
    let need = match sequence_len(first) {
        Some(need) => need,
        None => return Some((char::REPLACEMENT_CHARACTER, 1)),
    };
    if bytes.len() < need {
        return None;
    }
    match std::str::from_utf8(&bytes[..need]) {
        Ok(s) => s.chars().next().map(|ch| (ch, need)),
        Err(_) => Some((char::REPLACEMENT_CHARACTER, 1)),
    }
}

/// Decodes `bytes` as exactly one rune spanning the whole slice.
pub(crate) fn decode_exact(bytes: &[u8]) -> Option<char> {
    match decode_head(bytes) {
        Some((ch, size)) if size == bytes.len() => Some(ch),
        _ => None,
    }
}
