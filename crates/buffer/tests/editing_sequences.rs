// Chunk: docs/chunks/piece_table - Append-only store and linked piece list

//! Integration tests for realistic editing sequences.
//!
//! These exercise the piece list, the line memos, and the observer
//! broadcast together through the public API.

use seam_buffer::TextBuffer;

#[test]
fn test_hello_world_build_up() {
    let mut buf = TextBuffer::new();
    buf.insert(0, b"World");
    buf.insert(0, b"Hello");
    buf.insert(5, b" ");
    assert_eq!(buf.content(), "Hello World");
    assert_eq!(buf.len(), 11);
}

#[test]
fn test_insert_then_delete_everything() {
    let mut buf = TextBuffer::new();
    buf.insert(0, b"Hello");
    buf.delete(0, buf.len());
    assert_eq!(buf.content(), "");
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.line_count(), 1);
}

#[test]
fn test_delete_at_end_start_and_middle() {
    let mut buf = TextBuffer::from_str("Hello");
    buf.delete(3, buf.len());
    assert_eq!(buf.content(), "Hel");

    let mut buf = TextBuffer::from_str("Hello");
    buf.delete(0, 2);
    assert_eq!(buf.content(), "llo");

    let mut buf = TextBuffer::from_str("Hello");
    buf.delete(2, 3);
    assert_eq!(buf.content(), "Helo");
}

#[test]
fn test_insert_then_delete_restores_document() {
    let samples: &[(&str, usize, &str)] = &[
        ("Hello World", 0, "abc"),
        ("Hello World", 5, "xyz"),
        ("Hello World", 11, "!"),
        ("a\nb\nc", 2, "inserted\ntext"),
    ];
    for &(initial, offset, inserted) in samples {
        let mut buf = TextBuffer::from_str(initial);
        // Fragment the piece list a little first.
        buf.insert(1, b"@");
        buf.delete(1, 2);
        let before = buf.bytes();
        let len_before = buf.len();

        buf.insert(offset, inserted.as_bytes());
        buf.delete(offset, offset + inserted.len());

        assert_eq!(buf.bytes(), before, "restore failed for {initial:?}");
        assert_eq!(buf.len(), len_before);
    }
}

#[test]
fn test_line_offsets() {
    let mut buf = TextBuffer::new();
    buf.insert(0, b"Hello\nWorld\n\nThis is a test\n");
    assert_eq!(buf.line_start(1), 0);
    assert_eq!(buf.line_start(2), 6);
    assert_eq!(buf.line_start(3), 12);
    assert_eq!(buf.line_start(4), 13);
}

#[test]
fn test_line_count_with_trailing_text() {
    let mut buf = TextBuffer::new();
    assert_eq!(buf.line_count(), 1);
    buf.insert(0, b"Hello\n\nFoo");
    assert_eq!(buf.line_count(), 3);
}

#[test]
fn test_line_queries_follow_edits() {
    let mut buf = TextBuffer::from_str("aaa\nbbb");
    assert_eq!(buf.line_start(2), 4);
    buf.insert(0, b"x\n");
    assert_eq!(buf.line_count(), 3);
    assert_eq!(buf.line_start(2), 2);
    assert_eq!(buf.line_start(3), 6);
    buf.delete(0, 2);
    assert_eq!(buf.line_count(), 2);
    assert_eq!(buf.line_start(2), 4);
}

#[test]
fn test_marker_follows_surrounding_text() {
    let mut buf = TextBuffer::from_str("Hello");
    let marker = buf.new_marker(5);
    buf.insert(0, b"A");
    assert_eq!(marker.offset(), 6);
    buf.delete(0, 1);
    assert_eq!(marker.offset(), 5);
}

#[test]
fn test_marker_ignores_edits_to_its_right() {
    let mut buf = TextBuffer::from_str("Hello World");
    let marker = buf.new_marker(3);
    buf.insert(7, b"!!!");
    assert_eq!(marker.offset(), 3);
    buf.delete(5, 9);
    assert_eq!(marker.offset(), 3);
}

#[test]
fn test_marker_moves_with_insert_at_its_offset() {
    let mut buf = TextBuffer::from_str("ab");
    let marker = buf.new_marker(1);
    buf.insert(1, b"xyz");
    // Ties resolve toward the text on the marker's right.
    assert_eq!(marker.offset(), 4);
}

#[test]
fn test_marker_inside_deleted_range_clamps_to_start() {
    let mut buf = TextBuffer::from_str("Hello World");
    let marker = buf.new_marker(8);
    buf.delete(3, 9);
    assert_eq!(marker.offset(), 3);
    assert_eq!(buf.content(), "Helld");
}

#[test]
fn test_removed_marker_stops_tracking() {
    let mut buf = TextBuffer::from_str("Hello");
    let marker = buf.new_marker(5);
    assert!(buf.remove_observer(marker.id()));
    buf.insert(0, b"abc");
    assert_eq!(marker.offset(), 5);
}

#[test]
fn test_explicit_marker_move() {
    let mut buf = TextBuffer::from_str("Hello World");
    let mut marker = buf.new_marker(0);
    marker.move_to(6);
    buf.insert(0, b"x");
    assert_eq!(marker.offset(), 7);
}

#[test]
fn test_many_markers_update_independently() {
    let mut buf = TextBuffer::from_str("0123456789");
    let markers: Vec<_> = (0..=10).map(|off| buf.new_marker(off)).collect();
    buf.delete(3, 7);
    let offsets: Vec<usize> = markers.iter().map(|m| m.offset()).collect();
    assert_eq!(offsets, vec![0, 1, 2, 3, 3, 3, 3, 3, 4, 5, 6]);
}

#[test]
fn test_position_round_trip_after_edits() {
    let mut buf = TextBuffer::from_str("héllo\nwörld\n");
    buf.insert(6, "ça\n".as_bytes());
    buf.delete(0, 1);
    let text = buf.content();
    let mut offset = 0;
    for ch in text.chars() {
        let pos = buf.position_from_offset(offset).unwrap();
        assert_eq!(buf.position_to_offset(pos), Ok(offset));
        offset += ch.len_utf8();
    }
    assert_eq!(offset, buf.len());
}
