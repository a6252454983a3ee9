// Chunk: docs/chunks/marker_observers - Edit observers and self-adjusting markers

//! Edit observers and markers.
//!
//! Observers are notified of every insert and delete *before* the buffer
//! mutates, so callback arguments always refer to the pre-edit document.
//! A [`Marker`] is the built-in observer: a stable logical offset that
//! shifts itself under edits so it stays between the same two runes.
//!
//! Registration hands out an opaque [`ObserverId`]; markers never hold a
//! reference back to the buffer, so there is no ownership cycle and
//! removal is by id. Notification order across observers is unspecified,
//! and observers cannot reach the buffer from inside a callback.

use std::cell::RefCell;
use std::rc::Rc;

/// Receives edit notifications from a buffer.
///
/// Both callbacks fire before the change is applied.
pub trait EditObserver {
    /// `bytes` are about to be inserted at `offset`.
    fn on_insert(&mut self, offset: usize, bytes: &[u8]);
    /// The range `[off1, off2)` is about to be deleted.
    fn on_delete(&mut self, off1: usize, off2: usize);
}

/// Opaque registration handle. Ids are monotonically increasing and never
/// reused within a buffer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

#[derive(Debug)]
pub(crate) struct MarkerState {
    off: usize,
}

impl EditObserver for MarkerState {
    fn on_insert(&mut self, offset: usize, bytes: &[u8]) {
        // An insert exactly at the marker moves it: the marker stays with
        // the text to its right.
        if offset <= self.off {
            self.off += bytes.len();
        }
    }

    fn on_delete(&mut self, off1: usize, off2: usize) {
        if off2 <= self.off {
            self.off -= off2 - off1;
        } else if off1 < self.off {
            // Marker strictly inside the deleted range: clamp to its start.
            self.off = off1;
        }
    }
}

/// A stable position in a buffer, adjusted automatically under edits.
///
/// Created with [`TextBuffer::new_marker`](crate::TextBuffer::new_marker),
/// which registers it as an observer; remove it with
/// [`TextBuffer::remove_observer`](crate::TextBuffer::remove_observer)
/// when the position is no longer needed. Clones share the same tracked
/// offset.
#[derive(Debug, Clone)]
pub struct Marker {
    state: Rc<RefCell<MarkerState>>,
    id: ObserverId,
}

impl Marker {
    pub(crate) fn new(off: usize, id: ObserverId) -> (Self, Rc<RefCell<MarkerState>>) {
        let state = Rc::new(RefCell::new(MarkerState { off }));
        (
            Self {
                state: Rc::clone(&state),
                id,
            },
            state,
        )
    }

    /// Current offset from the beginning of the buffer.
    pub fn offset(&self) -> usize {
        self.state.borrow().off
    }

    /// Moves the marker to `offset`.
    ///
    /// The offset is not checked against the buffer; callers own that
    /// invariant just as they do for reader seeks.
    pub fn move_to(&mut self, offset: usize) {
        self.state.borrow_mut().off = offset;
    }

    /// The registration id, for removal from the buffer.
    pub fn id(&self) -> ObserverId {
        self.id
    }
}
