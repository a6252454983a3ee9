// Chunk: docs/chunks/line_lookup - Line queries and the single-slot line cache

//! Single-slot memo for line lookups.
//!
//! Line queries scan the document for newlines, so the buffer remembers
//! the most recently resolved line together with its starting offset and
//! the total line count. Both memos are interior-mutable so queries work
//! through a shared buffer reference, and both are dropped wholesale on
//! every edit.

use std::cell::Cell;

/// Don't displace the slot for requests within this many lines of it.
/// Short backward seeks near the cached line would otherwise evict a
/// slot that is about to be useful again.
const SLACK: usize = 5;

#[derive(Debug, Clone, Copy)]
struct Slot {
    line: usize,
    offset: usize,
}

/// Memo of the last resolved line plus the cached total line count.
#[derive(Debug, Default)]
pub(crate) struct LineCache {
    slot: Cell<Option<Slot>>,
    count: Cell<Option<usize>>,
}

impl LineCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Drops both memos. Called on every insert and delete.
    pub(crate) fn invalidate(&self) {
        self.slot.set(None);
        self.count.set(None);
    }

    /// The cached `(line, offset)` slot, if valid.
    pub(crate) fn slot(&self) -> Option<(usize, usize)> {
        self.slot.get().map(|s| (s.line, s.offset))
    }

    /// Offers a freshly scanned `(line, offset)` pair to the cache.
    ///
    /// The slot is taken when the cache is invalid, when the request is
    /// more than [`SLACK`] lines past the cached line, or when it is below
    /// the cached line but far enough from the start that rescanning from
    /// offset 0 is not free.
    pub(crate) fn maybe_record(&self, line: usize, offset: usize) {
        let take = match self.slot.get() {
            None => true,
            Some(slot) => {
                (line < slot.line && line > SLACK) || (line > slot.line && line - slot.line > SLACK)
            }
        };
        if take {
            self.slot.set(Some(Slot { line, offset }));
        }
    }

    pub(crate) fn count(&self) -> Option<usize> {
        self.count.get()
    }

    pub(crate) fn record_count(&self, count: usize) {
        self.count.set(Some(count));
    }
}
