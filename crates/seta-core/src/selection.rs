//! Last-selection-wins delivery of date loads.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issued when a date is selected; identifies that selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
}

/// Hands out tickets and drops results that complete after a newer
/// selection was made.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    latest: AtomicU64,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new selection; all earlier tickets become stale.
    pub fn begin(&self) -> SelectionTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        SelectionTicket { generation }
    }

    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }

    /// Pass `value` through if `ticket` is still the latest selection.
    pub fn deliver<T>(&self, ticket: SelectionTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.latest.load(Ordering::SeqCst),
                "discarding stale selection result"
            );
            None
        }
    }
}
