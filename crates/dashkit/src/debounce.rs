//! Cancelable quiet-period timer.
//!
//! A [`Debouncer`] hands out one deferred [`DebounceMsg`] per trigger. Every
//! trigger or cancel bumps the debouncer's tag, so any message already in flight
//! carries a stale tag and is rejected by [`Debouncer::accept`]. At most one
//! delivery can ever be accepted per quiet period, no matter how many commands
//! are still sleeping somewhere.
//!
//! # Example
//!
//! ```rust
//! use dashkit::debounce::{DebounceMsg, Debouncer};
//! use std::time::Duration;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(1));
//! let first = debouncer.trigger();
//! let second = debouncer.trigger();
//!
//! let stale = first.execute().unwrap().downcast::<DebounceMsg>().unwrap();
//! let fresh = second.execute().unwrap().downcast::<DebounceMsg>().unwrap();
//! assert!(!debouncer.accept(&stale));
//! assert!(debouncer.accept(&fresh));
//! assert!(!debouncer.pending());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::command::{Cmd, tick};
use crate::message::Message;

/// Global ID counter for debouncer instances.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Message delivered when a quiet period elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceMsg {
    /// ID of the debouncer that scheduled this message.
    pub id: u64,
    /// Generation the message was scheduled in.
    tag: u64,
}

/// Cancelable quiet-period timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    id: u64,
    tag: u64,
    window: Duration,
    pending: bool,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            window,
            pending: false,
        }
    }

    /// Returns the debouncer's unique ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the quiet window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Changes the quiet window for future triggers.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Returns whether a delivery is currently awaited.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Starts a new quiet period, superseding any earlier one.
    ///
    /// The returned command sleeps for the window and then yields a
    /// [`DebounceMsg`].
    pub fn trigger(&mut self) -> Cmd {
        self.tag = self.tag.wrapping_add(1);
        self.pending = true;

        let id = self.id;
        let tag = self.tag;
        tick(self.window, move |_| Message::new(DebounceMsg { id, tag }))
    }

    /// Cancels the pending quiet period, if any.
    pub fn cancel(&mut self) {
        if self.pending {
            tracing::trace!(id = self.id, tag = self.tag, "debounce cancelled");
        }
        self.tag = self.tag.wrapping_add(1);
        self.pending = false;
    }

    /// Consumes a delivery, returning true only for the current quiet period.
    pub fn accept(&mut self, msg: &DebounceMsg) -> bool {
        if msg.id != self.id {
            return false;
        }
        if !self.pending || msg.tag != self.tag {
            tracing::debug!(
                id = self.id,
                tag = msg.tag,
                current = self.tag,
                "stale debounce ignored"
            );
            return false;
        }
        self.pending = false;
        true
    }
}
