//! Generation-stamped view state
//!
//! Each selection change starts a new computation with [`ViewState::begin`].
//! Computations may finish in any order; [`ViewState::commit`] installs a
//! result only if its ticket belongs to the latest `begin`, so a slow, stale
//! computation can never overwrite the output of a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

/// Proof of which `begin` a computation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Generation number of the ticket.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Latest-wins holder for a derived view (chart rows, radar rows, ...).
#[derive(Debug)]
pub struct ViewState<T> {
    generation: AtomicU64,
    current: Mutex<Option<(u64, T)>>,
}

impl<T> ViewState<T> {
    /// Create an empty view state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Start a new computation, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the ticket still belongs to the latest computation.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Install a result; returns `false` and drops it if the ticket is stale.
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        // Staleness is checked while holding the lock
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale view result");
            return false;
        }
        *current = Some((ticket.0, value));
        true
    }

    /// Run `f` on the committed value, if any.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        f(current.as_ref().map(|(_, value)| value))
    }

    /// Generation of the committed value, if any.
    #[must_use]
    pub fn committed_generation(&self) -> Option<u64> {
        self.with_entry(|entry| entry.map(|(generation, _)| *generation))
    }

    fn with_entry<R>(&self, f: impl FnOnce(Option<&(u64, T)>) -> R) -> R {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        f(current.as_ref())
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ViewState<T> {
    /// Clone of the committed value, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<T> {
        self.with(|value| value.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_commits() {
        let view = ViewState::new();
        let ticket = view.begin();
        assert!(view.commit(ticket, "rows"));
        assert_eq!(view.snapshot(), Some("rows"));
        assert_eq!(view.committed_generation(), Some(ticket.generation()));
    }

    #[test]
    fn test_stale_ticket_cannot_clobber() {
        let view = ViewState::new();
        let stale = view.begin();
        let fresh = view.begin();

        assert!(view.commit(fresh, "fresh"));
        assert!(!view.commit(stale, "stale"));
        assert_eq!(view.snapshot(), Some("fresh"));
    }

    #[test]
    fn test_stale_ticket_rejected_even_before_fresh_commit() {
        let view: ViewState<u32> = ViewState::new();
        let stale = view.begin();
        let _fresh = view.begin();

        assert!(!view.commit(stale, 1));
        assert_eq!(view.snapshot(), None);
    }

    #[test]
    fn test_panicking_reader_does_not_wedge_the_view() {
        let view = std::sync::Arc::new(ViewState::<u32>::new());
        let reader = std::sync::Arc::clone(&view);
        let joined = std::thread::spawn(move || {
            reader.with(|value| assert!(value.is_some(), "nothing committed yet"));
        })
        .join();
        assert!(joined.is_err());

        let ticket = view.begin();
        assert!(view.commit(ticket, 7));
        assert_eq!(view.snapshot(), Some(7));
    }
}
