// Per-requester debounce state shared by every concurrent join-request handler.

use dashmap::{DashMap, mapref::entry::Entry};
use teloxide::types::UserId;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
enum Slot {
    // An approval call is running for this requester. `previous` is restored
    // if the call fails.
    InFlight { previous: Option<Instant> },
    Accepted(Instant),
}

/// Maps a requester to the instant its last join request was accepted.
///
/// The check-then-set sequence runs under the map's per-key entry lock, so two
/// concurrent requests from the same user can never both be reserved, while
/// requests from different users never contend on the same key.
#[derive(Debug)]
pub struct DebounceStore {
    window: Duration,
    slots: DashMap<UserId, Slot>,
}

impl DebounceStore {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slots: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn is_within_window(&self, accepted_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(accepted_at) < self.window
    }

    /// Reserve `user_id` for an approval attempt at `now`.
    ///
    /// Returns `None` when the request must be suppressed: either the last
    /// acceptance is still inside the window or another request for the same
    /// user is in flight. Suppression leaves the store untouched.
    ///
    /// This is a compare-and-swap, not a per-key queue: a duplicate arriving
    /// while the first approval is in flight is dropped immediately and does
    /// not wait for that approval's result. If the in-flight approval then
    /// fails, the slot is restored and the user's next request is evaluated
    /// fresh, but the dropped duplicate is not replayed.
    pub fn try_reserve(&self, user_id: UserId, now: Instant) -> Option<Reservation<'_>> {
        let previous = match self.slots.entry(user_id) {
            Entry::Occupied(mut slot) => {
                let previous = match *slot.get() {
                    Slot::InFlight { .. } => return None,
                    Slot::Accepted(at) if self.is_within_window(at, now) => return None,
                    Slot::Accepted(at) => Some(at),
                };
                slot.insert(Slot::InFlight { previous });
                previous
            }
            Entry::Vacant(slot) => {
                slot.insert(Slot::InFlight { previous: None });
                None
            }
        };

        Some(Reservation {
            store: self,
            user_id,
            previous,
            settled: false,
        })
    }

    /// Instant of the last recorded acceptance, ignoring in-flight attempts.
    pub fn last_accepted(&self, user_id: UserId) -> Option<Instant> {
        match *self.slots.get(&user_id)? {
            Slot::Accepted(at) => Some(at),
            Slot::InFlight { previous } => previous,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop accepted entries that can no longer suppress anything.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let mut purged = 0;
        self.slots.retain(|_, slot| {
            let keep = match *slot {
                Slot::InFlight { .. } => true,
                Slot::Accepted(at) => self.is_within_window(at, now),
            };
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }
}

/// Exclusive claim on one requester's slot while its approval is in flight.
///
/// Dropping a reservation without committing it restores the previous state.
#[derive(Debug)]
pub struct Reservation<'a> {
    store: &'a DebounceStore,
    user_id: UserId,
    previous: Option<Instant>,
    settled: bool,
}

impl Reservation<'_> {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Record `accepted_at` as the requester's last acceptance.
    pub fn commit(mut self, accepted_at: Instant) {
        self.store
            .slots
            .insert(self.user_id, Slot::Accepted(accepted_at));
        self.settled = true;
    }

    pub fn rollback(self) {}
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        match self.previous {
            Some(at) => {
                self.store.slots.insert(self.user_id, Slot::Accepted(at));
            }
            None => {
                self.store.slots.remove(&self.user_id);
            }
        }
    }
}
