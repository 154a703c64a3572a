//! C7: per-event advisory lock. The core treats the lock as an opaque
//! collaborator — it only ever checks that a caller holds a token scoped to
//! the event it is about to mutate. Acquisition, scope to the outer
//! persistence transaction, and release on commit/abort are the
//! responsibility of `StorePort::acquire_event_lock`; the lock is
//! non-reentrant per transaction by construction (acquiring twice for the
//! same event simply yields two equal tokens, so re-presenting either to a
//! mutation path is a no-op).

use uuid::Uuid;

/// Proof that the caller holds the per-event advisory lock for `event_id`.
/// Every C5/C6 entry point requires one and refuses to proceed
/// (`ScheduleConcurrencyError`) if it does not match the event being
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLock {
    event_id: Uuid,
}

impl EventLock {
    pub fn new(event_id: Uuid) -> Self {
        Self { event_id }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn guards(&self, event_id: Uuid) -> bool {
        self.event_id == event_id
    }
}
