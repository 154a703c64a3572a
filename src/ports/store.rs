//! Store port: the relational collaborator consumed by C5/C6.

use crate::domain::{Event, EventGraph, Match, Team};
use crate::lock::EventLock;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// entity not found
    #[error("entity not found")]
    NotFound,

    /// optimistic lock conflict
    #[error("optimistic lock conflict")]
    OptimisticLockConflict,

    /// connection, pool, or other store errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// An opaque handle to the outer persistence transaction. Implementations
/// define what this actually is (a connection, a transaction guard); the
/// core never inspects it.
pub trait Transaction: Send + Sync {}

#[async_trait]
pub trait StorePort: Send + Sync {
    async fn load_event_with_relations(&self, event_id: Uuid) -> StoreResult<EventGraph>;

    /// Replaces all matches for an event atomically with the provided set;
    /// idempotent given the same input.
    async fn save_matches(&self, event_id: Uuid, matches: &[Match]) -> StoreResult<()>;

    /// Persists only `wins`/`losses`.
    async fn save_team_records(&self, teams: &[Team]) -> StoreResult<()>;

    /// Persists any event-level fields the scheduler updated (e.g. the
    /// effective `end` if extended).
    async fn save_event_schedule(&self, event: &Event) -> StoreResult<()>;

    async fn delete_matches_by_event(&self, event_id: Uuid) -> StoreResult<()>;

    /// Acquires the per-event advisory lock, scoped to `tx`. A nested call
    /// for the same `event_id` within the same transaction is a no-op and
    /// returns an equal token; the lock releases when `tx` ends, commit or
    /// abort.
    async fn acquire_event_lock(&self, tx: &dyn Transaction, event_id: Uuid) -> StoreResult<EventLock>;
}
