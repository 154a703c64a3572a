//! Error taxonomy for the scheduler core.

use crate::utils::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Payload delivered to the host-notification collaborator when an
/// in-flight auto-reschedule cannot fit a match back into the event window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoRescheduleFailure {
    pub event_id: Uuid,
    pub event_name: String,
    pub event_end_iso: String,
    pub host_id: Uuid,
    pub match_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ScheduleError {
    /// invalid input: {0}
    #[error("invalid input: {0}")]
    Config(String),

    /// placement cannot fit all matches in the event window ({approximate_matches_needed} still unplaced)
    #[error("placement cannot fit all matches in the event window ({approximate_matches_needed} still unplaced)")]
    Infeasible {
        approximate_matches_needed: usize,
    },

    /// auto-reschedule could not re-place match {0:?} within the event window
    #[error("auto-reschedule could not re-place a match within the event window: {0:?}")]
    WindowExceeded(AutoRescheduleFailure),

    /// core invoked without an active per-event lock
    #[error("core invoked without an active per-event lock")]
    Concurrency,

    /// validation error: {0:?}
    #[error("validation error: {0:?}")]
    Validation(#[from] ValidationErrors),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

impl ScheduleError {
    pub fn config(message: impl Into<String>) -> Self {
        ScheduleError::Config(message.into())
    }

    pub fn is_concurrency_error(&self) -> bool {
        matches!(self, ScheduleError::Concurrency)
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, ScheduleError::Infeasible { .. })
    }
}
