//! Notification port: best-effort host notification on `ScheduleWindowExceeded`.

use crate::errors::AutoRescheduleFailure;
use async_trait::async_trait;

#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Called exactly once per `ScheduleWindowExceeded`. Must not throw
    /// into the scheduler's return path — implementations that fail should
    /// log and swallow the error rather than propagate it.
    async fn notify_host_of_auto_reschedule_failure(&self, failure: AutoRescheduleFailure);
}
