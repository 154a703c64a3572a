//! `SchedulerContext` holds the scheduler's collaborators. Built through a
//! typestate builder so a context cannot be constructed without both ports
//! wired, mirroring how the rest of the platform wires its core.

use crate::ports::{NotificationPort, StorePort};
use std::sync::Arc;

pub struct SchedulerContext {
    pub store: Arc<dyn StorePort>,
    pub notifier: Arc<dyn NotificationPort>,
    /// Mirrors `SCHEDULER_DEBUG`; gates whether placement diagnostics log
    /// at `debug` rather than `trace`.
    pub debug: bool,
}

impl SchedulerContext {
    pub fn from_env(store: Arc<dyn StorePort>, notifier: Arc<dyn NotificationPort>) -> Self {
        let debug = std::env::var("SCHEDULER_DEBUG")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            store,
            notifier,
            debug,
        }
    }
}

pub struct NoStore {}
pub struct NoNotifier {}

pub struct DynStore(Arc<dyn StorePort>);
pub struct DynNotifier(Arc<dyn NotificationPort>);

pub struct SchedulerContextBuilder<S, N> {
    state_store: S,
    state_notifier: N,
    debug: bool,
}

impl SchedulerContextBuilder<NoStore, NoNotifier> {
    pub fn new() -> Self {
        SchedulerContextBuilder {
            state_store: NoStore {},
            state_notifier: NoNotifier {},
            debug: false,
        }
    }
}

impl Default for SchedulerContextBuilder<NoStore, NoNotifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N> SchedulerContextBuilder<S, N> {
    pub fn set_store(self, store: Arc<dyn StorePort>) -> SchedulerContextBuilder<DynStore, N> {
        SchedulerContextBuilder {
            state_store: DynStore(store),
            state_notifier: self.state_notifier,
            debug: self.debug,
        }
    }

    pub fn set_notifier(self, notifier: Arc<dyn NotificationPort>) -> SchedulerContextBuilder<S, DynNotifier> {
        SchedulerContextBuilder {
            state_store: self.state_store,
            state_notifier: DynNotifier(notifier),
            debug: self.debug,
        }
    }

    pub fn set_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl SchedulerContextBuilder<DynStore, DynNotifier> {
    pub fn build(self) -> SchedulerContext {
        SchedulerContext {
            store: self.state_store.0,
            notifier: self.state_notifier.0,
            debug: self.debug,
        }
    }
}
