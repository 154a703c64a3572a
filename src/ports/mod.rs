mod notification;
mod store;

pub use notification::NotificationPort;
pub use store::{StoreError, StorePort, StoreResult, Transaction};
