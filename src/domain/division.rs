use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A grouping of teams that compete only against each other in the regular
/// season. Skill/age metadata is opaque to the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Division {
    id: Uuid,
    name: String,
    metadata: Option<Value>,
}

impl Division {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: crate::utils::normalize_ws(&name.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}
