use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Which divisions a field may host. `All` is the sentinel for an empty or
/// absent restriction set — the field qualifies for every division.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldDivisions {
    All,
    Only(HashSet<Uuid>),
}

impl FieldDivisions {
    pub fn supports(&self, division_id: Uuid) -> bool {
        match self {
            FieldDivisions::All => true,
            FieldDivisions::Only(set) => set.is_empty() || set.contains(&division_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayingField {
    id: Uuid,
    field_number: u32,
    divisions: FieldDivisions,
    name: String,
}

impl PlayingField {
    pub fn new(id: Uuid, field_number: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            field_number,
            divisions: FieldDivisions::All,
            name: crate::utils::normalize_ws(&name.into()),
        }
    }

    pub fn with_divisions(mut self, divisions: FieldDivisions) -> Self {
        self.divisions = divisions;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn field_number(&self) -> u32 {
        self.field_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supports(&self, division_id: Uuid) -> bool {
        self.divisions.supports(division_id)
    }
}
