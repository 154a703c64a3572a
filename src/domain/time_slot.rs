use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which field(s) a template is bound to. `Any` means "any field that
/// supports the match's division", resolved at placement time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldBinding {
    Any,
    Single(Uuid),
    Multiple(Vec<Uuid>),
}

/// A recurring weekly template, expanded by C4 into concrete
/// [`WeeklyInterval`]s at scheduling time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    id: Uuid,
    /// Monday-based 0..6.
    day_of_week: u8,
    days_of_week: Option<Vec<u8>>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    repeating: bool,
    start_time_minutes: u32,
    end_time_minutes: u32,
    field_binding: FieldBinding,
    division_id: Option<Uuid>,
}

impl TimeSlot {
    pub fn new(id: Uuid, day_of_week: u8, start_time_minutes: u32, end_time_minutes: u32) -> Self {
        Self {
            id,
            day_of_week: day_of_week % 7,
            days_of_week: None,
            start_date: None,
            end_date: None,
            repeating: true,
            start_time_minutes,
            end_time_minutes,
            field_binding: FieldBinding::Any,
            division_id: None,
        }
    }

    pub fn with_days_of_week(mut self, days: Vec<u8>) -> Self {
        self.days_of_week = Some(days);
        self
    }

    pub fn with_window(mut self, start_date: Option<DateTime<Utc>>, end_date: Option<DateTime<Utc>>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn with_field_binding(mut self, binding: FieldBinding) -> Self {
        self.field_binding = binding;
        self
    }

    pub fn with_division(mut self, division_id: Uuid) -> Self {
        self.division_id = Some(division_id);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn days(&self) -> Vec<u8> {
        self.days_of_week
            .clone()
            .unwrap_or_else(|| vec![self.day_of_week])
    }

    pub fn start_time_minutes(&self) -> u32 {
        self.start_time_minutes
    }

    pub fn end_time_minutes(&self) -> u32 {
        self.end_time_minutes
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn field_binding(&self) -> &FieldBinding {
        &self.field_binding
    }

    pub fn division_id(&self) -> Option<Uuid> {
        self.division_id
    }

    pub fn applies_to_division(&self, division_id: Uuid) -> bool {
        self.division_id.is_none_or(|d| d == division_id)
    }
}

/// A concrete `(field, start, end)` occurrence derived from a [`TimeSlot`].
/// `field = None` marks a floating interval that may bind to any field
/// supporting the placed match's division.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeeklyInterval {
    pub field: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub template_id: Uuid,
    /// Carried from the originating template's `division_id`; `None` means
    /// the occurrence is open to any division.
    pub division: Option<Uuid>,
}

impl WeeklyInterval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}
