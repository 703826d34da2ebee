use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LabError, LabResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub teacher_id: String,
    pub teacher_name: String,
    pub level: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub topic: String,
    pub description: Option<String>,
    pub location: String,
    pub max_students: i32,
    pub current_bookings: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Shared field validation for slot creation and edits.
///
/// The date is not checked against the clock; teachers may backfill past
/// sessions, and the UI applies its own future-only rule.
pub fn validate_slot_fields(
    level: i32,
    topic: &str,
    max_students: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> LabResult<()> {
    if topic.trim().is_empty() {
        return Err(LabError::Validation("Topic must not be empty".to_string()));
    }
    if level < 1 {
        return Err(LabError::Validation(format!(
            "Level must be a positive integer, got {}",
            level
        )));
    }
    if max_students < 1 {
        return Err(LabError::Validation(format!(
            "max_students must be at least 1, got {}",
            max_students
        )));
    }
    if end_time <= start_time {
        return Err(LabError::Validation(
            "end_time must be after start_time".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub level: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub topic: String,
    pub description: Option<String>,
    pub location: String,
    pub max_students: i32,
}

impl CreateSlotRequest {
    pub fn validate(&self) -> LabResult<()> {
        validate_slot_fields(
            self.level,
            &self.topic,
            self.max_students,
            self.start_time,
            self.end_time,
        )
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub level: Option<i32>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub topic: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub max_students: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub teacher_id: String,
    pub teacher_name: String,
    pub level: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub topic: String,
    pub description: Option<String>,
    pub location: String,
    pub max_students: i32,
    pub current_bookings: i32,
    pub seats_available: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub slots: Vec<SlotResponse>,
}
