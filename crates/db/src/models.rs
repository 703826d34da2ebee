use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
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

/// Booking row; `status` holds the wire values of
/// [`labslot_core::models::booking::BookingStatus`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub student_id: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
