use crate::models::DbSlot;
use chrono::Utc;
use eyre::Result;
use labslot_core::errors::{LabError, LabResult};
use labslot_core::models::slot::{validate_slot_fields, CreateSlotRequest, UpdateSlotRequest};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str = "id, teacher_id, teacher_name, level, date, start_time, end_time, \
     topic, description, location, max_students, current_bookings, is_active, created_at";

pub async fn create_slot(
    pool: &Pool<Postgres>,
    teacher_id: &str,
    teacher_name: &str,
    req: &CreateSlotRequest,
) -> Result<DbSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating slot: id={}, teacher_id={}, level={}, date={}",
        id,
        teacher_id,
        req.level,
        req.date
    );

    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        INSERT INTO slots (id, teacher_id, teacher_name, level, date, start_time, end_time,
                           topic, description, location, max_students, current_bookings,
                           is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, TRUE, $12)
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(teacher_id)
    .bind(teacher_name)
    .bind(req.level)
    .bind(req.date)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(&req.topic)
    .bind(&req.description)
    .bind(&req.location)
    .bind(req.max_students)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM slots
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Slots a student at `level` can still book: active, with seats left.
/// Recomputed per call; occupancy changes on every booking and cancel.
pub async fn list_available_by_level(pool: &Pool<Postgres>, level: i32) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM slots
        WHERE level = $1 AND is_active AND current_bookings < max_students
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(level)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn list_by_teacher(pool: &Pool<Postgres>, teacher_id: &str) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM slots
        WHERE teacher_id = $1
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Applies a partial edit. Runs under a row lock so the capacity guard
/// (`max_students` must stay >= `current_bookings`) cannot race a booking.
pub async fn update_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdateSlotRequest,
) -> LabResult<DbSlot> {
    let mut tx = pool.begin().await.map_err(eyre::Report::from)?;

    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(eyre::Report::from)?
    .ok_or_else(|| LabError::NotFound(format!("Slot with ID {} not found", id)))?;

    // Merge unset fields from the current row, then re-validate the result
    // under the same rules as creation.
    let level = changes.level.unwrap_or(slot.level);
    let date = changes.date.unwrap_or(slot.date);
    let start_time = changes.start_time.unwrap_or(slot.start_time);
    let end_time = changes.end_time.unwrap_or(slot.end_time);
    let topic = changes.topic.clone().unwrap_or(slot.topic);
    let description = changes.description.clone().or(slot.description);
    let location = changes.location.clone().unwrap_or(slot.location);
    let max_students = changes.max_students.unwrap_or(slot.max_students);

    validate_slot_fields(level, &topic, max_students, start_time, end_time)?;

    if max_students < slot.current_bookings {
        return Err(LabError::Capacity(format!(
            "Cannot set max_students to {} below the {} current bookings",
            max_students, slot.current_bookings
        )));
    }

    let updated = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        UPDATE slots
        SET level = $2, date = $3, start_time = $4, end_time = $5,
            topic = $6, description = $7, location = $8, max_students = $9
        WHERE id = $1
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(level)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .bind(&topic)
    .bind(&description)
    .bind(&location)
    .bind(max_students)
    .fetch_one(&mut *tx)
    .await
    .map_err(eyre::Report::from)?;

    tx.commit().await.map_err(eyre::Report::from)?;

    Ok(updated)
}

/// Toggles student visibility. Existing bookings are unaffected.
pub async fn set_active(
    pool: &Pool<Postgres>,
    id: Uuid,
    is_active: bool,
) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        UPDATE slots
        SET is_active = $2
        WHERE id = $1
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(is_active)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Deletes a slot. Refused while confirmed bookings exist; once only
/// cancelled history remains, slot and history go together in one
/// transaction.
pub async fn delete_slot(pool: &Pool<Postgres>, id: Uuid) -> LabResult<()> {
    let mut tx = pool.begin().await.map_err(eyre::Report::from)?;

    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(eyre::Report::from)?
    .ok_or_else(|| LabError::NotFound(format!("Slot with ID {} not found", id)))?;

    if slot.current_bookings > 0 {
        return Err(LabError::Capacity(format!(
            "Cannot delete slot with {} confirmed bookings",
            slot.current_bookings
        )));
    }

    sqlx::query("DELETE FROM bookings WHERE slot_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(eyre::Report::from)?;

    sqlx::query("DELETE FROM slots WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(eyre::Report::from)?;

    tx.commit().await.map_err(eyre::Report::from)?;

    tracing::debug!("Deleted slot: id={}", id);
    Ok(())
}

/// Claims one seat. Runs on the caller's transaction connection; the
/// conditional UPDATE keeps `current_bookings` within `max_students` even
/// without the row lock the booking path already holds.
pub async fn increment_booked(conn: &mut PgConnection, id: Uuid) -> LabResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET current_bookings = current_bookings + 1
        WHERE id = $1 AND current_bookings < max_students
        "#,
    )
    .bind(id)
    .execute(conn)
    .await
    .map_err(eyre::Report::from)?;

    if result.rows_affected() == 0 {
        return Err(LabError::SlotFull(format!(
            "Slot {} has no remaining seats",
            id
        )));
    }

    Ok(())
}

/// Releases one seat. Floors at zero; the counter never goes negative.
pub async fn decrement_booked(conn: &mut PgConnection, id: Uuid) -> LabResult<()> {
    sqlx::query(
        r#"
        UPDATE slots
        SET current_bookings = current_bookings - 1
        WHERE id = $1 AND current_bookings > 0
        "#,
    )
    .bind(id)
    .execute(conn)
    .await
    .map_err(eyre::Report::from)?;

    Ok(())
}
