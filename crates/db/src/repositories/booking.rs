use crate::models::{DbBooking, DbSlot};
use crate::repositories::slot;
use chrono::Utc;
use eyre::Result;
use labslot_core::errors::{LabError, LabResult};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, slot_id, student_id, notes, status, created_at";

/// Reserves one seat for `student_id` in `slot_id`.
///
/// The whole sequence — slot lookup, active check, duplicate check, counter
/// increment, booking insert — runs in one transaction holding the slot's
/// row lock, so two callers racing for the last seat serialize and exactly
/// one wins. Any early return drops the transaction and rolls back; a
/// failed attempt leaves no partial state.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    student_id: &str,
    notes: Option<&str>,
) -> LabResult<DbBooking> {
    let mut tx = pool.begin().await.map_err(eyre::Report::from)?;

    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, teacher_id, teacher_name, level, date, start_time, end_time,
               topic, description, location, max_students, current_bookings,
               is_active, created_at
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(eyre::Report::from)?
    .ok_or_else(|| LabError::NotFound(format!("Slot with ID {} not found", slot_id)))?;

    if !slot.is_active {
        return Err(LabError::InactiveSlot(format!(
            "Slot {} is not open for booking",
            slot_id
        )));
    }

    let existing = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM bookings
        WHERE slot_id = $1 AND student_id = $2 AND status = 'confirmed'
        "#,
    )
    .bind(slot_id)
    .bind(student_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(eyre::Report::from)?;

    if existing.is_some() {
        return Err(LabError::DuplicateBooking(format!(
            "Student {} already has a confirmed booking for slot {}",
            student_id, slot_id
        )));
    }

    slot::increment_booked(&mut tx, slot_id).await?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, slot_id, student_id, notes, status, created_at)
        VALUES ($1, $2, $3, $4, 'confirmed', $5)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(slot_id)
    .bind(student_id)
    .bind(notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(eyre::Report::from)?;

    tx.commit().await.map_err(eyre::Report::from)?;

    tracing::debug!(
        "Created booking: id={}, slot_id={}, student_id={}",
        booking.id,
        slot_id,
        student_id
    );
    Ok(booking)
}

/// Cancels a confirmed booking and releases its seat atomically.
/// Cancelling twice is a no-op surfaced as `LabError::NoOp`; the counter is
/// only decremented on the confirmed -> cancelled transition.
pub async fn cancel_booking(
    pool: &Pool<Postgres>,
    booking_id: Uuid,
    student_id: &str,
) -> LabResult<DbBooking> {
    let mut tx = pool.begin().await.map_err(eyre::Report::from)?;

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        FOR UPDATE
        "#
    ))
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(eyre::Report::from)?
    .ok_or_else(|| LabError::NotFound(format!("Booking with ID {} not found", booking_id)))?;

    if booking.student_id != student_id {
        return Err(LabError::Authorization(format!(
            "Booking {} belongs to another student",
            booking_id
        )));
    }

    if booking.status == "cancelled" {
        return Err(LabError::NoOp(format!(
            "Booking {} is already cancelled",
            booking_id
        )));
    }

    let cancelled = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = 'cancelled'
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(booking_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(eyre::Report::from)?;

    slot::decrement_booked(&mut tx, booking.slot_id).await?;

    tx.commit().await.map_err(eyre::Report::from)?;

    tracing::debug!(
        "Cancelled booking: id={}, slot_id={}, student_id={}",
        booking_id,
        booking.slot_id,
        student_id
    );
    Ok(cancelled)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// A student's full booking history, newest first. Cancelled rows are kept
/// so the caller can show past activity; filtering is a display concern.
pub async fn list_by_student(pool: &Pool<Postgres>, student_id: &str) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE student_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Roster query: confirmed bookings only, first-booked first.
pub async fn list_confirmed_by_slot(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE slot_id = $1 AND status = 'confirmed'
        ORDER BY created_at ASC
        "#
    ))
    .bind(slot_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
