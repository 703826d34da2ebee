use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use labslot_core::{
    errors::LabError,
    models::booking::{
        BookingListResponse, BookingResponse, BookingStatus, CancelBookingResponse,
        CreateBookingRequest, RosterEntry, RosterResponse,
    },
};
use labslot_db::models::DbBooking;
use uuid::Uuid;

use crate::{
    middleware::{auth::CallerIdentity, error_handling::AppError},
    ApiState,
};

fn to_response(booking: DbBooking) -> Result<BookingResponse, LabError> {
    let status: BookingStatus = booking.status.parse()?;
    Ok(BookingResponse {
        id: booking.id,
        slot_id: booking.slot_id,
        student_id: booking.student_id,
        notes: booking.notes,
        status,
        created_at: booking.created_at,
    })
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    caller.require_student()?;

    let db_booking = labslot_db::repositories::booking::create_booking(
        &state.db_pool,
        payload.slot_id,
        &caller.user_id,
        payload.notes.as_deref(),
    )
    .await?;

    Ok(Json(to_response(db_booking)?))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    caller.require_student()?;

    let db_booking =
        labslot_db::repositories::booking::cancel_booking(&state.db_pool, id, &caller.user_id)
            .await?;

    Ok(Json(CancelBookingResponse {
        id: db_booking.id,
        slot_id: db_booking.slot_id,
        status: db_booking.status.parse()?,
    }))
}

#[axum::debug_handler]
pub async fn list_my_bookings(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
) -> Result<Json<BookingListResponse>, AppError> {
    caller.require_student()?;

    let bookings =
        labslot_db::repositories::booking::list_by_student(&state.db_pool, &caller.user_id)
            .await
            .map_err(LabError::Database)?;

    let bookings = bookings
        .into_iter()
        .map(to_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(BookingListResponse { bookings }))
}

/// Teacher roster view: confirmed bookings for one of the caller's slots,
/// first-booked first.
#[axum::debug_handler]
pub async fn slot_roster(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterResponse>, AppError> {
    caller.require_teacher()?;

    let slot = labslot_db::repositories::slot::get_slot_by_id(&state.db_pool, id)
        .await
        .map_err(LabError::Database)?
        .ok_or_else(|| LabError::NotFound(format!("Slot with ID {} not found", id)))?;

    if slot.teacher_id != caller.user_id {
        return Err(AppError(LabError::Authorization(
            "Only the owning teacher may view this roster".to_string(),
        )));
    }

    let bookings = labslot_db::repositories::booking::list_confirmed_by_slot(&state.db_pool, id)
        .await
        .map_err(LabError::Database)?;

    Ok(Json(RosterResponse {
        slot_id: id,
        bookings: bookings
            .into_iter()
            .map(|b| RosterEntry {
                booking_id: b.id,
                student_id: b.student_id,
                notes: b.notes,
                booked_at: b.created_at,
            })
            .collect(),
    }))
}
