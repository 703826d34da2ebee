use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use labslot_core::{
    errors::LabError,
    models::slot::{
        CreateSlotRequest, SetActiveRequest, SlotListResponse, SlotResponse, UpdateSlotRequest,
    },
};
use labslot_db::models::DbSlot;
use uuid::Uuid;

use crate::{
    middleware::{auth::{CallerIdentity, Role}, error_handling::AppError},
    ApiState,
};

fn to_response(slot: DbSlot) -> SlotResponse {
    SlotResponse {
        seats_available: slot.max_students - slot.current_bookings,
        id: slot.id,
        teacher_id: slot.teacher_id,
        teacher_name: slot.teacher_name,
        level: slot.level,
        date: slot.date,
        start_time: slot.start_time,
        end_time: slot.end_time,
        topic: slot.topic,
        description: slot.description,
        location: slot.location,
        max_students: slot.max_students,
        current_bookings: slot.current_bookings,
        is_active: slot.is_active,
        created_at: slot.created_at,
    }
}

/// Loads a slot and checks that `caller` is its owning teacher.
async fn load_owned_slot(
    state: &ApiState,
    id: Uuid,
    caller: &CallerIdentity,
) -> Result<DbSlot, AppError> {
    let slot = labslot_db::repositories::slot::get_slot_by_id(&state.db_pool, id)
        .await
        .map_err(LabError::Database)?
        .ok_or_else(|| LabError::NotFound(format!("Slot with ID {} not found", id)))?;

    if slot.teacher_id != caller.user_id {
        return Err(AppError(LabError::Authorization(
            "Only the owning teacher may manage this slot".to_string(),
        )));
    }

    Ok(slot)
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    caller.require_teacher()?;
    payload.validate()?;

    let db_slot = labslot_db::repositories::slot::create_slot(
        &state.db_pool,
        &caller.user_id,
        caller.display_name_or_id(),
        &payload,
    )
    .await
    .map_err(LabError::Database)?;

    Ok(Json(to_response(db_slot)))
}

#[axum::debug_handler]
pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<SlotResponse>, AppError> {
    let db_slot = labslot_db::repositories::slot::get_slot_by_id(&state.db_pool, id)
        .await
        .map_err(LabError::Database)?
        .ok_or_else(|| LabError::NotFound(format!("Slot with ID {} not found", id)))?;

    Ok(Json(to_response(db_slot)))
}

/// Query parameters for the available-slots listing.
#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    /// Grade level to list; teachers must pass it, students are scoped to
    /// their own level.
    pub level: Option<i32>,
}

#[axum::debug_handler]
pub async fn list_available(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Query(query): Query<AvailableQuery>,
) -> Result<Json<SlotListResponse>, AppError> {
    let level = match caller.role {
        Role::Student => caller.level.ok_or_else(|| {
            LabError::Validation("Student caller has no level assigned".to_string())
        })?,
        Role::Teacher => query.level.ok_or_else(|| {
            LabError::Validation("level query parameter is required".to_string())
        })?,
    };

    let slots = labslot_db::repositories::slot::list_available_by_level(&state.db_pool, level)
        .await
        .map_err(LabError::Database)?;

    Ok(Json(SlotListResponse {
        slots: slots.into_iter().map(to_response).collect(),
    }))
}

#[axum::debug_handler]
pub async fn list_my_slots(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
) -> Result<Json<SlotListResponse>, AppError> {
    caller.require_teacher()?;

    let slots = labslot_db::repositories::slot::list_by_teacher(&state.db_pool, &caller.user_id)
        .await
        .map_err(LabError::Database)?;

    Ok(Json(SlotListResponse {
        slots: slots.into_iter().map(to_response).collect(),
    }))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    caller.require_teacher()?;
    load_owned_slot(&state, id, &caller).await?;

    // Field validation and the capacity guard run inside the repository's
    // row-locking transaction.
    let db_slot = labslot_db::repositories::slot::update_slot(&state.db_pool, id, &payload).await?;

    Ok(Json(to_response(db_slot)))
}

#[axum::debug_handler]
pub async fn set_slot_active(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<SlotResponse>, AppError> {
    caller.require_teacher()?;
    load_owned_slot(&state, id, &caller).await?;

    let db_slot = labslot_db::repositories::slot::set_active(&state.db_pool, id, payload.is_active)
        .await
        .map_err(LabError::Database)?
        .ok_or_else(|| LabError::NotFound(format!("Slot with ID {} not found", id)))?;

    Ok(Json(to_response(db_slot)))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    caller.require_teacher()?;
    load_owned_slot(&state, id, &caller).await?;

    labslot_db::repositories::slot::delete_slot(&state.db_pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
