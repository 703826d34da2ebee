use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", post(handlers::slot::create_slot))
        .route("/api/slots/available", get(handlers::slot::list_available))
        .route("/api/slots/mine", get(handlers::slot::list_my_slots))
        .route("/api/slots/:id", get(handlers::slot::get_slot))
        .route("/api/slots/:id", put(handlers::slot::update_slot))
        .route("/api/slots/:id", delete(handlers::slot::delete_slot))
        .route(
            "/api/slots/:id/active",
            put(handlers::slot::set_slot_active),
        )
}
