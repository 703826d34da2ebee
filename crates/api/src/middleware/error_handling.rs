//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the labslot
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! The booking-domain variants (`Capacity`, `SlotFull`, `DuplicateBooking`,
//! `InactiveSlot`, `NoOp`) all describe a state conflict between the request
//! and the current slot/booking state, and map to 409.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use labslot_core::errors::LabError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `LabError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub LabError);

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            LabError::NotFound(_) => StatusCode::NOT_FOUND,
            LabError::Validation(_) => StatusCode::BAD_REQUEST,
            LabError::Authorization(_) => StatusCode::FORBIDDEN,
            LabError::Capacity(_) => StatusCode::CONFLICT,
            LabError::SlotFull(_) => StatusCode::CONFLICT,
            LabError::DuplicateBooking(_) => StatusCode::CONFLICT,
            LabError::InactiveSlot(_) => StatusCode::CONFLICT,
            LabError::NoOp(_) => StatusCode::CONFLICT,
            LabError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LabError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from LabError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, LabError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<LabError> for AppError {
    fn from(err: LabError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Wraps the eyre error in a `LabError::Database` variant so repository
/// failures can propagate with `?`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(LabError::Database(err))
    }
}
