//! # Caller Identity Module
//!
//! Identity and session management live in the platform gateway, which
//! authenticates every request and forwards the caller's identity on
//! trusted headers:
//!
//! - `x-user-id`: opaque platform user id (required)
//! - `x-user-role`: `student` or `teacher` (required)
//! - `x-user-name`: display name (optional)
//! - `x-user-level`: the student's grade level (students only)
//!
//! This module extracts those headers into a [`CallerIdentity`] and offers
//! role guards for the handlers. Requests reaching this service without the
//! identity headers did not come through the gateway and are rejected.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use labslot_core::errors::{LabError, LabResult};

use crate::middleware::error_handling::AppError;

/// Role the gateway has authenticated the caller as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
}

/// The authenticated caller, as asserted by the gateway headers.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: String,
    pub display_name: Option<String>,
    pub role: Role,
    /// Grade level; populated for students, absent for teachers.
    pub level: Option<i32>,
}

impl CallerIdentity {
    pub fn require_teacher(&self) -> LabResult<()> {
        if self.role != Role::Teacher {
            return Err(LabError::Authorization(
                "This operation requires a teacher account".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_student(&self) -> LabResult<()> {
        if self.role != Role::Student {
            return Err(LabError::Authorization(
                "This operation requires a student account".to_string(),
            ));
        }
        Ok(())
    }

    /// Display name for records written by this caller, falling back to the
    /// opaque id when the gateway sent no name.
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_str(parts, "x-user-id")
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError(LabError::Authorization(
                    "Missing x-user-id header".to_string(),
                ))
            })?;

        let role = match header_str(parts, "x-user-role") {
            Some("student") => Role::Student,
            Some("teacher") => Role::Teacher,
            Some(other) => {
                return Err(AppError(LabError::Authorization(format!(
                    "Unknown caller role: {}",
                    other
                ))));
            }
            None => {
                return Err(AppError(LabError::Authorization(
                    "Missing x-user-role header".to_string(),
                )));
            }
        };

        let display_name = header_str(parts, "x-user-name")
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty());

        let level = match header_str(parts, "x-user-level") {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                AppError(LabError::Validation(format!(
                    "Invalid x-user-level header: {}",
                    raw
                )))
            })?),
            None => None,
        };

        Ok(CallerIdentity {
            user_id,
            display_name,
            role,
            level,
        })
    }
}
