use axum::Json;
use chrono::Utc;
use mockall::predicate;
use labslot_api::middleware::error_handling::AppError;
use labslot_core::{
    errors::LabError,
    models::booking::{BookingResponse, BookingStatus},
};
use labslot_db::models::DbBooking;
use uuid::Uuid;

use crate::test_utils::TestContext;

fn sample_db_booking(id: Uuid, slot_id: Uuid, student_id: &str, status: &str) -> DbBooking {
    DbBooking {
        id,
        slot_id,
        student_id: student_id.to_string(),
        notes: None,
        status: status.to_string(),
        created_at: Utc::now(),
    }
}

// Test wrapper mirroring the create_booking handler against the mocks
async fn test_create_booking_wrapper(
    ctx: &mut TestContext,
    slot_id: Uuid,
    student_id: &'static str,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = ctx
        .booking_repo
        .create_booking(slot_id, student_id, None)
        .await?;

    let status: BookingStatus = booking.status.parse()?;
    Ok(Json(BookingResponse {
        id: booking.id,
        slot_id: booking.slot_id,
        student_id: booking.student_id,
        notes: booking.notes,
        status,
        created_at: booking.created_at,
    }))
}

#[tokio::test]
async fn test_create_booking_success() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    // Set up booking repository mock
    ctx.booking_repo
        .expect_create_booking()
        .with(
            predicate::eq(slot_id),
            predicate::eq("student-1"),
            predicate::always(),
        )
        .returning(move |slot_id, student_id, _| {
            Ok(sample_db_booking(booking_id, slot_id, student_id, "confirmed"))
        });

    let result = test_create_booking_wrapper(&mut ctx, slot_id, "student-1").await;

    assert!(result.is_ok());
    let response = result.unwrap();
    assert_eq!(response.0.id, booking_id);
    assert_eq!(response.0.slot_id, slot_id);
    assert_eq!(response.0.student_id, "student-1");
    assert_eq!(response.0.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_create_booking_slot_full() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_create_booking()
        .returning(move |slot_id, _, _| {
            Err(LabError::SlotFull(format!(
                "Slot {} has no remaining seats",
                slot_id
            )))
        });

    let result = test_create_booking_wrapper(&mut ctx, slot_id, "student-1").await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        LabError::SlotFull(_) => {} // Expected
        e => panic!("Expected SlotFull error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_booking_duplicate() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_create_booking()
        .returning(move |slot_id, student_id, _| {
            Err(LabError::DuplicateBooking(format!(
                "Student {} already has a confirmed booking for slot {}",
                student_id, slot_id
            )))
        });

    let result = test_create_booking_wrapper(&mut ctx, slot_id, "student-1").await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        LabError::DuplicateBooking(_) => {} // Expected
        e => panic!("Expected DuplicateBooking error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_booking_inactive_slot() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_create_booking()
        .returning(move |slot_id, _, _| {
            Err(LabError::InactiveSlot(format!(
                "Slot {} is not open for booking",
                slot_id
            )))
        });

    let result = test_create_booking_wrapper(&mut ctx, slot_id, "student-1").await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        LabError::InactiveSlot(_) => {} // Expected
        e => panic!("Expected InactiveSlot error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_cancel_booking_success() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    let booking_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_cancel_booking()
        .with(predicate::eq(booking_id), predicate::eq("student-1"))
        .returning(move |booking_id, student_id| {
            Ok(sample_db_booking(booking_id, slot_id, student_id, "cancelled"))
        });

    let result = ctx.booking_repo.cancel_booking(booking_id, "student-1").await;

    assert!(result.is_ok());
    let booking = result.unwrap();
    assert_eq!(booking.status, "cancelled");
    assert_eq!(booking.slot_id, slot_id);
}

#[tokio::test]
async fn test_cancel_booking_twice_is_noop() {
    let mut ctx = TestContext::new();
    let booking_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_cancel_booking()
        .returning(move |booking_id, _| {
            Err(LabError::NoOp(format!(
                "Booking {} is already cancelled",
                booking_id
            )))
        });

    let result = ctx.booking_repo.cancel_booking(booking_id, "student-1").await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), LabError::NoOp(_)));
}

#[tokio::test]
async fn test_cancel_booking_wrong_student() {
    let mut ctx = TestContext::new();
    let booking_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_cancel_booking()
        .with(predicate::eq(booking_id), predicate::eq("student-2"))
        .returning(move |booking_id, _| {
            Err(LabError::Authorization(format!(
                "Booking {} belongs to another student",
                booking_id
            )))
        });

    let result = ctx.booking_repo.cancel_booking(booking_id, "student-2").await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), LabError::Authorization(_)));
}

#[tokio::test]
async fn test_roster_preserves_booking_order() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    // Repository returns confirmed bookings first-booked first; the
    // handler must not reorder them
    ctx.booking_repo
        .expect_list_confirmed_by_slot()
        .with(predicate::eq(slot_id))
        .returning(move |slot_id| {
            Ok(vec![
                sample_db_booking(Uuid::new_v4(), slot_id, "student-a", "confirmed"),
                sample_db_booking(Uuid::new_v4(), slot_id, "student-b", "confirmed"),
            ])
        });

    let roster = ctx.booking_repo.list_confirmed_by_slot(slot_id).await.unwrap();

    let students: Vec<&str> = roster.iter().map(|b| b.student_id.as_str()).collect();
    assert_eq!(students, vec!["student-a", "student-b"]);
}

#[tokio::test]
async fn test_booking_history_includes_cancelled() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    ctx.booking_repo
        .expect_list_by_student()
        .with(predicate::eq("student-1"))
        .returning(move |student_id| {
            Ok(vec![
                sample_db_booking(Uuid::new_v4(), slot_id, student_id, "cancelled"),
                sample_db_booking(Uuid::new_v4(), slot_id, student_id, "confirmed"),
            ])
        });

    let history = ctx.booking_repo.list_by_student("student-1").await.unwrap();

    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|b| b.status == "cancelled"));
    assert!(history.iter().any(|b| b.status == "confirmed"));
}
