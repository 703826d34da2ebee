use axum::extract::FromRequestParts;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use labslot_api::middleware::auth::{CallerIdentity, Role};
use labslot_api::middleware::error_handling::AppError;
use labslot_core::errors::LabError;

async fn extract_identity(request: Request<()>) -> Result<CallerIdentity, AppError> {
    let (mut parts, _) = request.into_parts();
    CallerIdentity::from_request_parts(&mut parts, &()).await
}

#[test]
fn test_error_status_mapping() {
    let cases = vec![
        (LabError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
        (LabError::Validation("x".to_string()), StatusCode::BAD_REQUEST),
        (LabError::Authorization("x".to_string()), StatusCode::FORBIDDEN),
        (LabError::Capacity("x".to_string()), StatusCode::CONFLICT),
        (LabError::SlotFull("x".to_string()), StatusCode::CONFLICT),
        (LabError::DuplicateBooking("x".to_string()), StatusCode::CONFLICT),
        (LabError::InactiveSlot("x".to_string()), StatusCode::CONFLICT),
        (LabError::NoOp("x".to_string()), StatusCode::CONFLICT),
        (
            LabError::Database(eyre::eyre!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        let response = AppError(error).into_response();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_identity_extraction_student() {
    let request = Request::builder()
        .uri("/api/bookings")
        .header("x-user-id", "s-17")
        .header("x-user-role", "student")
        .header("x-user-name", "Dana Whitfield")
        .header("x-user-level", "3")
        .body(())
        .unwrap();

    let caller = extract_identity(request).await.unwrap();

    assert_eq!(caller.user_id, "s-17");
    assert_eq!(caller.role, Role::Student);
    assert_eq!(caller.display_name.as_deref(), Some("Dana Whitfield"));
    assert_eq!(caller.level, Some(3));
    assert!(caller.require_student().is_ok());
    assert!(caller.require_teacher().is_err());
}

#[tokio::test]
async fn test_identity_extraction_teacher_without_level() {
    let request = Request::builder()
        .uri("/api/slots")
        .header("x-user-id", "t-4")
        .header("x-user-role", "teacher")
        .body(())
        .unwrap();

    let caller = extract_identity(request).await.unwrap();

    assert_eq!(caller.role, Role::Teacher);
    assert_eq!(caller.level, None);
    // No display name header: records fall back to the opaque id
    assert_eq!(caller.display_name_or_id(), "t-4");
}

#[tokio::test]
async fn test_identity_extraction_missing_user_id() {
    let request = Request::builder()
        .uri("/api/slots")
        .header("x-user-role", "teacher")
        .body(())
        .unwrap();

    let result = extract_identity(request).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        LabError::Authorization(_) => {} // Expected
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_identity_extraction_unknown_role() {
    let request = Request::builder()
        .uri("/api/slots")
        .header("x-user-id", "u-1")
        .header("x-user-role", "admin")
        .body(())
        .unwrap();

    let result = extract_identity(request).await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err().0, LabError::Authorization(_)));
}

#[tokio::test]
async fn test_identity_extraction_bad_level() {
    let request = Request::builder()
        .uri("/api/slots/available")
        .header("x-user-id", "s-17")
        .header("x-user-role", "student")
        .header("x-user-level", "three")
        .body(())
        .unwrap();

    let result = extract_identity(request).await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err().0, LabError::Validation(_)));
}
