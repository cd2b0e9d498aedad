//! Tests for HTTP error mapping.

use std::time::Duration;

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn body_json(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds")
}

#[rstest]
#[case(Error::invalid_request("Invalid ID"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("User not found"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("This email is already in use"), StatusCode::CONFLICT)]
#[case(Error::rate_limited("slow down"), StatusCode::TOO_MANY_REQUESTS)]
#[case(Error::internal("Error while creating the user"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

#[rstest]
#[actix_web::test]
async fn body_carries_only_the_message(expected_trace_id: String) {
    let error = Error::conflict("This email is already in use").with_trace_id(expected_trace_id);
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace-id header is set by error_response")
        .to_str()
        .expect("trace-id is valid UTF-8");
    assert_eq!(header, TRACE_ID);

    assert_eq!(
        body_json(response).await,
        json!({"error": "This email is already in use"})
    );
}

#[rstest]
#[actix_web::test]
async fn trace_header_is_omitted_without_trace_id() {
    let response = ResponseError::error_response(&Error::not_found("User not found"));
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
}

#[rstest]
#[case(Duration::from_secs(42), "42")]
#[case(Duration::from_millis(1_500), "2")]
#[case(Duration::ZERO, "1")]
fn rate_limited_responses_set_retry_after(#[case] wait: Duration, #[case] expected: &str) {
    let error = Error::rate_limited("Too many requests. Please try again later.")
        .with_retry_after(wait);
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let header = response
        .headers()
        .get(RETRY_AFTER)
        .expect("Retry-After header")
        .to_str()
        .expect("ascii header");
    assert_eq!(header, expected);
}

#[rstest]
#[actix_web::test]
async fn actix_errors_are_redacted() {
    let source = actix_web::error::ErrorBadGateway("upstream socket /tmp/x.sock refused");
    let error = Error::from(source);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(
        body_json(ResponseError::error_response(&error)).await,
        json!({"error": "Internal server error"})
    );
}
