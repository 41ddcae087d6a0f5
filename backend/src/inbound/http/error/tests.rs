//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("pool exhausted while decoding row")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"table": "shipments"}))
}

fn respond(error: &Error) -> (StatusCode, HttpResponse) {
    let response = ResponseError::error_response(error);
    (response.status(), response)
}

async fn decode(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error payload decodes")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no token"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("duplicate"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(internal_error: Error) {
    let (status, response) = respond(&internal_error);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace-id header present")
        .to_str()
        .expect("header is ascii")
        .to_owned();
    assert_eq!(header, TRACE_ID);

    let payload = decode(response).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), REDACTED_MESSAGE);
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::conflict("tracking number already exists")
        .with_details(json!({"trackingNumber": "20240517T083000.000000042"}));

    let (status, response) = respond(&error);
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    let payload = decode(response).await;
    assert_eq!(payload.message(), "tracking number already exists");
    assert_eq!(
        payload.details(),
        Some(&json!({"trackingNumber": "20240517T083000.000000042"}))
    );
}

#[rstest]
fn unauthorized_responses_carry_bearer_challenge() {
    let (_, response) = respond(&Error::unauthorized("missing bearer token"));
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .expect("challenge header present");
    assert_eq!(challenge, "Bearer");
}

#[rstest]
fn forbidden_responses_omit_bearer_challenge() {
    let (_, response) = respond(&Error::forbidden("insufficient role"));
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
}

#[rstest]
fn redaction_leaves_non_internal_errors_untouched() {
    let error = Error::not_found("shipment not found").with_trace_id(TRACE_ID);
    assert_eq!(redact_if_internal(&error), error);
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), REDACTED_MESSAGE);
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}
