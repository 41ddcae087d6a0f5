//! Translate domain errors into HTTP responses.
//!
//! The domain error stays transport-agnostic; this module decides the status
//! code, the response headers and what a client is allowed to see.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias used by every shipment handler.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned to clients in place of internal failure details.
pub(crate) const REDACTED_MESSAGE: &str = "Internal server error";

/// Bearer challenge sent with `401 Unauthorized` responses.
const BEARER_CHALLENGE: &str = "Bearer";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Strip message and details from internal errors, keeping the trace id.
fn redact_if_internal(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(
                trace_id = self.trace_id(),
                message = self.message(),
                details = ?self.details(),
                "request failed with internal error"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if self.code() == ErrorCode::Unauthorized {
            builder.insert_header((header::WWW_AUTHENTICATE, BEARER_CHALLENGE));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
