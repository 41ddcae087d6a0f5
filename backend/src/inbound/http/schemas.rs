//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers below mirror their wire shape so utoipa can document them from
//! the inbound adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested shipment does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The tracking number is already taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// The shipment store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "senderName must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ShipmentStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ShipmentStatus)]
pub enum ShipmentStatusSchema {
    /// Initial status assigned on creation.
    Created,
    Shipped,
    InTransit,
    Delivered,
    Cancelled,
}
