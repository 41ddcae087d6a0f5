//! Shipment HTTP handlers.
//!
//! ```text
//! POST  /api/v1/shipments
//! GET   /api/v1/shipments
//! GET   /api/v1/shipments/track/{trackingNumber}
//! PATCH /api/v1/shipments/{trackingNumber}/status
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateShipmentRequest, UpdateShipmentStatusRequest};
use crate::domain::{Error, IdentityContext, Shipment, ShipmentDetailsDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ShipmentStatusSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";

const SENDER_NAME: FieldName = FieldName::new("senderName");
const SENDER_ADDRESS: FieldName = FieldName::new("senderAddress");
const RECEIVER_NAME: FieldName = FieldName::new("receiverName");
const RECEIVER_ADDRESS: FieldName = FieldName::new("receiverAddress");
const ITEM_DESCRIPTION: FieldName = FieldName::new("itemDescription");

/// Request payload for creating a shipment.
///
/// Keys are camelCase; the snake_case spellings are accepted as aliases.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequestBody {
    #[schema(example = "A")]
    #[serde(alias = "sender_name")]
    pub sender_name: Option<String>,
    #[schema(example = "Addr A")]
    #[serde(alias = "sender_address")]
    pub sender_address: Option<String>,
    #[schema(example = "B")]
    #[serde(alias = "receiver_name")]
    pub receiver_name: Option<String>,
    #[schema(example = "Addr B")]
    #[serde(alias = "receiver_address")]
    pub receiver_address: Option<String>,
    #[schema(example = "Box")]
    #[serde(alias = "item_description")]
    pub item_description: Option<String>,
}

/// Request payload for changing a shipment's status.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentStatusRequestBody {
    #[schema(value_type = Option<ShipmentStatusSchema>, example = "Shipped")]
    pub status: Option<String>,
}

/// Shipment representation returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponseBody {
    pub id: String,
    #[schema(example = "20240517T083000.000000042")]
    pub tracking_number: String,
    pub user_id: String,
    pub sender_name: String,
    pub sender_address: String,
    pub receiver_name: String,
    pub receiver_address: String,
    pub item_description: String,
    #[schema(value_type = ShipmentStatusSchema)]
    pub status: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last status change.
    pub updated_at: String,
}

impl From<Shipment> for ShipmentResponseBody {
    fn from(value: Shipment) -> Self {
        let details = value.details();
        Self {
            id: value.id().to_string(),
            tracking_number: value.tracking_number().as_str().to_owned(),
            user_id: value.owner_id().to_string(),
            sender_name: details.sender_name().to_owned(),
            sender_address: details.sender_address().to_owned(),
            receiver_name: details.receiver_name().to_owned(),
            receiver_address: details.receiver_address().to_owned(),
            item_description: details.item_description().to_owned(),
            status: value.status().as_str().to_owned(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

fn parse_create_request(payload: CreateShipmentRequestBody) -> Result<CreateShipmentRequest, Error> {
    let CreateShipmentRequestBody {
        sender_name,
        sender_address,
        receiver_name,
        receiver_address,
        item_description,
    } = payload;

    Ok(CreateShipmentRequest {
        details: ShipmentDetailsDraft {
            sender_name: require_text(sender_name, SENDER_NAME)?,
            sender_address: require_text(sender_address, SENDER_ADDRESS)?,
            receiver_name: require_text(receiver_name, RECEIVER_NAME)?,
            receiver_address: require_text(receiver_address, RECEIVER_ADDRESS)?,
            item_description: require_text(item_description, ITEM_DESCRIPTION)?,
        },
    })
}

/// Create a shipment owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = CreateShipmentRequestBody,
    responses(
        (
            status = 201,
            description = "Shipment created",
            headers(("Location" = String, description = "Tracking URL of the new shipment")),
            body = ShipmentResponseBody
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Tracking number collision", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    security(("BearerAuth" = [])),
    tags = ["shipments"],
    operation_id = "createShipment"
)]
#[post("/shipments")]
pub async fn create_shipment(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    payload: web::Json<CreateShipmentRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_request(payload.into_inner())?;
    let shipment = state.shipments.create_shipment(&identity, request).await?;
    let body = ShipmentResponseBody::from(shipment);
    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/v1/shipments/track/{}", body.tracking_number),
        ))
        .json(body))
}

/// List the caller's shipments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    responses(
        (
            status = 200,
            description = "Shipments owned by the caller",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = [ShipmentResponseBody]
        ),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    security(("BearerAuth" = [])),
    tags = ["shipments"],
    operation_id = "listShipments"
)]
#[get("/shipments")]
pub async fn list_shipments(
    state: web::Data<HttpState>,
    identity: IdentityContext,
) -> ApiResult<HttpResponse> {
    let shipments = state.shipments_query.list_owned_shipments(&identity).await?;
    let body: Vec<ShipmentResponseBody> = shipments
        .into_iter()
        .map(ShipmentResponseBody::from)
        .collect();
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, PRIVATE_NO_CACHE))
        .json(body))
}

/// Fetch a shipment by tracking number.
#[utoipa::path(
    get,
    path = "/api/v1/shipments/track/{trackingNumber}",
    params(("trackingNumber" = String, Path, description = "Shipment tracking number")),
    responses(
        (status = 200, description = "Shipment", body = ShipmentResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Shipment not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    security(("BearerAuth" = [])),
    tags = ["shipments"],
    operation_id = "trackShipment"
)]
#[get("/shipments/track/{trackingNumber}")]
pub async fn track_shipment(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let tracking_number = path.into_inner();
    let shipment = state
        .shipments_query
        .track_shipment(&identity, &tracking_number)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, PRIVATE_NO_CACHE))
        .json(ShipmentResponseBody::from(shipment)))
}

/// Assign a new status to a shipment. Requires an administrative role.
#[utoipa::path(
    patch,
    path = "/api/v1/shipments/{trackingNumber}/status",
    params(("trackingNumber" = String, Path, description = "Shipment tracking number")),
    request_body = UpdateShipmentStatusRequestBody,
    responses(
        (status = 200, description = "Updated shipment", body = ShipmentResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller lacks an administrative role", body = ErrorSchema),
        (status = 404, description = "Shipment not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    security(("BearerAuth" = [])),
    tags = ["shipments"],
    operation_id = "updateShipmentStatus"
)]
#[patch("/shipments/{trackingNumber}/status")]
pub async fn update_shipment_status(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    path: web::Path<String>,
    payload: Option<web::Json<UpdateShipmentStatusRequestBody>>,
) -> ApiResult<web::Json<ShipmentResponseBody>> {
    // Absent, unreadable or status-less bodies reach the domain as a blank
    // status so the role check runs before any body validation.
    let status = payload
        .and_then(|body| body.into_inner().status)
        .unwrap_or_default();
    let shipment = state
        .shipments
        .update_status(
            &identity,
            UpdateShipmentStatusRequest {
                tracking_number: path.into_inner(),
                status,
            },
        )
        .await?;
    Ok(web::Json(ShipmentResponseBody::from(shipment)))
}

#[cfg(test)]
#[path = "shipments_tests.rs"]
mod tests;
