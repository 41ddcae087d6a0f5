//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the shipment and health endpoints, the schema
//! wrappers from [`crate::inbound::http::schemas`] and a `BearerAuth` JWT
//! security scheme. Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, ShipmentStatusSchema};
use crate::inbound::http::shipments::{
    CreateShipmentRequestBody, ShipmentResponseBody, UpdateShipmentStatusRequestBody,
};

/// Name of the bearer-token security scheme referenced by shipment paths.
pub const BEARER_AUTH: &str = "BearerAuth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "HS256 access token carrying `sub` and optional `role_code` claims.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the shipment tracking API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Shipment tracking API",
        description = "Create, list, track and update shipments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::shipments::create_shipment,
        crate::inbound::http::shipments::list_shipments,
        crate::inbound::http::shipments::track_shipment,
        crate::inbound::http::shipments::update_shipment_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ShipmentStatusSchema,
        ShipmentResponseBody,
        CreateShipmentRequestBody,
        UpdateShipmentStatusRequestBody
    )),
    tags(
        (name = "shipments", description = "Shipment lifecycle operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
