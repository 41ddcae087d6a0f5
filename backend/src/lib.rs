//! Shipment tracking backend library.
//!
//! Hexagonal layout: `domain` holds the lifecycle rules and ports,
//! `inbound::http` adapts actix-web requests onto the driving ports and
//! `outbound::persistence` implements the repository port over PostgreSQL.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
