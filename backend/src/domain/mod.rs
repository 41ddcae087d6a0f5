//! Domain primitives, services and ports.
//!
//! Purpose: define the shipment lifecycle independently of HTTP and
//! PostgreSQL. Adapters depend on this module; it depends on neither.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`Shipment`], [`TrackingNumber`], [`ShipmentStatus`]: the aggregate and
//!   its value types.
//! - [`IdentityContext`], [`UserId`], [`Role`]: the caller of an operation.
//! - [`AccessPolicy`], [`RoleAccessPolicy`]: who may assign statuses.
//! - [`ShipmentService`]: implementation of the driving ports in [`ports`].

pub mod authorization;
pub mod error;
pub mod identity;
pub mod ports;
pub mod shipment;
mod shipment_service;
pub mod trace_id;

#[cfg(test)]
pub use self::authorization::MockAccessPolicy;
pub use self::authorization::{AccessPolicy, Capability, DEFAULT_ADMIN_ROLE, RoleAccessPolicy};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{IdentityContext, IdentityValidationError, Role, UserId};
pub use self::shipment::{
    NewShipment, ParseShipmentStatusError, Shipment, ShipmentDetails, ShipmentDetailsDraft,
    ShipmentDraft, ShipmentField, ShipmentId, ShipmentStatus, ShipmentValidationError,
    TRACKING_NUMBER_LEN, TrackingNumber,
};
pub use self::shipment_service::ShipmentService;
pub use self::trace_id::TraceId;
