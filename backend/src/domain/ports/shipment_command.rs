//! Driving port for shipment mutations.
//!
//! Inbound adapters call this port to create shipments and to assign new
//! statuses. Both operations receive the caller's identity explicitly.

use async_trait::async_trait;

use crate::domain::{Error, IdentityContext, Shipment, ShipmentDetailsDraft};

/// Request to create a shipment owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateShipmentRequest {
    /// Sender, receiver and contents, validated by the service.
    pub details: ShipmentDetailsDraft,
}

/// Request to assign a new status to an existing shipment.
///
/// Both fields are raw caller input; the service validates them after the
/// role check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateShipmentStatusRequest {
    /// Tracking number of the shipment to update.
    pub tracking_number: String,
    /// Requested status name.
    pub status: String,
}

/// Domain use-case port for shipment mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentCommand: Send + Sync {
    /// Create a shipment with status `Created` owned by `identity`.
    async fn create_shipment(
        &self,
        identity: &IdentityContext,
        request: CreateShipmentRequest,
    ) -> Result<Shipment, Error>;

    /// Assign a new status. Requires the status-update capability.
    async fn update_status(
        &self,
        identity: &IdentityContext,
        request: UpdateShipmentStatusRequest,
    ) -> Result<Shipment, Error>;
}
