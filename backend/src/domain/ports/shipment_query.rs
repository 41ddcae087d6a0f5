//! Driving port for shipment reads.

use async_trait::async_trait;

use crate::domain::{Error, IdentityContext, Shipment};

/// Domain use-case port for reading shipments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentQuery: Send + Sync {
    /// Shipments owned by the caller, newest first. Empty is not an error.
    async fn list_owned_shipments(&self, identity: &IdentityContext)
    -> Result<Vec<Shipment>, Error>;

    /// Look up any shipment by tracking number.
    ///
    /// Blank input is `invalid_request`; an unknown number is `not_found`.
    async fn track_shipment(
        &self,
        identity: &IdentityContext,
        tracking_number: &str,
    ) -> Result<Shipment, Error>;
}
