//! Shipment lifecycle service.
//!
//! Implements the shipment driving ports: creation with tracking-number
//! minting, owner listings, lookups, and role-gated status assignment.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateShipmentRequest, ShipmentCommand, ShipmentQuery, ShipmentRepository,
    ShipmentRepositoryError, UpdateShipmentStatusRequest,
};
use crate::domain::{
    AccessPolicy, Capability, Error, IdentityContext, NewShipment, Shipment, ShipmentDetails,
    ShipmentId, ShipmentStatus, ShipmentValidationError, TrackingNumber,
};

fn map_repository_error(error: ShipmentRepositoryError) -> Error {
    match error {
        ShipmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("shipment repository unavailable: {message}"))
        }
        ShipmentRepositoryError::Query { message } => {
            Error::internal(format!("shipment repository error: {message}"))
        }
        ShipmentRepositoryError::DuplicateTrackingNumber { tracking_number } => {
            Error::conflict("tracking number already exists")
                .with_details(json!({ "trackingNumber": tracking_number }))
        }
    }
}

fn map_validation_error(error: &ShipmentValidationError) -> Error {
    let field = match error {
        ShipmentValidationError::EmptyField { field } => field.as_str(),
        ShipmentValidationError::EmptyTrackingNumber => "trackingNumber",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "empty_field",
    }))
}

fn parse_assignable_status(raw: &str) -> Result<ShipmentStatus, Error> {
    match raw.parse::<ShipmentStatus>() {
        Ok(status) if status.is_assignable() => Ok(status),
        _ => Err(Error::invalid_request(
            "status must be one of Shipped, InTransit, Delivered, Cancelled",
        )
        .with_details(json!({
            "field": "status",
            "value": raw,
            "code": "invalid_status",
        }))),
    }
}

/// Shipment service implementing the command and query driving ports.
#[derive(Clone)]
pub struct ShipmentService<R> {
    shipment_repo: Arc<R>,
    clock: Arc<dyn Clock>,
    access_policy: Arc<dyn AccessPolicy>,
}

impl<R> ShipmentService<R> {
    /// Create a service over a repository, a clock for tracking numbers and
    /// the policy gating status updates.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use shipments::domain::ports::FixtureShipmentRepository;
    /// # use shipments::domain::{RoleAccessPolicy, ShipmentService};
    /// let service = ShipmentService::new(
    ///     Arc::new(FixtureShipmentRepository),
    ///     Arc::new(DefaultClock),
    ///     Arc::new(RoleAccessPolicy::default()),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        shipment_repo: Arc<R>,
        clock: Arc<dyn Clock>,
        access_policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            shipment_repo,
            clock,
            access_policy,
        }
    }
}

#[async_trait]
impl<R> ShipmentCommand for ShipmentService<R>
where
    R: ShipmentRepository,
{
    async fn create_shipment(
        &self,
        identity: &IdentityContext,
        request: CreateShipmentRequest,
    ) -> Result<Shipment, Error> {
        let details = ShipmentDetails::try_from_parts(request.details)
            .map_err(|err| map_validation_error(&err))?;

        let tracking_number = TrackingNumber::from_instant(self.clock.utc());
        let new_shipment = NewShipment::new(
            ShipmentId::random(),
            tracking_number,
            *identity.owner_id(),
            details,
        );

        let shipment = self
            .shipment_repo
            .insert(&new_shipment)
            .await
            .map_err(map_repository_error)?;

        info!(
            shipment_id = %shipment.id(),
            tracking_number = %shipment.tracking_number(),
            owner_id = %shipment.owner_id(),
            "shipment created"
        );
        Ok(shipment)
    }

    async fn update_status(
        &self,
        identity: &IdentityContext,
        request: UpdateShipmentStatusRequest,
    ) -> Result<Shipment, Error> {
        if !self
            .access_policy
            .permits(identity.role(), Capability::UpdateShipmentStatus)
        {
            warn!(
                owner_id = %identity.owner_id(),
                role = %identity.role(),
                "status update denied"
            );
            return Err(Error::forbidden(
                "insufficient role to update shipment status",
            ));
        }

        let tracking_number = TrackingNumber::new(&request.tracking_number)
            .map_err(|err| map_validation_error(&err))?;
        let status = parse_assignable_status(request.status.as_str())?;

        let shipment = self
            .shipment_repo
            .update_status(&tracking_number, status)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("shipment not found"))?;

        info!(
            tracking_number = %shipment.tracking_number(),
            status = %shipment.status(),
            updated_by = %identity.owner_id(),
            "shipment status updated"
        );
        Ok(shipment)
    }
}

#[async_trait]
impl<R> ShipmentQuery for ShipmentService<R>
where
    R: ShipmentRepository,
{
    async fn list_owned_shipments(
        &self,
        identity: &IdentityContext,
    ) -> Result<Vec<Shipment>, Error> {
        self.shipment_repo
            .list_by_owner(identity.owner_id())
            .await
            .map_err(map_repository_error)
    }

    async fn track_shipment(
        &self,
        _identity: &IdentityContext,
        tracking_number: &str,
    ) -> Result<Shipment, Error> {
        let tracking_number =
            TrackingNumber::new(tracking_number).map_err(|err| map_validation_error(&err))?;

        self.shipment_repo
            .find_by_tracking_number(&tracking_number)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("shipment not found"))
    }
}

#[cfg(test)]
#[path = "shipment_service_tests.rs"]
mod tests;
