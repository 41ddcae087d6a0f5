//! Port for shipment persistence.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{NewShipment, Shipment, ShipmentStatus, TrackingNumber, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by shipment repository adapters.
    pub enum ShipmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "shipment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "shipment repository query failed: {message}",
        /// Another shipment already holds the tracking number.
        DuplicateTrackingNumber { tracking_number: String } =>
            "tracking number already exists: {tracking_number}",
    }
}

/// Port for storing and reading shipment records.
///
/// Implementations assign `created_at` and `updated_at`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Insert a new shipment and return the stored record.
    ///
    /// Fails with `DuplicateTrackingNumber` when the tracking number is taken.
    async fn insert(&self, shipment: &NewShipment) -> Result<Shipment, ShipmentRepositoryError>;

    /// Find a shipment by exact tracking number.
    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError>;

    /// List an owner's shipments, newest first (ties broken by id, descending).
    async fn list_by_owner(&self, owner_id: &UserId)
    -> Result<Vec<Shipment>, ShipmentRepositoryError>;

    /// Set the status and refresh `updated_at` in one step.
    ///
    /// Returns `None` when no shipment carries the tracking number.
    async fn update_status(
        &self,
        tracking_number: &TrackingNumber,
        status: ShipmentStatus,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError>;
}

/// Fixture implementation for running the server without a database.
///
/// Inserts echo the record back, lookups find nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShipmentRepository;

#[async_trait]
impl ShipmentRepository for FixtureShipmentRepository {
    async fn insert(&self, shipment: &NewShipment) -> Result<Shipment, ShipmentRepositoryError> {
        Ok(shipment.clone().into_shipment(Utc::now()))
    }

    async fn find_by_tracking_number(
        &self,
        _tracking_number: &TrackingNumber,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        Ok(None)
    }

    async fn list_by_owner(
        &self,
        _owner_id: &UserId,
    ) -> Result<Vec<Shipment>, ShipmentRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        _tracking_number: &TrackingNumber,
        _status: ShipmentStatus,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        Ok(None)
    }
}
