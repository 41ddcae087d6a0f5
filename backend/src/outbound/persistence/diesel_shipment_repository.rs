//! PostgreSQL-backed `ShipmentRepository` implementation using Diesel ORM.
//!
//! Rows are converted through validated domain constructors; a row whose
//! status or text fields fail validation surfaces as a query error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ShipmentRepository, ShipmentRepositoryError};
use crate::domain::{
    NewShipment, Shipment, ShipmentDetails, ShipmentDetailsDraft, ShipmentDraft, ShipmentId,
    ShipmentStatus, TrackingNumber, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewShipmentRow, ShipmentRow};
use super::pool::DbPool;
use super::schema::shipments;

/// Diesel-backed implementation of the shipment repository port.
#[derive(Clone)]
pub struct DieselShipmentRepository {
    pool: DbPool,
}

impl DieselShipmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row into a validated domain shipment.
fn row_to_shipment(row: ShipmentRow) -> Result<Shipment, ShipmentRepositoryError> {
    let ShipmentRow {
        id,
        tracking_number,
        user_id,
        sender_name,
        sender_address,
        receiver_name,
        receiver_address,
        item_description,
        status,
        created_at,
        updated_at,
    } = row;

    let tracking_number = TrackingNumber::new(tracking_number)
        .map_err(|err| ShipmentRepositoryError::query(format!("decode tracking_number: {err}")))?;
    let status = status
        .parse::<ShipmentStatus>()
        .map_err(|err| ShipmentRepositoryError::query(format!("decode status: {err}")))?;
    let details = ShipmentDetails::try_from_parts(ShipmentDetailsDraft {
        sender_name,
        sender_address,
        receiver_name,
        receiver_address,
        item_description,
    })
    .map_err(|err| ShipmentRepositoryError::query(format!("decode details: {err}")))?;

    Ok(Shipment::new(ShipmentDraft {
        id: ShipmentId::from_uuid(id),
        tracking_number,
        owner_id: UserId::from_uuid(user_id),
        details,
        status,
        created_at,
        updated_at,
    }))
}

#[async_trait]
impl ShipmentRepository for DieselShipmentRepository {
    async fn insert(&self, shipment: &NewShipment) -> Result<Shipment, ShipmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = shipment.details();
        let tracking_number = shipment.tracking_number().as_str();

        let new_row = NewShipmentRow {
            id: *shipment.id().as_uuid(),
            tracking_number,
            user_id: *shipment.owner_id().as_uuid(),
            sender_name: details.sender_name(),
            sender_address: details.sender_address(),
            receiver_name: details.receiver_name(),
            receiver_address: details.receiver_address(),
            item_description: details.item_description(),
            status: shipment.status().as_str(),
        };

        let row = diesel::insert_into(shipments::table)
            .values(&new_row)
            .returning(ShipmentRow::as_returning())
            .get_result::<ShipmentRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(tracking_number)))?;

        row_to_shipment(row)
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = shipments::table
            .filter(shipments::tracking_number.eq(tracking_number.as_str()))
            .select(ShipmentRow::as_select())
            .first::<ShipmentRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_shipment).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Shipment>, ShipmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ShipmentRow> = shipments::table
            .filter(shipments::user_id.eq(owner_id.as_uuid()))
            .order((shipments::created_at.desc(), shipments::id.desc()))
            .select(ShipmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_shipment).collect()
    }

    async fn update_status(
        &self,
        tracking_number: &TrackingNumber,
        status: ShipmentStatus,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            shipments::table.filter(shipments::tracking_number.eq(tracking_number.as_str())),
        )
        .set((
            shipments::status.eq(status.as_str()),
            shipments::updated_at.eq(diesel::dsl::now),
        ))
        .returning(ShipmentRow::as_returning())
        .get_result::<ShipmentRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, None))?;

        row.map(row_to_shipment).transpose()
    }
}
