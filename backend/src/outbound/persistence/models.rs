//! Diesel row structs for the shipments table.
//!
//! These types are adapter-internal; repositories convert them into domain
//! values before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::shipments;

/// Row struct for reading shipment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shipments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShipmentRow {
    pub id: Uuid,
    pub tracking_number: String,
    pub user_id: Uuid,
    pub sender_name: String,
    pub sender_address: String,
    pub receiver_name: String,
    pub receiver_address: String,
    pub item_description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating shipment records.
///
/// Timestamps are left to column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shipments)]
pub(crate) struct NewShipmentRow<'a> {
    pub id: Uuid,
    pub tracking_number: &'a str,
    pub user_id: Uuid,
    pub sender_name: &'a str,
    pub sender_address: &'a str,
    pub receiver_name: &'a str,
    pub receiver_address: &'a str,
    pub item_description: &'a str,
    pub status: &'a str,
}
