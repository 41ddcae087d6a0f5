//! Diesel and pool error mapping for shipment repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::ShipmentRepositoryError;

use super::pool::PoolError;

/// Name of the unique constraint guarding tracking numbers.
const TRACKING_NUMBER_CONSTRAINT: &str = "shipments_tracking_number_key";

/// Map pool failures to connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> ShipmentRepositoryError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    ShipmentRepositoryError::connection(message)
}

/// Map Diesel failures to repository errors.
///
/// `tracking_number` is reported when an insert trips the unique constraint.
pub(crate) fn map_diesel_error(
    error: DieselError,
    tracking_number: Option<&str>,
) -> ShipmentRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info
                .constraint_name()
                .is_none_or(|name| name == TRACKING_NUMBER_CONSTRAINT) =>
        {
            ShipmentRepositoryError::duplicate_tracking_number(tracking_number.unwrap_or_default())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ShipmentRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => ShipmentRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ShipmentRepositoryError::query("database query error"),
        DieselError::DeserializationError(err) => {
            ShipmentRepositoryError::query(format!("row decode failed: {err}"))
        }
        _ => ShipmentRepositoryError::query("database error"),
    }
}
