//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories) expose strongly typed errors so adapters map
//! their failures into predictable variants. Driving ports (commands and
//! queries) speak in domain [`Error`](crate::domain::Error) values.

mod macros;
pub(crate) use macros::define_port_error;

mod shipment_command;
mod shipment_query;
mod shipment_repository;

#[cfg(test)]
pub use shipment_command::MockShipmentCommand;
pub use shipment_command::{CreateShipmentRequest, ShipmentCommand, UpdateShipmentStatusRequest};
#[cfg(test)]
pub use shipment_query::MockShipmentQuery;
pub use shipment_query::ShipmentQuery;
#[cfg(test)]
pub use shipment_repository::MockShipmentRepository;
pub use shipment_repository::{
    FixtureShipmentRepository, ShipmentRepository, ShipmentRepositoryError,
};
