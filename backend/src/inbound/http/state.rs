//! Shared HTTP adapter state.
//!
//! Handlers depend on the driving ports only, so tests can swap in mocks and
//! the server can choose between database-backed and fixture services.

use std::sync::Arc;

use crate::domain::ports::{ShipmentCommand, ShipmentQuery};

/// Port handles injected into every shipment handler.
#[derive(Clone)]
pub struct HttpState {
    pub shipments: Arc<dyn ShipmentCommand>,
    pub shipments_query: Arc<dyn ShipmentQuery>,
}

impl HttpState {
    pub fn new(shipments: Arc<dyn ShipmentCommand>, shipments_query: Arc<dyn ShipmentQuery>) -> Self {
        Self {
            shipments,
            shipments_query,
        }
    }
}
