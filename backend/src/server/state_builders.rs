//! Builders wiring the shipment service into HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;
use shipments::domain::ShipmentService;
use shipments::domain::ports::{
    FixtureShipmentRepository, ShipmentCommand, ShipmentQuery, ShipmentRepository,
};
use shipments::inbound::http::state::HttpState;
use shipments::outbound::persistence::DieselShipmentRepository;

use super::ServerConfig;

/// Split one service into its command and query port handles.
fn into_ports<R>(
    service: ShipmentService<R>,
) -> (Arc<dyn ShipmentCommand>, Arc<dyn ShipmentQuery>)
where
    R: ShipmentRepository + 'static,
{
    let service = Arc::new(service);
    (
        service.clone() as Arc<dyn ShipmentCommand>,
        service as Arc<dyn ShipmentQuery>,
    )
}

fn build_service<R>(repo: R, config: &ServerConfig) -> ShipmentService<R> {
    ShipmentService::new(
        Arc::new(repo),
        Arc::new(DefaultClock),
        config.access_policy.clone(),
    )
}

/// Build HTTP state over the Diesel repository when a pool is configured,
/// otherwise over the fixture repository.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let (shipments, shipments_query) = match &config.db_pool {
        Some(pool) => into_ports(build_service(
            DieselShipmentRepository::new(pool.clone()),
            config,
        )),
        None => into_ports(build_service(FixtureShipmentRepository, config)),
    };
    HttpState::new(shipments, shipments_query)
}
