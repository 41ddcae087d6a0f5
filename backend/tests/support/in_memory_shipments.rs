//! In-memory shipment store and controllable clock for behaviour tests.
//!
//! The store enforces the same unique tracking-number rule as the
//! PostgreSQL schema and counts status writes so scenarios can assert that
//! rejected updates never reach persistence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;
use shipments::domain::ports::{ShipmentRepository, ShipmentRepositoryError};
use shipments::domain::{NewShipment, Shipment, ShipmentStatus, TrackingNumber, UserId};

/// Clock that only moves when told to.
pub(crate) struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub(crate) fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub(crate) fn advance(&self, step: Duration) {
        let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shipment store backed by a vector.
pub(crate) struct InMemoryShipmentRepository {
    records: Mutex<Vec<Shipment>>,
    clock: Arc<SteppingClock>,
    status_writes: AtomicUsize,
}

impl InMemoryShipmentRepository {
    pub(crate) fn new(clock: Arc<SteppingClock>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            clock,
            status_writes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }

    pub(crate) fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryShipmentRepository {
    async fn insert(&self, shipment: &NewShipment) -> Result<Shipment, ShipmentRepositoryError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records
            .iter()
            .any(|record| record.tracking_number() == shipment.tracking_number())
        {
            return Err(ShipmentRepositoryError::duplicate_tracking_number(
                shipment.tracking_number().as_str(),
            ));
        }
        let stored = shipment.clone().into_shipment(self.clock.utc());
        records.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .iter()
            .find(|record| record.tracking_number() == tracking_number)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Shipment>, ShipmentRepositoryError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut owned: Vec<Shipment> = records
            .iter()
            .filter(|record| record.owner_id() == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().as_uuid().cmp(a.id().as_uuid()))
        });
        Ok(owned)
    }

    async fn update_status(
        &self,
        tracking_number: &TrackingNumber,
        status: ShipmentStatus,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.utc();
        Ok(records
            .iter_mut()
            .find(|record| record.tracking_number() == tracking_number)
            .map(|record| {
                *record = record.clone().with_status(status, now);
                record.clone()
            }))
    }
}
