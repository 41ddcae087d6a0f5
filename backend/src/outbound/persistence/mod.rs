//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the shipment
//! repository port backed by PostgreSQL via Diesel with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types. No lifecycle rules reside here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map to
//!   `ShipmentRepositoryError` variants.
//!
//! # Example
//!
//! ```no_run
//! use shipments::outbound::persistence::{DbPool, DieselShipmentRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), shipments::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/logistic_db")).await?;
//! let repo = DieselShipmentRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_shipment_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_shipment_repository::DieselShipmentRepository;
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_blocking,
};
pub use pool::{DbPool, PoolConfig, PoolError};
