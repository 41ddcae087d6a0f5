//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed shipment repository using Diesel ORM.
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod persistence;
