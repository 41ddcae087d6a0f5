//! HTTP inbound adapter exposing the shipment REST endpoints.

pub mod error;
pub mod health;
pub mod identity;
pub mod schemas;
pub mod shipments;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
