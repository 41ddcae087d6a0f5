//! Inbound adapters translating external requests into domain port calls.
//!
//! Framework details stay at this edge; the domain only sees typed requests
//! and an [`IdentityContext`](crate::domain::IdentityContext).

pub mod http;
