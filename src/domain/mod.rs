//! Domain layer containing business entities and data-access contracts.
//!
//! - [`entities`] - URL records and visit-log entries
//! - [`repositories`] - Storage traits implemented by the infrastructure layer
//! - [`stats`] - Per-URL, per-IP aggregation of the visit log
//!
//! The domain layer does not depend on infrastructure or HTTP types.

pub mod entities;
pub mod repositories;
pub mod stats;
