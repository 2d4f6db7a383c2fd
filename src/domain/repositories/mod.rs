//! Repository trait definitions for the domain layer.
//!
//! Traits define the data-access contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated with
//! `mockall` for service tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - URL records: creation, lookup, alias updates, soft delete,
//!   quota-checked visit counting
//! - [`VisitRepository`] - Append-only visit log

pub mod url_repository;
pub mod visit_repository;

pub use url_repository::UrlRepository;
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
