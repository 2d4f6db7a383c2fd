//! Core domain entities.
//!
//! - [`UrlRecord`] - A short identifier mapped to an original URL
//! - [`Visit`] - One entry of the append-only visit log
//!
//! Creation inputs live in separate structs (`NewUrlRecord`, `NewVisit`) and
//! updates in [`UrlPatch`].

pub mod url_record;
pub mod visit;

pub use url_record::{AccessOutcome, NewUrlRecord, UrlPatch, UrlRecord};
pub use visit::{NewVisit, Visit, VisitorInfo};
