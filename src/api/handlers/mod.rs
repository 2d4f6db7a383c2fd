//! HTTP request handlers for API endpoints.
//!
//! Shorten, update, delete, redirect and list under `/api/v1/urls`, plus `/health`.

pub mod health;
pub mod list;
pub mod redirect;
pub mod shorten;
pub mod urls;

pub use health::health_handler;
pub use list::list_urls_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use urls::{delete_url_handler, update_url_handler};
