//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_validator`] - Target URL validation
//! - [`request_origin`] - Public origin and client IP resolution from HTTP headers

pub mod code_generator;
pub mod request_origin;
pub mod url_validator;
