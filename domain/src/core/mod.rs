//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] — typed identifiers for panel and experiment entities
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod ids;
