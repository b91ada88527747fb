//! Shared wire types for the Mini CRM deposit ingestion service.
//!
//! The HTTP client lives behind the `client` feature so the server can depend
//! on the types without pulling in `reqwest`.

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
