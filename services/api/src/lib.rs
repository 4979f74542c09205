//! services/api/src/lib.rs
//!
//! The HTTP surface of the page builder: configuration, the Postgres adapter
//! and the axum router. The binaries in `src/bin` are thin wrappers around it.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
