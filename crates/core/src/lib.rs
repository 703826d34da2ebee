//! # Labslot Core
//!
//! Domain types for the lab-session booking service: slot and booking
//! models, the request/response shapes exchanged with the API layer, and
//! the shared error taxonomy.
//!
//! This crate is persistence-agnostic; the `labslot-db` crate maps these
//! types onto PostgreSQL rows.

pub mod errors;
pub mod models;
