//! Gateway services.
//!
//! # Responsibility
//! - Validate caller arguments against the schema registry.
//! - Dispatch to store implementations and map their outcomes.
//! - Keep transport layers decoupled from storage details.

mod coerce;
pub mod gateway;
