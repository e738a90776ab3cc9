//! Store abstraction and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract the gateway calls through.
//! - Isolate SQLite query details from the gateway.
//!
//! # Invariants
//! - Stores return semantic errors (`NotFound`) in addition to DB transport
//!   errors.
//! - Stores assign `id` and `date_created`; input maps never carry them.

pub mod memory_store;
pub mod sqlite_store;
pub mod store;
