//! Typed query/mutation gateway over Category, Book and Grocery records.
//!
//! Callers address records by entity name; the gateway validates arguments
//! against the static schema registry and persists through an
//! [`EntityStore`] (SQLite in production, in-memory in tests).

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use config::{Config, ConfigError, DatabaseConfig, LoggingConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::book::Book;
pub use model::category::Category;
pub use model::entity::{EntityKind, RecordId};
pub use model::grocery::Grocery;
pub use model::record::EntityRecord;
pub use model::value::{FieldError, FieldValue, FieldValues};
pub use repo::memory_store::InMemoryStore;
pub use repo::sqlite_store::SqliteStore;
pub use repo::store::{EntityStore, RepoError, RepoResult};
pub use schema::{registry, SchemaError, SchemaRegistry};
pub use service::gateway::{GatewayError, GatewayResult, OperationGateway, OperationOutput};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
