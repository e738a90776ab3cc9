//! Static schema registry for entity and operation shapes.
//!
//! # Responsibility
//! - Declare exposed fields per entity with their semantic types.
//! - Declare every named operation with its inputs and output type.
//!
//! # Invariants
//! - The registry is built once per process and never mutated.
//! - Lookups are pure; unknown names fail with typed errors.

pub mod registry;

pub use registry::{
    entity_schema, registry, EntitySchema, FieldSpec, FieldType, InputField, OperationKind,
    OperationSpec, OutputType, SchemaError, SchemaRegistry,
};
