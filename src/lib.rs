//! # cimdb - CIM network model persistence
//!
//! Stores and reloads power-system network models (IEC CIM / CGMES) in a
//! relational store and rebuilds the object graph on the way back.
//!
//! cimdb provides:
//! - Reflection-free, name-indexed attribute access for every CIM class
//! - Per-class SQLite tables behind a type-tag registry (`ClassMap`)
//! - A persistence service that saves objects batched by type
//! - A single-pass linker that turns rdf:ID references back into object links
//! - A JSON interchange reader/writer for moving models in and out

pub mod attribute;
pub mod cim;
pub mod config;
pub mod convert;
pub mod directory;
pub mod graph;
pub mod interchange;
pub mod linker;
pub mod model;
pub mod object;
pub mod output;
pub mod reference;
pub mod service;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use attribute::{AttributeDescriptor, AttributeKind, AttributeTable, AttributeValue, ValueType};
pub use directory::{ModelRepository, ObjectInfo, TypeDirectory};
pub use graph::{ModelGraph, ObjectId};
pub use interchange::{InterchangeReader, JsonInterchange};
pub use linker::{DiagnosticSink, LinkReport, ObjectLinker, TracingSink};
pub use model::CimModel;
pub use object::{CimClass, CimObject, ObjectBase};
pub use reference::{ObjectRef, Reference, ReferenceSet};
pub use service::{CimModelService, LinkMode};
pub use storage::{ClassMap, SqliteStore};

/// Result type alias for cimdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cimdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown attribute '{attribute}' for class {class}")]
    UnknownAttribute { class: &'static str, attribute: String },

    #[error("Unknown CIM class: {0}")]
    UnknownClass(String),

    #[error("Expected a {expected} object, found {found}")]
    WrongClass {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Malformed value for {attribute}: '{value}'")]
    MalformedValue { attribute: &'static str, value: String },

    #[error("Type mismatch for {attribute}: expected one of {expected:?}, found {found}")]
    TypeMismatch {
        attribute: &'static str,
        expected: &'static [&'static str],
        found: String,
    },

    #[error("Attribute {attribute} does not hold an object reference")]
    NotAReference { attribute: &'static str },

    #[error("Value of {attribute} has the wrong shape for its declared kind")]
    InvalidValueShape { attribute: &'static str },

    #[error("CIM model not found: {0}")]
    ModelNotFound(i64),

    #[error("Object {0} is not attached to a saved CIM model")]
    MissingModel(String),

    #[error("Interchange error: {0}")]
    Interchange(String),
}
