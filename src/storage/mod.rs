//! Storage Layer - SQLite-backed persistence
//!
//! Tables:
//! - cim_model(id, name)
//! - base_class(id, rdfid, cim_type, cim_model_id)
//! - one table per registered class, keyed by base_class.id
//! - one join table per used reference-set attribute (owner_id, target_rdfid)

pub mod class_map;
pub mod schema;
pub mod sqlite;
pub mod table;

pub use class_map::ClassMap;
pub use sqlite::{DbStats, ModelSummary, SqliteStore};
pub use table::{AttributeInfo, ClassTable, TableStore};
