//! Type Directory - per-type batch persistence the service is written against
//!
//! The service never touches SQL. It partitions objects by type tag and
//! hands each partition to a [`TypeDirectory`]; model rows and the
//! model-scoped inventory go through [`ModelRepository`].

use crate::model::CimModel;
use crate::object::CimObject;
use crate::Result;
use serde::Serialize;

/// One row of the model inventory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ObjectInfo {
    pub id: i64,
    pub cim_type: String,
}

impl ObjectInfo {
    pub fn new(id: i64, cim_type: impl Into<String>) -> Self {
        Self {
            id,
            cim_type: cim_type.into(),
        }
    }
}

/// Batched save/load/delete of objects of one concrete type.
pub trait TypeDirectory {
    /// Persist objects that all carry `cim_type`. Objects without a storage
    /// id are inserted and get their id set in place.
    fn save_batch(&mut self, cim_type: &str, objects: &mut [Box<dyn CimObject>]) -> Result<()>;

    /// Load objects by storage id. Reference attributes come back unlinked.
    fn load_batch(&self, cim_type: &str, ids: &[i64]) -> Result<Vec<Box<dyn CimObject>>>;

    fn delete_batch(&mut self, cim_type: &str, ids: &[i64]) -> Result<()>;
}

/// Model rows and the model-scoped inventory query.
pub trait ModelRepository {
    /// Insert or update the model row and return its id
    fn save_model(&mut self, model: &CimModel) -> Result<i64>;

    fn model_exists(&self, cim_model_id: i64) -> Result<bool>;

    /// Remove the model row; `false` if there was none
    fn delete_model(&mut self, cim_model_id: i64) -> Result<bool>;

    /// (id, type) of every object owned by the model, ids ascending
    fn find_objects(&self, cim_model_id: i64) -> Result<Vec<ObjectInfo>>;
}
