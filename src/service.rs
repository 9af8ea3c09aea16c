//! CIM model service - save, read-with-linking and delete of whole models
//!
//! Objects are always moved through the store one type at a time: saving
//! partitions the input by type tag, reading loads every type of the model
//! before a single linking pass runs over the complete graph.

use crate::directory::{ModelRepository, TypeDirectory};
use crate::graph::ModelGraph;
use crate::interchange::InterchangeReader;
use crate::linker::{DiagnosticSink, ObjectLinker, TracingSink};
use crate::model::CimModel;
use crate::object::CimObject;
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use std::sync::Arc;

/// Whether a read resolves references into object links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    #[default]
    Linked,
    /// Leave reference attributes as raw rdf:IDs
    Unlinked,
}

impl From<bool> for LinkMode {
    fn from(link_objects: bool) -> Self {
        if link_objects {
            LinkMode::Linked
        } else {
            LinkMode::Unlinked
        }
    }
}

pub struct CimModelService<S> {
    store: S,
    sink: Arc<dyn DiagnosticSink>,
}

impl<S: TypeDirectory + ModelRepository> CimModelService<S> {
    /// Service reporting link diagnostics through `tracing`
    pub fn new(store: S) -> Self {
        Self::with_sink(store, Arc::new(TracingSink))
    }

    pub fn with_sink(store: S, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ========== Inventory ==========

    /// Storage id → type tag for every object of the model
    pub fn get_cim_object_infos(&self, cim_model_id: i64) -> Result<BTreeMap<i64, String>> {
        Ok(self
            .store
            .find_objects(cim_model_id)?
            .into_iter()
            .map(|info| (info.id, info.cim_type))
            .collect())
    }

    /// Type tag → storage ids (ascending) for every object of the model
    pub fn get_object_inventory(&self, cim_model_id: i64) -> Result<BTreeMap<String, Vec<i64>>> {
        let mut inventory: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for info in self.store.find_objects(cim_model_id)? {
            inventory.entry(info.cim_type).or_default().push(info.id);
        }
        for ids in inventory.values_mut() {
            ids.sort_unstable();
        }
        Ok(inventory)
    }

    // ========== Save ==========

    /// Save a single object into `model`
    pub fn save_cim_object(
        &mut self,
        model: &mut CimModel,
        object: Box<dyn CimObject>,
    ) -> Result<Box<dyn CimObject>> {
        let rdfid = object.rdfid().to_string();
        self.save_cim_objects(model, vec![object])?
            .pop()
            .ok_or(Error::MissingModel(rdfid))
    }

    /// Save the model row, then the objects batched by type.
    ///
    /// Batches run in the order their type first appears; the result is the
    /// concatenation of the saved batches.
    pub fn save_cim_objects(
        &mut self,
        model: &mut CimModel,
        objects: impl IntoIterator<Item = Box<dyn CimObject>>,
    ) -> Result<Vec<Box<dyn CimObject>>> {
        let cim_model_id = self.persist_model(model)?;
        self.save_grouped(cim_model_id, objects)
    }

    /// Save the model and its own collection, then delete objects removed
    /// from it since the last save.
    ///
    /// The collection is regrouped by type. On error it keeps every object
    /// and the removed objects stay queued.
    pub fn save_cim_model(&mut self, model: &mut CimModel) -> Result<i64> {
        let cim_model_id = self.persist_model(model)?;
        let saved = self.save_in_place(cim_model_id, model.objects_mut())?;
        tracing::info!("Saved {} objects into model {}", saved, cim_model_id);

        let orphans = model.orphans().to_vec();
        if !orphans.is_empty() {
            let mut by_type: BTreeMap<&'static str, Vec<i64>> = BTreeMap::new();
            for (cim_type, id) in orphans {
                by_type.entry(cim_type).or_default().push(id);
            }
            for (cim_type, ids) in &by_type {
                self.store.delete_batch(cim_type, ids)?;
            }
            model.clear_orphans();
            tracing::debug!("Removed {} orphaned object types", by_type.len());
        }
        Ok(cim_model_id)
    }

    /// Save a model together with the objects a reader extracts from `payload`
    pub fn save_cim_model_from_payload(
        &mut self,
        model: &mut CimModel,
        payload: &str,
        reader: &dyn InterchangeReader,
    ) -> Result<Vec<Box<dyn CimObject>>> {
        let objects = reader.read(payload)?;
        let saved = self.save_cim_objects(model, objects.into_values())?;

        if let Some(cim_model_id) = model.cim_model_id {
            for (cim_type, ids) in self.get_object_inventory(cim_model_id)? {
                tracing::debug!("Model {}: {} x {}", cim_model_id, ids.len(), cim_type);
            }
        }
        Ok(saved)
    }

    fn persist_model(&mut self, model: &mut CimModel) -> Result<i64> {
        let cim_model_id = self.store.save_model(model)?;
        model.set_cim_model_id(cim_model_id);
        Ok(cim_model_id)
    }

    fn save_grouped(
        &mut self,
        cim_model_id: i64,
        objects: impl IntoIterator<Item = Box<dyn CimObject>>,
    ) -> Result<Vec<Box<dyn CimObject>>> {
        let mut objects: Vec<Box<dyn CimObject>> = objects.into_iter().collect();
        let saved = self.save_in_place(cim_model_id, &mut objects)?;
        tracing::info!("Saved {} objects into model {}", saved, cim_model_id);
        Ok(objects)
    }

    /// Regroup `objects` by type and save one batch per type. Storage ids
    /// are written into the objects; nothing is moved out of the slice.
    fn save_in_place(
        &mut self,
        cim_model_id: i64,
        objects: &mut [Box<dyn CimObject>],
    ) -> Result<usize> {
        for (cim_type, range) in group_by_type(objects) {
            let batch = &mut objects[range];
            for object in batch.iter_mut() {
                object.set_cim_model_id(cim_model_id);
            }
            tracing::debug!("Saving {} {} objects", batch.len(), cim_type);
            self.store.save_batch(cim_type, batch)?;
        }
        Ok(objects.len())
    }

    // ========== Read ==========

    /// Load every object of a model and, unless disabled, link references.
    ///
    /// Dangling references and link failures never fail the read; they are
    /// reported to the sink and collected in [`ModelGraph::link_report`].
    pub fn read_cim_objects(&self, cim_model_id: i64, mode: LinkMode) -> Result<ModelGraph> {
        if !self.store.model_exists(cim_model_id)? {
            return Err(Error::ModelNotFound(cim_model_id));
        }

        let mut graph = ModelGraph::new(Some(cim_model_id));
        for (cim_type, ids) in self.get_object_inventory(cim_model_id)? {
            let objects = self.store.load_batch(&cim_type, &ids)?;
            tracing::debug!("Loaded {} {} objects", objects.len(), cim_type);
            for object in objects {
                graph.insert(object);
            }
        }

        if mode == LinkMode::Linked {
            let report = ObjectLinker::new(self.sink.as_ref()).run(&mut graph);
            tracing::info!(
                "Read model {}: {} objects, {} links, {} dangling, {} failed",
                cim_model_id,
                graph.len(),
                report.resolved,
                report.dangling.len(),
                report.failures.len()
            );
            graph.set_link_report(report);
        } else {
            tracing::info!("Read model {}: {} objects (unlinked)", cim_model_id, graph.len());
        }
        Ok(graph)
    }

    // ========== Delete ==========

    /// Delete a model and everything it owns.
    ///
    /// Returns `false` without touching any object when the model does not
    /// exist, so deleting twice is harmless.
    pub fn delete_cim_model(&mut self, cim_model_id: i64) -> Result<bool> {
        if !self.store.model_exists(cim_model_id)? {
            tracing::debug!("Model {} not found, nothing to delete", cim_model_id);
            return Ok(false);
        }

        for (cim_type, ids) in self.get_object_inventory(cim_model_id)? {
            self.store.delete_batch(&cim_type, &ids)?;
        }
        let removed = self.store.delete_model(cim_model_id)?;
        tracing::info!("Deleted model {}", cim_model_id);
        Ok(removed)
    }
}

/// Stable-sort by the position where each type tag first appears and
/// return the contiguous range of every type.
fn group_by_type(objects: &mut [Box<dyn CimObject>]) -> Vec<(&'static str, Range<usize>)> {
    let mut rank: HashMap<&'static str, usize> = HashMap::new();
    for object in objects.iter() {
        let next = rank.len();
        rank.entry(object.cim_type()).or_insert(next);
    }
    objects.sort_by_key(|object| rank[&object.cim_type()]);

    let mut groups: Vec<(&'static str, Range<usize>)> = Vec::with_capacity(rank.len());
    for (index, object) in objects.iter().enumerate() {
        match groups.last_mut() {
            Some((cim_type, range)) if *cim_type == object.cim_type() => range.end = index + 1,
            _ => groups.push((object.cim_type(), index..index + 1)),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::{BusbarSection, Terminal};
    use crate::object::CimClass;
    use crate::storage::SqliteStore;

    #[test]
    fn test_group_by_type_keeps_order() {
        let mut objects: Vec<Box<dyn CimObject>> = vec![
            Box::new(Terminal::with_rdfid("_t1")),
            Box::new(BusbarSection::with_rdfid("_b1")),
            Box::new(Terminal::with_rdfid("_t2")),
        ];
        let groups = group_by_type(&mut objects);
        assert_eq!(groups, vec![("Terminal", 0..2), ("BusbarSection", 2..3)]);
        let rdfids: Vec<&str> = objects.iter().map(|o| o.rdfid()).collect();
        assert_eq!(rdfids, vec!["_t1", "_t2", "_b1"]);
    }

    #[test]
    fn test_link_mode_from_flag() {
        assert_eq!(LinkMode::from(true), LinkMode::Linked);
        assert_eq!(LinkMode::from(false), LinkMode::Unlinked);
    }

    #[test]
    fn test_read_unknown_model() {
        let service = CimModelService::new(SqliteStore::open_in_memory().unwrap());
        assert!(matches!(
            service.read_cim_objects(99, LinkMode::Linked),
            Err(Error::ModelNotFound(99))
        ));
    }

    #[test]
    fn test_save_model_removes_orphans() {
        let mut service = CimModelService::new(SqliteStore::open_in_memory().unwrap());
        let mut model = CimModel::new("grid");
        model.add_object(Box::new(Terminal::with_rdfid("_t1")));
        model.add_object(Box::new(BusbarSection::with_rdfid("_b1")));
        let id = service.save_cim_model(&mut model).unwrap();
        assert!(model.objects().iter().all(|o| o.id().is_some()));
        assert_eq!(service.get_cim_object_infos(id).unwrap().len(), 2);

        model.remove_object("_t1").unwrap();
        service.save_cim_model(&mut model).unwrap();

        let inventory = service.get_object_inventory(id).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory["BusbarSection"].len(), 1);
        assert!(model.orphans().is_empty());
    }

    #[test]
    fn test_failed_model_save_keeps_collection_and_orphans() {
        let mut service = CimModelService::new(SqliteStore::open_in_memory().unwrap());
        let mut model = CimModel::new("grid");
        model.add_object(Box::new(Terminal::with_rdfid("_t1")));
        model.add_object(Box::new(Terminal::with_rdfid("_t2")));
        let id = service.save_cim_model(&mut model).unwrap();

        model.remove_object("_t2").unwrap();
        // A second, unsaved object claiming an rdf:ID the model already stores
        model.add_object(Box::new(Terminal::with_rdfid("_t1")));
        model.add_object(Box::new(BusbarSection::with_rdfid("_b1")));

        assert!(matches!(
            service.save_cim_model(&mut model),
            Err(Error::Storage(_))
        ));
        assert_eq!(model.len(), 3);
        assert_eq!(model.orphans().len(), 1);
        assert_eq!(model.orphans()[0].0, "Terminal");

        // The removed terminal is still stored until a save succeeds
        let inventory = service.get_object_inventory(id).unwrap();
        assert_eq!(inventory["Terminal"].len(), 2);
    }
}
