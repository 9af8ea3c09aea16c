//! Model Graph - the in-memory result of reading a CIM model
//!
//! Objects live in an arena in load order; [`ObjectId`] is their position.
//! An rdf:ID index gives the model-scoped identity map the linker resolves
//! references against.

use crate::linker::LinkReport;
use crate::object::CimObject;
use crate::reference::ObjectRef;
use serde::Serialize;
use std::collections::BTreeMap;

/// Position of an object inside a [`ModelGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectId(pub usize);

/// All objects of one CIM model, indexed by rdf:ID.
#[derive(Debug, Default)]
pub struct ModelGraph {
    cim_model_id: Option<i64>,
    objects: Vec<Box<dyn CimObject>>,
    by_rdfid: BTreeMap<String, ObjectId>,
    link_report: LinkReport,
}

impl ModelGraph {
    pub fn new(cim_model_id: Option<i64>) -> Self {
        Self {
            cim_model_id,
            ..Self::default()
        }
    }

    pub fn cim_model_id(&self) -> Option<i64> {
        self.cim_model_id
    }

    /// Add an object. A later object with the same rdf:ID replaces the
    /// earlier one in the index; both stay in the arena.
    pub fn insert(&mut self, object: Box<dyn CimObject>) -> ObjectId {
        let id = ObjectId(self.objects.len());
        let rdfid = object.rdfid().to_string();
        if let Some(previous) = self.by_rdfid.insert(rdfid.clone(), id) {
            tracing::warn!(
                "Duplicate rdf:ID {} in model {:?} (objects {} and {})",
                rdfid,
                self.cim_model_id,
                previous.0,
                id.0
            );
        }
        self.objects.push(object);
        id
    }

    /// Look up an object by rdf:ID
    pub fn get(&self, rdfid: &str) -> Option<&dyn CimObject> {
        self.by_rdfid
            .get(rdfid)
            .and_then(|id| self.object(*id))
    }

    pub fn get_mut(&mut self, rdfid: &str) -> Option<&mut dyn CimObject> {
        let id = *self.by_rdfid.get(rdfid)?;
        self.object_mut(id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&dyn CimObject> {
        self.objects.get(id.0).map(|o| o.as_ref())
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut dyn CimObject> {
        match self.objects.get_mut(id.0) {
            Some(object) => Some(object.as_mut()),
            None => None,
        }
    }

    /// Follow a link to the live object
    pub fn resolve(&self, target: &ObjectRef) -> Option<&dyn CimObject> {
        self.object(target.object)
    }

    /// Handle for the object with this rdf:ID
    pub fn object_ref(&self, rdfid: &str) -> Option<ObjectRef> {
        let id = *self.by_rdfid.get(rdfid)?;
        let object = self.object(id)?;
        Some(ObjectRef::new(id, rdfid, object.cim_type()))
    }

    /// The rdf:ID → object index, sorted by rdf:ID
    pub fn identity_map(&self) -> BTreeMap<String, ObjectRef> {
        self.by_rdfid
            .iter()
            .filter_map(|(rdfid, id)| {
                self.object(*id)
                    .map(|o| (rdfid.clone(), ObjectRef::new(*id, rdfid.clone(), o.cim_type())))
            })
            .collect()
    }

    /// Objects in load order
    pub fn iter(&self) -> impl Iterator<Item = &dyn CimObject> {
        self.objects.iter().map(|o| o.as_ref())
    }

    pub(crate) fn objects_mut(&mut self) -> &mut [Box<dyn CimObject>] {
        &mut self.objects
    }

    pub fn rdfids(&self) -> impl Iterator<Item = &str> {
        self.by_rdfid.keys().map(String::as_str)
    }

    pub fn contains(&self, rdfid: &str) -> bool {
        self.by_rdfid.contains_key(rdfid)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects per CIM class
    pub fn count_by_type(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for object in &self.objects {
            *counts.entry(object.cim_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Diagnostics of the last linking pass (empty when not linked)
    pub fn link_report(&self) -> &LinkReport {
        &self.link_report
    }

    pub(crate) fn set_link_report(&mut self, report: LinkReport) {
        self.link_report = report;
    }

    /// Hand the objects back, keyed by rdf:ID
    pub fn into_objects(self) -> BTreeMap<String, Box<dyn CimObject>> {
        self.objects
            .into_iter()
            .map(|o| (o.rdfid().to_string(), o))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::{BusbarSection, Terminal};
    use crate::object::CimClass;

    #[test]
    fn test_insert_and_lookup() {
        let mut graph = ModelGraph::new(Some(1));
        let bus = graph.insert(Box::new(BusbarSection::with_rdfid("_b1")));
        let term = graph.insert(Box::new(Terminal::with_rdfid("_t1")));

        assert_eq!(bus, ObjectId(0));
        assert_eq!(term, ObjectId(1));
        assert_eq!(graph.get("_t1").unwrap().cim_type(), "Terminal");
        assert!(graph.get("_missing").is_none());

        let handle = graph.object_ref("_b1").unwrap();
        assert_eq!(handle.cim_type, "BusbarSection");
        assert_eq!(graph.resolve(&handle).unwrap().rdfid(), "_b1");
    }

    #[test]
    fn test_count_by_type() {
        let mut graph = ModelGraph::new(None);
        graph.insert(Box::new(Terminal::with_rdfid("_t1")));
        graph.insert(Box::new(Terminal::with_rdfid("_t2")));
        graph.insert(Box::new(BusbarSection::with_rdfid("_b1")));

        let counts = graph.count_by_type();
        assert_eq!(counts["Terminal"], 2);
        assert_eq!(counts["BusbarSection"], 1);
    }

    #[test]
    fn test_identity_map_is_sorted() {
        let mut graph = ModelGraph::new(None);
        graph.insert(Box::new(Terminal::with_rdfid("_z")));
        graph.insert(Box::new(Terminal::with_rdfid("_a")));
        let keys: Vec<String> = graph.identity_map().into_keys().collect();
        assert_eq!(keys, vec!["_a".to_string(), "_z".to_string()]);
    }
}
