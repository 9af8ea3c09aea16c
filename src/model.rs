//! CIM model - the aggregate root owning a set of objects

use crate::object::CimObject;
use std::fmt;

/// A network model and the objects it owns.
///
/// Adding an object stamps it with the model id; removing one queues it
/// for deletion on the next save when it was already persisted.
#[derive(Default)]
pub struct CimModel {
    pub cim_model_id: Option<i64>,
    pub name: Option<String>,
    objects: Vec<Box<dyn CimObject>>,
    orphans: Vec<(&'static str, i64)>,
}

impl CimModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A handle for an already stored model
    pub fn with_id(cim_model_id: i64) -> Self {
        Self {
            cim_model_id: Some(cim_model_id),
            ..Self::default()
        }
    }

    /// Assign the model id and propagate it to every owned object
    pub fn set_cim_model_id(&mut self, cim_model_id: i64) {
        self.cim_model_id = Some(cim_model_id);
        for object in &mut self.objects {
            object.set_cim_model_id(cim_model_id);
        }
    }

    pub fn add_object(&mut self, mut object: Box<dyn CimObject>) {
        if let Some(id) = self.cim_model_id {
            object.set_cim_model_id(id);
        }
        self.objects.push(object);
    }

    /// Detach an object. A persisted object is deleted on the next save.
    pub fn remove_object(&mut self, rdfid: &str) -> Option<Box<dyn CimObject>> {
        let position = self.objects.iter().position(|o| o.rdfid() == rdfid)?;
        let object = self.objects.remove(position);
        if let Some(id) = object.id() {
            self.orphans.push((object.cim_type(), id));
        }
        Some(object)
    }

    pub fn objects(&self) -> &[Box<dyn CimObject>] {
        &self.objects
    }

    pub fn get(&self, rdfid: &str) -> Option<&dyn CimObject> {
        self.objects
            .iter()
            .find(|o| o.rdfid() == rdfid)
            .map(|o| o.as_ref())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects removed since the last save, as (type, storage id)
    pub fn orphans(&self) -> &[(&'static str, i64)] {
        &self.orphans
    }

    pub(crate) fn clear_orphans(&mut self) {
        self.orphans.clear();
    }

    pub(crate) fn objects_mut(&mut self) -> &mut [Box<dyn CimObject>] {
        &mut self.objects
    }
}

impl fmt::Debug for CimModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CimModel")
            .field("cim_model_id", &self.cim_model_id)
            .field("name", &self.name)
            .field("objects", &self.objects.len())
            .field("orphans", &self.orphans.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::{BusbarSection, Terminal};
    use crate::object::CimClass;

    #[test]
    fn test_add_stamps_model_id() {
        let mut model = CimModel::with_id(7);
        model.add_object(Box::new(Terminal::with_rdfid("_t1")));
        assert_eq!(model.get("_t1").unwrap().cim_model_id(), Some(7));
    }

    #[test]
    fn test_set_id_propagates() {
        let mut model = CimModel::new("grid");
        model.add_object(Box::new(Terminal::with_rdfid("_t1")));
        assert_eq!(model.objects()[0].cim_model_id(), None);

        model.set_cim_model_id(3);
        assert_eq!(model.objects()[0].cim_model_id(), Some(3));
    }

    #[test]
    fn test_remove_queues_persisted_objects_only() {
        let mut model = CimModel::with_id(1);
        let mut stored = BusbarSection::with_rdfid("_b1");
        stored.base.id = Some(42);
        model.add_object(Box::new(stored));
        model.add_object(Box::new(Terminal::with_rdfid("_t1")));

        assert!(model.remove_object("_t1").is_some());
        assert!(model.orphans().is_empty());

        assert!(model.remove_object("_b1").is_some());
        assert_eq!(model.orphans(), &[("BusbarSection", 42)]);
        assert!(model.remove_object("_b1").is_none());
        assert!(model.is_empty());
    }
}
