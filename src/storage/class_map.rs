//! Registry of class tables keyed by type tag

use super::table::{ClassTable, TableStore};
use crate::object::{CimClass, CimObject};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Maps a CIM type tag to the table adapter for that class.
///
/// Built once at startup by explicit registration.
#[derive(Default)]
pub struct ClassMap {
    tables: BTreeMap<&'static str, Box<dyn ClassTable>>,
}

impl ClassMap {
    /// Create a new empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with every built-in CIM class registered
    pub fn with_cim_classes() -> Self {
        let mut map = Self::new();
        crate::cim::register_all(&mut map);
        map
    }

    /// Register a class
    pub fn register<T: CimClass>(&mut self) {
        self.register_table(TableStore::<T>::new());
    }

    /// Register a hand-written adapter
    pub fn register_table(&mut self, table: impl ClassTable + 'static) {
        let cim_type = table.cim_type();
        if self.tables.insert(cim_type, Box::new(table)).is_some() {
            tracing::warn!("Class {} registered twice; keeping the last", cim_type);
        }
    }

    pub fn get(&self, cim_type: &str) -> Result<&dyn ClassTable> {
        self.tables
            .get(cim_type)
            .map(|t| t.as_ref())
            .ok_or_else(|| Error::UnknownClass(cim_type.to_string()))
    }

    pub fn contains(&self, cim_type: &str) -> bool {
        self.tables.contains_key(cim_type)
    }

    /// Fresh object of the named class
    pub fn new_object(&self, cim_type: &str) -> Result<Box<dyn CimObject>> {
        Ok(self.get(cim_type)?.new_object())
    }

    /// Registered type tags, sorted
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tables.keys().copied()
    }

    pub fn tables(&self) -> impl Iterator<Item = &dyn ClassTable> {
        self.tables.values().map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::Terminal;

    #[test]
    fn test_builtin_classes() {
        let map = ClassMap::with_cim_classes();
        assert_eq!(map.len(), 11);
        assert!(map.contains("ACLineSegment"));
        assert_eq!(map.new_object("Terminal").unwrap().cim_type(), "Terminal");
    }

    #[test]
    fn test_unknown_class() {
        let mut map = ClassMap::new();
        map.register::<Terminal>();
        assert!(matches!(
            map.new_object("Breaker"),
            Err(Error::UnknownClass(name)) if name == "Breaker"
        ));
    }
}
