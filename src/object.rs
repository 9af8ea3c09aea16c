//! CIM objects - typed graph nodes with name-indexed attributes
//!
//! Every concrete class implements [`CimClass`] (its name, its static
//! attribute table and its identity block). The object-safe [`CimObject`]
//! trait is implemented for all of them at once and is what the storage
//! layer, the linker and the service work with.

use crate::attribute::{AttributeKind, AttributeTable, AttributeValue};
use crate::reference::ObjectRef;
use crate::Result;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity and ownership shared by all CIM objects.
///
/// Equality and hashing use `(cim_model_id, rdfid)` only: the storage id is
/// absent before the first save and must not change what "the same object"
/// means.
#[derive(Debug, Clone, Default)]
pub struct ObjectBase {
    /// Storage id, assigned on first save
    pub id: Option<i64>,
    /// rdf:ID, unique within the owning model
    pub rdfid: String,
    /// Owning model
    pub cim_model_id: Option<i64>,
}

impl ObjectBase {
    pub fn new(rdfid: impl Into<String>) -> Self {
        Self {
            id: None,
            rdfid: rdfid.into(),
            cim_model_id: None,
        }
    }
}

impl PartialEq for ObjectBase {
    fn eq(&self, other: &Self) -> bool {
        self.cim_model_id == other.cim_model_id && self.rdfid == other.rdfid
    }
}

impl Eq for ObjectBase {}

impl Hash for ObjectBase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cim_model_id.hash(state);
        self.rdfid.hash(state);
    }
}

/// Implemented by each concrete CIM class.
pub trait CimClass: fmt::Debug + Default + Send + Sync + 'static {
    /// Type tag stored with every row and used for dispatch
    const CLASS_NAME: &'static str;

    fn attribute_table() -> &'static AttributeTable<Self>;

    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    /// A fresh object with the given rdf:ID
    fn with_rdfid(rdfid: impl Into<String>) -> Self {
        let mut object = Self::default();
        object.base_mut().rdfid = rdfid.into();
        object
    }
}

/// Object-safe view of any CIM object.
pub trait CimObject: fmt::Debug + Send + Sync + 'static {
    /// Concrete class name (the type tag)
    fn cim_type(&self) -> &'static str;

    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Names of all declared attributes, inherited included
    fn attribute_names(&self) -> Vec<&'static str>;

    /// `<DeclaringClass>.<label>` for an attribute name
    fn attribute_full_name(&self, name: &str) -> Result<&'static str>;

    fn attribute_kind(&self, name: &str) -> Result<AttributeKind>;

    fn get_attribute(&self, name: &str) -> Result<Option<AttributeValue>>;

    /// Set a primitive or enum value, or the raw rdf:ID(s) of a reference
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()>;

    /// Link a reference attribute to a live object
    fn set_attribute_ref(&mut self, name: &str, target: ObjectRef) -> Result<()>;

    /// Live objects a reference attribute is linked to
    fn linked_objects(&self, name: &str) -> Result<Vec<&ObjectRef>>;

    fn is_primitive_attribute(&self, name: &str) -> Result<bool>;

    fn is_enum_attribute(&self, name: &str) -> Result<bool>;

    fn is_used_attribute(&self, name: &str) -> Result<bool>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    // ========== Identity shortcuts ==========

    fn id(&self) -> Option<i64> {
        self.base().id
    }

    fn rdfid(&self) -> &str {
        &self.base().rdfid
    }

    fn set_rdfid(&mut self, rdfid: &str) {
        self.base_mut().rdfid = rdfid.to_string();
    }

    fn cim_model_id(&self) -> Option<i64> {
        self.base().cim_model_id
    }

    fn set_cim_model_id(&mut self, cim_model_id: i64) {
        self.base_mut().cim_model_id = Some(cim_model_id);
    }
}

impl<T: CimClass> CimObject for T {
    fn cim_type(&self) -> &'static str {
        T::CLASS_NAME
    }

    fn base(&self) -> &ObjectBase {
        CimClass::base(self)
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        CimClass::base_mut(self)
    }

    fn attribute_names(&self) -> Vec<&'static str> {
        T::attribute_table().names()
    }

    fn attribute_full_name(&self, name: &str) -> Result<&'static str> {
        Ok(T::attribute_table().get(name)?.full_name)
    }

    fn attribute_kind(&self, name: &str) -> Result<AttributeKind> {
        Ok(T::attribute_table().get(name)?.kind)
    }

    fn get_attribute(&self, name: &str) -> Result<Option<AttributeValue>> {
        Ok(T::attribute_table().get(name)?.read(self))
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        T::attribute_table().get(name)?.write_text(self, value)
    }

    fn set_attribute_ref(&mut self, name: &str, target: ObjectRef) -> Result<()> {
        T::attribute_table().get(name)?.write_ref(self, target)
    }

    fn linked_objects(&self, name: &str) -> Result<Vec<&ObjectRef>> {
        Ok(T::attribute_table().get(name)?.links(self))
    }

    fn is_primitive_attribute(&self, name: &str) -> Result<bool> {
        Ok(T::attribute_table().get(name)?.is_primitive())
    }

    fn is_enum_attribute(&self, name: &str) -> Result<bool> {
        Ok(T::attribute_table().get(name)?.is_enum())
    }

    fn is_used_attribute(&self, name: &str) -> Result<bool> {
        Ok(T::attribute_table().get(name)?.is_used)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn CimObject {
    /// Downcast to a concrete class
    pub fn downcast_ref<T: CimClass>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: CimClass>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Short description for display
    pub fn describe(&self) -> String {
        match self.id() {
            Some(id) => format!("{} {} (id {})", self.cim_type(), self.rdfid(), id),
            None => format!("{} {}", self.cim_type(), self.rdfid()),
        }
    }
}

impl PartialEq for dyn CimObject {
    fn eq(&self, other: &Self) -> bool {
        self.base() == other.base()
    }
}

impl Eq for dyn CimObject {}

impl Hash for dyn CimObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::{ACLineSegment, Terminal};
    use crate::Error;
    use std::collections::HashSet;

    fn boxed_terminal(rdfid: &str, model: i64, id: Option<i64>) -> Box<dyn CimObject> {
        let mut terminal = Terminal::with_rdfid(rdfid);
        terminal.base.cim_model_id = Some(model);
        terminal.base.id = id;
        Box::new(terminal)
    }

    #[test]
    fn test_equality_ignores_storage_id() {
        let a = boxed_terminal("_t1", 1, Some(10));
        let b = boxed_terminal("_t1", 1, Some(99));
        assert!(*a == *b);
    }

    #[test]
    fn test_equality_uses_rdfid() {
        let a = boxed_terminal("_t1", 1, Some(10));
        let b = boxed_terminal("_t2", 1, Some(10));
        assert!(*a != *b);
    }

    #[test]
    fn test_equality_is_model_scoped() {
        let a = boxed_terminal("_t1", 1, None);
        let b = boxed_terminal("_t1", 2, None);
        assert!(*a != *b);
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(ObjectBase { id: Some(1), rdfid: "_x".into(), cim_model_id: Some(5) });
        set.insert(ObjectBase { id: Some(2), rdfid: "_x".into(), cim_model_id: Some(5) });
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_dynamic_attribute_access() {
        let mut line: Box<dyn CimObject> = Box::new(ACLineSegment::with_rdfid("_l1"));
        line.set_attribute("name", "Line 1").unwrap();
        line.set_attribute("r", "0.12").unwrap();

        assert_eq!(line.cim_type(), "ACLineSegment");
        assert_eq!(
            line.get_attribute("name").unwrap(),
            Some(AttributeValue::Text("Line 1".into()))
        );
        assert!(line.is_primitive_attribute("r").unwrap());
        assert!(!line.is_primitive_attribute("BaseVoltage").unwrap());
        assert_eq!(line.attribute_full_name("name").unwrap(), "IdentifiedObject.name");

        let concrete = line.downcast_ref::<ACLineSegment>().unwrap();
        assert_eq!(concrete.r, Some(0.12));
    }

    #[test]
    fn test_unknown_attribute_escalates() {
        let mut terminal: Box<dyn CimObject> = Box::new(Terminal::with_rdfid("_t"));
        let err = terminal.set_attribute("r", "1").unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute { class: "Terminal", .. }));
        assert!(terminal.get_attribute("nonsense").is_err());
        assert!(terminal.is_used_attribute("nonsense").is_err());
    }
}
