//! Attribute registry - name-indexed access to CIM attributes
//!
//! Every CIM class wires one static [`AttributeTable`] of
//! [`AttributeDescriptor`]s. A descriptor carries the attribute's full name,
//! its kind and a pair of plain function pointers into the concrete struct,
//! so generic code (storage adapters, the linker, the interchange reader)
//! can get and set attributes by name without knowing the concrete type.
//!
//! Kinds:
//! - `Primitive`: String, Float, Integer, Boolean and CIM datatypes, held as text
//! - `Enum`: an enumeration literal, held as text
//! - `Reference`: one object, text rdf:ID until linked
//! - `ReferenceSet`: several objects, a set of rdf:IDs until linked

use crate::convert;
use crate::reference::{ObjectRef, Reference, ReferenceSet};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// CIM namespace for attributes of the IEC 61970 canonical model
pub const CIM_NAMESPACE: &str = "http://iec.ch/TC57/CIM100#";

/// ENTSO-E extension namespace used by CGMES profiles
pub const ENTSOE_NAMESPACE: &str = "http://iec.ch/TC57/CIM100-European#";

/// The four kinds of attribute a CIM class can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Primitive or datatype value
    Primitive,
    /// Enumeration literal
    Enum,
    /// Single object reference
    Reference,
    /// Set of object references
    ReferenceSet,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Primitive => "primitive",
            AttributeKind::Enum => "enum",
            AttributeKind::Reference => "reference",
            AttributeKind::ReferenceSet => "reference_set",
        }
    }

    /// Whether values of this kind are linked to other objects
    pub fn is_reference(&self) -> bool {
        matches!(self, AttributeKind::Reference | AttributeKind::ReferenceSet)
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage type of a text-held value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Float,
    Integer,
    Boolean,
}

impl ValueType {
    /// SQLite column type
    pub fn sql_type(&self) -> &'static str {
        match self {
            ValueType::String => "TEXT",
            ValueType::Float => "REAL",
            ValueType::Integer | ValueType::Boolean => "INTEGER",
        }
    }
}

/// An attribute value as seen through the name-indexed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Primitive / enum text, or the rdf:ID of a single reference
    Text(String),
    /// rdf:IDs of a reference set
    TextSet(BTreeSet<String>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            AttributeValue::TextSet(_) => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            AttributeValue::Text(_) => None,
            AttributeValue::TextSet(set) => Some(set),
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Text(text) => write!(f, "{}", text),
            AttributeValue::TextSet(set) => {
                let items: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// Setter for text-held values; `None` when the text does not convert.
pub type TextSetter<T> = fn(&mut T, &str) -> Option<()>;

/// Accessor pair into a concrete struct.
pub enum Accessor<T: 'static> {
    Text {
        get: fn(&T) -> Option<String>,
        set: TextSetter<T>,
    },
    Reference {
        get: fn(&T) -> &Reference,
        get_mut: fn(&mut T) -> &mut Reference,
    },
    ReferenceSet {
        get: fn(&T) -> &ReferenceSet,
        get_mut: fn(&mut T) -> &mut ReferenceSet,
    },
}

/// One attribute of a CIM class.
pub struct AttributeDescriptor<T: 'static> {
    /// `<DeclaringClass>.<label>`
    pub full_name: &'static str,
    pub kind: AttributeKind,
    pub value_type: ValueType,
    /// Inert attributes are declared but never stored, loaded or linked
    pub is_used: bool,
    pub namespace_url: &'static str,
    /// Concrete classes a reference may point at (empty = any)
    pub targets: &'static [&'static str],
    accessor: Accessor<T>,
}

impl<T: 'static> AttributeDescriptor<T> {
    pub const fn primitive(
        full_name: &'static str,
        value_type: ValueType,
        get: fn(&T) -> Option<String>,
        set: TextSetter<T>,
    ) -> Self {
        Self {
            full_name,
            kind: AttributeKind::Primitive,
            value_type,
            is_used: true,
            namespace_url: CIM_NAMESPACE,
            targets: &[],
            accessor: Accessor::Text { get, set },
        }
    }

    pub const fn enumeration(
        full_name: &'static str,
        get: fn(&T) -> Option<String>,
        set: TextSetter<T>,
    ) -> Self {
        Self {
            full_name,
            kind: AttributeKind::Enum,
            value_type: ValueType::String,
            is_used: true,
            namespace_url: CIM_NAMESPACE,
            targets: &[],
            accessor: Accessor::Text { get, set },
        }
    }

    pub const fn reference(
        full_name: &'static str,
        targets: &'static [&'static str],
        get: fn(&T) -> &Reference,
        get_mut: fn(&mut T) -> &mut Reference,
    ) -> Self {
        Self {
            full_name,
            kind: AttributeKind::Reference,
            value_type: ValueType::String,
            is_used: true,
            namespace_url: CIM_NAMESPACE,
            targets,
            accessor: Accessor::Reference { get, get_mut },
        }
    }

    pub const fn reference_set(
        full_name: &'static str,
        targets: &'static [&'static str],
        get: fn(&T) -> &ReferenceSet,
        get_mut: fn(&mut T) -> &mut ReferenceSet,
    ) -> Self {
        Self {
            full_name,
            kind: AttributeKind::ReferenceSet,
            value_type: ValueType::String,
            is_used: true,
            namespace_url: CIM_NAMESPACE,
            targets,
            accessor: Accessor::ReferenceSet { get, get_mut },
        }
    }

    /// Mark the attribute as declared but inert.
    pub const fn unused(mut self) -> Self {
        self.is_used = false;
        self
    }

    pub const fn in_namespace(mut self, namespace_url: &'static str) -> Self {
        self.namespace_url = namespace_url;
        self
    }

    /// Attribute name without the declaring class
    pub fn label(&self) -> &'static str {
        self.full_name
            .rsplit_once('.')
            .map(|(_, label)| label)
            .unwrap_or(self.full_name)
    }

    /// Class that declares the attribute (may be a superclass of the owner)
    pub fn declaring_class(&self) -> &'static str {
        self.full_name
            .split_once('.')
            .map(|(class, _)| class)
            .unwrap_or("")
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == AttributeKind::Primitive
    }

    pub fn is_enum(&self) -> bool {
        self.kind == AttributeKind::Enum
    }

    /// Current value as text (references report their target rdf:IDs)
    pub fn read(&self, object: &T) -> Option<AttributeValue> {
        match &self.accessor {
            Accessor::Text { get, .. } => get(object).map(AttributeValue::Text),
            Accessor::Reference { get, .. } => get(object)
                .target_id()
                .map(|id| AttributeValue::Text(id.to_string())),
            Accessor::ReferenceSet { get, .. } => {
                let set = get(object);
                if set.is_empty() {
                    None
                } else {
                    Some(AttributeValue::TextSet(set.ids().clone()))
                }
            }
        }
    }

    /// Set from text. Reference sets add one member per call.
    pub fn write_text(&self, object: &mut T, text: &str) -> Result<()> {
        match &self.accessor {
            Accessor::Text { set, .. } => set(object, text).ok_or_else(|| Error::MalformedValue {
                attribute: self.full_name,
                value: text.to_string(),
            }),
            Accessor::Reference { get_mut, .. } => {
                get_mut(object).set_id(text);
                Ok(())
            }
            Accessor::ReferenceSet { get_mut, .. } => {
                get_mut(object).add_id(text);
                Ok(())
            }
        }
    }

    /// Link to a live object. Reference sets add one member per call.
    pub fn write_ref(&self, object: &mut T, target: ObjectRef) -> Result<()> {
        if !self.targets.is_empty() && !self.targets.contains(&target.cim_type) {
            return Err(Error::TypeMismatch {
                attribute: self.full_name,
                expected: self.targets,
                found: target.cim_type.to_string(),
            });
        }
        match &self.accessor {
            Accessor::Text { .. } => Err(Error::NotAReference {
                attribute: self.full_name,
            }),
            Accessor::Reference { get_mut, .. } => {
                get_mut(object).link(target);
                Ok(())
            }
            Accessor::ReferenceSet { get_mut, .. } => {
                get_mut(object).link(target);
                Ok(())
            }
        }
    }

    /// Live objects this attribute is linked to
    pub fn links<'a>(&self, object: &'a T) -> Vec<&'a ObjectRef> {
        match &self.accessor {
            Accessor::Text { .. } => Vec::new(),
            Accessor::Reference { get, .. } => get(object).resolved().into_iter().collect(),
            Accessor::ReferenceSet { get, .. } => get(object).resolved().collect(),
        }
    }
}

/// The attribute table of one CIM class.
///
/// Inherited attributes come first, grouped by declaring class.
pub struct AttributeTable<T: 'static> {
    pub class_name: &'static str,
    groups: &'static [&'static [AttributeDescriptor<T>]],
}

impl<T: 'static> AttributeTable<T> {
    pub const fn new(
        class_name: &'static str,
        groups: &'static [&'static [AttributeDescriptor<T>]],
    ) -> Self {
        Self { class_name, groups }
    }

    /// All descriptors, inherited first
    pub fn iter(&self) -> impl Iterator<Item = &'static AttributeDescriptor<T>> + use<T> {
        let groups: &'static [&'static [AttributeDescriptor<T>]] = self.groups;
        groups.iter().copied().flatten()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|d| d.label()).collect()
    }

    /// Look up by label (`name`) or full name (`IdentifiedObject.name`)
    pub fn find(&self, name: &str) -> Option<&'static AttributeDescriptor<T>> {
        self.iter()
            .find(|d| d.label() == name || d.full_name == name)
    }

    pub fn get(&self, name: &str) -> Result<&'static AttributeDescriptor<T>> {
        self.find(name).ok_or_else(|| Error::UnknownAttribute {
            class: self.class_name,
            attribute: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A CIM enumeration with text literals.
pub trait CimEnum: Copy + Sized + 'static {
    /// Enumeration class name, e.g. `PhaseCode`
    const ENUM_NAME: &'static str;

    fn literal(&self) -> &'static str;

    fn from_literal(literal: &str) -> Option<Self>;

    /// `PhaseCode.ABC`
    fn qualified(&self) -> String {
        format!("{}.{}", Self::ENUM_NAME, self.literal())
    }

    /// Accepts `http://...#PhaseCode.ABC`, `PhaseCode.ABC` and `ABC`.
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.rsplit_once('#').map(|(_, t)| t).unwrap_or(text);
        let literal = text
            .strip_prefix(Self::ENUM_NAME)
            .and_then(|t| t.strip_prefix('.'))
            .unwrap_or(text);
        Self::from_literal(literal)
    }
}

// ========== Field helpers used by the class tables ==========

pub fn string_text(value: &Option<String>) -> Option<String> {
    value.clone()
}

pub fn set_string(slot: &mut Option<String>, text: &str) -> Option<()> {
    *slot = Some(text.to_string());
    Some(())
}

pub fn double_text(value: &Option<f64>) -> Option<String> {
    value.map(convert::format_double)
}

pub fn set_double(slot: &mut Option<f64>, text: &str) -> Option<()> {
    *slot = Some(convert::parse_double(text)?);
    Some(())
}

pub fn integer_text(value: &Option<i64>) -> Option<String> {
    value.map(|v| v.to_string())
}

pub fn set_integer(slot: &mut Option<i64>, text: &str) -> Option<()> {
    *slot = Some(convert::parse_integer(text)?);
    Some(())
}

pub fn boolean_text(value: &Option<bool>) -> Option<String> {
    value.map(convert::format_boolean)
}

pub fn set_boolean(slot: &mut Option<bool>, text: &str) -> Option<()> {
    *slot = Some(convert::parse_boolean(text));
    Some(())
}

pub fn enum_text<E: CimEnum>(value: &Option<E>) -> Option<String> {
    value.map(|v| v.qualified())
}

pub fn set_enum<E: CimEnum>(slot: &mut Option<E>, text: &str) -> Option<()> {
    *slot = Some(E::parse(text)?);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ObjectId;

    #[derive(Default)]
    struct Gauge {
        name: Option<String>,
        rating: Option<f64>,
        owner: Reference,
        members: ReferenceSet,
    }

    type GaugeAttr = AttributeDescriptor<Gauge>;

    static GAUGE: AttributeTable<Gauge> = AttributeTable::new(
        "Gauge",
        &[
            &[GaugeAttr::primitive(
                "IdentifiedObject.name",
                ValueType::String,
                |o| string_text(&o.name),
                |o, v| set_string(&mut o.name, v),
            )],
            &[
                GaugeAttr::primitive(
                    "Gauge.rating",
                    ValueType::Float,
                    |o| double_text(&o.rating),
                    |o, v| set_double(&mut o.rating, v),
                ),
                GaugeAttr::reference("Gauge.owner", &["Owner"], |o| &o.owner, |o| &mut o.owner),
                GaugeAttr::reference_set("Gauge.members", &[], |o| &o.members, |o| &mut o.members),
                GaugeAttr::reference_set("Gauge.inert", &[], |o| &o.members, |o| &mut o.members)
                    .unused(),
            ],
        ],
    );

    #[test]
    fn test_names_include_inherited_first() {
        assert_eq!(GAUGE.names(), vec!["name", "rating", "owner", "members", "inert"]);
        assert_eq!(GAUGE.len(), 5);
    }

    #[test]
    fn test_lookup_by_label_and_full_name() {
        assert_eq!(GAUGE.get("rating").unwrap().full_name, "Gauge.rating");
        assert_eq!(GAUGE.get("IdentifiedObject.name").unwrap().label(), "name");
        assert_eq!(GAUGE.get("name").unwrap().declaring_class(), "IdentifiedObject");
        assert!(!GAUGE.get("inert").unwrap().is_used);
    }

    #[test]
    fn test_unknown_attribute() {
        match GAUGE.get("nope") {
            Err(Error::UnknownAttribute { class, attribute }) => {
                assert_eq!(class, "Gauge");
                assert_eq!(attribute, "nope");
            }
            other => panic!("unexpected: {:?}", other.map(|d| d.full_name)),
        }
    }

    #[test]
    fn test_text_roundtrip_and_malformed() {
        let mut gauge = Gauge::default();
        let rating = GAUGE.get("rating").unwrap();

        rating.write_text(&mut gauge, "1.5").unwrap();
        assert_eq!(rating.read(&gauge), Some(AttributeValue::Text("1.5".into())));

        let err = rating.write_text(&mut gauge, "high").unwrap_err();
        assert!(matches!(err, Error::MalformedValue { attribute: "Gauge.rating", .. }));
        assert_eq!(gauge.rating, Some(1.5), "failed conversion leaves value untouched");
    }

    #[test]
    fn test_reference_text_and_link() {
        let mut gauge = Gauge::default();
        let owner = GAUGE.get("owner").unwrap();

        owner.write_text(&mut gauge, "#_o1").unwrap();
        assert_eq!(owner.read(&gauge), Some(AttributeValue::Text("_o1".into())));
        assert!(owner.links(&gauge).is_empty());

        owner
            .write_ref(&mut gauge, ObjectRef::new(ObjectId(3), "_o1", "Owner"))
            .unwrap();
        assert_eq!(owner.links(&gauge)[0].object, ObjectId(3));
    }

    #[test]
    fn test_reference_type_mismatch() {
        let mut gauge = Gauge::default();
        let owner = GAUGE.get("owner").unwrap();
        let err = owner
            .write_ref(&mut gauge, ObjectRef::new(ObjectId(0), "_x", "Stranger"))
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(gauge.owner.is_empty());
    }

    #[test]
    fn test_reference_set_accumulates() {
        let mut gauge = Gauge::default();
        let members = GAUGE.get("members").unwrap();
        members.write_text(&mut gauge, "A").unwrap();
        members.write_text(&mut gauge, "B").unwrap();

        let value = members.read(&gauge).unwrap();
        assert_eq!(value.as_set().unwrap().len(), 2);

        members
            .write_ref(&mut gauge, ObjectRef::new(ObjectId(0), "A", "X"))
            .unwrap();
        members
            .write_ref(&mut gauge, ObjectRef::new(ObjectId(1), "B", "X"))
            .unwrap();
        assert_eq!(members.links(&gauge).len(), 2);
    }

    #[test]
    fn test_primitive_rejects_link() {
        let mut gauge = Gauge::default();
        let name = GAUGE.get("name").unwrap();
        let err = name
            .write_ref(&mut gauge, ObjectRef::new(ObjectId(0), "A", "X"))
            .unwrap_err();
        assert!(matches!(err, Error::NotAReference { .. }));
    }
}
