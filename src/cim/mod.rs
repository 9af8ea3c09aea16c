//! CIM classes - the CGMES subset cimdb stores
//!
//! Each class is a plain struct holding an [`ObjectBase`], the flattened
//! attributes of its superclasses and its own attributes, plus one static
//! attribute table that wires names to fields.
//!
//! [`ObjectBase`]: crate::object::ObjectBase

/// The attributes every class inherits from `IdentifiedObject`.
///
/// Expands to a descriptor slice for `$class`, which must have an
/// `identified: IdentifiedObject` field.
macro_rules! identified_object_attributes {
    ($class:ty) => {
        &[
            $crate::attribute::AttributeDescriptor::<$class>::primitive(
                "IdentifiedObject.mRID",
                $crate::attribute::ValueType::String,
                |o| $crate::attribute::string_text(&o.identified.mrid),
                |o, v| $crate::attribute::set_string(&mut o.identified.mrid, v),
            ),
            $crate::attribute::AttributeDescriptor::<$class>::primitive(
                "IdentifiedObject.name",
                $crate::attribute::ValueType::String,
                |o| $crate::attribute::string_text(&o.identified.name),
                |o, v| $crate::attribute::set_string(&mut o.identified.name, v),
            ),
            $crate::attribute::AttributeDescriptor::<$class>::primitive(
                "IdentifiedObject.description",
                $crate::attribute::ValueType::String,
                |o| $crate::attribute::string_text(&o.identified.description),
                |o, v| $crate::attribute::set_string(&mut o.identified.description, v),
            ),
            $crate::attribute::AttributeDescriptor::<$class>::primitive(
                "IdentifiedObject.shortName",
                $crate::attribute::ValueType::String,
                |o| $crate::attribute::string_text(&o.identified.short_name),
                |o, v| $crate::attribute::set_string(&mut o.identified.short_name, v),
            )
            .in_namespace($crate::attribute::ENTSOE_NAMESPACE),
        ]
    };
}

/// `CimClass` impl for a struct with a `base: ObjectBase` field.
macro_rules! impl_cim_class {
    ($class:ident, $table:ident) => {
        impl $crate::object::CimClass for $class {
            const CLASS_NAME: &'static str = stringify!($class);

            fn attribute_table() -> &'static $crate::attribute::AttributeTable<Self> {
                &$table
            }

            fn base(&self) -> &$crate::object::ObjectBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::object::ObjectBase {
                &mut self.base
            }
        }
    };
}

pub mod limits;
pub mod network;
pub mod topology;
pub mod types;
pub mod wires;

pub use limits::{CurrentLimit, OperationalLimitSet};
pub use network::{BaseVoltage, ConnectivityNode, Substation, Terminal, VoltageLevel};
pub use topology::{TopologicalIsland, TopologicalNode};
pub use types::PhaseCode;
pub use wires::{ACLineSegment, BusbarSection};

use crate::storage::ClassMap;

/// Naming attributes shared by all identified objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifiedObject {
    pub mrid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_name: Option<String>,
}

/// Register every built-in class.
pub fn register_all(map: &mut ClassMap) {
    map.register::<BaseVoltage>();
    map.register::<Substation>();
    map.register::<VoltageLevel>();
    map.register::<ConnectivityNode>();
    map.register::<Terminal>();
    map.register::<BusbarSection>();
    map.register::<ACLineSegment>();
    map.register::<OperationalLimitSet>();
    map.register::<CurrentLimit>();
    map.register::<TopologicalNode>();
    map.register::<TopologicalIsland>();
}
