//! Operational limits

use super::IdentifiedObject;
use crate::attribute::{double_text, set_double, AttributeDescriptor, AttributeTable, ValueType};
use crate::object::ObjectBase;
use crate::reference::Reference;

/// Set of limits attached to a terminal or a piece of equipment.
#[derive(Debug, Clone, Default)]
pub struct OperationalLimitSet {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub terminal: Reference,
    pub equipment: Reference,
}

type OperationalLimitSetAttr = AttributeDescriptor<OperationalLimitSet>;

static OPERATIONAL_LIMIT_SET: AttributeTable<OperationalLimitSet> = AttributeTable::new(
    "OperationalLimitSet",
    &[
        identified_object_attributes!(OperationalLimitSet),
        &[
            OperationalLimitSetAttr::reference(
                "OperationalLimitSet.Terminal",
                &["Terminal"],
                |o| &o.terminal,
                |o| &mut o.terminal,
            ),
            OperationalLimitSetAttr::reference(
                "OperationalLimitSet.Equipment",
                &["ACLineSegment", "BusbarSection"],
                |o| &o.equipment,
                |o| &mut o.equipment,
            ),
        ],
    ],
);

impl_cim_class!(OperationalLimitSet, OPERATIONAL_LIMIT_SET);

/// Current limit, A.
#[derive(Debug, Clone, Default)]
pub struct CurrentLimit {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub limit_set: Reference,
    pub value: Option<f64>,
}

type CurrentLimitAttr = AttributeDescriptor<CurrentLimit>;

static CURRENT_LIMIT: AttributeTable<CurrentLimit> = AttributeTable::new(
    "CurrentLimit",
    &[
        identified_object_attributes!(CurrentLimit),
        &[CurrentLimitAttr::reference(
            "OperationalLimit.OperationalLimitSet",
            &["OperationalLimitSet"],
            |o| &o.limit_set,
            |o| &mut o.limit_set,
        )],
        &[CurrentLimitAttr::primitive(
            "CurrentLimit.value",
            ValueType::Float,
            |o| double_text(&o.value),
            |o, v| set_double(&mut o.value, v),
        )],
    ],
);

impl_cim_class!(CurrentLimit, CURRENT_LIMIT);
