//! Conducting equipment

use super::IdentifiedObject;
use crate::attribute::{
    boolean_text, double_text, set_boolean, set_double, AttributeDescriptor, AttributeTable,
    ValueType,
};
use crate::object::ObjectBase;
use crate::reference::Reference;

/// Busbar, modelled as a conductor of negligible impedance.
#[derive(Debug, Clone, Default)]
pub struct BusbarSection {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub aggregate: Option<bool>,
    pub equipment_container: Reference,
    pub base_voltage: Reference,
    /// Maximum allowable peak short-circuit current, A
    pub ip_max: Option<f64>,
}

type BusbarSectionAttr = AttributeDescriptor<BusbarSection>;

static BUSBAR_SECTION: AttributeTable<BusbarSection> = AttributeTable::new(
    "BusbarSection",
    &[
        identified_object_attributes!(BusbarSection),
        &[
            BusbarSectionAttr::primitive(
                "Equipment.aggregate",
                ValueType::Boolean,
                |o| boolean_text(&o.aggregate),
                |o, v| set_boolean(&mut o.aggregate, v),
            ),
            BusbarSectionAttr::reference(
                "Equipment.EquipmentContainer",
                &["VoltageLevel", "Substation"],
                |o| &o.equipment_container,
                |o| &mut o.equipment_container,
            ),
            BusbarSectionAttr::reference(
                "ConductingEquipment.BaseVoltage",
                &["BaseVoltage"],
                |o| &o.base_voltage,
                |o| &mut o.base_voltage,
            ),
        ],
        &[BusbarSectionAttr::primitive(
            "BusbarSection.ipMax",
            ValueType::Float,
            |o| double_text(&o.ip_max),
            |o, v| set_double(&mut o.ip_max, v),
        )],
    ],
);

impl_cim_class!(BusbarSection, BUSBAR_SECTION);

/// AC transmission line segment.
#[derive(Debug, Clone, Default)]
pub struct ACLineSegment {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub aggregate: Option<bool>,
    pub equipment_container: Reference,
    pub base_voltage: Reference,
    /// m
    pub length: Option<f64>,
    /// Positive sequence series resistance, ohm
    pub r: Option<f64>,
    /// Positive sequence series reactance, ohm
    pub x: Option<f64>,
    /// Positive sequence shunt susceptance, S
    pub bch: Option<f64>,
    /// Positive sequence shunt conductance, S
    pub gch: Option<f64>,
}

type ACLineSegmentAttr = AttributeDescriptor<ACLineSegment>;

static AC_LINE_SEGMENT: AttributeTable<ACLineSegment> = AttributeTable::new(
    "ACLineSegment",
    &[
        identified_object_attributes!(ACLineSegment),
        &[
            ACLineSegmentAttr::primitive(
                "Equipment.aggregate",
                ValueType::Boolean,
                |o| boolean_text(&o.aggregate),
                |o, v| set_boolean(&mut o.aggregate, v),
            ),
            ACLineSegmentAttr::reference(
                "Equipment.EquipmentContainer",
                &[],
                |o| &o.equipment_container,
                |o| &mut o.equipment_container,
            ),
            ACLineSegmentAttr::reference(
                "ConductingEquipment.BaseVoltage",
                &["BaseVoltage"],
                |o| &o.base_voltage,
                |o| &mut o.base_voltage,
            ),
            ACLineSegmentAttr::primitive(
                "Conductor.length",
                ValueType::Float,
                |o| double_text(&o.length),
                |o, v| set_double(&mut o.length, v),
            ),
        ],
        &[
            ACLineSegmentAttr::primitive(
                "ACLineSegment.r",
                ValueType::Float,
                |o| double_text(&o.r),
                |o, v| set_double(&mut o.r, v),
            ),
            ACLineSegmentAttr::primitive(
                "ACLineSegment.x",
                ValueType::Float,
                |o| double_text(&o.x),
                |o, v| set_double(&mut o.x, v),
            ),
            ACLineSegmentAttr::primitive(
                "ACLineSegment.bch",
                ValueType::Float,
                |o| double_text(&o.bch),
                |o, v| set_double(&mut o.bch, v),
            ),
            ACLineSegmentAttr::primitive(
                "ACLineSegment.gch",
                ValueType::Float,
                |o| double_text(&o.gch),
                |o, v| set_double(&mut o.gch, v),
            ),
        ],
    ],
);

impl_cim_class!(ACLineSegment, AC_LINE_SEGMENT);
