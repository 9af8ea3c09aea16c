//! Core network classes: voltages, containers, nodes and terminals

use super::types::PhaseCode;
use super::IdentifiedObject;
use crate::attribute::{
    boolean_text, double_text, enum_text, integer_text, set_boolean, set_double, set_enum,
    set_integer, AttributeDescriptor, AttributeTable, ValueType,
};
use crate::object::ObjectBase;
use crate::reference::{Reference, ReferenceSet};

// ========== BaseVoltage ==========

/// Nominal voltage shared by equipment of one voltage level.
#[derive(Debug, Clone, Default)]
pub struct BaseVoltage {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    /// kV
    pub nominal_voltage: Option<f64>,
}

type BaseVoltageAttr = AttributeDescriptor<BaseVoltage>;

static BASE_VOLTAGE: AttributeTable<BaseVoltage> = AttributeTable::new(
    "BaseVoltage",
    &[
        identified_object_attributes!(BaseVoltage),
        &[BaseVoltageAttr::primitive(
            "BaseVoltage.nominalVoltage",
            ValueType::Float,
            |o| double_text(&o.nominal_voltage),
            |o, v| set_double(&mut o.nominal_voltage, v),
        )],
    ],
);

impl_cim_class!(BaseVoltage, BASE_VOLTAGE);

// ========== Substation ==========

#[derive(Debug, Clone, Default)]
pub struct Substation {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    /// Geographical region, usually defined in a boundary model
    pub region: Reference,
}

type SubstationAttr = AttributeDescriptor<Substation>;

static SUBSTATION: AttributeTable<Substation> = AttributeTable::new(
    "Substation",
    &[
        identified_object_attributes!(Substation),
        &[SubstationAttr::reference(
            "Substation.Region",
            &["SubGeographicalRegion"],
            |o| &o.region,
            |o| &mut o.region,
        )],
    ],
);

impl_cim_class!(Substation, SUBSTATION);

// ========== VoltageLevel ==========

#[derive(Debug, Clone, Default)]
pub struct VoltageLevel {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub high_voltage_limit: Option<f64>,
    pub low_voltage_limit: Option<f64>,
    pub substation: Reference,
    pub base_voltage: Reference,
}

type VoltageLevelAttr = AttributeDescriptor<VoltageLevel>;

static VOLTAGE_LEVEL: AttributeTable<VoltageLevel> = AttributeTable::new(
    "VoltageLevel",
    &[
        identified_object_attributes!(VoltageLevel),
        &[
            VoltageLevelAttr::primitive(
                "VoltageLevel.highVoltageLimit",
                ValueType::Float,
                |o| double_text(&o.high_voltage_limit),
                |o, v| set_double(&mut o.high_voltage_limit, v),
            ),
            VoltageLevelAttr::primitive(
                "VoltageLevel.lowVoltageLimit",
                ValueType::Float,
                |o| double_text(&o.low_voltage_limit),
                |o, v| set_double(&mut o.low_voltage_limit, v),
            ),
            VoltageLevelAttr::reference(
                "VoltageLevel.Substation",
                &["Substation"],
                |o| &o.substation,
                |o| &mut o.substation,
            ),
            VoltageLevelAttr::reference(
                "VoltageLevel.BaseVoltage",
                &["BaseVoltage"],
                |o| &o.base_voltage,
                |o| &mut o.base_voltage,
            ),
        ],
    ],
);

impl_cim_class!(VoltageLevel, VOLTAGE_LEVEL);

// ========== ConnectivityNode ==========

#[derive(Debug, Clone, Default)]
pub struct ConnectivityNode {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub container: Reference,
    /// Inverse of `Terminal.ConnectivityNode`; declared but not stored
    pub terminals: ReferenceSet,
}

type ConnectivityNodeAttr = AttributeDescriptor<ConnectivityNode>;

static CONNECTIVITY_NODE: AttributeTable<ConnectivityNode> = AttributeTable::new(
    "ConnectivityNode",
    &[
        identified_object_attributes!(ConnectivityNode),
        &[
            ConnectivityNodeAttr::reference(
                "ConnectivityNode.ConnectivityNodeContainer",
                &["VoltageLevel", "Substation"],
                |o| &o.container,
                |o| &mut o.container,
            ),
            ConnectivityNodeAttr::reference_set(
                "ConnectivityNode.Terminals",
                &["Terminal"],
                |o| &o.terminals,
                |o| &mut o.terminals,
            )
            .unused(),
        ],
    ],
);

impl_cim_class!(ConnectivityNode, CONNECTIVITY_NODE);

// ========== Terminal ==========

/// Connection point of a piece of conducting equipment.
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub sequence_number: Option<i64>,
    pub connected: Option<bool>,
    pub phases: Option<PhaseCode>,
    pub conducting_equipment: Reference,
    pub connectivity_node: Reference,
    pub topological_node: Reference,
}

type TerminalAttr = AttributeDescriptor<Terminal>;

static TERMINAL: AttributeTable<Terminal> = AttributeTable::new(
    "Terminal",
    &[
        identified_object_attributes!(Terminal),
        &[
            TerminalAttr::primitive(
                "ACDCTerminal.sequenceNumber",
                ValueType::Integer,
                |o| integer_text(&o.sequence_number),
                |o, v| set_integer(&mut o.sequence_number, v),
            ),
            TerminalAttr::primitive(
                "ACDCTerminal.connected",
                ValueType::Boolean,
                |o| boolean_text(&o.connected),
                |o, v| set_boolean(&mut o.connected, v),
            ),
        ],
        &[
            TerminalAttr::enumeration(
                "Terminal.phases",
                |o| enum_text(&o.phases),
                |o, v| set_enum(&mut o.phases, v),
            ),
            TerminalAttr::reference(
                "Terminal.ConductingEquipment",
                &["ACLineSegment", "BusbarSection"],
                |o| &o.conducting_equipment,
                |o| &mut o.conducting_equipment,
            ),
            TerminalAttr::reference(
                "Terminal.ConnectivityNode",
                &["ConnectivityNode"],
                |o| &o.connectivity_node,
                |o| &mut o.connectivity_node,
            ),
            TerminalAttr::reference(
                "Terminal.TopologicalNode",
                &["TopologicalNode"],
                |o| &o.topological_node,
                |o| &mut o.topological_node,
            ),
        ],
    ],
);

impl_cim_class!(Terminal, TERMINAL);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;
    use crate::object::{CimClass, CimObject};

    #[test]
    fn test_terminal_attribute_names() {
        let terminal = Terminal::with_rdfid("_t1");
        let names = terminal.attribute_names();
        assert_eq!(&names[..4], &["mRID", "name", "description", "shortName"]);
        assert!(names.contains(&"ConductingEquipment"));
        assert!(names.contains(&"phases"));
    }

    #[test]
    fn test_terminal_enum_and_boolean() {
        let mut terminal = Terminal::with_rdfid("_t1");
        terminal
            .set_attribute("phases", "http://iec.ch/TC57/CIM100#PhaseCode.ABC")
            .unwrap();
        terminal.set_attribute("connected", "TRUE").unwrap();
        terminal.set_attribute("sequenceNumber", "2").unwrap();

        assert_eq!(terminal.phases, Some(PhaseCode::ABC));
        assert!(terminal.is_enum_attribute("phases").unwrap());
        assert_eq!(
            terminal.get_attribute("phases").unwrap(),
            Some(AttributeValue::Text("PhaseCode.ABC".into()))
        );
        assert_eq!(
            terminal.get_attribute("connected").unwrap(),
            Some(AttributeValue::Text("true".into()))
        );
        assert!(terminal.set_attribute("sequenceNumber", "two").is_err());
    }

    #[test]
    fn test_nominal_voltage_rejects_nan() {
        let mut voltage = BaseVoltage::with_rdfid("_bv");
        voltage.set_attribute("nominalVoltage", "220").unwrap();
        assert!(matches!(
            voltage.set_attribute("nominalVoltage", "NaN"),
            Err(crate::Error::MalformedValue { .. })
        ));
        assert_eq!(voltage.nominal_voltage, Some(220.0));
    }

    #[test]
    fn test_connectivity_node_terminals_inert() {
        let node = ConnectivityNode::with_rdfid("_cn");
        assert!(!node.is_used_attribute("Terminals").unwrap());
        assert!(node.is_used_attribute("ConnectivityNodeContainer").unwrap());
    }

    #[test]
    fn test_short_name_namespace() {
        let descriptor = BaseVoltage::attribute_table().get("shortName").unwrap();
        assert_eq!(descriptor.namespace_url, crate::attribute::ENTSOE_NAMESPACE);
    }
}
