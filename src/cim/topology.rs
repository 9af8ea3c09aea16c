//! Bus-branch topology produced by topology processing

use super::IdentifiedObject;
use crate::attribute::{AttributeDescriptor, AttributeTable};
use crate::object::ObjectBase;
use crate::reference::{Reference, ReferenceSet};

#[derive(Debug, Clone, Default)]
pub struct TopologicalNode {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub base_voltage: Reference,
    pub container: Reference,
    /// Inverse of `Terminal.TopologicalNode`; declared but not stored
    pub terminal: ReferenceSet,
}

type TopologicalNodeAttr = AttributeDescriptor<TopologicalNode>;

static TOPOLOGICAL_NODE: AttributeTable<TopologicalNode> = AttributeTable::new(
    "TopologicalNode",
    &[
        identified_object_attributes!(TopologicalNode),
        &[
            TopologicalNodeAttr::reference(
                "TopologicalNode.BaseVoltage",
                &["BaseVoltage"],
                |o| &o.base_voltage,
                |o| &mut o.base_voltage,
            ),
            TopologicalNodeAttr::reference(
                "TopologicalNode.ConnectivityNodeContainer",
                &["VoltageLevel", "Substation"],
                |o| &o.container,
                |o| &mut o.container,
            ),
            TopologicalNodeAttr::reference_set(
                "TopologicalNode.Terminal",
                &["Terminal"],
                |o| &o.terminal,
                |o| &mut o.terminal,
            )
            .unused(),
        ],
    ],
);

impl_cim_class!(TopologicalNode, TOPOLOGICAL_NODE);

/// Electrically connected subset of the network.
#[derive(Debug, Clone, Default)]
pub struct TopologicalIsland {
    pub base: ObjectBase,
    pub identified: IdentifiedObject,
    pub angle_ref_node: Reference,
    pub nodes: ReferenceSet,
}

type TopologicalIslandAttr = AttributeDescriptor<TopologicalIsland>;

static TOPOLOGICAL_ISLAND: AttributeTable<TopologicalIsland> = AttributeTable::new(
    "TopologicalIsland",
    &[
        identified_object_attributes!(TopologicalIsland),
        &[
            TopologicalIslandAttr::reference(
                "TopologicalIsland.AngleRefTopologicalNode",
                &["TopologicalNode"],
                |o| &o.angle_ref_node,
                |o| &mut o.angle_ref_node,
            ),
            TopologicalIslandAttr::reference_set(
                "TopologicalIsland.TopologicalNodes",
                &["TopologicalNode"],
                |o| &o.nodes,
                |o| &mut o.nodes,
            ),
        ],
    ],
);

impl_cim_class!(TopologicalIsland, TOPOLOGICAL_ISLAND);
