//! Interchange - turning raw model files into unlinked objects and back
//!
//! RDF/XML parsing lives outside this crate. [`JsonInterchange`] reads and
//! writes a flat JSON object list:
//!
//! ```json
//! [
//!   { "rdfid": "_t1", "type": "Terminal",
//!     "attributes": { "name": "T1", "ConductingEquipment": "_b1" } }
//! ]
//! ```
//!
//! Reference sets are written as arrays of rdf:IDs.

use crate::attribute::{AttributeKind, AttributeValue};
use crate::graph::ModelGraph;
use crate::object::CimObject;
use crate::reference::normalize_rdfid;
use crate::storage::ClassMap;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Produces populated but unlinked objects from raw interchange text.
pub trait InterchangeReader {
    /// Objects keyed by rdf:ID
    fn read(&self, payload: &str) -> Result<BTreeMap<String, Box<dyn CimObject>>>;
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonObject {
    rdfid: String,
    #[serde(rename = "type")]
    cim_type: String,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
}

/// Reader and writer for the JSON object-list format.
pub struct JsonInterchange {
    classes: ClassMap,
}

impl Default for JsonInterchange {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonInterchange {
    /// Reader for the built-in classes
    pub fn new() -> Self {
        Self::with_classes(ClassMap::with_cim_classes())
    }

    pub fn with_classes(classes: ClassMap) -> Self {
        Self { classes }
    }

    fn build(&self, entry: JsonObject) -> Result<Box<dyn CimObject>> {
        let mut object = self.classes.new_object(&entry.cim_type)?;
        object.set_rdfid(normalize_rdfid(&entry.rdfid));

        for (name, value) in &entry.attributes {
            match value {
                AttributeValue::Text(text) => object.set_attribute(name, text)?,
                AttributeValue::TextSet(members) => {
                    if object.attribute_kind(name)? != AttributeKind::ReferenceSet {
                        return Err(Error::InvalidValueShape {
                            attribute: object.attribute_full_name(name)?,
                        });
                    }
                    for member in members {
                        object.set_attribute(name, member)?;
                    }
                }
            }
        }
        Ok(object)
    }

    /// Serialize objects, in the given order, to the JSON object list
    pub fn write<'a>(&self, objects: impl IntoIterator<Item = &'a dyn CimObject>) -> Result<String> {
        let mut entries = Vec::new();
        for object in objects {
            let mut attributes = BTreeMap::new();
            for name in object.attribute_names() {
                if let Some(value) = object.get_attribute(name)? {
                    attributes.insert(name.to_string(), value);
                }
            }
            entries.push(JsonObject {
                rdfid: object.rdfid().to_string(),
                cim_type: object.cim_type().to_string(),
                attributes,
            });
        }
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    /// Serialize a loaded model in load order
    pub fn write_graph(&self, graph: &ModelGraph) -> Result<String> {
        self.write(graph.iter())
    }
}

impl InterchangeReader for JsonInterchange {
    fn read(&self, payload: &str) -> Result<BTreeMap<String, Box<dyn CimObject>>> {
        let entries: Vec<JsonObject> = serde_json::from_str(payload)?;
        let mut objects = BTreeMap::new();
        for entry in entries {
            let object = self.build(entry)?;
            let rdfid = object.rdfid().to_string();
            if rdfid.is_empty() {
                return Err(Error::Interchange(format!(
                    "{} object without rdf:ID",
                    object.cim_type()
                )));
            }
            if objects.insert(rdfid.clone(), object).is_some() {
                return Err(Error::Interchange(format!("Duplicate rdf:ID {}", rdfid)));
            }
        }
        tracing::debug!("Read {} objects from interchange payload", objects.len());
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r##"[
        { "rdfid": "_b1", "type": "BusbarSection",
          "attributes": { "name": "Bus 1", "ipMax": "2500" } },
        { "rdfid": "#_t1", "type": "Terminal",
          "attributes": { "ConductingEquipment": "#_b1", "phases": "PhaseCode.ABC" } },
        { "rdfid": "_i1", "type": "TopologicalIsland",
          "attributes": { "TopologicalNodes": ["_n1", "_n2"] } }
    ]"##;

    #[test]
    fn test_read_objects() {
        let objects = JsonInterchange::new().read(PAYLOAD).unwrap();
        assert_eq!(objects.len(), 3);

        let terminal = &objects["_t1"];
        assert_eq!(terminal.cim_type(), "Terminal");
        assert_eq!(
            terminal.get_attribute("ConductingEquipment").unwrap(),
            Some(AttributeValue::Text("_b1".into()))
        );
        let island = &objects["_i1"];
        assert_eq!(
            island.get_attribute("TopologicalNodes").unwrap().unwrap().as_set().unwrap().len(),
            2
        );
    }

    #[test]
    fn test_unknown_class_and_attribute() {
        let reader = JsonInterchange::new();
        let unknown_class = r#"[{ "rdfid": "_x", "type": "Breaker" }]"#;
        assert!(matches!(reader.read(unknown_class), Err(Error::UnknownClass(_))));

        let unknown_attribute =
            r#"[{ "rdfid": "_t", "type": "Terminal", "attributes": { "open": "true" } }]"#;
        assert!(matches!(
            reader.read(unknown_attribute),
            Err(Error::UnknownAttribute { class: "Terminal", .. })
        ));
    }

    #[test]
    fn test_list_for_single_reference_rejected() {
        let payload = r#"[{ "rdfid": "_t", "type": "Terminal",
            "attributes": { "ConductingEquipment": ["_a", "_b"] } }]"#;
        assert!(matches!(
            JsonInterchange::new().read(payload),
            Err(Error::InvalidValueShape { attribute: "Terminal.ConductingEquipment" })
        ));
    }

    #[test]
    fn test_duplicate_rdfid_rejected() {
        let payload = r##"[{ "rdfid": "_t", "type": "Terminal" }, { "rdfid": "#_t", "type": "Terminal" }]"##;
        assert!(matches!(
            JsonInterchange::new().read(payload),
            Err(Error::Interchange(_))
        ));
    }

    #[test]
    fn test_write_reads_back() {
        let json = JsonInterchange::new();
        let objects = json.read(PAYLOAD).unwrap();
        let written = json.write(objects.values().map(|o| o.as_ref())).unwrap();
        let again = json.read(&written).unwrap();

        for (rdfid, object) in &objects {
            let other = &again[rdfid];
            for name in object.attribute_names() {
                assert_eq!(object.get_attribute(name).unwrap(), other.get_attribute(name).unwrap());
            }
        }
    }
}
