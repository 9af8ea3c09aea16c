use crate::attribute::{AttributeKind, AttributeValue};
use crate::graph::ModelGraph;
use crate::linker::diagnostics::{DanglingReference, DiagnosticSink, LinkFailure, LinkReport};
use crate::object::CimObject;
use crate::reference::ObjectRef;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Resolves every used reference attribute of a loaded model graph.
///
/// Targets are looked up in the graph's rdf:ID map only. A missing target is
/// reported as dangling; a failing setter is reported and skipped. Neither
/// stops the pass.
pub struct ObjectLinker<'a> {
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ObjectLinker<'a> {
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    pub fn run(&self, graph: &mut ModelGraph) -> LinkReport {
        let index = graph.identity_map();
        let mut report = LinkReport::default();

        for object in graph.objects_mut() {
            report.objects += 1;
            self.link_object(object.as_mut(), &index, &mut report);
        }

        tracing::debug!(
            "Linked {} objects: {} resolved, {} dangling, {} failed",
            report.objects,
            report.resolved,
            report.dangling.len(),
            report.failures.len()
        );
        report
    }

    fn link_object(
        &self,
        object: &mut dyn CimObject,
        index: &BTreeMap<String, ObjectRef>,
        report: &mut LinkReport,
    ) {
        for name in object.attribute_names() {
            match self.link_attribute(object, name, index, report) {
                Ok(()) => {}
                Err(e) => self.fail(object, name, None, e, report),
            }
        }
    }

    fn link_attribute(
        &self,
        object: &mut dyn CimObject,
        name: &'static str,
        index: &BTreeMap<String, ObjectRef>,
        report: &mut LinkReport,
    ) -> Result<()> {
        if !object.is_used_attribute(name)?
            || object.is_primitive_attribute(name)?
            || object.is_enum_attribute(name)?
        {
            return Ok(());
        }

        let kind = object.attribute_kind(name)?;
        let Some(value) = object.get_attribute(name)? else {
            return Ok(());
        };
        report.attributes += 1;

        // The declared kind decides the shape, not the runtime value
        match (kind, value) {
            (AttributeKind::Reference, AttributeValue::Text(target)) => {
                self.link_target(object, name, &target, index, report);
            }
            (AttributeKind::ReferenceSet, AttributeValue::TextSet(targets)) => {
                for target in &targets {
                    self.link_target(object, name, target, index, report);
                }
            }
            _ => {
                return Err(Error::InvalidValueShape {
                    attribute: object.attribute_full_name(name)?,
                });
            }
        }
        Ok(())
    }

    fn link_target(
        &self,
        object: &mut dyn CimObject,
        name: &'static str,
        target: &str,
        index: &BTreeMap<String, ObjectRef>,
        report: &mut LinkReport,
    ) {
        match index.get(target) {
            Some(found) => match object.set_attribute_ref(name, found.clone()) {
                Ok(()) => report.resolved += 1,
                Err(e) => self.fail(object, name, Some(target), e, report),
            },
            None => {
                let dangling = DanglingReference {
                    cim_type: object.cim_type(),
                    rdfid: object.rdfid().to_string(),
                    attribute: object.attribute_full_name(name).unwrap_or(name),
                    target: target.to_string(),
                };
                self.sink.dangling_reference(&dangling);
                report.dangling.push(dangling);
            }
        }
    }

    fn fail(
        &self,
        object: &dyn CimObject,
        name: &str,
        target: Option<&str>,
        error: Error,
        report: &mut LinkReport,
    ) {
        let failure = LinkFailure {
            cim_type: object.cim_type(),
            rdfid: object.rdfid().to_string(),
            attribute: object
                .attribute_full_name(name)
                .map(str::to_string)
                .unwrap_or_else(|_| name.to_string()),
            target: target.map(str::to_string),
            error: error.to_string(),
        };
        self.sink.link_failure(&failure);
        report.failures.push(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cim::{BusbarSection, Terminal, TopologicalIsland, TopologicalNode};
    use crate::linker::TracingSink;
    use crate::object::CimClass;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        dangling: Mutex<Vec<String>>,
        failures: Mutex<Vec<String>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn dangling_reference(&self, dangling: &DanglingReference) {
            self.dangling.lock().unwrap().push(dangling.target.clone());
        }

        fn link_failure(&self, failure: &LinkFailure) {
            self.failures.lock().unwrap().push(failure.attribute.clone());
        }
    }

    fn terminal_to(rdfid: &str, equipment: &str) -> Box<dyn CimObject> {
        let mut terminal = Terminal::with_rdfid(rdfid);
        terminal.set_attribute("ConductingEquipment", equipment).unwrap();
        Box::new(terminal)
    }

    #[test]
    fn test_forward_reference_resolves() {
        let mut graph = ModelGraph::new(Some(1));
        // Terminal loaded before the busbar it points at
        graph.insert(terminal_to("_t1", "_b1"));
        graph.insert(Box::new(BusbarSection::with_rdfid("_b1")));

        let report = ObjectLinker::new(&TracingSink).run(&mut graph);
        assert_eq!(report.resolved, 1);
        assert!(report.is_clean());

        let terminal = graph.get("_t1").unwrap();
        let links = terminal.linked_objects("ConductingEquipment").unwrap();
        let target = graph.resolve(links[0]).unwrap();
        assert_eq!(target.rdfid(), "_b1");
        assert_eq!(target.cim_type(), "BusbarSection");
    }

    #[test]
    fn test_dangling_reference_is_reported_not_fatal() {
        let sink = RecordingSink::default();
        let mut graph = ModelGraph::new(Some(1));
        graph.insert(terminal_to("_t1", "_elsewhere"));
        graph.insert(terminal_to("_t2", "_b1"));
        graph.insert(Box::new(BusbarSection::with_rdfid("_b1")));

        let report = ObjectLinker::new(&sink).run(&mut graph);
        assert_eq!(report.resolved, 1);
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.dangling[0].attribute, "Terminal.ConductingEquipment");
        assert_eq!(*sink.dangling.lock().unwrap(), vec!["_elsewhere".to_string()]);

        let t1 = graph.get("_t1").unwrap();
        assert!(t1.linked_objects("ConductingEquipment").unwrap().is_empty());
        assert_eq!(
            t1.get_attribute("ConductingEquipment").unwrap(),
            Some(AttributeValue::Text("_elsewhere".into()))
        );
    }

    #[test]
    fn test_type_mismatch_does_not_abort_pass() {
        let sink = RecordingSink::default();
        let mut graph = ModelGraph::new(Some(1));
        let mut bad = Terminal::with_rdfid("_t1");
        bad.set_attribute("ConductingEquipment", "_t2").unwrap();
        bad.set_attribute("TopologicalNode", "_tn").unwrap();
        graph.insert(Box::new(bad));
        graph.insert(Box::new(Terminal::with_rdfid("_t2")));
        graph.insert(Box::new(TopologicalNode::with_rdfid("_tn")));

        let report = ObjectLinker::new(&sink).run(&mut graph);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].target.as_deref(), Some("_t2"));
        assert_eq!(report.resolved, 1, "remaining attributes still linked");
        assert_eq!(
            *sink.failures.lock().unwrap(),
            vec!["Terminal.ConductingEquipment".to_string()]
        );
    }

    #[test]
    fn test_reference_set_links_present_members() {
        let mut graph = ModelGraph::new(Some(1));
        let mut island = TopologicalIsland::with_rdfid("_island");
        for id in ["A", "B", "C"] {
            island.set_attribute("TopologicalNodes", id).unwrap();
        }
        graph.insert(Box::new(island));
        graph.insert(Box::new(TopologicalNode::with_rdfid("A")));
        graph.insert(Box::new(TopologicalNode::with_rdfid("C")));

        let report = ObjectLinker::new(&TracingSink).run(&mut graph);
        assert_eq!(report.resolved, 2);
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.dangling[0].target, "B");

        let island = graph.get("_island").unwrap();
        let mut linked: Vec<&str> = island
            .linked_objects("TopologicalNodes")
            .unwrap()
            .into_iter()
            .map(|r| r.rdfid.as_str())
            .collect();
        linked.sort();
        assert_eq!(linked, vec!["A", "C"]);
    }
}
