//! Reference slots - object-valued attributes before and after linking
//!
//! A reference attribute holds the rdf:ID of its target as text until the
//! linker finds the target among the loaded objects, then it additionally
//! carries an [`ObjectRef`] pointing at the live object in the [`ModelGraph`].
//!
//! [`ModelGraph`]: crate::graph::ModelGraph

use crate::graph::ObjectId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Handle to a live object inside a loaded model graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectRef {
    /// Position of the target in its graph
    pub object: ObjectId,
    /// rdf:ID of the target
    pub rdfid: String,
    /// Concrete CIM class of the target
    pub cim_type: &'static str,
}

impl ObjectRef {
    pub fn new(object: ObjectId, rdfid: impl Into<String>, cim_type: &'static str) -> Self {
        Self {
            object,
            rdfid: rdfid.into(),
            cim_type,
        }
    }
}

/// Strip the fragment marker interchange files put in front of local references.
pub fn normalize_rdfid(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('#').unwrap_or(text)
}

/// Single-valued object reference (multiplicity 0..1 / 1..1).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    target: Option<String>,
    resolved: Option<ObjectRef>,
}

impl Reference {
    /// An unlinked reference to `rdfid`
    pub fn to(rdfid: &str) -> Self {
        let mut reference = Self::default();
        reference.set_id(rdfid);
        reference
    }

    /// rdf:ID of the target, linked or not
    pub fn target_id(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn resolved(&self) -> Option<&ObjectRef> {
        self.resolved.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_none()
    }

    /// Point the reference at a raw rdf:ID. An empty id clears the slot.
    pub fn set_id(&mut self, rdfid: &str) {
        let rdfid = normalize_rdfid(rdfid);
        if rdfid.is_empty() {
            self.clear();
            return;
        }
        if self.resolved.as_ref().is_some_and(|r| r.rdfid != rdfid) {
            self.resolved = None;
        }
        self.target = Some(rdfid.to_string());
    }

    /// Link the reference to a live object.
    pub fn link(&mut self, target: ObjectRef) {
        self.target = Some(target.rdfid.clone());
        self.resolved = Some(target);
    }

    pub fn clear(&mut self) {
        self.target = None;
        self.resolved = None;
    }
}

/// Multi-valued object reference (multiplicity 0..n / 1..n).
///
/// Linking is additive: every call to [`ReferenceSet::link`] adds one member
/// and never drops members linked before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    targets: BTreeSet<String>,
    resolved: BTreeMap<String, ObjectRef>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw rdf:ID member. Empty ids are ignored.
    pub fn add_id(&mut self, rdfid: &str) {
        let rdfid = normalize_rdfid(rdfid);
        if !rdfid.is_empty() {
            self.targets.insert(rdfid.to_string());
        }
    }

    /// Add a linked member.
    pub fn link(&mut self, target: ObjectRef) {
        self.targets.insert(target.rdfid.clone());
        self.resolved.insert(target.rdfid.clone(), target);
    }

    /// All member ids, sorted
    pub fn ids(&self) -> &BTreeSet<String> {
        &self.targets
    }

    /// Linked members, ordered by rdf:ID
    pub fn resolved(&self) -> impl Iterator<Item = &ObjectRef> {
        self.resolved.values()
    }

    pub fn resolved_len(&self) -> usize {
        self.resolved.len()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.resolved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(index: usize, rdfid: &str) -> ObjectRef {
        ObjectRef::new(ObjectId(index), rdfid, "Terminal")
    }

    #[test]
    fn test_reference_normalizes_fragment() {
        let reference = Reference::to("#_abc");
        assert_eq!(reference.target_id(), Some("_abc"));
        assert!(!reference.is_resolved());
    }

    #[test]
    fn test_reference_link_and_retarget() {
        let mut reference = Reference::to("_t1");
        reference.link(target(0, "_t1"));
        assert!(reference.is_resolved());

        reference.set_id("_t1");
        assert!(reference.is_resolved(), "same id keeps the link");

        reference.set_id("_t2");
        assert!(!reference.is_resolved());
        assert_eq!(reference.target_id(), Some("_t2"));

        reference.set_id("");
        assert!(reference.is_empty());
    }

    #[test]
    fn test_reference_set_is_additive() {
        let mut set = ReferenceSet::new();
        set.add_id("A");
        set.add_id("B");
        set.add_id("C");

        set.link(target(0, "A"));
        set.link(target(2, "C"));
        set.link(target(2, "C"));

        assert_eq!(set.len(), 3);
        assert_eq!(set.resolved_len(), 2);
        let linked: Vec<&str> = set.resolved().map(|r| r.rdfid.as_str()).collect();
        assert_eq!(linked, vec!["A", "C"]);
    }
}
