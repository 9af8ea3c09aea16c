//! Link diagnostics and the sink they are reported to

use serde::Serialize;
use std::fmt;

/// A reference whose target is not part of the model.
///
/// Not an error: the target may live in another model (e.g. a boundary set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub cim_type: &'static str,
    /// rdf:ID of the object holding the reference
    pub rdfid: String,
    /// Full attribute name
    pub attribute: &'static str,
    /// rdf:ID that could not be found
    pub target: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} -> {} not in model",
            self.cim_type, self.rdfid, self.attribute, self.target
        )
    }
}

/// A reference that could not be linked even though it was looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkFailure {
    pub cim_type: &'static str,
    pub rdfid: String,
    pub attribute: String,
    pub target: Option<String>,
    pub error: String,
}

impl fmt::Display for LinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(
                f,
                "{} {}: {} -> {}: {}",
                self.cim_type, self.rdfid, self.attribute, target, self.error
            ),
            None => write!(
                f,
                "{} {}: {}: {}",
                self.cim_type, self.rdfid, self.attribute, self.error
            ),
        }
    }
}

/// Outcome of one linking pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkReport {
    /// Objects visited
    pub objects: usize,
    /// Reference attributes holding a value
    pub attributes: usize,
    /// Links established
    pub resolved: usize,
    pub dangling: Vec<DanglingReference>,
    pub failures: Vec<LinkFailure>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.failures.is_empty()
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Linker Stats:")?;
        writeln!(f, "  Objects: {}", self.objects)?;
        writeln!(f, "  Reference attributes: {}", self.attributes)?;
        writeln!(f, "  ✅ Resolved: {}", self.resolved)?;
        writeln!(f, "  🌍 Dangling: {}", self.dangling.len())?;
        writeln!(f, "  ❌ Failed: {}", self.failures.len())
    }
}

/// Receives link diagnostics as they happen.
///
/// Implementations must not panic; reporting never affects the link result.
pub trait DiagnosticSink: Send + Sync {
    fn dangling_reference(&self, dangling: &DanglingReference);

    fn link_failure(&self, failure: &LinkFailure);
}

/// Default sink: forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn dangling_reference(&self, dangling: &DanglingReference) {
        tracing::debug!(
            cim_type = dangling.cim_type,
            rdfid = %dangling.rdfid,
            attribute = dangling.attribute,
            target = %dangling.target,
            "Reference target not in model"
        );
    }

    fn link_failure(&self, failure: &LinkFailure) {
        tracing::warn!(
            cim_type = failure.cim_type,
            rdfid = %failure.rdfid,
            attribute = %failure.attribute,
            target = ?failure.target,
            "Failed to link attribute: {}",
            failure.error
        );
    }
}
