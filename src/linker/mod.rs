//! Linker - turns rdf:ID references into object links
//!
//! Runs once all objects of a model are loaded, so forward references need
//! no second pass.

pub mod diagnostics;
pub mod object_linker;

pub use diagnostics::{DanglingReference, DiagnosticSink, LinkFailure, LinkReport, TracingSink};
pub use object_linker::ObjectLinker;
