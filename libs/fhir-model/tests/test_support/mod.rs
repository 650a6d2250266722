#![allow(dead_code)]

use ferrum_model::prelude::*;
use ferrum_model::resources::{
    OperationOutcome, OperationOutcomeBuilder, OperationOutcomeIssue, OperationOutcomeIssueBuilder,
};
use ferrum_model::types::{CodeableConcept, Code, Coding, FhirString, Reference, Uri};
use ferrum_model::{NodeRef, ScalarRef};

pub fn code(value: &str) -> Code {
    Code::new(value).expect("fixture code must be valid")
}

pub fn string(value: &str) -> FhirString {
    FhirString::new(value).expect("fixture string must be valid")
}

pub fn uri(value: &str) -> Uri {
    Uri::new(value).expect("fixture uri must be valid")
}

pub fn coding(system: &str, value: &str) -> Coding {
    Coding::builder()
        .system(uri(system))
        .code(code(value))
        .build()
        .expect("fixture coding must build")
}

pub fn concept(system: &str, value: &str) -> CodeableConcept {
    CodeableConcept::builder()
        .coding([coding(system, value)])
        .build()
        .expect("fixture concept must build")
}

pub fn reference(value: &str) -> Reference {
    Reference::builder()
        .reference(string(value))
        .build()
        .expect("fixture reference must build")
}

pub fn issue(severity: &str, issue_type: &str) -> OperationOutcomeIssue {
    OperationOutcomeIssueBuilder::new(code(severity), code(issue_type))
        .build()
        .expect("fixture issue must build")
}

pub fn outcome(issues: impl IntoIterator<Item = OperationOutcomeIssue>) -> OperationOutcome {
    OperationOutcomeBuilder::new(issues)
        .build()
        .expect("fixture outcome must build")
}

/// One visitor callback, as observed by [`RecordingVisitor`]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PreVisit(&'static str),
    Start(String, Option<usize>, &'static str),
    Visit(String, Option<usize>),
    End(String, Option<usize>),
    PostVisit(&'static str),
    Scalar(String, String),
    ListStart(String, usize),
    ListEnd(String, usize),
}

/// Records every callback in order
#[derive(Debug, Default)]
pub struct RecordingVisitor {
    pub events: Vec<Event>,
    /// Types rejected by `pre_visit`
    pub skip: Vec<&'static str>,
    /// Types whose children are skipped by `visit`
    pub leaves: Vec<&'static str>,
}

impl RecordingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipping(types: &[&'static str]) -> Self {
        Self {
            skip: types.to_vec(),
            ..Self::default()
        }
    }

    pub fn stopping_at(types: &[&'static str]) -> Self {
        Self {
            leaves: types.to_vec(),
            ..Self::default()
        }
    }

    /// `(name, index)` of every `visit_start`, in order
    pub fn starts(&self) -> Vec<(String, Option<usize>)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Start(name, index, _) => Some((name.clone(), *index)),
                _ => None,
            })
            .collect()
    }

    pub fn start_names(&self) -> Vec<String> {
        self.starts().into_iter().map(|(name, _)| name).collect()
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Start(_, _, type_name) => Some(*type_name),
                _ => None,
            })
            .collect()
    }

    pub fn scalars(&self) -> Vec<(String, String)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Scalar(name, value) => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

impl Visitor for RecordingVisitor {
    fn pre_visit(&mut self, node: NodeRef<'_>) -> bool {
        self.events.push(Event::PreVisit(node.type_name()));
        !self.skip.contains(&node.type_name())
    }

    fn visit_start(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) {
        self.events
            .push(Event::Start(name.to_string(), index, node.type_name()));
    }

    fn visit(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) -> bool {
        self.events.push(Event::Visit(name.to_string(), index));
        !self.leaves.contains(&node.type_name())
    }

    fn visit_end(&mut self, name: &str, index: Option<usize>, _node: NodeRef<'_>) {
        self.events.push(Event::End(name.to_string(), index));
    }

    fn post_visit(&mut self, node: NodeRef<'_>) {
        self.events.push(Event::PostVisit(node.type_name()));
    }

    fn visit_scalar(&mut self, name: &str, value: ScalarRef<'_>) {
        self.events
            .push(Event::Scalar(name.to_string(), value.to_string()));
    }

    fn visit_list_start(&mut self, name: &str, len: usize) {
        self.events.push(Event::ListStart(name.to_string(), len));
    }

    fn visit_list_end(&mut self, name: &str, len: usize) {
        self.events.push(Event::ListEnd(name.to_string(), len));
    }
}
