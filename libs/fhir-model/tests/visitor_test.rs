//! Traversal tests
//!
//! Checks callback order, list indices, pruning through `pre_visit` and
//! `visit`, and the path-tracking visitors.

mod test_support;

use ferrum_model::prelude::*;
use ferrum_model::resources::{BasicBuilder, OperationOutcomeIssueBuilder};
use ferrum_model::types::{CodeableConcept, Extension};
use ferrum_model::{NodeCollector, NodeRef, PathCollector};
use test_support::{
    code, coding, concept, issue, outcome, string, Event, RecordingVisitor,
};

fn starts(names: &[(&str, Option<usize>)]) -> Vec<(String, Option<usize>)> {
    names
        .iter()
        .map(|(name, index)| (name.to_string(), *index))
        .collect()
}

#[test]
fn test_callback_order_for_a_leaf() {
    let mut visitor = RecordingVisitor::new();
    code("error").traverse(&mut visitor);

    assert_eq!(
        visitor.events,
        vec![
            Event::PreVisit("code"),
            Event::Start("code".into(), None, "code"),
            Event::Visit("code".into(), None),
            Event::Scalar("value".into(), "error".into()),
            Event::End("code".into(), None),
            Event::PostVisit("code"),
        ]
    );
}

#[test]
fn test_operation_outcome_traversal() {
    let outcome = outcome([issue("error", "invalid")]);
    let mut visitor = RecordingVisitor::new();
    outcome.traverse(&mut visitor);

    assert_eq!(
        visitor.starts(),
        starts(&[
            ("OperationOutcome", None),
            ("issue", Some(0)),
            ("severity", None),
            ("code", None),
        ])
    );
    assert_eq!(
        visitor.scalars(),
        vec![
            ("value".to_string(), "error".to_string()),
            ("value".to_string(), "invalid".to_string()),
        ]
    );
    assert_eq!(
        visitor.type_names(),
        vec!["OperationOutcome", "OperationOutcome.Issue", "code", "code"]
    );
}

#[test]
fn test_list_items_are_indexed_in_declaration_order() {
    let issue = OperationOutcomeIssueBuilder::new(code("error"), code("invalid"))
        .expression([string("Patient.name")])
        .location([string("/f:a"), string("/f:b"), string("/f:c")])
        .diagnostics(string("three locations"))
        .build()
        .unwrap();
    let mut visitor = RecordingVisitor::new();
    issue.traverse(&mut visitor);

    assert_eq!(
        visitor.starts(),
        starts(&[
            ("OperationOutcome.Issue", None),
            ("severity", None),
            ("code", None),
            ("diagnostics", None),
            ("location", Some(0)),
            ("location", Some(1)),
            ("location", Some(2)),
            ("expression", Some(0)),
        ])
    );

    let ends: Vec<_> = visitor
        .events
        .iter()
        .filter_map(|event| match event {
            Event::End(name, Some(index)) if name == "location" => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(ends, vec![0, 1, 2]);
}

#[test]
fn test_list_boundaries_wrap_items() {
    let issue = OperationOutcomeIssueBuilder::new(code("error"), code("invalid"))
        .location([string("a"), string("b")])
        .build()
        .unwrap();
    let mut visitor = RecordingVisitor::new();
    issue.traverse(&mut visitor);

    let list_start = visitor
        .events
        .iter()
        .position(|event| *event == Event::ListStart("location".into(), 2))
        .unwrap();
    let first = visitor
        .events
        .iter()
        .position(|event| *event == Event::Start("location".into(), Some(0), "string"))
        .unwrap();
    let last = visitor
        .events
        .iter()
        .position(|event| *event == Event::End("location".into(), Some(1)))
        .unwrap();
    let list_end = visitor
        .events
        .iter()
        .position(|event| *event == Event::ListEnd("location".into(), 2))
        .unwrap();
    assert!(list_start < first && first < last && last < list_end);

    // Empty lists produce no boundaries
    assert!(!visitor
        .events
        .iter()
        .any(|event| matches!(event, Event::ListStart(name, _) if name == "expression")));
}

#[test]
fn test_inherited_elements_come_first() {
    let marker = Extension::builder()
        .url("http://example.org/marker")
        .value(code("m"))
        .build()
        .unwrap();
    let issue = OperationOutcomeIssueBuilder::new(code("error"), code("invalid"))
        .id("i1")
        .extension([marker.clone()])
        .modifier_extension([marker])
        .build()
        .unwrap();
    let mut visitor = RecordingVisitor::new();
    issue.traverse(&mut visitor);

    assert_eq!(
        visitor.start_names(),
        vec![
            "OperationOutcome.Issue",
            "extension",
            "value",
            "modifierExtension",
            "value",
            "severity",
            "code",
        ]
    );
    assert_eq!(
        visitor.scalars()[0],
        ("id".to_string(), "i1".to_string())
    );
    assert_eq!(
        visitor.scalars()[1],
        ("url".to_string(), "http://example.org/marker".to_string())
    );
}

#[test]
fn test_resource_elements_and_contained() {
    let inner = BasicBuilder::new(concept("http://example.org/kinds", "inner"))
        .build()
        .unwrap();
    let outer = ferrum_model::resources::OperationOutcomeBuilder::new([issue("error", "invalid")])
        .id("oo")
        .language(code("en"))
        .contained([inner])
        .build()
        .unwrap();
    let mut collector = PathCollector::new();
    outer.traverse(&mut collector);

    assert_eq!(
        collector.entries()[..4],
        [
            ("OperationOutcome".to_string(), "OperationOutcome"),
            ("OperationOutcome.language".to_string(), "code"),
            ("OperationOutcome.contained[0]".to_string(), "Basic"),
            ("OperationOutcome.contained[0].code".to_string(), "CodeableConcept"),
        ]
    );
    assert!(collector
        .paths()
        .contains(&"OperationOutcome.issue[0].severity"));
}

#[test]
fn test_pre_visit_false_skips_the_subtree() {
    let details = CodeableConcept::builder()
        .coding([coding("http://example.org/cs", "a"), coding("http://example.org/cs", "b")])
        .text(string("details"))
        .build()
        .unwrap();
    let issue = OperationOutcomeIssueBuilder::new(code("error"), code("invalid"))
        .details(details)
        .build()
        .unwrap();

    let mut visitor = RecordingVisitor::skipping(&["Coding"]);
    issue.traverse(&mut visitor);

    // pre_visit is still asked about each coding, but nothing else is reported
    let asked = visitor
        .events
        .iter()
        .filter(|event| **event == Event::PreVisit("Coding"))
        .count();
    assert_eq!(asked, 2);
    assert!(!visitor.type_names().contains(&"Coding"));
    assert!(!visitor.type_names().contains(&"uri"));
    assert!(!visitor
        .events
        .iter()
        .any(|event| *event == Event::PostVisit("Coding")));
    assert!(visitor.start_names().contains(&"text".to_string()));
}

#[test]
fn test_pre_visit_false_on_root() {
    let mut visitor = RecordingVisitor::skipping(&["OperationOutcome"]);
    outcome([issue("error", "invalid")]).traverse(&mut visitor);
    assert_eq!(visitor.events, vec![Event::PreVisit("OperationOutcome")]);
}

#[test]
fn test_visit_false_skips_children_only() {
    let mut visitor = RecordingVisitor::stopping_at(&["OperationOutcome.Issue"]);
    outcome([issue("error", "invalid"), issue("warning", "processing")]).traverse(&mut visitor);

    assert_eq!(
        visitor.starts(),
        starts(&[
            ("OperationOutcome", None),
            ("issue", Some(0)),
            ("issue", Some(1)),
        ])
    );
    assert!(visitor
        .events
        .contains(&Event::End("issue".into(), Some(1))));
    assert!(visitor
        .events
        .contains(&Event::PostVisit("OperationOutcome.Issue")));
}

#[test]
fn test_choice_values_are_visited_as_their_type() {
    let extension = Extension::builder()
        .url("http://example.org/flag")
        .value(coding("http://example.org/cs", "x"))
        .build()
        .unwrap();
    let mut collector = PathCollector::new();
    extension.traverse(&mut collector);

    assert_eq!(
        collector.entries(),
        &[
            ("Extension".to_string(), "Extension"),
            ("Extension.value".to_string(), "Coding"),
            ("Extension.value.system".to_string(), "uri"),
            ("Extension.value.code".to_string(), "code"),
        ]
    );
}

#[test]
fn test_max_depth_prunes_deeper_nodes() {
    let outcome = outcome([issue("error", "invalid")]);
    let mut collector = PathCollector::with_max_depth(2);
    outcome.traverse(&mut collector);
    assert_eq!(
        collector.paths(),
        vec!["OperationOutcome", "OperationOutcome.issue[0]"]
    );
}

#[test]
fn test_node_collector_matches_by_shape() {
    let outcome = outcome([issue("error", "invalid"), issue("warning", "processing")]);
    let mut collector = NodeCollector::new(|node: NodeRef<'_>| match node {
        NodeRef::Code(code) => code.value().map(String::as_str) == Some("warning"),
        _ => false,
    });
    outcome.traverse(&mut collector);
    assert_eq!(collector.into_paths(), vec!["OperationOutcome.issue[1].severity"]);
}

#[test]
fn test_visitor_state_is_owned_by_the_visitor() {
    #[derive(Default)]
    struct Depth {
        current: usize,
        max: usize,
    }

    impl Visitor for Depth {
        fn visit_start(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {
            self.current += 1;
            self.max = self.max.max(self.current);
        }

        fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {
            self.current -= 1;
        }
    }

    let mut depth = Depth::default();
    outcome([issue("error", "invalid")]).traverse(&mut depth);
    assert_eq!(depth.current, 0);
    assert_eq!(depth.max, 3);
}
