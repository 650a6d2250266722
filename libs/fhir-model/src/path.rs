//! Path tracking during traversal
//!
//! [`PathTracker`] turns the `(name, index)` pairs passed to
//! `visit_start`/`visit_end` into FHIRPath-style locations such as
//! `OperationOutcome.issue[0].severity`.

use crate::visitor::{NodeRef, Visitor};
use smallvec::SmallVec;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    name: String,
    index: Option<usize>,
}

/// Stack of element names from the traversal root to the current node
#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    segments: SmallVec<[Segment; 16]>,
}

impl PathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, index: Option<usize>) {
        self.segments.push(Segment {
            name: name.to_string(),
            index,
        });
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of the current node
    pub fn path(&self) -> String {
        let mut path = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                path.push('.');
            }
            path.push_str(&segment.name);
            if let Some(index) = segment.index {
                path.push_str(&format!("[{}]", index));
            }
        }
        path
    }

    /// Path of a child of the current node that is not itself a node (`id`, `url`, `value`)
    pub fn child_path(&self, name: &str) -> String {
        if self.is_empty() {
            return name.to_string();
        }
        format!("{}.{}", self.path(), name)
    }
}

/// Records the path and type of every visited node, in pre-order
#[derive(Debug, Clone, Default)]
pub struct PathCollector {
    tracker: PathTracker,
    max_depth: Option<usize>,
    entries: Vec<(String, &'static str)>,
}

impl PathCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only descend `max_depth` levels; the root is level 1
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[(String, &'static str)] {
        &self.entries
    }

    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|(path, _)| path.as_str()).collect()
    }

    pub fn into_entries(self) -> Vec<(String, &'static str)> {
        self.entries
    }
}

impl Visitor for PathCollector {
    fn visit_start(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) {
        self.tracker.push(name, index);
        self.entries.push((self.tracker.path(), node.type_name()));
    }

    fn visit(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) -> bool {
        match self.max_depth {
            Some(max_depth) if self.tracker.depth() >= max_depth => {
                trace!(path = %self.tracker.path(), max_depth, "skipping children");
                false
            }
            _ => true,
        }
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {
        self.tracker.pop();
    }
}

/// Collects the paths of nodes accepted by a predicate
pub struct NodeCollector<F> {
    tracker: PathTracker,
    predicate: F,
    paths: Vec<String>,
}

impl<F> NodeCollector<F>
where
    F: FnMut(NodeRef<'_>) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self {
            tracker: PathTracker::new(),
            predicate,
            paths: Vec::new(),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }
}

impl<F> Visitor for NodeCollector<F>
where
    F: FnMut(NodeRef<'_>) -> bool,
{
    fn visit_start(&mut self, name: &str, index: Option<usize>, node: NodeRef<'_>) {
        self.tracker.push(name, index);
        if (self.predicate)(node) {
            self.paths.push(self.tracker.path());
        }
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {
        self.tracker.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_indices_and_dots() {
        let mut tracker = PathTracker::new();
        assert_eq!(tracker.path(), "");
        assert_eq!(tracker.child_path("id"), "id");

        tracker.push("Parameters", None);
        tracker.push("parameter", Some(2));
        tracker.push("part", Some(0));
        assert_eq!(tracker.path(), "Parameters.parameter[2].part[0]");
        assert_eq!(tracker.child_path("value"), "Parameters.parameter[2].part[0].value");

        tracker.pop();
        assert_eq!(tracker.depth(), 2);
        assert_eq!(tracker.path(), "Parameters.parameter[2]");

        tracker.push("part", Some(10));
        assert_eq!(tracker.path(), "Parameters.parameter[2].part[10]");
        tracker.pop();
        tracker.pop();
        tracker.push("parameter", Some(0));
        assert_eq!(tracker.path(), "Parameters.parameter[0]");
    }
}
