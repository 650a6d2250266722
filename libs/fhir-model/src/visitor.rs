//! Visitor traversal engine
//!
//! Every node implements [`Visitable`]. [`Visitable::accept`] drives a
//! depth-first, pre-order walk:
//!
//! 1. [`Visitor::pre_visit`] - returning `false` skips the node entirely
//! 2. [`Visitor::visit_start`]
//! 3. [`Visitor::visit`] - children are visited only if it returns `true`,
//!    in declaration order (`id`, `extension`, `modifierExtension`, then the
//!    type-specific elements); list items carry their zero-based index
//! 4. [`Visitor::visit_end`]
//! 5. [`Visitor::post_visit`]
//!
//! Nodes never inspect the visitor. Type-specific behaviour belongs to the
//! visitor, which matches on the closed [`NodeRef`] enum.

use crate::element::Element;
use crate::model::{ElementInfo, ModelInfo, TypeKind};
use crate::resource::Resource;
use crate::resources::{
    Basic, OperationOutcome, OperationOutcomeIssue, Parameters, ParametersParameter,
};
use crate::types::{
    Boolean, Canonical, Code, CodeableConcept, Coding, Date, DateTime, Decimal, Extension,
    FhirString, Id, Identifier, Instant, Integer, Meta, Narrative, Period, PositiveInt, Quantity,
    Reference, Uri, Xhtml,
};
use chrono::FixedOffset;
use std::fmt;

macro_rules! node_ref {
    (
        elements: [$($element:ident),+ $(,)?],
        resources: [$($resource:ident),+ $(,)?] $(,)?
    ) => {
        /// Borrowed view of any node in the model.
        ///
        /// This is the closed set of node shapes; visitors dispatch by
        /// matching on it.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum NodeRef<'a> {
            $($element(&'a $element),)+
            $($resource(&'a $resource),)+
        }

        impl<'a> NodeRef<'a> {
            /// Model type name (`"Coding"`, `"OperationOutcome.Issue"`, ...)
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$element(_) => <$element as ModelInfo>::TYPE_NAME,)+
                    $(Self::$resource(_) => <$resource as ModelInfo>::TYPE_NAME,)+
                }
            }

            pub fn kind(&self) -> TypeKind {
                match self {
                    $(Self::$element(_) => <$element as ModelInfo>::KIND,)+
                    $(Self::$resource(_) => <$resource as ModelInfo>::KIND,)+
                }
            }

            /// Element metadata of this node's type, in declaration order
            pub fn element_info(&self) -> &'static [ElementInfo] {
                match self {
                    $(Self::$element(_) => <$element as ModelInfo>::element_info(),)+
                    $(Self::$resource(_) => <$resource as ModelInfo>::element_info(),)+
                }
            }

            /// Local identity of the node (`Element.id` or `Resource.id`)
            pub fn id(&self) -> Option<&'a str> {
                match *self {
                    $(Self::$element(node) => Element::id(node),)+
                    $(Self::$resource(node) => Resource::id(node),)+
                }
            }
        }
    };
}

node_ref! {
    elements: [
        Boolean, Integer, PositiveInt, Decimal, FhirString, Code, Id, Uri, Canonical, Date,
        DateTime, Instant, Xhtml, Extension, Coding, CodeableConcept, Identifier, Reference,
        Period, Quantity, Meta, Narrative, OperationOutcomeIssue, ParametersParameter,
    ],
    resources: [OperationOutcome, Parameters, Basic],
}

impl NodeRef<'_> {
    pub fn is_resource(&self) -> bool {
        matches!(self.kind(), TypeKind::Resource)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind(), TypeKind::Primitive)
    }
}

/// Raw value carried by a leaf: `id` attributes, `url` and primitive values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Boolean(bool),
    Integer(i32),
    Decimal(&'a rust_decimal::Decimal),
    String(&'a str),
    Instant(&'a chrono::DateTime<FixedOffset>),
}

impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Decimal(value) => write!(f, "{}", value),
            Self::String(value) => f.write_str(value),
            Self::Instant(value) => write!(f, "{}", value.to_rfc3339()),
        }
    }
}

/// Callbacks invoked by [`Visitable::accept`].
///
/// Every method has a default, so a visitor overrides only what it needs. The
/// defaults visit every node and all of its children.
pub trait Visitor {
    /// Return `false` to skip this node and its subtree entirely
    fn pre_visit(&mut self, _node: NodeRef<'_>) -> bool {
        true
    }

    fn visit_start(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {}

    /// Return `false` to skip the children of this node
    fn visit(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) -> bool {
        true
    }

    fn visit_end(&mut self, _name: &str, _index: Option<usize>, _node: NodeRef<'_>) {}

    fn post_visit(&mut self, _node: NodeRef<'_>) {}

    /// Called for raw values: `id`, `url` and primitive `value`
    fn visit_scalar(&mut self, _name: &str, _value: ScalarRef<'_>) {}

    /// Called before the items of a non-empty repeating element
    fn visit_list_start(&mut self, _name: &str, _len: usize) {}

    /// Called after the items of a non-empty repeating element
    fn visit_list_end(&mut self, _name: &str, _len: usize) {}
}

/// Capability implemented by every node type
pub trait Visitable {
    fn as_node(&self) -> NodeRef<'_>;

    /// Visit the child elements in declaration order
    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V);

    /// Visit this node under the given element name.
    ///
    /// `index` is `Some` only when the node is an item of a repeating element.
    fn accept<V: Visitor + ?Sized>(&self, name: &str, index: Option<usize>, visitor: &mut V) {
        let node = self.as_node();
        if !visitor.pre_visit(node) {
            return;
        }
        visitor.visit_start(name, index, node);
        if visitor.visit(name, index, node) {
            self.accept_children(visitor);
        }
        visitor.visit_end(name, index, node);
        visitor.post_visit(node);
    }

    /// Visit this node as a traversal root, named after its type
    fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        let name = self.as_node().type_name();
        self.accept(name, None, visitor);
    }
}

/// Visit an optional singular element
pub fn accept_field<T, V>(value: Option<&T>, name: &str, visitor: &mut V)
where
    T: Visitable,
    V: Visitor + ?Sized,
{
    if let Some(value) = value {
        value.accept(name, None, visitor);
    }
}

/// Visit the items of a repeating element in insertion order
pub fn accept_list<T, V>(values: &[T], name: &str, visitor: &mut V)
where
    T: Visitable,
    V: Visitor + ?Sized,
{
    if values.is_empty() {
        return;
    }
    visitor.visit_list_start(name, values.len());
    for (index, value) in values.iter().enumerate() {
        value.accept(name, Some(index), visitor);
    }
    visitor.visit_list_end(name, values.len());
}

/// Visit an optional string scalar
pub fn accept_str<V>(value: Option<&str>, name: &str, visitor: &mut V)
where
    V: Visitor + ?Sized,
{
    if let Some(value) = value {
        visitor.visit_scalar(name, ScalarRef::String(value));
    }
}
