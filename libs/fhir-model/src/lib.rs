//! FHIR object model
//!
//! This crate provides validated, immutable FHIR elements and resources and
//! the framework they share: builders, choice elements, structural
//! equality/hashing and a visitor traversal engine.
//!
//! # Module Organization
//!
//! - `builder`: [`Builder`] / [`Node`] traits and the inherited-setter traits
//! - `element`, `resource`: the common attributes every node embeds
//! - `choice`: closed unions for `[x]` elements and the dynamic [`DataType`]
//! - `validation`: stateless checks run by `build()`
//! - `visitor`, `path`: depth-first traversal and path tracking
//! - `model`: static metadata (type names, elements in declaration order)
//! - `types`: primitive and general-purpose complex data types
//! - `resources`: concrete resources
//!
//! # Lifecycle
//!
//! ```text
//! Builder --build()--> Node --accept()--> Visitor
//!    ^                   |
//!    +---to_builder()----+
//! ```
//!
//! # Example
//!
//! ```rust
//! use ferrum_model::prelude::*;
//! use ferrum_model::resources::{OperationOutcomeBuilder, OperationOutcomeIssueBuilder};
//! use ferrum_model::types::Code;
//! use ferrum_model::PathCollector;
//!
//! let issue = OperationOutcomeIssueBuilder::new(Code::new("error")?, Code::new("invalid")?)
//!     .build()?;
//! let outcome = OperationOutcomeBuilder::new([issue]).build()?;
//!
//! let mut collector = PathCollector::new();
//! outcome.traverse(&mut collector);
//! assert_eq!(
//!     collector.paths(),
//!     vec![
//!         "OperationOutcome",
//!         "OperationOutcome.issue[0]",
//!         "OperationOutcome.issue[0].severity",
//!         "OperationOutcome.issue[0].code",
//!     ]
//! );
//! # Ok::<(), ferrum_model::ValidationError>(())
//! ```

pub mod builder;
pub mod choice;
pub mod config;
pub mod element;
pub mod error;
mod hash;
pub mod model;
pub mod path;
pub mod resource;
pub mod resources;
pub mod types;
pub mod validation;
pub mod visitor;

// Re-export main types
pub use builder::{Builder, Node};
pub use choice::{ChoiceType, DataType, ExtensionValue, ParametersParameterValue};
pub use config::ModelConfig;
pub use error::{ConfigError, Result, ValidationError};
pub use model::{ElementInfo, ModelInfo, TypeKind};
pub use path::{NodeCollector, PathCollector, PathTracker};
pub use resource::AnyResource;
pub use visitor::{NodeRef, ScalarRef, Visitable, Visitor};

/// Traits needed to build, inspect and traverse nodes
pub mod prelude {
    pub use crate::builder::{
        BackboneElementBuilder, Builder, DomainResourceBuilder, ElementBuilder, Node,
        ResourceBuilder,
    };
    pub use crate::choice::ChoiceType;
    pub use crate::element::{BackboneElement, Element};
    pub use crate::model::ModelInfo;
    pub use crate::resource::{DomainResource, Resource};
    pub use crate::visitor::{Visitable, Visitor};
}
