//! Resource data core
//!
//! Every resource embeds a [`ResourceCore`] (`id`, `meta`, `implicitRules`,
//! `language`); domain resources embed a [`DomainResourceCore`], which adds
//! the narrative, contained resources and both extension lists.

use crate::config::ModelConfig;
use crate::error::Result;
use crate::resources::{Basic, OperationOutcome, Parameters};
use crate::types::{Code, Extension, Meta, Narrative, Uri};
use crate::validation;
use crate::visitor::{accept_field, accept_list, accept_str, NodeRef, Visitable, Visitor};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceCore {
    /// Logical id of the resource
    pub id: Option<String>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Uri>,
    pub language: Option<Code>,
}

impl ResourceCore {
    pub(crate) fn validate(&self, config: &ModelConfig) -> Result<()> {
        if let Some(id) = &self.id {
            validation::check_id(id, config)?;
        }
        Ok(())
    }

    pub(crate) fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        accept_str(self.id.as_deref(), "id", visitor);
        accept_field(self.meta.as_ref(), "meta", visitor);
        accept_field(self.implicit_rules.as_ref(), "implicitRules", visitor);
        accept_field(self.language.as_ref(), "language", visitor);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainResourceCore {
    pub resource: ResourceCore,

    /// Human-readable summary of the resource
    pub text: Option<Narrative>,

    /// Resources embedded by value; they have no independent identity
    pub contained: Vec<AnyResource>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
}

impl DomainResourceCore {
    pub(crate) fn validate(&self, config: &ModelConfig) -> Result<()> {
        self.resource.validate(config)
    }

    pub(crate) fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.resource.accept_children(visitor);
        accept_field(self.text.as_ref(), "text", visitor);
        accept_list(&self.contained, "contained", visitor);
        accept_list(&self.extension, "extension", visitor);
        accept_list(&self.modifier_extension, "modifierExtension", visitor);
    }
}

pub trait Resource: Visitable {
    fn resource_core(&self) -> &ResourceCore;

    fn id(&self) -> Option<&str> {
        self.resource_core().id.as_deref()
    }

    fn meta(&self) -> Option<&Meta> {
        self.resource_core().meta.as_ref()
    }

    /// Rules followed when the resource was constructed
    fn implicit_rules(&self) -> Option<&Uri> {
        self.resource_core().implicit_rules.as_ref()
    }

    fn language(&self) -> Option<&Code> {
        self.resource_core().language.as_ref()
    }
}

pub trait DomainResource: Resource {
    fn domain_resource_core(&self) -> &DomainResourceCore;

    fn text(&self) -> Option<&Narrative> {
        self.domain_resource_core().text.as_ref()
    }

    fn contained(&self) -> &[AnyResource] {
        &self.domain_resource_core().contained
    }

    fn extension(&self) -> &[Extension] {
        &self.domain_resource_core().extension
    }

    fn modifier_extension(&self) -> &[Extension] {
        &self.domain_resource_core().modifier_extension
    }

    /// Extensions with the given url, in document order
    fn extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        self.extension()
            .iter()
            .filter(|extension| extension.url() == url)
            .collect()
    }
}

/// Any concrete resource, for `contained` and `Parameters.parameter.resource`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyResource {
    OperationOutcome(OperationOutcome),
    Parameters(Parameters),
    Basic(Basic),
}

impl AnyResource {
    pub fn resource_type(&self) -> &'static str {
        self.as_node().type_name()
    }
}

impl Resource for AnyResource {
    fn resource_core(&self) -> &ResourceCore {
        match self {
            Self::OperationOutcome(resource) => resource.resource_core(),
            Self::Parameters(resource) => resource.resource_core(),
            Self::Basic(resource) => resource.resource_core(),
        }
    }
}

impl Visitable for AnyResource {
    fn as_node(&self) -> NodeRef<'_> {
        match self {
            Self::OperationOutcome(resource) => resource.as_node(),
            Self::Parameters(resource) => resource.as_node(),
            Self::Basic(resource) => resource.as_node(),
        }
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::OperationOutcome(resource) => resource.accept_children(visitor),
            Self::Parameters(resource) => resource.accept_children(visitor),
            Self::Basic(resource) => resource.accept_children(visitor),
        }
    }
}

impl From<OperationOutcome> for AnyResource {
    fn from(resource: OperationOutcome) -> Self {
        Self::OperationOutcome(resource)
    }
}

impl From<Parameters> for AnyResource {
    fn from(resource: Parameters) -> Self {
        Self::Parameters(resource)
    }
}

impl From<Basic> for AnyResource {
    fn from(resource: Basic) -> Self {
        Self::Basic(resource)
    }
}
