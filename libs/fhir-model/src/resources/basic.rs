//! Basic: a resource for concepts that have no dedicated resource type

use crate::builder::{impl_builder, impl_core_builder, Node};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{
    ElementInfo, ModelInfo, TypeKind, DOMAIN_RESOURCE_CONTAINED, DOMAIN_RESOURCE_TEXT,
    ELEMENT_EXTENSION, ELEMENT_MODIFIER_EXTENSION, RESOURCE_ID, RESOURCE_IMPLICIT_RULES,
    RESOURCE_LANGUAGE, RESOURCE_META,
};
use crate::resource::{DomainResource, DomainResourceCore, Resource, ResourceCore};
use crate::types::{CodeableConcept, Date, Identifier, Reference};
use crate::validation::{check_reference_type, require_non_null};
use crate::visitor::{accept_field, accept_list, NodeRef, Visitable, Visitor};

const AUTHOR_TARGETS: &[&str] = &[
    "Practitioner",
    "PractitionerRole",
    "Patient",
    "RelatedPerson",
    "Organization",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basic {
    hash: NodeHash,
    core: DomainResourceCore,
    identifier: Vec<Identifier>,
    code: CodeableConcept,
    subject: Option<Reference>,
    created: Option<Date>,
    author: Option<Reference>,
}

impl Basic {
    pub fn builder() -> BasicBuilder {
        BasicBuilder::default()
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    /// Kind of resource
    pub fn code(&self) -> &CodeableConcept {
        &self.code
    }

    /// Identifies the focus of this resource
    pub fn subject(&self) -> Option<&Reference> {
        self.subject.as_ref()
    }

    pub fn created(&self) -> Option<&Date> {
        self.created.as_ref()
    }

    pub fn author(&self) -> Option<&Reference> {
        self.author.as_ref()
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.identifier,
            &self.code,
            &self.subject,
            &self.created,
            &self.author,
        ));
        self
    }
}

impl_node_hash!(Basic);

impl ModelInfo for Basic {
    const TYPE_NAME: &'static str = "Basic";
    const KIND: TypeKind = TypeKind::Resource;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            RESOURCE_ID,
            RESOURCE_META,
            RESOURCE_IMPLICIT_RULES,
            RESOURCE_LANGUAGE,
            DOMAIN_RESOURCE_TEXT,
            DOMAIN_RESOURCE_CONTAINED,
            ELEMENT_EXTENSION,
            ELEMENT_MODIFIER_EXTENSION,
            ElementInfo::repeating("identifier", &["Identifier"]),
            ElementInfo::required("code", &["CodeableConcept"]),
            ElementInfo::optional("subject", &["Reference"]),
            ElementInfo::optional("created", &["date"]),
            ElementInfo::optional("author", &["Reference"]),
        ];
        ELEMENTS
    }
}

impl Resource for Basic {
    fn resource_core(&self) -> &ResourceCore {
        &self.core.resource
    }
}

impl DomainResource for Basic {
    fn domain_resource_core(&self) -> &DomainResourceCore {
        &self.core
    }
}

impl Visitable for Basic {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Basic(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_list(&self.identifier, "identifier", visitor);
        self.code.accept("code", None, visitor);
        accept_field(self.subject.as_ref(), "subject", visitor);
        accept_field(self.created.as_ref(), "created", visitor);
        accept_field(self.author.as_ref(), "author", visitor);
    }
}

impl Node for Basic {
    type Builder = BasicBuilder;

    fn to_builder(&self) -> BasicBuilder {
        BasicBuilder {
            core: self.core.clone(),
            identifier: self.identifier.clone(),
            code: Some(self.code.clone()),
            subject: self.subject.clone(),
            created: self.created.clone(),
            author: self.author.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasicBuilder {
    core: DomainResourceCore,
    identifier: Vec<Identifier>,
    code: Option<CodeableConcept>,
    subject: Option<Reference>,
    created: Option<Date>,
    author: Option<Reference>,
}

impl BasicBuilder {
    pub fn new(code: CodeableConcept) -> Self {
        Self::default().code(code)
    }

    pub fn identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier.extend(identifier);
        self
    }

    pub fn replace_identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier = identifier.into_iter().collect();
        self
    }

    pub fn code(mut self, code: CodeableConcept) -> Self {
        self.code = Some(code);
        self
    }

    pub fn subject(mut self, subject: Reference) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn created(mut self, created: Date) -> Self {
        self.created = Some(created);
        self
    }

    /// Practitioner, PractitionerRole, Patient, RelatedPerson or Organization
    pub fn author(mut self, author: Reference) -> Self {
        self.author = Some(author);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Basic> {
        self.core.validate(config)?;
        let code = require_non_null(self.code.clone(), "code")?;
        check_reference_type(self.author.as_ref(), "author", AUTHOR_TARGETS, config)?;
        Ok(Basic {
            hash: NodeHash::default(),
            core: self.core.clone(),
            identifier: self.identifier.clone(),
            code,
            subject: self.subject.clone(),
            created: self.created.clone(),
            author: self.author.clone(),
        }
        .sealed())
    }
}

impl_core_builder!(domain_resource: BasicBuilder);
impl_builder!(BasicBuilder => Basic);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Builder, DomainResourceBuilder, ResourceBuilder};
    use crate::error::ValidationError;
    use crate::types::{Code, Coding, FhirString, Uri};

    fn kind() -> CodeableConcept {
        CodeableConcept::builder()
            .coding([Coding::builder()
                .system(Uri::new("http://terminology.hl7.org/CodeSystem/basic-resource-type").unwrap())
                .code(Code::new("referral").unwrap())
                .build()
                .unwrap()])
            .build()
            .unwrap()
    }

    fn reference(value: &str) -> Reference {
        Reference::builder()
            .reference(FhirString::new(value).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn code_is_required() {
        assert_eq!(
            Basic::builder().build().unwrap_err(),
            ValidationError::MissingRequiredField("code".into())
        );
    }

    #[test]
    fn author_targets_are_restricted() {
        let err = BasicBuilder::new(kind())
            .author(reference("Device/1"))
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("author"));

        let basic = BasicBuilder::new(kind())
            .author(reference("PractitionerRole/7"))
            .subject(reference("Device/1"))
            .build()
            .unwrap();
        assert_eq!(basic.author().and_then(Reference::reference_type), Some("PractitionerRole"));
    }

    #[test]
    fn contained_resources_are_embedded_by_value() {
        let inner = BasicBuilder::new(kind()).id("inner").build().unwrap();
        let outer = BasicBuilder::new(kind())
            .contained([inner.clone()])
            .build()
            .unwrap();
        assert_eq!(outer.contained().len(), 1);
        assert_eq!(outer.contained()[0].id(), Some("inner"));
        assert_eq!(outer.contained()[0].resource_type(), "Basic");
        assert_ne!(outer, inner);
    }
}
