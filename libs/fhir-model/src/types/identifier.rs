use crate::builder::{finish_element, impl_builder, impl_core_builder, Node};
use crate::config::ModelConfig;
use crate::element::{Element, ElementCore};
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{ElementInfo, ModelInfo, TypeKind, ELEMENT_EXTENSION, ELEMENT_ID};
use crate::types::{Code, CodeableConcept, DateTime, FhirString, Uri};
use crate::validation::{check_reference_type, check_value_set_binding};
use crate::visitor::{accept_field, NodeRef, Visitable, Visitor};

const IDENTIFIER_USE_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/identifier-use";
const IDENTIFIER_USE_CODES: &[&str] = &["usual", "official", "temp", "secondary", "old"];

/// Identifier for a resource, unique within a namespace given by `system`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    hash: NodeHash,
    core: ElementCore,
    use_: Option<Code>,
    type_: Option<CodeableConcept>,
    system: Option<Uri>,
    value: Option<FhirString>,
    period: Option<Period>,
    assigner: Option<Box<Reference>>,
}

impl Identifier {
    pub fn builder() -> IdentifierBuilder {
        IdentifierBuilder::default()
    }

    /// usual | official | temp | secondary | old
    pub fn use_(&self) -> Option<&Code> {
        self.use_.as_ref()
    }

    pub fn type_(&self) -> Option<&CodeableConcept> {
        self.type_.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn value(&self) -> Option<&FhirString> {
        self.value.as_ref()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    /// Organization that issued the identifier
    pub fn assigner(&self) -> Option<&Reference> {
        self.assigner.as_deref()
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.use_,
            &self.type_,
            &self.system,
            &self.value,
            &self.period,
            &self.assigner,
        ));
        self
    }
}

impl_node_hash!(Identifier, Reference, Period);

impl ModelInfo for Identifier {
    const TYPE_NAME: &'static str = "Identifier";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::optional("use", &["code"]),
            ElementInfo::optional("type", &["CodeableConcept"]),
            ElementInfo::optional("system", &["uri"]),
            ElementInfo::optional("value", &["string"]),
            ElementInfo::optional("period", &["Period"]),
            ElementInfo::optional("assigner", &["Reference"]),
        ];
        ELEMENTS
    }
}

impl Element for Identifier {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty()
            || self.use_.is_some()
            || self.type_.is_some()
            || self.system.is_some()
            || self.value.is_some()
            || self.period.is_some()
            || self.assigner.is_some()
    }
}

impl Visitable for Identifier {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Identifier(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_field(self.use_.as_ref(), "use", visitor);
        accept_field(self.type_.as_ref(), "type", visitor);
        accept_field(self.system.as_ref(), "system", visitor);
        accept_field(self.value.as_ref(), "value", visitor);
        accept_field(self.period.as_ref(), "period", visitor);
        accept_field(self.assigner.as_deref(), "assigner", visitor);
    }
}

impl Node for Identifier {
    type Builder = IdentifierBuilder;

    fn to_builder(&self) -> IdentifierBuilder {
        IdentifierBuilder {
            core: self.core.clone(),
            use_: self.use_.clone(),
            type_: self.type_.clone(),
            system: self.system.clone(),
            value: self.value.clone(),
            period: self.period.clone(),
            assigner: self.assigner.as_deref().cloned(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierBuilder {
    core: ElementCore,
    use_: Option<Code>,
    type_: Option<CodeableConcept>,
    system: Option<Uri>,
    value: Option<FhirString>,
    period: Option<Period>,
    assigner: Option<Reference>,
}

impl IdentifierBuilder {
    pub fn use_(mut self, use_: Code) -> Self {
        self.use_ = Some(use_);
        self
    }

    pub fn type_(mut self, type_: CodeableConcept) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn system(mut self, system: Uri) -> Self {
        self.system = Some(system);
        self
    }

    pub fn value(mut self, value: FhirString) -> Self {
        self.value = Some(value);
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn assigner(mut self, assigner: Reference) -> Self {
        self.assigner = Some(assigner);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Identifier> {
        self.core.validate(config)?;
        check_value_set_binding(
            self.use_.as_ref(),
            "use",
            IDENTIFIER_USE_VALUE_SET,
            IDENTIFIER_USE_CODES,
            config,
        )?;
        check_reference_type(self.assigner.as_ref(), "assigner", &["Organization"], config)?;
        finish_element(
            Identifier {
                hash: NodeHash::default(),
                core: self.core.clone(),
                use_: self.use_.clone(),
                type_: self.type_.clone(),
                system: self.system.clone(),
                value: self.value.clone(),
                period: self.period.clone(),
                assigner: self.assigner.clone().map(Box::new),
            }
            .sealed(),
        )
    }
}

/// Reference from one resource to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    hash: NodeHash,
    core: ElementCore,
    reference: Option<FhirString>,
    type_: Option<Uri>,
    identifier: Option<Identifier>,
    display: Option<FhirString>,
}

impl Reference {
    pub fn builder() -> ReferenceBuilder {
        ReferenceBuilder::default()
    }

    /// Literal reference: relative, internal (`#id`) or absolute URL
    pub fn reference(&self) -> Option<&FhirString> {
        self.reference.as_ref()
    }

    /// Type the reference refers to, e.g. `Patient`
    pub fn type_(&self) -> Option<&Uri> {
        self.type_.as_ref()
    }

    /// Logical reference, when the literal reference is not known
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    /// Resource type targeted by this reference.
    ///
    /// The explicit `type` wins; otherwise the type prefix of a relative or
    /// conditional literal reference (`Patient/123`, `Patient?name=x`).
    pub fn reference_type(&self) -> Option<&str> {
        if let Some(type_) = self.type_.as_ref().and_then(Uri::value) {
            return Some(type_.as_str());
        }
        let reference = self.reference.as_ref().and_then(FhirString::value)?;
        if reference.starts_with('#') || reference.contains(':') {
            return None;
        }
        let prefix = reference.split(['/', '?']).next()?;
        let uppercase = prefix.chars().next().is_some_and(|ch| ch.is_ascii_uppercase());
        (uppercase && prefix.len() < reference.len()).then_some(prefix)
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.reference,
            &self.type_,
            &self.identifier,
            &self.display,
        ));
        self
    }
}

impl ModelInfo for Reference {
    const TYPE_NAME: &'static str = "Reference";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::optional("reference", &["string"]),
            ElementInfo::optional("type", &["uri"]),
            ElementInfo::optional("identifier", &["Identifier"]),
            ElementInfo::optional("display", &["string"]),
        ];
        ELEMENTS
    }
}

impl Element for Reference {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty()
            || self.reference.is_some()
            || self.type_.is_some()
            || self.identifier.is_some()
            || self.display.is_some()
    }
}

impl Visitable for Reference {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Reference(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_field(self.reference.as_ref(), "reference", visitor);
        accept_field(self.type_.as_ref(), "type", visitor);
        accept_field(self.identifier.as_ref(), "identifier", visitor);
        accept_field(self.display.as_ref(), "display", visitor);
    }
}

impl Node for Reference {
    type Builder = ReferenceBuilder;

    fn to_builder(&self) -> ReferenceBuilder {
        ReferenceBuilder {
            core: self.core.clone(),
            reference: self.reference.clone(),
            type_: self.type_.clone(),
            identifier: self.identifier.clone(),
            display: self.display.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    core: ElementCore,
    reference: Option<FhirString>,
    type_: Option<Uri>,
    identifier: Option<Identifier>,
    display: Option<FhirString>,
}

impl ReferenceBuilder {
    pub fn reference(mut self, reference: FhirString) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn type_(mut self, type_: Uri) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn display(mut self, display: FhirString) -> Self {
        self.display = Some(display);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Reference> {
        self.core.validate(config)?;
        finish_element(
            Reference {
                hash: NodeHash::default(),
                core: self.core.clone(),
                reference: self.reference.clone(),
                type_: self.type_.clone(),
                identifier: self.identifier.clone(),
                display: self.display.clone(),
            }
            .sealed(),
        )
    }
}

/// Time range defined by start and end date/time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    hash: NodeHash,
    core: ElementCore,
    start: Option<DateTime>,
    end: Option<DateTime>,
}

impl Period {
    pub fn builder() -> PeriodBuilder {
        PeriodBuilder::default()
    }

    pub fn start(&self) -> Option<&DateTime> {
        self.start.as_ref()
    }

    /// End time with inclusive boundary, if not ongoing
    pub fn end(&self) -> Option<&DateTime> {
        self.end.as_ref()
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(&self.core, &self.start, &self.end));
        self
    }
}

impl ModelInfo for Period {
    const TYPE_NAME: &'static str = "Period";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::optional("start", &["dateTime"]),
            ElementInfo::optional("end", &["dateTime"]),
        ];
        ELEMENTS
    }
}

impl Element for Period {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty() || self.start.is_some() || self.end.is_some()
    }
}

impl Visitable for Period {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Period(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_field(self.start.as_ref(), "start", visitor);
        accept_field(self.end.as_ref(), "end", visitor);
    }
}

impl Node for Period {
    type Builder = PeriodBuilder;

    fn to_builder(&self) -> PeriodBuilder {
        PeriodBuilder {
            core: self.core.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodBuilder {
    core: ElementCore,
    start: Option<DateTime>,
    end: Option<DateTime>,
}

impl PeriodBuilder {
    pub fn start(mut self, start: DateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime) -> Self {
        self.end = Some(end);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Period> {
        self.core.validate(config)?;
        finish_element(
            Period {
                hash: NodeHash::default(),
                core: self.core.clone(),
                start: self.start.clone(),
                end: self.end.clone(),
            }
            .sealed(),
        )
    }
}

impl_core_builder!(element: IdentifierBuilder, ReferenceBuilder, PeriodBuilder);
impl_builder!(
    IdentifierBuilder => Identifier,
    ReferenceBuilder => Reference,
    PeriodBuilder => Period,
);
