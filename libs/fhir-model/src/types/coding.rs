use crate::builder::{finish_element, impl_builder, impl_core_builder, Node};
use crate::config::ModelConfig;
use crate::element::{Element, ElementCore};
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{ElementInfo, ModelInfo, TypeKind, ELEMENT_EXTENSION, ELEMENT_ID};
use crate::types::{Boolean, Code, FhirString, Uri};
use crate::visitor::{accept_field, accept_list, NodeRef, Visitable, Visitor};

/// Reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coding {
    hash: NodeHash,
    core: ElementCore,
    system: Option<Uri>,
    version: Option<FhirString>,
    code: Option<Code>,
    display: Option<FhirString>,
    user_selected: Option<Boolean>,
}

impl Coding {
    pub fn builder() -> CodingBuilder {
        CodingBuilder::default()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn display(&self) -> Option<&FhirString> {
        self.display.as_ref()
    }

    /// If this coding was chosen directly by the user
    pub fn user_selected(&self) -> Option<&Boolean> {
        self.user_selected.as_ref()
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.system,
            &self.version,
            &self.code,
            &self.display,
            &self.user_selected,
        ));
        self
    }
}

impl_node_hash!(Coding, CodeableConcept);

impl ModelInfo for Coding {
    const TYPE_NAME: &'static str = "Coding";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::optional("system", &["uri"]),
            ElementInfo::optional("version", &["string"]),
            ElementInfo::optional("code", &["code"]),
            ElementInfo::optional("display", &["string"]),
            ElementInfo::optional("userSelected", &["boolean"]),
        ];
        ELEMENTS
    }
}

impl Element for Coding {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty()
            || self.system.is_some()
            || self.version.is_some()
            || self.code.is_some()
            || self.display.is_some()
            || self.user_selected.is_some()
    }
}

impl Visitable for Coding {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Coding(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_field(self.system.as_ref(), "system", visitor);
        accept_field(self.version.as_ref(), "version", visitor);
        accept_field(self.code.as_ref(), "code", visitor);
        accept_field(self.display.as_ref(), "display", visitor);
        accept_field(self.user_selected.as_ref(), "userSelected", visitor);
    }
}

impl Node for Coding {
    type Builder = CodingBuilder;

    fn to_builder(&self) -> CodingBuilder {
        CodingBuilder {
            core: self.core.clone(),
            system: self.system.clone(),
            version: self.version.clone(),
            code: self.code.clone(),
            display: self.display.clone(),
            user_selected: self.user_selected.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodingBuilder {
    core: ElementCore,
    system: Option<Uri>,
    version: Option<FhirString>,
    code: Option<Code>,
    display: Option<FhirString>,
    user_selected: Option<Boolean>,
}

impl CodingBuilder {
    pub fn system(mut self, system: Uri) -> Self {
        self.system = Some(system);
        self
    }

    pub fn version(mut self, version: FhirString) -> Self {
        self.version = Some(version);
        self
    }

    pub fn code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    pub fn display(mut self, display: FhirString) -> Self {
        self.display = Some(display);
        self
    }

    pub fn user_selected(mut self, user_selected: Boolean) -> Self {
        self.user_selected = Some(user_selected);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Coding> {
        self.core.validate(config)?;
        finish_element(
            Coding {
                hash: NodeHash::default(),
                core: self.core.clone(),
                system: self.system.clone(),
                version: self.version.clone(),
                code: self.code.clone(),
                display: self.display.clone(),
                user_selected: self.user_selected.clone(),
            }
            .sealed(),
        )
    }
}

/// Concept expressed by codings and/or text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeableConcept {
    hash: NodeHash,
    core: ElementCore,
    coding: Vec<Coding>,
    text: Option<FhirString>,
}

impl CodeableConcept {
    pub fn builder() -> CodeableConceptBuilder {
        CodeableConceptBuilder::default()
    }

    pub fn coding(&self) -> &[Coding] {
        &self.coding
    }

    /// Plain text representation of the concept
    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }

    /// `true` if any coding has the given system and code
    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|coding| {
            coding.system().and_then(Uri::value).map(String::as_str) == Some(system)
                && coding.code().and_then(Code::value).map(String::as_str) == Some(code)
        })
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(&self.core, &self.coding, &self.text));
        self
    }
}

impl ModelInfo for CodeableConcept {
    const TYPE_NAME: &'static str = "CodeableConcept";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::repeating("coding", &["Coding"]),
            ElementInfo::optional("text", &["string"]),
        ];
        ELEMENTS
    }
}

impl Element for CodeableConcept {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty() || !self.coding.is_empty() || self.text.is_some()
    }
}

impl Visitable for CodeableConcept {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::CodeableConcept(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_list(&self.coding, "coding", visitor);
        accept_field(self.text.as_ref(), "text", visitor);
    }
}

impl Node for CodeableConcept {
    type Builder = CodeableConceptBuilder;

    fn to_builder(&self) -> CodeableConceptBuilder {
        CodeableConceptBuilder {
            core: self.core.clone(),
            coding: self.coding.clone(),
            text: self.text.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeableConceptBuilder {
    core: ElementCore,
    coding: Vec<Coding>,
    text: Option<FhirString>,
}

impl CodeableConceptBuilder {
    /// Append codings
    pub fn coding(mut self, coding: impl IntoIterator<Item = Coding>) -> Self {
        self.coding.extend(coding);
        self
    }

    /// Replace all codings
    pub fn replace_coding(mut self, coding: impl IntoIterator<Item = Coding>) -> Self {
        self.coding = coding.into_iter().collect();
        self
    }

    pub fn text(mut self, text: FhirString) -> Self {
        self.text = Some(text);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<CodeableConcept> {
        self.core.validate(config)?;
        finish_element(
            CodeableConcept {
                hash: NodeHash::default(),
                core: self.core.clone(),
                coding: self.coding.clone(),
                text: self.text.clone(),
            }
            .sealed(),
        )
    }
}

impl_core_builder!(element: CodingBuilder, CodeableConceptBuilder);
impl_builder!(CodingBuilder => Coding, CodeableConceptBuilder => CodeableConcept);
