use crate::builder::{finish_element, impl_builder, impl_core_builder, Node};
use crate::config::ModelConfig;
use crate::element::{Element, ElementCore};
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{ElementInfo, ModelInfo, TypeKind, ELEMENT_EXTENSION, ELEMENT_ID};
use crate::types::{Canonical, Code, Coding, Id, Instant, Uri, Xhtml};
use crate::validation::{check_value_set_binding, require_non_null};
use crate::visitor::{accept_field, accept_list, NodeRef, Visitable, Visitor};

const NARRATIVE_STATUS_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/narrative-status";
const NARRATIVE_STATUS_CODES: &[&str] = &["generated", "extensions", "additional", "empty"];

/// Metadata about a resource: version, provenance, profiles and labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    hash: NodeHash,
    core: ElementCore,
    version_id: Option<Id>,
    last_updated: Option<Instant>,
    source: Option<Uri>,
    profile: Vec<Canonical>,
    security: Vec<Coding>,
    tag: Vec<Coding>,
}

impl Meta {
    pub fn builder() -> MetaBuilder {
        MetaBuilder::default()
    }

    pub fn version_id(&self) -> Option<&Id> {
        self.version_id.as_ref()
    }

    pub fn last_updated(&self) -> Option<&Instant> {
        self.last_updated.as_ref()
    }

    pub fn source(&self) -> Option<&Uri> {
        self.source.as_ref()
    }

    /// Profiles the resource claims to conform to
    pub fn profile(&self) -> &[Canonical] {
        &self.profile
    }

    pub fn security(&self) -> &[Coding] {
        &self.security
    }

    pub fn tag(&self) -> &[Coding] {
        &self.tag
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.version_id,
            &self.last_updated,
            &self.source,
            &self.profile,
            &self.security,
            &self.tag,
        ));
        self
    }
}

impl_node_hash!(Meta, Narrative);

impl ModelInfo for Meta {
    const TYPE_NAME: &'static str = "Meta";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::optional("versionId", &["id"]),
            ElementInfo::optional("lastUpdated", &["instant"]),
            ElementInfo::optional("source", &["uri"]),
            ElementInfo::repeating("profile", &["canonical"]),
            ElementInfo::repeating("security", &["Coding"]),
            ElementInfo::repeating("tag", &["Coding"]),
        ];
        ELEMENTS
    }
}

impl Element for Meta {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty()
            || self.version_id.is_some()
            || self.last_updated.is_some()
            || self.source.is_some()
            || !self.profile.is_empty()
            || !self.security.is_empty()
            || !self.tag.is_empty()
    }
}

impl Visitable for Meta {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Meta(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_field(self.version_id.as_ref(), "versionId", visitor);
        accept_field(self.last_updated.as_ref(), "lastUpdated", visitor);
        accept_field(self.source.as_ref(), "source", visitor);
        accept_list(&self.profile, "profile", visitor);
        accept_list(&self.security, "security", visitor);
        accept_list(&self.tag, "tag", visitor);
    }
}

impl Node for Meta {
    type Builder = MetaBuilder;

    fn to_builder(&self) -> MetaBuilder {
        MetaBuilder {
            core: self.core.clone(),
            version_id: self.version_id.clone(),
            last_updated: self.last_updated.clone(),
            source: self.source.clone(),
            profile: self.profile.clone(),
            security: self.security.clone(),
            tag: self.tag.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetaBuilder {
    core: ElementCore,
    version_id: Option<Id>,
    last_updated: Option<Instant>,
    source: Option<Uri>,
    profile: Vec<Canonical>,
    security: Vec<Coding>,
    tag: Vec<Coding>,
}

impl MetaBuilder {
    pub fn version_id(mut self, version_id: Id) -> Self {
        self.version_id = Some(version_id);
        self
    }

    pub fn last_updated(mut self, last_updated: Instant) -> Self {
        self.last_updated = Some(last_updated);
        self
    }

    pub fn source(mut self, source: Uri) -> Self {
        self.source = Some(source);
        self
    }

    pub fn profile(mut self, profile: impl IntoIterator<Item = Canonical>) -> Self {
        self.profile.extend(profile);
        self
    }

    pub fn replace_profile(mut self, profile: impl IntoIterator<Item = Canonical>) -> Self {
        self.profile = profile.into_iter().collect();
        self
    }

    pub fn security(mut self, security: impl IntoIterator<Item = Coding>) -> Self {
        self.security.extend(security);
        self
    }

    pub fn replace_security(mut self, security: impl IntoIterator<Item = Coding>) -> Self {
        self.security = security.into_iter().collect();
        self
    }

    pub fn tag(mut self, tag: impl IntoIterator<Item = Coding>) -> Self {
        self.tag.extend(tag);
        self
    }

    pub fn replace_tag(mut self, tag: impl IntoIterator<Item = Coding>) -> Self {
        self.tag = tag.into_iter().collect();
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Meta> {
        self.core.validate(config)?;
        finish_element(
            Meta {
                hash: NodeHash::default(),
                core: self.core.clone(),
                version_id: self.version_id.clone(),
                last_updated: self.last_updated.clone(),
                source: self.source.clone(),
                profile: self.profile.clone(),
                security: self.security.clone(),
                tag: self.tag.clone(),
            }
            .sealed(),
        )
    }
}

/// Human-readable summary of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    hash: NodeHash,
    core: ElementCore,
    status: Code,
    div: Xhtml,
}

impl Narrative {
    pub fn builder() -> NarrativeBuilder {
        NarrativeBuilder::default()
    }

    /// generated | extensions | additional | empty
    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn div(&self) -> &Xhtml {
        &self.div
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(&self.core, &self.status, &self.div));
        self
    }
}

impl ModelInfo for Narrative {
    const TYPE_NAME: &'static str = "Narrative";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::required("status", &["code"]),
            ElementInfo::required("div", &["xhtml"]),
        ];
        ELEMENTS
    }
}

impl Element for Narrative {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        true
    }
}

impl Visitable for Narrative {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Narrative(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        self.status.accept("status", None, visitor);
        self.div.accept("div", None, visitor);
    }
}

impl Node for Narrative {
    type Builder = NarrativeBuilder;

    fn to_builder(&self) -> NarrativeBuilder {
        NarrativeBuilder {
            core: self.core.clone(),
            status: Some(self.status.clone()),
            div: Some(self.div.clone()),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NarrativeBuilder {
    core: ElementCore,
    status: Option<Code>,
    div: Option<Xhtml>,
}

impl NarrativeBuilder {
    pub fn new(status: Code, div: Xhtml) -> Self {
        Self::default().status(status).div(div)
    }

    pub fn status(mut self, status: Code) -> Self {
        self.status = Some(status);
        self
    }

    pub fn div(mut self, div: Xhtml) -> Self {
        self.div = Some(div);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Narrative> {
        self.core.validate(config)?;
        let status = require_non_null(self.status.clone(), "status")?;
        let div = require_non_null(self.div.clone(), "div")?;
        check_value_set_binding(
            Some(&status),
            "status",
            NARRATIVE_STATUS_VALUE_SET,
            NARRATIVE_STATUS_CODES,
            config,
        )?;
        finish_element(
            Narrative {
                hash: NodeHash::default(),
                core: self.core.clone(),
                status,
                div,
            }
            .sealed(),
        )
    }
}

impl_core_builder!(element: MetaBuilder, NarrativeBuilder);
impl_builder!(MetaBuilder => Meta, NarrativeBuilder => Narrative);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::error::ValidationError;

    #[test]
    fn narrative_requires_status_and_div() {
        let div = Xhtml::new("<div>summary</div>").unwrap();
        assert_eq!(
            Narrative::builder().div(div.clone()).build().unwrap_err(),
            ValidationError::MissingRequiredField("status".into())
        );
        assert_eq!(
            Narrative::builder()
                .status(Code::new("generated").unwrap())
                .build()
                .unwrap_err(),
            ValidationError::MissingRequiredField("div".into())
        );

        let narrative = NarrativeBuilder::new(Code::new("generated").unwrap(), div)
            .build()
            .unwrap();
        assert_eq!(narrative.status().value().map(String::as_str), Some("generated"));
    }

    #[test]
    fn narrative_status_is_bound() {
        let err = NarrativeBuilder::new(
            Code::new("pending").unwrap(),
            Xhtml::new("<div/>").unwrap(),
        )
        .build()
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCode { .. }));
    }

    #[test]
    fn meta_collections_append_in_order() {
        let a = Canonical::new("http://example.org/StructureDefinition/a").unwrap();
        let b = Canonical::new("http://example.org/StructureDefinition/b").unwrap();
        let meta = Meta::builder()
            .profile([a.clone()])
            .profile([b.clone()])
            .build()
            .unwrap();
        assert_eq!(meta.profile(), &[a, b.clone()]);

        let replaced = meta.to_builder().replace_profile([b.clone()]).build().unwrap();
        assert_eq!(replaced.profile(), &[b]);
        assert_eq!(meta.profile().len(), 2);
    }

    #[test]
    fn empty_meta_violates_ele_1() {
        assert_eq!(
            Meta::builder().build().unwrap_err(),
            ValidationError::EmptyLeafElement("Meta".into())
        );
    }
}
