//! OperationOutcome: errors, warnings and information about the outcome of
//! an action

use crate::builder::{finish_element, impl_builder, impl_core_builder, Node};
use crate::config::ModelConfig;
use crate::element::{BackboneCore, BackboneElement, Element, ElementCore};
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{
    ElementInfo, ModelInfo, TypeKind, DOMAIN_RESOURCE_CONTAINED, DOMAIN_RESOURCE_TEXT,
    ELEMENT_EXTENSION, ELEMENT_ID, ELEMENT_MODIFIER_EXTENSION, RESOURCE_ID,
    RESOURCE_IMPLICIT_RULES, RESOURCE_LANGUAGE, RESOURCE_META,
};
use crate::resource::{DomainResource, DomainResourceCore, Resource, ResourceCore};
use crate::types::{Code, CodeableConcept, FhirString};
use crate::validation::{check_value_set_binding, require_non_empty, require_non_null};
use crate::visitor::{accept_field, accept_list, NodeRef, Visitable, Visitor};

const ISSUE_SEVERITY_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/issue-severity";
const ISSUE_SEVERITY_CODES: &[&str] = &["fatal", "error", "warning", "information"];

const ISSUE_TYPE_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/issue-type";
const ISSUE_TYPE_CODES: &[&str] = &[
    "invalid",
    "structure",
    "required",
    "value",
    "invariant",
    "security",
    "login",
    "unknown",
    "expired",
    "forbidden",
    "suppressed",
    "processing",
    "not-supported",
    "duplicate",
    "multiple-matches",
    "not-found",
    "deleted",
    "too-long",
    "code-invalid",
    "extension",
    "too-costly",
    "business-rule",
    "conflict",
    "transient",
    "lock-error",
    "no-store",
    "exception",
    "timeout",
    "incomplete",
    "throttled",
    "informational",
];

/// Collection of error, warning or information messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    hash: NodeHash,
    core: DomainResourceCore,
    issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    pub fn builder() -> OperationOutcomeBuilder {
        OperationOutcomeBuilder::default()
    }

    /// A single issue associated with the action; never empty
    pub fn issue(&self) -> &[OperationOutcomeIssue] {
        &self.issue
    }

    /// `true` if any issue has severity `fatal` or `error`
    pub fn has_errors(&self) -> bool {
        self.issue.iter().any(|issue| {
            matches!(
                issue.severity().value().map(String::as_str),
                Some("fatal" | "error")
            )
        })
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(&self.core, &self.issue));
        self
    }
}

impl_node_hash!(OperationOutcome, OperationOutcomeIssue);

impl ModelInfo for OperationOutcome {
    const TYPE_NAME: &'static str = "OperationOutcome";
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
            ElementInfo::required_repeating("issue", &["OperationOutcome.Issue"]),
        ];
        ELEMENTS
    }
}

impl Resource for OperationOutcome {
    fn resource_core(&self) -> &ResourceCore {
        &self.core.resource
    }
}

impl DomainResource for OperationOutcome {
    fn domain_resource_core(&self) -> &DomainResourceCore {
        &self.core
    }
}

impl Visitable for OperationOutcome {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::OperationOutcome(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_list(&self.issue, "issue", visitor);
    }
}

impl Node for OperationOutcome {
    type Builder = OperationOutcomeBuilder;

    fn to_builder(&self) -> OperationOutcomeBuilder {
        OperationOutcomeBuilder {
            core: self.core.clone(),
            issue: self.issue.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationOutcomeBuilder {
    core: DomainResourceCore,
    issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcomeBuilder {
    pub fn new(issue: impl IntoIterator<Item = OperationOutcomeIssue>) -> Self {
        Self::default().issue(issue)
    }

    /// Append issues
    pub fn issue(mut self, issue: impl IntoIterator<Item = OperationOutcomeIssue>) -> Self {
        self.issue.extend(issue);
        self
    }

    /// Replace all issues
    pub fn replace_issue(mut self, issue: impl IntoIterator<Item = OperationOutcomeIssue>) -> Self {
        self.issue = issue.into_iter().collect();
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<OperationOutcome> {
        self.core.validate(config)?;
        require_non_empty(&self.issue, "issue")?;
        Ok(OperationOutcome {
            hash: NodeHash::default(),
            core: self.core.clone(),
            issue: self.issue.clone(),
        }
        .sealed())
    }
}

/// One error, warning or information message of an [`OperationOutcome`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcomeIssue {
    hash: NodeHash,
    core: BackboneCore,
    severity: Code,
    code: Code,
    details: Option<CodeableConcept>,
    diagnostics: Option<FhirString>,
    location: Vec<FhirString>,
    expression: Vec<FhirString>,
}

impl OperationOutcomeIssue {
    pub fn builder() -> OperationOutcomeIssueBuilder {
        OperationOutcomeIssueBuilder::default()
    }

    /// fatal | error | warning | information
    pub fn severity(&self) -> &Code {
        &self.severity
    }

    /// Error or warning code from the issue-type value set
    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn details(&self) -> Option<&CodeableConcept> {
        self.details.as_ref()
    }

    /// Additional diagnostic information, e.g. a stack dump
    pub fn diagnostics(&self) -> Option<&FhirString> {
        self.diagnostics.as_ref()
    }

    pub fn location(&self) -> &[FhirString] {
        &self.location
    }

    /// FHIRPath of the element(s) related to the issue
    pub fn expression(&self) -> &[FhirString] {
        &self.expression
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.severity,
            &self.code,
            &self.details,
            &self.diagnostics,
            &self.location,
            &self.expression,
        ));
        self
    }
}

impl ModelInfo for OperationOutcomeIssue {
    const TYPE_NAME: &'static str = "OperationOutcome.Issue";
    const KIND: TypeKind = TypeKind::Backbone;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ELEMENT_MODIFIER_EXTENSION,
            ElementInfo::required("severity", &["code"]),
            ElementInfo::required("code", &["code"]),
            ElementInfo::optional("details", &["CodeableConcept"]),
            ElementInfo::optional("diagnostics", &["string"]),
            ElementInfo::repeating("location", &["string"]),
            ElementInfo::repeating("expression", &["string"]),
        ];
        ELEMENTS
    }
}

impl Element for OperationOutcomeIssue {
    fn element_core(&self) -> &ElementCore {
        &self.core.element
    }

    fn has_children(&self) -> bool {
        true
    }
}

impl BackboneElement for OperationOutcomeIssue {
    fn backbone_core(&self) -> &BackboneCore {
        &self.core
    }
}

impl Visitable for OperationOutcomeIssue {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::OperationOutcomeIssue(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        self.severity.accept("severity", None, visitor);
        self.code.accept("code", None, visitor);
        accept_field(self.details.as_ref(), "details", visitor);
        accept_field(self.diagnostics.as_ref(), "diagnostics", visitor);
        accept_list(&self.location, "location", visitor);
        accept_list(&self.expression, "expression", visitor);
    }
}

impl Node for OperationOutcomeIssue {
    type Builder = OperationOutcomeIssueBuilder;

    fn to_builder(&self) -> OperationOutcomeIssueBuilder {
        OperationOutcomeIssueBuilder {
            core: self.core.clone(),
            severity: Some(self.severity.clone()),
            code: Some(self.code.clone()),
            details: self.details.clone(),
            diagnostics: self.diagnostics.clone(),
            location: self.location.clone(),
            expression: self.expression.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationOutcomeIssueBuilder {
    core: BackboneCore,
    severity: Option<Code>,
    code: Option<Code>,
    details: Option<CodeableConcept>,
    diagnostics: Option<FhirString>,
    location: Vec<FhirString>,
    expression: Vec<FhirString>,
}

impl OperationOutcomeIssueBuilder {
    pub fn new(severity: Code, code: Code) -> Self {
        Self::default().severity(severity).code(code)
    }

    pub fn severity(mut self, severity: Code) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    pub fn details(mut self, details: CodeableConcept) -> Self {
        self.details = Some(details);
        self
    }

    pub fn diagnostics(mut self, diagnostics: FhirString) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn location(mut self, location: impl IntoIterator<Item = FhirString>) -> Self {
        self.location.extend(location);
        self
    }

    pub fn replace_location(mut self, location: impl IntoIterator<Item = FhirString>) -> Self {
        self.location = location.into_iter().collect();
        self
    }

    pub fn expression(mut self, expression: impl IntoIterator<Item = FhirString>) -> Self {
        self.expression.extend(expression);
        self
    }

    pub fn replace_expression(
        mut self,
        expression: impl IntoIterator<Item = FhirString>,
    ) -> Self {
        self.expression = expression.into_iter().collect();
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<OperationOutcomeIssue> {
        self.core.validate(config)?;
        let severity = require_non_null(self.severity.clone(), "severity")?;
        let code = require_non_null(self.code.clone(), "code")?;
        check_value_set_binding(
            Some(&severity),
            "severity",
            ISSUE_SEVERITY_VALUE_SET,
            ISSUE_SEVERITY_CODES,
            config,
        )?;
        check_value_set_binding(
            Some(&code),
            "code",
            ISSUE_TYPE_VALUE_SET,
            ISSUE_TYPE_CODES,
            config,
        )?;
        finish_element(
            OperationOutcomeIssue {
                hash: NodeHash::default(),
                core: self.core.clone(),
                severity,
                code,
                details: self.details.clone(),
                diagnostics: self.diagnostics.clone(),
                location: self.location.clone(),
                expression: self.expression.clone(),
            }
            .sealed(),
        )
    }
}

impl_core_builder!(domain_resource: OperationOutcomeBuilder);
impl_core_builder!(backbone: OperationOutcomeIssueBuilder);
impl_builder!(
    OperationOutcomeBuilder => OperationOutcome,
    OperationOutcomeIssueBuilder => OperationOutcomeIssue,
);
