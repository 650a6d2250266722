//! Parameters: operation request or response

use crate::builder::{finish_element, impl_builder, impl_core_builder, Node};
use crate::choice::{ChoiceType, DataType, ParametersParameterValue};
use crate::config::ModelConfig;
use crate::element::{BackboneCore, BackboneElement, Element, ElementCore};
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{
    ElementInfo, ModelInfo, TypeKind, ELEMENT_EXTENSION, ELEMENT_ID, ELEMENT_MODIFIER_EXTENSION,
    RESOURCE_ID, RESOURCE_IMPLICIT_RULES, RESOURCE_LANGUAGE, RESOURCE_META,
};
use crate::resource::{AnyResource, Resource, ResourceCore};
use crate::types::FhirString;
use crate::validation::{require_choice, require_non_null};
use crate::visitor::{accept_field, accept_list, NodeRef, Visitable, Visitor};

/// Parameters of an operation. A plain resource: no narrative, contained
/// resources or extensions at the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
    hash: NodeHash,
    core: ResourceCore,
    parameter: Vec<ParametersParameter>,
}

impl Parameters {
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::default()
    }

    pub fn parameter(&self) -> &[ParametersParameter] {
        &self.parameter
    }

    /// Top-level parameters with the given name, in order
    pub fn parameters_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ParametersParameter> + 'a {
        self.parameter
            .iter()
            .filter(move |parameter| parameter.name_str() == Some(name))
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(&self.core, &self.parameter));
        self
    }
}

impl_node_hash!(Parameters, ParametersParameter);

impl ModelInfo for Parameters {
    const TYPE_NAME: &'static str = "Parameters";
    const KIND: TypeKind = TypeKind::Resource;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            RESOURCE_ID,
            RESOURCE_META,
            RESOURCE_IMPLICIT_RULES,
            RESOURCE_LANGUAGE,
            ElementInfo::repeating("parameter", &["Parameters.Parameter"]),
        ];
        ELEMENTS
    }
}

impl Resource for Parameters {
    fn resource_core(&self) -> &ResourceCore {
        &self.core
    }
}

impl Visitable for Parameters {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Parameters(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_list(&self.parameter, "parameter", visitor);
    }
}

impl Node for Parameters {
    type Builder = ParametersBuilder;

    fn to_builder(&self) -> ParametersBuilder {
        ParametersBuilder {
            core: self.core.clone(),
            parameter: self.parameter.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    core: ResourceCore,
    parameter: Vec<ParametersParameter>,
}

impl ParametersBuilder {
    pub fn parameter(mut self, parameter: impl IntoIterator<Item = ParametersParameter>) -> Self {
        self.parameter.extend(parameter);
        self
    }

    pub fn replace_parameter(
        mut self,
        parameter: impl IntoIterator<Item = ParametersParameter>,
    ) -> Self {
        self.parameter = parameter.into_iter().collect();
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Parameters> {
        self.core.validate(config)?;
        Ok(Parameters {
            hash: NodeHash::default(),
            core: self.core.clone(),
            parameter: self.parameter.clone(),
        }
        .sealed())
    }
}

/// A named parameter carrying a value, a resource or nested parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParametersParameter {
    hash: NodeHash,
    core: BackboneCore,
    name: FhirString,
    value: Option<ParametersParameterValue>,
    resource: Option<Box<AnyResource>>,
    part: Vec<ParametersParameter>,
}

impl ParametersParameter {
    pub fn builder() -> ParametersParameterBuilder {
        ParametersParameterBuilder::default()
    }

    pub fn name(&self) -> &FhirString {
        &self.name
    }

    fn name_str(&self) -> Option<&str> {
        self.name.value().map(String::as_str)
    }

    pub fn value(&self) -> Option<&ParametersParameterValue> {
        self.value.as_ref()
    }

    pub fn resource(&self) -> Option<&AnyResource> {
        self.resource.as_deref()
    }

    /// Named parts of a multi-part parameter
    pub fn part(&self) -> &[ParametersParameter] {
        &self.part
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.name,
            &self.value,
            &self.resource,
            &self.part,
        ));
        self
    }
}

impl ModelInfo for ParametersParameter {
    const TYPE_NAME: &'static str = "Parameters.Parameter";
    const KIND: TypeKind = TypeKind::Backbone;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ELEMENT_MODIFIER_EXTENSION,
            ElementInfo::required("name", &["string"]),
            ElementInfo::choice("value", ParametersParameterValue::PERMITTED),
            ElementInfo::optional("resource", &["Resource"]),
            ElementInfo::repeating("part", &["Parameters.Parameter"]),
        ];
        ELEMENTS
    }
}

impl Element for ParametersParameter {
    fn element_core(&self) -> &ElementCore {
        &self.core.element
    }

    fn has_children(&self) -> bool {
        true
    }
}

impl BackboneElement for ParametersParameter {
    fn backbone_core(&self) -> &BackboneCore {
        &self.core
    }
}

impl Visitable for ParametersParameter {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::ParametersParameter(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        self.name.accept("name", None, visitor);
        accept_field(self.value.as_ref(), "value", visitor);
        accept_field(self.resource.as_deref(), "resource", visitor);
        accept_list(&self.part, "part", visitor);
    }
}

impl Node for ParametersParameter {
    type Builder = ParametersParameterBuilder;

    fn to_builder(&self) -> ParametersParameterBuilder {
        ParametersParameterBuilder {
            core: self.core.clone(),
            name: Some(self.name.clone()),
            value: self.value.clone().map(DataType::from),
            resource: self.resource.as_deref().cloned(),
            part: self.part.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParametersParameterBuilder {
    core: BackboneCore,
    name: Option<FhirString>,
    value: Option<DataType>,
    resource: Option<AnyResource>,
    part: Vec<ParametersParameter>,
}

impl ParametersParameterBuilder {
    pub fn new(name: FhirString) -> Self {
        Self::default().name(name)
    }

    pub fn name(mut self, name: FhirString) -> Self {
        self.name = Some(name);
        self
    }

    pub fn value(mut self, value: impl Into<ParametersParameterValue>) -> Self {
        let value: ParametersParameterValue = value.into();
        self.value = Some(value.into());
        self
    }

    /// Set the value from a dynamically typed data type, checked at build time
    pub fn value_data(mut self, value: DataType) -> Self {
        self.value = Some(value);
        self
    }

    pub fn resource(mut self, resource: impl Into<AnyResource>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn part(mut self, part: impl IntoIterator<Item = ParametersParameter>) -> Self {
        self.part.extend(part);
        self
    }

    pub fn replace_part(mut self, part: impl IntoIterator<Item = ParametersParameter>) -> Self {
        self.part = part.into_iter().collect();
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<ParametersParameter> {
        self.core.validate(config)?;
        let name = require_non_null(self.name.clone(), "name")?;
        let value = require_choice::<ParametersParameterValue>(self.value.clone(), "value")?;
        finish_element(
            ParametersParameter {
                hash: NodeHash::default(),
                core: self.core.clone(),
                name,
                value,
                resource: self.resource.clone().map(Box::new),
                part: self.part.clone(),
            }
            .sealed(),
        )
    }
}

impl_core_builder!(resource: ParametersBuilder);
impl_core_builder!(backbone: ParametersParameterBuilder);
impl_builder!(
    ParametersBuilder => Parameters,
    ParametersParameterBuilder => ParametersParameter,
);
