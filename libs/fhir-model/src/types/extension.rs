use crate::builder::{finish_element, impl_builder, impl_core_builder, Node};
use crate::choice::{DataType, ExtensionValue};
use crate::config::ModelConfig;
use crate::element::{Element, ElementCore};
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{ElementInfo, ModelInfo, TypeKind, ELEMENT_EXTENSION, ELEMENT_ID};
use crate::validation::{check_uri, require_choice, require_non_null};
use crate::visitor::{accept_field, NodeRef, ScalarRef, Visitable, Visitor};

/// Additional content defined by an implementation guide, identified by `url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    hash: NodeHash,
    core: ElementCore,
    url: String,
    value: Option<ExtensionValue>,
}

impl Extension {
    pub fn builder() -> ExtensionBuilder {
        ExtensionBuilder::default()
    }

    /// Identifies the meaning of the extension
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn value(&self) -> Option<&ExtensionValue> {
        self.value.as_ref()
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(&self.core, &self.url, &self.value));
        self
    }
}

impl_node_hash!(Extension);

impl ModelInfo for Extension {
    const TYPE_NAME: &'static str = "Extension";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::required("url", &["uri"]),
            ElementInfo::choice(
                "value",
                <ExtensionValue as crate::choice::ChoiceType>::PERMITTED,
            ),
        ];
        ELEMENTS
    }
}

impl Element for Extension {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty() || self.value.is_some()
    }
}

impl Visitable for Extension {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Extension(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        visitor.visit_scalar("url", ScalarRef::String(&self.url));
        accept_field(self.value.as_ref(), "value", visitor);
    }
}

impl Node for Extension {
    type Builder = ExtensionBuilder;

    fn to_builder(&self) -> ExtensionBuilder {
        ExtensionBuilder {
            core: self.core.clone(),
            url: Some(self.url.clone()),
            value: self.value.clone().map(DataType::from),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtensionBuilder {
    core: ElementCore,
    url: Option<String>,
    value: Option<DataType>,
}

impl ExtensionBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self::default().url(url)
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn value(mut self, value: impl Into<ExtensionValue>) -> Self {
        let value: ExtensionValue = value.into();
        self.value = Some(value.into());
        self
    }

    /// Set the value from a dynamically typed data type, checked at build time
    pub fn value_data(mut self, value: DataType) -> Self {
        self.value = Some(value);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Extension> {
        self.core.validate(config)?;
        let url = require_non_null(self.url.clone(), "url")?;
        check_uri(&url, config)?;
        let value = require_choice::<ExtensionValue>(self.value.clone(), "value")?;
        finish_element(
            Extension {
                hash: NodeHash::default(),
                core: self.core.clone(),
                url,
                value,
            }
            .sealed(),
        )
    }
}

impl_core_builder!(element: ExtensionBuilder);
impl_builder!(ExtensionBuilder => Extension);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Builder, ElementBuilder};
    use crate::error::ValidationError;
    use crate::types::{Code, FhirString, Narrative, Xhtml};

    #[test]
    fn url_is_required() {
        let err = Extension::builder()
            .value(FhirString::new("x").unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingRequiredField("url".into()));
    }

    #[test]
    fn url_alone_violates_ele_1() {
        let err = ExtensionBuilder::new("http://example.org/flag").build().unwrap_err();
        assert_eq!(err, ValidationError::EmptyLeafElement("Extension".into()));
    }

    #[test]
    fn nested_extensions_count_as_children() {
        let inner = ExtensionBuilder::new("inner")
            .value(Code::new("a").unwrap())
            .build()
            .unwrap();
        let outer = ExtensionBuilder::new("http://example.org/complex")
            .extension([inner.clone()])
            .build()
            .unwrap();
        assert_eq!(outer.extensions_by_url("inner"), vec![&inner]);
        assert!(outer.value().is_none());
    }

    #[test]
    fn dynamic_value_outside_the_union_is_rejected() {
        let narrative = Narrative::builder()
            .status(Code::new("generated").unwrap())
            .div(Xhtml::new("<div>x</div>").unwrap())
            .build()
            .unwrap();
        let err = ExtensionBuilder::new("http://example.org/n")
            .value_data(DataType::Narrative(narrative))
            .build()
            .unwrap_err();
        match err {
            ValidationError::InvalidChoiceType {
                field,
                actual,
                permitted,
            } => {
                assert_eq!(field, "value");
                assert_eq!(actual, "Narrative");
                assert!(permitted.contains(&"Coding".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dynamic_value_inside_the_union_is_narrowed() {
        let code = Code::new("x").unwrap();
        let extension = ExtensionBuilder::new("http://example.org/c")
            .value_data(DataType::Code(code.clone()))
            .build()
            .unwrap();
        assert_eq!(extension.value(), Some(&ExtensionValue::Code(code)));
        assert_eq!(extension.to_builder().build().unwrap(), extension);
    }
}
