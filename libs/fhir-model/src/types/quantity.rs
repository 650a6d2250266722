use crate::builder::{finish_element, impl_builder, impl_core_builder, Node};
use crate::config::ModelConfig;
use crate::element::{Element, ElementCore};
use crate::error::Result;
use crate::hash::{impl_node_hash, NodeHash};
use crate::model::{ElementInfo, ModelInfo, TypeKind, ELEMENT_EXTENSION, ELEMENT_ID};
use crate::types::{Code, Decimal, FhirString, Uri};
use crate::validation::check_value_set_binding;
use crate::visitor::{accept_field, NodeRef, Visitable, Visitor};

const COMPARATOR_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/quantity-comparator";
const COMPARATOR_CODES: &[&str] = &["<", "<=", ">=", ">"];

/// Measured amount, optionally with a coded unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    hash: NodeHash,
    core: ElementCore,
    value: Option<Decimal>,
    comparator: Option<Code>,
    unit: Option<FhirString>,
    system: Option<Uri>,
    code: Option<Code>,
}

impl Quantity {
    pub fn builder() -> QuantityBuilder {
        QuantityBuilder::default()
    }

    pub fn value(&self) -> Option<&Decimal> {
        self.value.as_ref()
    }

    /// How to understand the value: `<`, `<=`, `>=` or `>`
    pub fn comparator(&self) -> Option<&Code> {
        self.comparator.as_ref()
    }

    /// Unit representation for display
    pub fn unit(&self) -> Option<&FhirString> {
        self.unit.as_ref()
    }

    pub fn system(&self) -> Option<&Uri> {
        self.system.as_ref()
    }

    /// Coded form of the unit
    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    fn sealed(mut self) -> Self {
        self.hash = NodeHash::of(&(
            &self.core,
            &self.value,
            &self.comparator,
            &self.unit,
            &self.system,
            &self.code,
        ));
        self
    }
}

impl_node_hash!(Quantity);

impl ModelInfo for Quantity {
    const TYPE_NAME: &'static str = "Quantity";
    const KIND: TypeKind = TypeKind::Complex;

    fn element_info() -> &'static [ElementInfo] {
        const ELEMENTS: &[ElementInfo] = &[
            ELEMENT_ID,
            ELEMENT_EXTENSION,
            ElementInfo::optional("value", &["decimal"]),
            ElementInfo::optional("comparator", &["code"]),
            ElementInfo::optional("unit", &["string"]),
            ElementInfo::optional("system", &["uri"]),
            ElementInfo::optional("code", &["code"]),
        ];
        ELEMENTS
    }
}

impl Element for Quantity {
    fn element_core(&self) -> &ElementCore {
        &self.core
    }

    fn has_children(&self) -> bool {
        !self.core.extension.is_empty()
            || self.value.is_some()
            || self.comparator.is_some()
            || self.unit.is_some()
            || self.system.is_some()
            || self.code.is_some()
    }
}

impl Visitable for Quantity {
    fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Quantity(self)
    }

    fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.core.accept_children(visitor);
        accept_field(self.value.as_ref(), "value", visitor);
        accept_field(self.comparator.as_ref(), "comparator", visitor);
        accept_field(self.unit.as_ref(), "unit", visitor);
        accept_field(self.system.as_ref(), "system", visitor);
        accept_field(self.code.as_ref(), "code", visitor);
    }
}

impl Node for Quantity {
    type Builder = QuantityBuilder;

    fn to_builder(&self) -> QuantityBuilder {
        QuantityBuilder {
            core: self.core.clone(),
            value: self.value.clone(),
            comparator: self.comparator.clone(),
            unit: self.unit.clone(),
            system: self.system.clone(),
            code: self.code.clone(),
        }
    }

    fn hash_code(&self) -> u64 {
        self.hash.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuantityBuilder {
    core: ElementCore,
    value: Option<Decimal>,
    comparator: Option<Code>,
    unit: Option<FhirString>,
    system: Option<Uri>,
    code: Option<Code>,
}

impl QuantityBuilder {
    pub fn value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    pub fn comparator(mut self, comparator: Code) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn unit(mut self, unit: FhirString) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn system(mut self, system: Uri) -> Self {
        self.system = Some(system);
        self
    }

    pub fn code(mut self, code: Code) -> Self {
        self.code = Some(code);
        self
    }

    fn validate_and_build(&self, config: &ModelConfig) -> Result<Quantity> {
        self.core.validate(config)?;
        check_value_set_binding(
            self.comparator.as_ref(),
            "comparator",
            COMPARATOR_VALUE_SET,
            COMPARATOR_CODES,
            config,
        )?;
        finish_element(
            Quantity {
                hash: NodeHash::default(),
                core: self.core.clone(),
                value: self.value.clone(),
                comparator: self.comparator.clone(),
                unit: self.unit.clone(),
                system: self.system.clone(),
                code: self.code.clone(),
            }
            .sealed(),
        )
    }
}

impl_core_builder!(element: QuantityBuilder);
impl_builder!(QuantityBuilder => Quantity);
