//! Choice element tests
//!
//! Typed setters accept only permitted types at compile time; the dynamic
//! `DataType` setters are checked when the builder runs.

mod test_support;

use ferrum_model::model::{self, ElementInfo};
use ferrum_model::prelude::*;
use ferrum_model::resources::{ParametersParameter, ParametersParameterBuilder};
use ferrum_model::types::{Decimal, Extension, ExtensionBuilder, Meta, Quantity, Uri};
use ferrum_model::{DataType, ExtensionValue, ParametersParameterValue, ValidationError};
use rust_decimal::Decimal as RawDecimal;
use test_support::{code, coding, string};

fn quantity() -> Quantity {
    Quantity::builder()
        .value(Decimal::new(RawDecimal::new(725, 1)).unwrap())
        .unit(string("kg"))
        .system(Uri::new("http://unitsofmeasure.org").unwrap())
        .code(code("kg"))
        .build()
        .unwrap()
}

fn meta() -> Meta {
    Meta::builder()
        .profile([ferrum_model::types::Canonical::new("http://example.org/profile").unwrap()])
        .build()
        .unwrap()
}

#[test]
fn test_permitted_value_is_returned_unchanged() {
    let extension = ExtensionBuilder::new("http://example.org/weight")
        .value(quantity())
        .build()
        .unwrap();

    assert_eq!(extension.value(), Some(&ExtensionValue::Quantity(quantity())));
    match extension.value() {
        Some(ExtensionValue::Quantity(value)) => {
            assert_eq!(value.unit().and_then(|unit| unit.value()).map(String::as_str), Some("kg"));
        }
        other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn test_dynamic_value_outside_permitted_set() {
    let err = ExtensionBuilder::new("http://example.org/meta")
        .value_data(DataType::Meta(meta()))
        .build()
        .unwrap_err();

    match err {
        ValidationError::InvalidChoiceType {
            field,
            actual,
            permitted,
        } => {
            assert_eq!(field, "value");
            assert_eq!(actual, "Meta");
            assert_eq!(permitted.len(), ExtensionValue::PERMITTED.len());
            assert!(permitted.iter().any(|name| name == "Quantity"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_dynamic_value_inside_permitted_set() {
    let parameter = ParametersParameterBuilder::new(string("meta"))
        .value_data(DataType::Meta(meta()))
        .build()
        .unwrap();
    assert_eq!(parameter.value(), Some(&ParametersParameterValue::Meta(meta())));

    let extension = ExtensionBuilder::new("http://example.org/kind")
        .value_data(DataType::from(coding("http://example.org/cs", "a")))
        .build()
        .unwrap();
    assert_eq!(extension.value().map(ExtensionValue::type_name), Some("Coding"));
}

#[test]
fn test_choice_survives_to_builder() {
    let extension = ExtensionBuilder::new("http://example.org/weight")
        .value(quantity())
        .extension([Extension::builder()
            .url("http://example.org/nested")
            .value(string("n"))
            .build()
            .unwrap()])
        .build()
        .unwrap();
    let rebuilt = extension.to_builder().build().unwrap();
    assert_eq!(rebuilt, extension);

    let replaced = extension
        .to_builder()
        .value(string("light"))
        .build()
        .unwrap();
    assert_eq!(replaced.value().map(ExtensionValue::type_name), Some("string"));
    assert_ne!(replaced, extension);
}

#[test]
fn test_extension_url_is_required() {
    assert_eq!(
        Extension::builder().value(string("x")).build().unwrap_err(),
        ValidationError::MissingRequiredField("url".into())
    );
}

#[test]
fn test_choice_metadata() {
    let info: &ElementInfo = model::element_info("Parameters.Parameter", "value").unwrap();
    assert!(info.choice);
    assert_eq!(info.types, ParametersParameterValue::PERMITTED);
    assert_eq!(info.choice_name("Quantity").as_deref(), Some("valueQuantity"));
    assert_eq!(info.choice_name("Narrative"), None);
    assert_eq!(
        ParametersParameter::element_info()
            .iter()
            .map(|info| info.name)
            .collect::<Vec<_>>(),
        vec!["id", "extension", "modifierExtension", "name", "value", "resource", "part"]
    );
}
