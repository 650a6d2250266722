//! Validation support
//!
//! Stateless checks run by builders. Every function takes the value under
//! test, the element name used in error messages and, where a check is
//! optional, the active [`ModelConfig`].

use crate::choice::{ChoiceType, DataType};
use crate::config::ModelConfig;
use crate::element::Element;
use crate::error::{Result, ValidationError};
use crate::model::{is_resource_type, ModelInfo};
use crate::types::{Code, Reference};
use regex::Regex;
use std::sync::OnceLock;

/// Extension url marking an element whose value is deliberately absent
pub const DATA_ABSENT_REASON_URL: &str =
    "http://hl7.org/fhir/StructureDefinition/data-absent-reason";

const ID_MAX_LENGTH: usize = 64;

pub fn require_non_null<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| ValidationError::MissingRequiredField(field.to_string()))
}

pub fn require_non_empty<T>(values: &[T], field: &str) -> Result<()> {
    if values.is_empty() {
        return Err(ValidationError::EmptyRequiredCollection(field.to_string()));
    }
    Ok(())
}

/// Check that a dynamically typed value is one of the `permitted` type names
pub fn check_choice_type(value: &DataType, field: &str, permitted: &[&str]) -> Result<()> {
    if permitted.contains(&value.type_name()) {
        return Ok(());
    }
    Err(ValidationError::InvalidChoiceType {
        field: field.to_string(),
        actual: value.type_name().to_string(),
        permitted: permitted.iter().map(ToString::to_string).collect(),
    })
}

/// Resolve a dynamically typed value into the closed union `C`.
///
/// `None` passes; choice elements are optional unless paired with
/// [`require_non_null`].
pub fn require_choice<C: ChoiceType>(value: Option<DataType>, field: &str) -> Result<Option<C>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match C::from_data_type(value) {
        Ok(choice) => Ok(Some(choice)),
        Err(actual) => Err(ValidationError::InvalidChoiceType {
            field: field.to_string(),
            actual: actual.type_name().to_string(),
            permitted: C::PERMITTED.iter().map(ToString::to_string).collect(),
        }),
    }
}

/// ele-1: every element has a value or children
pub fn require_value_or_children<E>(element: &E) -> Result<()>
where
    E: Element + ModelInfo,
{
    if element.has_value() || element.has_children() {
        return Ok(());
    }
    Err(ValidationError::EmptyLeafElement(E::TYPE_NAME.to_string()))
}

/// `true` if the element carries extensions and all of them are data-absent-reason
pub fn has_only_data_absent_reason<E: Element + ?Sized>(element: &E) -> bool {
    let extension = element.extension();
    !extension.is_empty()
        && extension
            .iter()
            .all(|extension| extension.url() == DATA_ABSENT_REASON_URL)
}

pub fn unchecked<T: ?Sized>(_value: &T, _config: &ModelConfig) -> Result<()> {
    Ok(())
}

fn check_max_length(datatype: &str, value: &str, config: &ModelConfig) -> Result<()> {
    let length = value.chars().count();
    if length > config.max_string_length {
        return Err(ValidationError::invalid_value(
            datatype,
            format!(
                "length {} is greater than maximum allowed length {}",
                length, config.max_string_length
            ),
        ));
    }
    Ok(())
}

fn is_unsupported_control(ch: char) -> bool {
    ch.is_control() && (ch as u32) < 32 && !matches!(ch, '\t' | '\n' | '\r')
}

/// Whitespace as the FHIR string grammars see it: the no-break spaces and NEL
/// are ordinary characters, the information separators U+001C..U+001F are not
fn is_lexical_whitespace(ch: char) -> bool {
    match ch {
        '\u{1c}'..='\u{1f}' => true,
        '\u{85}' | '\u{a0}' | '\u{2007}' | '\u{202f}' => false,
        _ => ch.is_whitespace(),
    }
}

fn check_control(datatype: &str, value: &str, ch: char, config: &ModelConfig) -> Result<()> {
    if config.check_control_chars && is_unsupported_control(ch) {
        return Err(ValidationError::invalid_value(
            datatype,
            format!("'{}' contains unsupported control character U+{:04X}", value, ch as u32),
        ));
    }
    Ok(())
}

/// `[ \r\n\t\S]+`: at least one non-whitespace character
pub fn check_string(value: &str, config: &ModelConfig) -> Result<()> {
    check_max_length("string", value, config)?;
    let mut visible = 0;
    for ch in value.chars() {
        if is_lexical_whitespace(ch) {
            if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
                return Err(ValidationError::invalid_value(
                    "string",
                    format!("'{}' contains whitespace other than space, tab, CR or LF", value),
                ));
            }
        } else {
            check_control("string", value, ch, config)?;
            visible += 1;
        }
    }
    if visible == 0 {
        return Err(ValidationError::invalid_value(
            "string",
            "value must contain at least one non-whitespace character",
        ));
    }
    Ok(())
}

/// `[^\s]+(\s[^\s]+)*`
pub fn check_code(value: &str, config: &ModelConfig) -> Result<()> {
    check_max_length("code", value, config)?;
    let (Some(first), Some(last)) = (value.chars().next(), value.chars().last()) else {
        return Err(ValidationError::invalid_value("code", "value must not be empty"));
    };
    if is_lexical_whitespace(first) || is_lexical_whitespace(last) {
        return Err(ValidationError::invalid_value(
            "code",
            format!("'{}' must not begin or end with whitespace", value),
        ));
    }
    let mut previous_space = false;
    for ch in value.chars() {
        if is_lexical_whitespace(ch) {
            if ch != ' ' {
                return Err(ValidationError::invalid_value(
                    "code",
                    format!("'{}' must not contain whitespace other than a single space", value),
                ));
            }
            if previous_space {
                return Err(ValidationError::invalid_value(
                    "code",
                    format!("'{}' must not contain consecutive spaces", value),
                ));
            }
            previous_space = true;
        } else {
            check_control("code", value, ch, config)?;
            previous_space = false;
        }
    }
    Ok(())
}

/// `[A-Za-z0-9\-\.]{1,64}`
pub fn check_id(value: &str, _config: &ModelConfig) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::invalid_value("id", "value must not be empty"));
    }
    if value.len() > ID_MAX_LENGTH {
        return Err(ValidationError::invalid_value(
            "id",
            format!(
                "length {} is greater than maximum allowed length {}",
                value.len(),
                ID_MAX_LENGTH
            ),
        ));
    }
    if let Some(ch) = value
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '.'))
    {
        return Err(ValidationError::invalid_value(
            "id",
            format!("'{}' contains invalid character '{}'", value, ch),
        ));
    }
    Ok(())
}

/// `\S*`
pub fn check_uri(value: &str, config: &ModelConfig) -> Result<()> {
    check_max_length("uri", value, config)?;
    for ch in value.chars() {
        check_control("uri", value, ch, config)?;
        if is_lexical_whitespace(ch) {
            return Err(ValidationError::invalid_value(
                "uri",
                format!("'{}' must not contain whitespace", value),
            ));
        }
    }
    Ok(())
}

pub fn check_positive_int(value: &i32, _config: &ModelConfig) -> Result<()> {
    if *value < 1 {
        return Err(ValidationError::invalid_value(
            "positiveInt",
            format!("{} is less than minimum required value 1", value),
        ));
    }
    Ok(())
}

fn date_regex() -> &'static Regex {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    DATE_RE.get_or_init(|| {
        Regex::new(
            r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$",
        )
        .expect("date regex must compile")
    })
}

fn date_time_regex() -> &'static Regex {
    static DATE_TIME_RE: OnceLock<Regex> = OnceLock::new();
    DATE_TIME_RE.get_or_init(|| {
        Regex::new(
            r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$",
        )
        .expect("dateTime regex must compile")
    })
}

/// FHIR partial date: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
pub fn check_date(value: &str, _config: &ModelConfig) -> Result<()> {
    if date_regex().is_match(value) {
        return Ok(());
    }
    Err(ValidationError::invalid_value(
        "date",
        format!("'{}' is not a valid partial date", value),
    ))
}

/// FHIR partial date, or full date and time with a zone offset
pub fn check_date_time(value: &str, _config: &ModelConfig) -> Result<()> {
    if date_time_regex().is_match(value) {
        return Ok(());
    }
    Err(ValidationError::invalid_value(
        "dateTime",
        format!("'{}' is not a valid dateTime", value),
    ))
}

/// Narrative XHTML must be a non-empty `<div>` fragment
pub fn check_xhtml(value: &str, config: &ModelConfig) -> Result<()> {
    check_max_length("xhtml", value, config)?;
    let trimmed = value.trim_start();
    if trimmed.is_empty() {
        return Err(ValidationError::invalid_value("xhtml", "value must not be empty"));
    }
    let root = trimmed
        .strip_prefix("<div")
        .and_then(|rest| rest.chars().next());
    if !matches!(root, Some(ch) if ch == '>' || ch == '/' || ch.is_whitespace()) {
        return Err(ValidationError::invalid_value(
            "xhtml",
            "root element must be a <div>",
        ));
    }
    Ok(())
}

fn relative_reference_regex() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE.get_or_init(|| {
        Regex::new(r"^([A-Z][A-Za-z]+)/[A-Za-z0-9\-.]{1,64}(/_history/[A-Za-z0-9\-.]{1,64})?$")
            .expect("reference regex must compile")
    })
}

/// A prefix followed by `:` and a non-empty remainder (`urn:uuid:...`, `https://...`)
fn has_scheme(value: &str) -> bool {
    value
        .find(':')
        .is_some_and(|index| index > 0 && value.len() > index + 1)
}

/// Resource type named by a literal reference.
///
/// Returns `Ok(None)` for references that carry no checkable type: local
/// (`#id`) and scheme-qualified references.
fn literal_reference_type<'a>(value: &'a str, field: &str) -> Result<Option<&'a str>> {
    if value.starts_with('#') || has_scheme(value) {
        return Ok(None);
    }
    let resource_type = match value.split_once('?') {
        Some((resource_type, _)) => Some(resource_type),
        None => relative_reference_regex()
            .captures(value)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str()),
    };
    match resource_type {
        Some(resource_type) => Ok(Some(resource_type)),
        None => Err(ValidationError::InvalidReferenceType {
            field: field.to_string(),
            actual: value.to_string(),
            permitted: Vec::new(),
        }),
    }
}

fn reference_type_error(field: &str, actual: &str, permitted: &[&str]) -> ValidationError {
    ValidationError::InvalidReferenceType {
        field: field.to_string(),
        actual: actual.to_string(),
        permitted: permitted.iter().map(ToString::to_string).collect(),
    }
}

/// Check a reference against the resource types its element may target.
///
/// Both the type in the literal reference and `Reference.type` must be
/// known resource types listed in `permitted`, and must agree when both are
/// present.
pub fn check_reference_type(
    reference: Option<&Reference>,
    field: &str,
    permitted: &[&str],
    config: &ModelConfig,
) -> Result<()> {
    let Some(reference) = reference else {
        return Ok(());
    };
    if !config.check_reference_types {
        return Ok(());
    }

    let literal_type = match reference.reference().and_then(|value| value.value()) {
        Some(value) => literal_reference_type(value, field)?,
        None => None,
    };
    if let Some(resource_type) = literal_type {
        if !is_resource_type(resource_type) || !permitted.contains(&resource_type) {
            return Err(reference_type_error(field, resource_type, permitted));
        }
    }

    if let Some(explicit_type) = reference.type_().and_then(|value| value.value()) {
        if !is_resource_type(explicit_type) || !permitted.contains(&explicit_type.as_str()) {
            return Err(reference_type_error(field, explicit_type, permitted));
        }
        if let Some(resource_type) = literal_type {
            if resource_type != explicit_type.as_str() {
                return Err(reference_type_error(field, explicit_type, &[resource_type]));
            }
        }
    }
    Ok(())
}

/// Check a code against the codes of a required value set binding.
///
/// A code whose value is absent passes only when its extensions are all
/// data-absent-reason.
pub fn check_value_set_binding(
    code: Option<&Code>,
    field: &str,
    value_set: &str,
    allowed: &[&str],
    config: &ModelConfig,
) -> Result<()> {
    let Some(code) = code else {
        return Ok(());
    };
    if !config.check_value_set_bindings {
        return Ok(());
    }
    match code.value() {
        Some(value) if allowed.contains(&value.as_str()) => Ok(()),
        None if has_only_data_absent_reason(code) => Ok(()),
        value => Err(ValidationError::InvalidCode {
            field: field.to_string(),
            code: value.cloned().unwrap_or_default(),
            value_set: value_set.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Builder, ElementBuilder};
    use crate::types::{Extension, FhirString, Uri};

    fn config() -> ModelConfig {
        ModelConfig::default()
    }

    fn reference(value: Option<&str>, type_: Option<&str>) -> Reference {
        let mut builder = Reference::builder();
        if let Some(value) = value {
            builder = builder.reference(FhirString::new(value).unwrap());
        }
        if let Some(type_) = type_ {
            builder = builder.type_(Uri::new(type_).unwrap());
        }
        builder.build_with(&ModelConfig::lenient()).unwrap()
    }

    #[test]
    fn required_helpers() {
        assert_eq!(require_non_null(Some(1), "a").unwrap(), 1);
        assert_eq!(
            require_non_null::<i32>(None, "status").unwrap_err(),
            ValidationError::MissingRequiredField("status".into())
        );
        assert!(require_non_empty(&[1], "issue").is_ok());
        assert_eq!(
            require_non_empty::<i32>(&[], "issue").unwrap_err(),
            ValidationError::EmptyRequiredCollection("issue".into())
        );
    }

    #[test]
    fn strings() {
        assert!(check_string("hello world", &config()).is_ok());
        assert!(check_string("line\r\n\tnext", &config()).is_ok());
        assert!(check_string("   ", &config()).is_err());
        assert!(check_string("", &config()).is_err());
        assert!(check_string("bell\u{7}", &config()).is_err());
        assert!(check_string("bell\u{7}", &ModelConfig::lenient()).is_ok());
        assert!(check_string("Jos\u{a0}Smith", &config()).is_ok());
        assert!(check_string("\u{a0}\u{2007}", &config()).is_ok());
        assert!(check_string("em\u{2003}space", &config()).is_err());
        assert!(check_string("x\u{1c}y", &ModelConfig::lenient()).is_err());
        assert!(check_string("x\u{1f}y", &config()).is_err());

        let short = ModelConfig {
            max_string_length: 3,
            ..ModelConfig::default()
        };
        assert!(check_string("abc", &short).is_ok());
        assert!(check_string("abcd", &short).is_err());
    }

    #[test]
    fn codes() {
        assert!(check_code("not-found", &config()).is_ok());
        assert!(check_code("two words", &config()).is_ok());
        assert!(check_code(" leading", &config()).is_err());
        assert!(check_code("trailing ", &config()).is_err());
        assert!(check_code("double  space", &config()).is_err());
        assert!(check_code("tab\there", &config()).is_err());
        assert!(check_code("a\u{a0}b", &config()).is_ok());
        assert!(check_code("\u{202f}edge\u{202f}", &config()).is_ok());
        assert!(check_code("a\u{1e}b", &ModelConfig::lenient()).is_err());
        assert!(check_code("a\u{2028}b", &config()).is_err());
        assert!(check_code("", &config()).is_err());
    }

    #[test]
    fn ids() {
        assert!(check_id("abc-123.X", &config()).is_ok());
        assert!(check_id(&"a".repeat(64), &config()).is_ok());
        assert!(check_id(&"a".repeat(65), &config()).is_err());
        assert!(check_id("a_b", &config()).is_err());
        assert!(check_id("a/b", &config()).is_err());
        assert!(check_id("", &config()).is_err());
    }

    #[test]
    fn uris_dates_and_xhtml() {
        assert!(check_uri("http://example.org/fhir", &config()).is_ok());
        assert!(check_uri("", &config()).is_ok());
        assert!(check_uri("http://example.org/a b", &config()).is_err());
        assert!(check_uri("urn:x\u{1d}y", &ModelConfig::lenient()).is_err());
        assert!(check_uri("urn:x\u{a0}y", &config()).is_ok());

        for value in ["2024", "2024-02", "2024-02-29"] {
            assert!(check_date(value, &config()).is_ok(), "{}", value);
        }
        for value in ["24", "2024-13", "2024-02-29T10:00:00Z", "0000"] {
            assert!(check_date(value, &config()).is_err(), "{}", value);
        }
        for value in ["2024", "2024-02-29", "2024-02-29T10:00:00Z", "2024-02-29T10:00:00.123+14:00"] {
            assert!(check_date_time(value, &config()).is_ok(), "{}", value);
        }
        for value in ["2024-02-29T10:00", "2024-02-29T10:00:00", "2024-02-29T25:00:00Z"] {
            assert!(check_date_time(value, &config()).is_err(), "{}", value);
        }

        assert!(check_xhtml("<div xmlns=\"http://www.w3.org/1999/xhtml\">x</div>", &config()).is_ok());
        assert!(check_xhtml("<div>x</div>", &config()).is_ok());
        assert!(check_xhtml("<span>x</span>", &config()).is_err());
        assert!(check_xhtml("<divx>", &config()).is_err());
        assert!(check_xhtml("", &config()).is_err());
    }

    #[test]
    fn positive_ints() {
        assert!(check_positive_int(&1, &config()).is_ok());
        assert!(check_positive_int(&0, &config()).is_err());
        assert!(check_positive_int(&-5, &config()).is_err());
    }

    #[test]
    fn reference_targets() {
        let permitted = ["Patient", "Organization"];
        let check = |r: &Reference| check_reference_type(Some(r), "author", &permitted, &config());

        assert!(check(&reference(Some("Patient/123"), None)).is_ok());
        assert!(check(&reference(Some("Patient/123/_history/2"), None)).is_ok());
        assert!(check(&reference(Some("Patient?identifier=x"), None)).is_ok());
        assert!(check(&reference(Some("#local"), None)).is_ok());
        assert!(check(&reference(Some("urn:uuid:0f6f0a8e-3d4e-4b6a-a3c1-8d6b2c6c7c11"), None)).is_ok());
        assert!(check(&reference(Some("https://example.org/fhir/Device/1"), None)).is_ok());
        assert!(check(&reference(None, Some("Organization"))).is_ok());
        assert!(check(&reference(Some("Organization/1"), Some("Organization"))).is_ok());

        let err = check(&reference(Some("Device/1"), None)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidReferenceType { ref actual, .. } if actual == "Device"));
        assert!(check(&reference(Some("Unknown/1"), None)).is_err());
        assert!(check(&reference(Some("patient"), None)).is_err());
        assert!(check(&reference(None, Some("Device"))).is_err());
        assert!(check(&reference(Some("Patient/1"), Some("Organization"))).is_err());

        let lenient = ModelConfig::lenient();
        let device = reference(Some("Device/1"), None);
        assert!(check_reference_type(Some(&device), "author", &permitted, &lenient).is_ok());
        assert!(check_reference_type(None, "author", &permitted, &config()).is_ok());
    }

    #[test]
    fn value_set_bindings() {
        let allowed = ["error", "warning"];
        let check = |code: &Code| {
            check_value_set_binding(Some(code), "severity", "issue-severity", &allowed, &config())
        };

        assert!(check(&Code::new("error").unwrap()).is_ok());
        let err = check(&Code::new("bogus").unwrap()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCode {
                field: "severity".into(),
                code: "bogus".into(),
                value_set: "issue-severity".into(),
            }
        );

        let absent = Extension::builder()
            .url(DATA_ABSENT_REASON_URL)
            .value(Code::new("unknown").unwrap())
            .build()
            .unwrap();
        let no_value = Code::builder().extension([absent]).build().unwrap();
        assert!(check(&no_value).is_ok());

        let bogus = Code::new("bogus").unwrap();
        assert!(check_value_set_binding(Some(&bogus), "severity", "x", &allowed, &ModelConfig::lenient()).is_ok());
    }
}
