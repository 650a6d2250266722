//! Primitive data types
//!
//! A primitive is an element with an optional `value`. It may carry
//! extensions instead of a value (ele-1 requires one or the other).

use crate::visitor::ScalarRef;
use chrono::FixedOffset;
use std::hash::Hash;

/// Raw value of a primitive as seen by visitors
pub(crate) trait ScalarValue {
    /// Key that equality and hashing see. Two values are equal only when they
    /// would be written the same way, so `1.0` differs from `1.00` and
    /// `00:00Z` differs from `01:00+01:00`.
    type Exact<'a>: Hash + Eq
    where
        Self: 'a;

    fn as_scalar(&self) -> ScalarRef<'_>;

    fn exact(&self) -> Self::Exact<'_>;
}

impl ScalarValue for bool {
    type Exact<'a> = bool;

    fn as_scalar(&self) -> ScalarRef<'_> {
        ScalarRef::Boolean(*self)
    }

    fn exact(&self) -> bool {
        *self
    }
}

impl ScalarValue for i32 {
    type Exact<'a> = i32;

    fn as_scalar(&self) -> ScalarRef<'_> {
        ScalarRef::Integer(*self)
    }

    fn exact(&self) -> i32 {
        *self
    }
}

impl ScalarValue for rust_decimal::Decimal {
    type Exact<'a> = (rust_decimal::Decimal, u32);

    fn as_scalar(&self) -> ScalarRef<'_> {
        ScalarRef::Decimal(self)
    }

    fn exact(&self) -> Self::Exact<'_> {
        (*self, self.scale())
    }
}

impl ScalarValue for String {
    type Exact<'a> = &'a str;

    fn as_scalar(&self) -> ScalarRef<'_> {
        ScalarRef::String(self)
    }

    fn exact(&self) -> &str {
        self
    }
}

impl ScalarValue for chrono::DateTime<FixedOffset> {
    /// UTC instant plus the offset it was written with, in seconds
    type Exact<'a> = (chrono::DateTime<chrono::Utc>, i32);

    fn as_scalar(&self) -> ScalarRef<'_> {
        ScalarRef::Instant(self)
    }

    fn exact(&self) -> Self::Exact<'_> {
        (self.with_timezone(&chrono::Utc), self.offset().local_minus_utc())
    }
}

macro_rules! primitive_type {
    (
        $(#[$meta:meta])*
        $name:ident($value:ty) => $type_name:literal, builder: $builder:ident, check: $check:path
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            hash: $crate::hash::NodeHash,
            core: $crate::element::ElementCore,
            value: Option<$value>,
        }

        impl $name {
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Build a value-only element with the default configuration
            pub fn new(value: impl Into<$value>) -> $crate::error::Result<Self> {
                use $crate::builder::Builder;
                Self::builder().value(value).build()
            }

            pub fn value(&self) -> Option<&$value> {
                self.value.as_ref()
            }

            fn exact_value(
                &self,
            ) -> Option<<$value as $crate::types::primitive::ScalarValue>::Exact<'_>> {
                use $crate::types::primitive::ScalarValue;
                self.value.as_ref().map(|value| value.exact())
            }

            fn sealed(mut self) -> Self {
                self.hash = $crate::hash::NodeHash::of(&(&self.core, self.exact_value()));
                self
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.hash == other.hash
                    && self.core == other.core
                    && self.exact_value() == other.exact_value()
            }
        }

        impl Eq for $name {}

        $crate::hash::impl_node_hash!($name);

        impl $crate::model::ModelInfo for $name {
            const TYPE_NAME: &'static str = $type_name;
            const KIND: $crate::model::TypeKind = $crate::model::TypeKind::Primitive;

            fn element_info() -> &'static [$crate::model::ElementInfo] {
                const ELEMENTS: &[$crate::model::ElementInfo] = &[
                    $crate::model::ELEMENT_ID,
                    $crate::model::ELEMENT_EXTENSION,
                    $crate::model::ElementInfo::optional("value", &[$type_name]),
                ];
                ELEMENTS
            }
        }

        impl $crate::element::Element for $name {
            fn element_core(&self) -> &$crate::element::ElementCore {
                &self.core
            }

            fn has_value(&self) -> bool {
                self.value.is_some()
            }

            fn has_children(&self) -> bool {
                !self.core.extension.is_empty()
            }
        }

        impl $crate::visitor::Visitable for $name {
            fn as_node(&self) -> $crate::visitor::NodeRef<'_> {
                $crate::visitor::NodeRef::$name(self)
            }

            fn accept_children<V>(&self, visitor: &mut V)
            where
                V: $crate::visitor::Visitor + ?Sized,
            {
                use $crate::types::primitive::ScalarValue;
                self.core.accept_children(visitor);
                if let Some(value) = &self.value {
                    visitor.visit_scalar("value", value.as_scalar());
                }
            }
        }

        impl $crate::builder::Node for $name {
            type Builder = $builder;

            fn to_builder(&self) -> $builder {
                $builder {
                    core: self.core.clone(),
                    value: self.value.clone(),
                }
            }

            fn hash_code(&self) -> u64 {
                self.hash.get()
            }
        }

        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            core: $crate::element::ElementCore,
            value: Option<$value>,
        }

        impl $builder {
            pub fn value(mut self, value: impl Into<$value>) -> Self {
                self.value = Some(value.into());
                self
            }

            fn validate_and_build(
                &self,
                config: &$crate::config::ModelConfig,
            ) -> $crate::error::Result<$name> {
                self.core.validate(config)?;
                if let Some(value) = &self.value {
                    $check(value, config)?;
                }
                $crate::builder::finish_element(
                    $name {
                        hash: $crate::hash::NodeHash::default(),
                        core: self.core.clone(),
                        value: self.value.clone(),
                    }
                    .sealed(),
                )
            }
        }

        $crate::builder::impl_core_builder!(element: $builder);
        $crate::builder::impl_builder!($builder => $name);
    };
}

primitive_type! {
    Boolean(bool) => "boolean", builder: BooleanBuilder, check: crate::validation::unchecked
}

primitive_type! {
    /// Signed 32-bit integer
    Integer(i32) => "integer", builder: IntegerBuilder, check: crate::validation::unchecked
}

primitive_type! {
    /// Integer greater than zero
    PositiveInt(i32) => "positiveInt", builder: PositiveIntBuilder,
        check: crate::validation::check_positive_int
}

primitive_type! {
    /// Arbitrary-precision decimal; trailing zeros are significant to equality
    Decimal(rust_decimal::Decimal) => "decimal", builder: DecimalBuilder,
        check: crate::validation::unchecked
}

primitive_type! {
    /// FHIR `string`
    FhirString(String) => "string", builder: FhirStringBuilder, check: crate::validation::check_string
}

primitive_type! {
    /// Token from a defined set of codes
    Code(String) => "code", builder: CodeBuilder, check: crate::validation::check_code
}

primitive_type! {
    Id(String) => "id", builder: IdBuilder, check: crate::validation::check_id
}

primitive_type! {
    Uri(String) => "uri", builder: UriBuilder, check: crate::validation::check_uri
}

primitive_type! {
    /// URI that refers to a resource by its canonical URL
    Canonical(String) => "canonical", builder: CanonicalBuilder, check: crate::validation::check_uri
}

primitive_type! {
    /// Partial date: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    Date(String) => "date", builder: DateBuilder, check: crate::validation::check_date
}

primitive_type! {
    /// Partial date, or date and time with a zone offset
    DateTime(String) => "dateTime", builder: DateTimeBuilder,
        check: crate::validation::check_date_time
}

primitive_type! {
    /// Instant in time; equal only with the same zone offset
    Instant(chrono::DateTime<FixedOffset>) => "instant", builder: InstantBuilder,
        check: crate::validation::unchecked
}

primitive_type! {
    /// XHTML `<div>` fragment of a narrative
    Xhtml(String) => "xhtml", builder: XhtmlBuilder, check: crate::validation::check_xhtml
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value.as_deref().unwrap_or_default())
    }
}
