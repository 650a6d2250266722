//! Choice (`[x]`) elements
//!
//! Each choice element is a closed enum whose variants are exactly its
//! permitted types. [`DataType`] is the union of every data type and is the
//! dynamic input accepted by builders; it is resolved into the element's
//! enum at `build()` time by [`require_choice`](crate::validation::require_choice).

use crate::model::ModelInfo;
use crate::types::{
    Boolean, Canonical, Code, CodeableConcept, Coding, Date, DateTime, Decimal, Extension,
    FhirString, Id, Identifier, Instant, Integer, Meta, Narrative, Period, PositiveInt, Quantity,
    Reference, Uri, Xhtml,
};
use crate::visitor::{NodeRef, Visitable, Visitor};

/// A closed union of data types that can be recovered from a [`DataType`]
pub trait ChoiceType: Sized + Into<DataType> {
    /// Type names of the variants, in declaration order
    const PERMITTED: &'static [&'static str];

    /// Narrow a dynamic value, handing it back unchanged if its type is not permitted
    fn from_data_type(value: DataType) -> std::result::Result<Self, DataType>;
}

macro_rules! data_union {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($variant),)+
        }

        impl $name {
            /// Model type name of the held value
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$variant as ModelInfo>::TYPE_NAME,)+
                }
            }
        }

        $(
            impl From<$variant> for $name {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )+

        impl Visitable for $name {
            fn as_node(&self) -> NodeRef<'_> {
                match self {
                    $(Self::$variant(value) => value.as_node(),)+
                }
            }

            fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
                match self {
                    $(Self::$variant(value) => value.accept_children(visitor),)+
                }
            }
        }
    };
}

macro_rules! choice_type {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        data_union!($(#[$meta])* $name { $($variant),+ });

        impl From<$name> for DataType {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant(value) => DataType::$variant(value),)+
                }
            }
        }

        impl ChoiceType for $name {
            const PERMITTED: &'static [&'static str] = &[$(<$variant as ModelInfo>::TYPE_NAME),+];

            fn from_data_type(value: DataType) -> std::result::Result<Self, DataType> {
                match value {
                    $(DataType::$variant(value) => Ok(Self::$variant(value)),)+
                    other => Err(other),
                }
            }
        }
    };
}

data_union! {
    /// Any primitive or complex data type
    DataType {
        Boolean, Integer, PositiveInt, Decimal, FhirString, Code, Id, Uri, Canonical, Date,
        DateTime, Instant, Xhtml, Extension, Coding, CodeableConcept, Identifier, Reference,
        Period, Quantity, Meta, Narrative,
    }
}

choice_type! {
    /// Permitted types of `Extension.value[x]`
    ExtensionValue {
        Boolean, Integer, PositiveInt, Decimal, FhirString, Code, Id, Uri, Canonical, Date,
        DateTime, Instant, Coding, CodeableConcept, Identifier, Reference, Period, Quantity,
    }
}

choice_type! {
    /// Permitted types of `Parameters.parameter.value[x]`
    ParametersParameterValue {
        Boolean, Integer, PositiveInt, Decimal, FhirString, Code, Id, Uri, Canonical, Date,
        DateTime, Instant, Coding, CodeableConcept, Identifier, Reference, Period, Quantity, Meta,
    }
}
