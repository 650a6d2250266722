//! Data types: primitives and the general-purpose complex types

mod coding;
mod extension;
mod identifier;
mod meta;
mod primitive;
mod quantity;

pub use coding::{CodeableConcept, CodeableConceptBuilder, Coding, CodingBuilder};
pub use extension::{Extension, ExtensionBuilder};
pub use identifier::{
    Identifier, IdentifierBuilder, Period, PeriodBuilder, Reference, ReferenceBuilder,
};
pub use meta::{Meta, MetaBuilder, Narrative, NarrativeBuilder};
pub use primitive::{
    Boolean, BooleanBuilder, Canonical, CanonicalBuilder, Code, CodeBuilder, Date, DateBuilder,
    DateTime, DateTimeBuilder, Decimal, DecimalBuilder, FhirString, FhirStringBuilder, Id,
    IdBuilder, Instant, InstantBuilder, Integer, IntegerBuilder, PositiveInt, PositiveIntBuilder,
    Uri, UriBuilder, Xhtml, XhtmlBuilder,
};
pub use quantity::{Quantity, QuantityBuilder};
