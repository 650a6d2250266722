//! Model metadata
//!
//! Static description of every node type: its name, its kind and its
//! elements in declaration order. Traversal visits children in exactly the
//! order listed here.

use crate::resources::{
    Basic, OperationOutcome, OperationOutcomeIssue, Parameters, ParametersParameter,
};
use crate::types::{
    Boolean, Canonical, Code, CodeableConcept, Coding, Date, DateTime, Decimal, Extension,
    FhirString, Id, Identifier, Instant, Integer, Meta, Narrative, Period, PositiveInt, Quantity,
    Reference, Uri, Xhtml,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Primitive,
    Complex,
    Backbone,
    Resource,
}

/// Description of one element of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub name: &'static str,
    pub types: &'static [&'static str],
    pub required: bool,
    pub repeating: bool,
    pub choice: bool,
}

impl ElementInfo {
    /// Optional singular element
    pub const fn optional(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            required: false,
            repeating: false,
            choice: false,
        }
    }

    /// Required singular element
    pub const fn required(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            required: true,
            repeating: false,
            choice: false,
        }
    }

    /// Optional repeating element
    pub const fn repeating(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            required: false,
            repeating: true,
            choice: false,
        }
    }

    /// Repeating element that must have at least one item
    pub const fn required_repeating(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            required: true,
            repeating: true,
            choice: false,
        }
    }

    /// Optional choice (`[x]`) element
    pub const fn choice(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            required: false,
            repeating: false,
            choice: true,
        }
    }

    /// Type-specific name of a choice element, e.g. `valueQuantity`
    pub fn choice_name(&self, type_name: &str) -> Option<String> {
        if self.choice && self.types.contains(&type_name) {
            Some(choice_element_name(self.name, type_name))
        } else {
            None
        }
    }
}

/// Static metadata implemented by every node type
pub trait ModelInfo {
    const TYPE_NAME: &'static str;
    const KIND: TypeKind;

    fn element_info() -> &'static [ElementInfo];
}

/// Elements shared by every element type
pub(crate) const ELEMENT_ID: ElementInfo = ElementInfo::optional("id", &["string"]);
pub(crate) const ELEMENT_EXTENSION: ElementInfo =
    ElementInfo::repeating("extension", &["Extension"]);
pub(crate) const ELEMENT_MODIFIER_EXTENSION: ElementInfo =
    ElementInfo::repeating("modifierExtension", &["Extension"]);

/// Elements shared by every resource type
pub(crate) const RESOURCE_ID: ElementInfo = ElementInfo::optional("id", &["id"]);
pub(crate) const RESOURCE_META: ElementInfo = ElementInfo::optional("meta", &["Meta"]);
pub(crate) const RESOURCE_IMPLICIT_RULES: ElementInfo =
    ElementInfo::optional("implicitRules", &["uri"]);
pub(crate) const RESOURCE_LANGUAGE: ElementInfo = ElementInfo::optional("language", &["code"]);
pub(crate) const DOMAIN_RESOURCE_TEXT: ElementInfo = ElementInfo::optional("text", &["Narrative"]);
pub(crate) const DOMAIN_RESOURCE_CONTAINED: ElementInfo =
    ElementInfo::repeating("contained", &["Resource"]);

/// Resource type names of FHIR R4 (the `ResourceType` value set)
pub const RESOURCE_TYPES: &[&str] = &[
    "Account", "ActivityDefinition", "AdverseEvent", "AllergyIntolerance", "Appointment",
    "AppointmentResponse", "AuditEvent", "Basic", "Binary", "BiologicallyDerivedProduct",
    "BodyStructure", "Bundle", "CapabilityStatement", "CarePlan", "CareTeam", "CatalogEntry",
    "ChargeItem", "ChargeItemDefinition", "Claim", "ClaimResponse", "ClinicalImpression",
    "CodeSystem", "Communication", "CommunicationRequest", "CompartmentDefinition", "Composition",
    "ConceptMap", "Condition", "Consent", "Contract", "Coverage", "CoverageEligibilityRequest",
    "CoverageEligibilityResponse", "DetectedIssue", "Device", "DeviceDefinition", "DeviceMetric",
    "DeviceRequest", "DeviceUseStatement", "DiagnosticReport", "DocumentManifest",
    "DocumentReference", "DomainResource", "EffectEvidenceSynthesis", "Encounter", "Endpoint",
    "EnrollmentRequest", "EnrollmentResponse", "EpisodeOfCare", "EventDefinition", "Evidence",
    "EvidenceVariable", "ExampleScenario", "ExplanationOfBenefit", "FamilyMemberHistory", "Flag",
    "Goal", "GraphDefinition", "Group", "GuidanceResponse", "HealthcareService", "ImagingStudy",
    "Immunization", "ImmunizationEvaluation", "ImmunizationRecommendation", "ImplementationGuide",
    "InsurancePlan", "Invoice", "Library", "Linkage", "List", "Location", "Measure",
    "MeasureReport", "Media", "Medication", "MedicationAdministration", "MedicationDispense",
    "MedicationKnowledge", "MedicationRequest", "MedicationStatement", "MedicinalProduct",
    "MedicinalProductAuthorization", "MedicinalProductContraindication",
    "MedicinalProductIndication", "MedicinalProductIngredient", "MedicinalProductInteraction",
    "MedicinalProductManufactured", "MedicinalProductPackaged", "MedicinalProductPharmaceutical",
    "MedicinalProductUndesirableEffect", "MessageDefinition", "MessageHeader",
    "MolecularSequence", "NamingSystem", "NutritionOrder", "Observation", "ObservationDefinition",
    "OperationDefinition", "OperationOutcome", "Organization", "OrganizationAffiliation",
    "Parameters", "Patient", "PaymentNotice", "PaymentReconciliation", "Person", "PlanDefinition",
    "Practitioner", "PractitionerRole", "Procedure", "Provenance", "Questionnaire",
    "QuestionnaireResponse", "RelatedPerson", "RequestGroup", "ResearchDefinition",
    "ResearchElementDefinition", "ResearchStudy", "ResearchSubject", "Resource", "RiskAssessment",
    "RiskEvidenceSynthesis", "Schedule", "SearchParameter", "ServiceRequest", "Slot", "Specimen",
    "SpecimenDefinition", "StructureDefinition", "StructureMap", "Subscription", "Substance",
    "SubstanceNucleicAcid", "SubstancePolymer", "SubstanceProtein",
    "SubstanceReferenceInformation", "SubstanceSourceMaterial", "SubstanceSpecification",
    "SupplyDelivery", "SupplyRequest", "Task", "TerminologyCapabilities", "TestReport",
    "TestScript", "ValueSet", "VerificationResult", "VisionPrescription",
];

const ABSTRACT_RESOURCE_TYPES: &[&str] = &["Resource", "DomainResource"];

/// Check whether `name` is a FHIR R4 resource type name (abstract types included)
pub fn is_resource_type(name: &str) -> bool {
    RESOURCE_TYPES.contains(&name)
}

/// Check whether `name` is a resource type that can be instantiated
pub fn is_concrete_resource_type(name: &str) -> bool {
    is_resource_type(name) && !ABSTRACT_RESOURCE_TYPES.contains(&name)
}

macro_rules! model_types {
    ($($ty:ident),+ $(,)?) => {
        /// Element metadata for a type implemented by this crate
        pub fn element_infos(type_name: &str) -> Option<&'static [ElementInfo]> {
            $(
                if type_name == <$ty as ModelInfo>::TYPE_NAME {
                    return Some(<$ty as ModelInfo>::element_info());
                }
            )+
            None
        }

        /// Names of every type implemented by this crate
        pub fn model_type_names() -> &'static [&'static str] {
            const NAMES: &[&str] = &[$(<$ty as ModelInfo>::TYPE_NAME),+];
            NAMES
        }
    };
}

model_types!(
    Boolean, Integer, PositiveInt, Decimal, FhirString, Code, Id, Uri, Canonical, Date, DateTime,
    Instant, Xhtml, Extension, Coding, CodeableConcept, Identifier, Reference, Period, Quantity,
    Meta, Narrative, OperationOutcome, OperationOutcomeIssue, Parameters, ParametersParameter,
    Basic,
);

/// Metadata of one element of a type
pub fn element_info(type_name: &str, element_name: &str) -> Option<&'static ElementInfo> {
    element_infos(type_name)?
        .iter()
        .find(|info| info.name == element_name)
}

pub fn is_choice_element(type_name: &str, element_name: &str) -> bool {
    element_info(type_name, element_name).is_some_and(|info| info.choice)
}

pub fn is_required_element(type_name: &str, element_name: &str) -> bool {
    element_info(type_name, element_name).is_some_and(|info| info.required)
}

pub fn is_repeating_element(type_name: &str, element_name: &str) -> bool {
    element_info(type_name, element_name).is_some_and(|info| info.repeating)
}

/// Name of a choice element for a concrete type: `("value", "Quantity")` -> `valueQuantity`.
///
/// Primitive type names are capitalized: `("value", "dateTime")` -> `valueDateTime`.
pub fn choice_element_name(name: &str, type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", name, first.to_uppercase(), chars.as_str()),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_names_capitalize_the_type() {
        assert_eq!(choice_element_name("value", "Quantity"), "valueQuantity");
        assert_eq!(choice_element_name("value", "dateTime"), "valueDateTime");
        assert_eq!(choice_element_name("value", ""), "value");
    }

    #[test]
    fn resource_type_lookup() {
        assert!(is_resource_type("Patient"));
        assert!(is_resource_type("DomainResource"));
        assert!(!is_concrete_resource_type("DomainResource"));
        assert!(is_concrete_resource_type("OperationOutcome"));
        assert!(!is_resource_type("Coding"));
    }

    #[test]
    fn element_metadata_lookup() {
        assert!(is_required_element("OperationOutcome", "issue"));
        assert!(is_repeating_element("OperationOutcome", "issue"));
        assert!(is_choice_element("Extension", "value"));
        assert!(!is_choice_element("Extension", "url"));
        assert!(element_info("Coding", "nope").is_none());
        assert!(element_infos("NotAType").is_none());
    }

    #[test]
    fn choice_name_requires_permitted_type() {
        let info = element_info("Extension", "value").unwrap();
        assert_eq!(info.choice_name("Quantity").as_deref(), Some("valueQuantity"));
        assert_eq!(info.choice_name("Narrative"), None);
    }

    #[test]
    fn every_model_type_has_metadata() {
        for name in model_type_names() {
            let infos = element_infos(name).unwrap();
            assert!(!infos.is_empty(), "{} has no elements", name);
        }
    }
}
