//! Element data core
//!
//! Every element embeds an [`ElementCore`] (`id` + `extension`); backbone
//! elements embed a [`BackboneCore`], which adds `modifierExtension`.
//! Builders hold the same structs, so the inherited setters are written once
//! (see [`crate::builder::ElementBuilder`]).

use crate::config::ModelConfig;
use crate::error::Result;
use crate::types::Extension;
use crate::validation;
use crate::visitor::{accept_list, accept_str, Visitable, Visitor};

/// Attributes shared by every element
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementCore {
    /// Local identity, unique within the enclosing resource
    pub id: Option<String>,

    /// Additional content not modeled by named elements, in document order
    pub extension: Vec<Extension>,
}

impl ElementCore {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_empty()
    }

    pub(crate) fn validate(&self, config: &ModelConfig) -> Result<()> {
        if let Some(id) = &self.id {
            validation::check_string(id, config)?;
        }
        Ok(())
    }

    pub(crate) fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        accept_str(self.id.as_deref(), "id", visitor);
        accept_list(&self.extension, "extension", visitor);
    }
}

/// Attributes shared by every backbone element
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BackboneCore {
    pub element: ElementCore,

    /// Extensions that change the meaning of the element that contains them.
    ///
    /// Consumers that do not understand one of these must not process the
    /// element.
    pub modifier_extension: Vec<Extension>,
}

impl BackboneCore {
    pub fn is_empty(&self) -> bool {
        self.element.is_empty() && self.modifier_extension.is_empty()
    }

    pub(crate) fn validate(&self, config: &ModelConfig) -> Result<()> {
        self.element.validate(config)
    }

    pub(crate) fn accept_children<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        self.element.accept_children(visitor);
        accept_list(&self.modifier_extension, "modifierExtension", visitor);
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.element.extension.is_empty() || !self.modifier_extension.is_empty()
    }
}

/// Read access to the attributes every element carries
pub trait Element: Visitable {
    fn element_core(&self) -> &ElementCore;

    /// `true` if this is a primitive carrying a value
    fn has_value(&self) -> bool {
        false
    }

    /// `true` if any extension or type-specific child element is present
    fn has_children(&self) -> bool;

    fn id(&self) -> Option<&str> {
        self.element_core().id.as_deref()
    }

    fn extension(&self) -> &[Extension] {
        &self.element_core().extension
    }

    /// Extensions with the given url, in document order
    fn extensions_by_url(&self, url: &str) -> Vec<&Extension> {
        self.extension()
            .iter()
            .filter(|extension| extension.url() == url)
            .collect()
    }
}

/// Read access to the attributes of backbone elements
pub trait BackboneElement: Element {
    fn backbone_core(&self) -> &BackboneCore;

    fn modifier_extension(&self) -> &[Extension] {
        &self.backbone_core().modifier_extension
    }
}
