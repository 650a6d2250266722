//! Builder framework
//!
//! Nodes are created only by builders. A builder accumulates fields through
//! fluent setters; [`Builder::build`] validates them and produces an immutable
//! node, or the first [`ValidationError`](crate::ValidationError) found.
//! `build` borrows the builder, so it can be adjusted and built again.
//!
//! The attributes every element or resource shares are set through the
//! default methods of [`ElementBuilder`], [`BackboneElementBuilder`],
//! [`ResourceBuilder`] and [`DomainResourceBuilder`].

use crate::config::ModelConfig;
use crate::element::{BackboneCore, Element, ElementCore};
use crate::error::Result;
use crate::model::ModelInfo;
use crate::resource::{AnyResource, DomainResourceCore, ResourceCore};
use crate::types::{Code, Extension, Meta, Narrative, Uri};
use crate::validation;
use crate::visitor::Visitable;
use std::hash::Hash;
use tracing::{debug, trace};

pub trait Builder {
    type Output;

    /// Validate the accumulated fields against `config` and produce the node
    fn build_with(&self, config: &ModelConfig) -> Result<Self::Output>;

    fn build(&self) -> Result<Self::Output> {
        self.build_with(&ModelConfig::default())
    }
}

/// Immutable, validated model node
pub trait Node: Visitable + ModelInfo + Clone + Eq + Hash + Send + Sync {
    type Builder: Builder<Output = Self>;

    /// Builder pre-populated with this node's fields
    fn to_builder(&self) -> Self::Builder;

    /// Structural hash computed when the node was built
    fn hash_code(&self) -> u64;
}

pub trait ElementBuilder: Sized {
    fn element_core_mut(&mut self) -> &mut ElementCore;

    fn id(mut self, id: impl Into<String>) -> Self {
        self.element_core_mut().id = Some(id.into());
        self
    }

    /// Append extensions
    fn extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.element_core_mut().extension.extend(extension);
        self
    }

    /// Replace all extensions
    fn replace_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.element_core_mut().extension = extension.into_iter().collect();
        self
    }
}

pub trait BackboneElementBuilder: ElementBuilder {
    fn backbone_core_mut(&mut self) -> &mut BackboneCore;

    /// Append modifier extensions
    fn modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.backbone_core_mut().modifier_extension.extend(extension);
        self
    }

    /// Replace all modifier extensions
    fn replace_modifier_extension(
        mut self,
        extension: impl IntoIterator<Item = Extension>,
    ) -> Self {
        self.backbone_core_mut().modifier_extension = extension.into_iter().collect();
        self
    }
}

pub trait ResourceBuilder: Sized {
    fn resource_core_mut(&mut self) -> &mut ResourceCore;

    fn id(mut self, id: impl Into<String>) -> Self {
        self.resource_core_mut().id = Some(id.into());
        self
    }

    fn meta(mut self, meta: Meta) -> Self {
        self.resource_core_mut().meta = Some(meta);
        self
    }

    fn implicit_rules(mut self, implicit_rules: Uri) -> Self {
        self.resource_core_mut().implicit_rules = Some(implicit_rules);
        self
    }

    fn language(mut self, language: Code) -> Self {
        self.resource_core_mut().language = Some(language);
        self
    }
}

pub trait DomainResourceBuilder: ResourceBuilder {
    fn domain_resource_core_mut(&mut self) -> &mut DomainResourceCore;

    fn text(mut self, text: Narrative) -> Self {
        self.domain_resource_core_mut().text = Some(text);
        self
    }

    /// Append contained resources
    fn contained<R: Into<AnyResource>>(mut self, contained: impl IntoIterator<Item = R>) -> Self {
        self.domain_resource_core_mut()
            .contained
            .extend(contained.into_iter().map(Into::into));
        self
    }

    /// Replace all contained resources
    fn replace_contained<R: Into<AnyResource>>(
        mut self,
        contained: impl IntoIterator<Item = R>,
    ) -> Self {
        self.domain_resource_core_mut().contained =
            contained.into_iter().map(Into::into).collect();
        self
    }

    /// Append extensions
    fn extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.domain_resource_core_mut().extension.extend(extension);
        self
    }

    /// Replace all extensions
    fn replace_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.domain_resource_core_mut().extension = extension.into_iter().collect();
        self
    }

    /// Append modifier extensions
    fn modifier_extension(mut self, extension: impl IntoIterator<Item = Extension>) -> Self {
        self.domain_resource_core_mut()
            .modifier_extension
            .extend(extension);
        self
    }

    /// Replace all modifier extensions
    fn replace_modifier_extension(
        mut self,
        extension: impl IntoIterator<Item = Extension>,
    ) -> Self {
        self.domain_resource_core_mut().modifier_extension = extension.into_iter().collect();
        self
    }
}

/// Final step of every element build: enforce ele-1
pub(crate) fn finish_element<N>(node: N) -> Result<N>
where
    N: Element + ModelInfo,
{
    validation::require_value_or_children(&node)?;
    Ok(node)
}

/// Log the outcome of a build
pub(crate) fn log_build<N: ModelInfo>(result: Result<N>) -> Result<N> {
    match &result {
        Ok(_) => trace!(type_name = N::TYPE_NAME, "built node"),
        Err(err) => debug!(
            type_name = N::TYPE_NAME,
            field = err.field(),
            error = %err,
            "build rejected"
        ),
    }
    result
}

/// Implements [`Builder`] for a builder with an inherent `validate_and_build`
macro_rules! impl_builder {
    ($($builder:ty => $node:ty),+ $(,)?) => {
        $(
            impl $crate::builder::Builder for $builder {
                type Output = $node;

                fn build_with(
                    &self,
                    config: &$crate::config::ModelConfig,
                ) -> $crate::error::Result<$node> {
                    $crate::builder::log_build(self.validate_and_build(config))
                }
            }
        )+
    };
}

/// Implements the inherited-setter traits for builders holding a `core` field
macro_rules! impl_core_builder {
    (element: $($builder:ty),+ $(,)?) => {
        $(
            impl $crate::builder::ElementBuilder for $builder {
                fn element_core_mut(&mut self) -> &mut $crate::element::ElementCore {
                    &mut self.core
                }
            }
        )+
    };
    (backbone: $($builder:ty),+ $(,)?) => {
        $(
            impl $crate::builder::ElementBuilder for $builder {
                fn element_core_mut(&mut self) -> &mut $crate::element::ElementCore {
                    &mut self.core.element
                }
            }

            impl $crate::builder::BackboneElementBuilder for $builder {
                fn backbone_core_mut(&mut self) -> &mut $crate::element::BackboneCore {
                    &mut self.core
                }
            }
        )+
    };
    (resource: $($builder:ty),+ $(,)?) => {
        $(
            impl $crate::builder::ResourceBuilder for $builder {
                fn resource_core_mut(&mut self) -> &mut $crate::resource::ResourceCore {
                    &mut self.core
                }
            }
        )+
    };
    (domain_resource: $($builder:ty),+ $(,)?) => {
        $(
            impl $crate::builder::ResourceBuilder for $builder {
                fn resource_core_mut(&mut self) -> &mut $crate::resource::ResourceCore {
                    &mut self.core.resource
                }
            }

            impl $crate::builder::DomainResourceBuilder for $builder {
                fn domain_resource_core_mut(&mut self) -> &mut $crate::resource::DomainResourceCore {
                    &mut self.core
                }
            }
        )+
    };
}

pub(crate) use {impl_builder, impl_core_builder};
