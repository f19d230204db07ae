//! Aspect values and the factory that constructs them.
//!
//! An [`Aspect`] is one cross-cutting extension point: a named bundle of
//! life-cycle hooks that the launch orchestrator drives in a fixed order
//! across every active feature. Every aspect definition passes through
//! [`AspectDescriptor::build`], the single validation gate, so downstream
//! consumers never re-check the shape of what they are handed.
//!
//! ## Life cycle
//!
//! Hooks execute in the order they are listed on the value: `genesis` once
//! at start-up, `validate_feature_content` (and, for deferred content,
//! `expand_feature_content`) per feature, `assemble_feature_content` once
//! over the active feature set, `assemble_aspect_resources` once over the
//! aspect set, then the two root-element hooks folded over the root
//! rendering-tree node.
//!
//! ## Accumulation state
//!
//! An `Aspect` is immutable after construction. Any per-run state a hook
//! needs (collected feature content, assembled resources) lives inside the
//! hook's own closure, behind `Cell`/`RefCell` where mutation is required.
//!
//! ## Additional methods
//!
//! Beyond the fixed hooks, an aspect may carry arbitrarily named opaque
//! entries used for aspect-to-aspect contracts. The fixed record and the
//! extension map are disjoint by construction; whether an extension name is
//! legal at all is decided later, against the property registry, once the
//! full aspect set is known.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contract::{Feature, FeatureKeywordGuard, ResourceHub, RootElm};
use crate::property_registry::BUILTIN_ASPECT_PROPERTIES;

// ---------------------------------------------------------------------------
// Hook signatures
// ---------------------------------------------------------------------------

/// One-time initialization and self-validation hook. This is where a plugin
/// reserves its extension property names. An `Err` is a fatal configuration
/// problem; attribution of the message belongs to the orchestrator.
pub type GenesisHook = Box<dyn Fn() -> Result<(), String>>;

/// Per-feature content-shape validation. The feature is known to declare
/// content under this aspect's name.
pub type ValidateContentHook = Box<dyn Fn(&dyn Feature) -> Result<(), String>>;

/// Deferred-content expansion. Absent, the orchestrator applies its default
/// expansion algorithm.
pub type ExpandContentHook = Box<dyn Fn(&dyn ResourceHub, &dyn Feature) -> Result<(), String>>;

/// Accumulates this aspect's content across all active features.
pub type AssembleContentHook = Box<dyn Fn(&dyn ResourceHub, &[&dyn Feature])>;

/// Accumulates cross-aspect resources after all feature content is
/// assembled.
pub type AssembleResourcesHook = Box<dyn Fn(&dyn ResourceHub, &[Aspect])>;

/// Wraps or extends the root rendering-tree node. The returned node must
/// still contain the supplied one.
pub type RootElmHook = Box<dyn Fn(&dyn ResourceHub, RootElm) -> RootElm>;

// ---------------------------------------------------------------------------
// AspectConfig
// ---------------------------------------------------------------------------

/// Aspect-specific settings.
///
/// Always a plain structured object: the wrapper admits only a key/value
/// map, so an array, function, or primitive can never masquerade as
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectConfig(Map<String, Value>);

impl AspectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Map<String, Value>> for AspectConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ---------------------------------------------------------------------------
// AdditionalMethod
// ---------------------------------------------------------------------------

/// Opaque named callable or value carried by an aspect beyond the fixed
/// hooks, supporting aspect-to-aspect communication contracts.
///
/// The payload type is part of the contract between the participating
/// aspects; consumers recover it with [`AdditionalMethod::downcast_ref`].
pub struct AdditionalMethod(Box<dyn Any>);

impl AdditionalMethod {
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for AdditionalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdditionalMethod(..)")
    }
}

// ---------------------------------------------------------------------------
// AspectError
// ---------------------------------------------------------------------------

/// Descriptor validation failures. Always fatal to the build call; the
/// caller fixes the descriptor and re-invokes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AspectError {
    /// No `name` was supplied.
    MissingName,
    /// The supplied `name` is empty.
    EmptyName,
    /// The supplied `name` shadows a feature-level reserved keyword.
    ReservedFeatureKeyword { name: String },
    /// The required `validate_feature_content` hook was not supplied.
    MissingValidateFeatureContent,
    /// The required `assemble_feature_content` hook was not supplied.
    MissingAssembleFeatureContent,
    /// An additional method tried to reuse one of the fixed property names.
    AdditionalMethodShadowsBuiltin { name: String },
}

impl AspectError {
    /// Stable error code for structured logging.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingName => "WEFT-ASPECT-0001",
            Self::EmptyName => "WEFT-ASPECT-0002",
            Self::ReservedFeatureKeyword { .. } => "WEFT-ASPECT-0003",
            Self::MissingValidateFeatureContent => "WEFT-ASPECT-0004",
            Self::MissingAssembleFeatureContent => "WEFT-ASPECT-0005",
            Self::AdditionalMethodShadowsBuiltin { .. } => "WEFT-ASPECT-0006",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingName => "name is required".to_string(),
            Self::EmptyName => "name must not be empty".to_string(),
            Self::ReservedFeatureKeyword { name } => {
                format!("aspect name `{name}` is a reserved feature keyword")
            }
            Self::MissingValidateFeatureContent => {
                "validate_feature_content is required".to_string()
            }
            Self::MissingAssembleFeatureContent => {
                "assemble_feature_content is required".to_string()
            }
            Self::AdditionalMethodShadowsBuiltin { name } => {
                format!("additional method `{name}` shadows a built-in aspect property")
            }
        }
    }
}

impl fmt::Display for AspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aspect descriptor violation [{}]: {}",
            self.error_code(),
            self.message()
        )
    }
}

impl std::error::Error for AspectError {}

// ---------------------------------------------------------------------------
// AspectDescriptor — the factory input
// ---------------------------------------------------------------------------

/// Declarative descriptor for one aspect.
///
/// Every slot is optional at the descriptor level; [`AspectDescriptor::build`]
/// enforces which ones are required, failing fast on the first violation.
#[derive(Default)]
pub struct AspectDescriptor {
    name: Option<String>,
    genesis: Option<GenesisHook>,
    validate_feature_content: Option<ValidateContentHook>,
    expand_feature_content: Option<ExpandContentHook>,
    assemble_feature_content: Option<AssembleContentHook>,
    assemble_aspect_resources: Option<AssembleResourcesHook>,
    initial_root_app_elm: Option<RootElmHook>,
    inject_root_app_elm: Option<RootElmHook>,
    config: Option<AspectConfig>,
    additional_methods: BTreeMap<String, AdditionalMethod>,
}

impl AspectDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aspect identifier. Keys this aspect's content in feature
    /// declarations, so it must be unique among the aspects in use and must
    /// not clash with a feature-level keyword.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn genesis<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<(), String> + 'static,
    {
        self.genesis = Some(Box::new(hook));
        self
    }

    pub fn validate_feature_content<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn Feature) -> Result<(), String> + 'static,
    {
        self.validate_feature_content = Some(Box::new(hook));
        self
    }

    pub fn expand_feature_content<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn ResourceHub, &dyn Feature) -> Result<(), String> + 'static,
    {
        self.expand_feature_content = Some(Box::new(hook));
        self
    }

    pub fn assemble_feature_content<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn ResourceHub, &[&dyn Feature]) + 'static,
    {
        self.assemble_feature_content = Some(Box::new(hook));
        self
    }

    pub fn assemble_aspect_resources<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn ResourceHub, &[Aspect]) + 'static,
    {
        self.assemble_aspect_resources = Some(Box::new(hook));
        self
    }

    pub fn initial_root_app_elm<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn ResourceHub, RootElm) -> RootElm + 'static,
    {
        self.initial_root_app_elm = Some(Box::new(hook));
        self
    }

    pub fn inject_root_app_elm<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn ResourceHub, RootElm) -> RootElm + 'static,
    {
        self.inject_root_app_elm = Some(Box::new(hook));
        self
    }

    pub fn config(mut self, config: AspectConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Attach a named opaque entry for aspect-to-aspect contracts. Names are
    /// checked against the fixed property names at build time; their
    /// registry legality is the orchestrator's concern.
    pub fn additional_method(mut self, name: impl Into<String>, method: AdditionalMethod) -> Self {
        self.additional_methods.insert(name.into(), method);
        self
    }

    /// Validate the descriptor and produce the immutable [`Aspect`].
    ///
    /// Fail-fast: the first violated rule wins. Checks, in order: `name`
    /// present, `name` non-empty, `name` not a reserved feature keyword
    /// (via `keywords`), `validate_feature_content` present,
    /// `assemble_feature_content` present, no additional method shadowing a
    /// fixed property name. Optional hooks are callable by construction and
    /// `config` defaults to the empty object.
    pub fn build(self, keywords: &dyn FeatureKeywordGuard) -> Result<Aspect, AspectError> {
        let name = self.name.ok_or(AspectError::MissingName)?;
        if name.is_empty() {
            return Err(AspectError::EmptyName);
        }
        if keywords.is_reserved_feature_keyword(&name) {
            return Err(AspectError::ReservedFeatureKeyword { name });
        }
        // Name uniqueness across the aspects in use is an orchestrator
        // concern: the full aspect set is unknown here.

        let validate_feature_content = self
            .validate_feature_content
            .ok_or(AspectError::MissingValidateFeatureContent)?;
        let assemble_feature_content = self
            .assemble_feature_content
            .ok_or(AspectError::MissingAssembleFeatureContent)?;

        if let Some(shadow) = self
            .additional_methods
            .keys()
            .find(|key| BUILTIN_ASPECT_PROPERTIES.contains(&key.as_str()))
        {
            return Err(AspectError::AdditionalMethodShadowsBuiltin {
                name: shadow.clone(),
            });
        }

        Ok(Aspect {
            name,
            genesis: self.genesis,
            validate_feature_content,
            expand_feature_content: self.expand_feature_content,
            assemble_feature_content,
            assemble_aspect_resources: self.assemble_aspect_resources,
            initial_root_app_elm: self.initial_root_app_elm,
            inject_root_app_elm: self.inject_root_app_elm,
            config: self.config.unwrap_or_default(),
            additional_methods: self.additional_methods,
        })
    }
}

impl fmt::Debug for AspectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectDescriptor")
            .field("name", &self.name)
            .field("additional_methods", &self.additional_methods.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Aspect — the immutable value
// ---------------------------------------------------------------------------

/// One cross-cutting extension point, produced by [`AspectDescriptor::build`]
/// and immutable thereafter. Destroyed only with the process; there is no
/// disposal protocol.
pub struct Aspect {
    name: String,
    genesis: Option<GenesisHook>,
    validate_feature_content: ValidateContentHook,
    expand_feature_content: Option<ExpandContentHook>,
    assemble_feature_content: AssembleContentHook,
    assemble_aspect_resources: Option<AssembleResourcesHook>,
    initial_root_app_elm: Option<RootElmHook>,
    inject_root_app_elm: Option<RootElmHook>,
    config: AspectConfig,
    additional_methods: BTreeMap<String, AdditionalMethod>,
}

impl Aspect {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn genesis(&self) -> Option<&GenesisHook> {
        self.genesis.as_ref()
    }

    pub fn validate_feature_content(&self) -> &ValidateContentHook {
        &self.validate_feature_content
    }

    pub fn expand_feature_content(&self) -> Option<&ExpandContentHook> {
        self.expand_feature_content.as_ref()
    }

    pub fn assemble_feature_content(&self) -> &AssembleContentHook {
        &self.assemble_feature_content
    }

    pub fn assemble_aspect_resources(&self) -> Option<&AssembleResourcesHook> {
        self.assemble_aspect_resources.as_ref()
    }

    pub fn initial_root_app_elm(&self) -> Option<&RootElmHook> {
        self.initial_root_app_elm.as_ref()
    }

    pub fn inject_root_app_elm(&self) -> Option<&RootElmHook> {
        self.inject_root_app_elm.as_ref()
    }

    pub fn config(&self) -> &AspectConfig {
        &self.config
    }

    /// Look up an additional method by name.
    pub fn additional_method(&self, name: &str) -> Option<&AdditionalMethod> {
        self.additional_methods.get(name)
    }

    /// Names of all additional methods, in deterministic order.
    pub fn additional_method_names(&self) -> impl Iterator<Item = &str> {
        self.additional_methods.keys().map(String::as_str)
    }
}

impl fmt::Debug for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aspect")
            .field("name", &self.name)
            .field("genesis", &self.genesis.is_some())
            .field("expand_feature_content", &self.expand_feature_content.is_some())
            .field(
                "assemble_aspect_resources",
                &self.assemble_aspect_resources.is_some(),
            )
            .field("initial_root_app_elm", &self.initial_root_app_elm.is_some())
            .field("inject_root_app_elm", &self.inject_root_app_elm.is_some())
            .field("config", &self.config)
            .field(
                "additional_methods",
                &self.additional_methods.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
