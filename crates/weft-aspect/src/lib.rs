#![forbid(unsafe_code)]

//! Cross-cutting aspect contracts with governed property namespaces.
//!
//! Independently authored features contribute content to cross-cutting
//! concerns ("aspects": state-management wiring, routing, rendering-tree
//! injection) without features or aspects knowing each other's
//! implementation. This crate is the contract layer that makes that
//! composition safe:
//!
//! - [`AspectDescriptor`] and [`Aspect`]: the factory gate every aspect
//!   definition passes through, and the immutable value it produces.
//! - [`PropertyRegistry`]: process-wide, owner-scoped arbitration of the
//!   top-level property names features and aspects may use, safely
//!   extensible at runtime by third-party aspect plugins.
//!
//! The launch orchestrator, feature declarations, and the UI tree stay
//! external; they interact through the seams in [`contract`] and the phase
//! order pinned in [`launch_contract`]. Everything here is synchronous,
//! single-threaded, and free of I/O.

pub mod aspect;
pub mod content;
pub mod contract;
pub mod launch_contract;
pub mod property_registry;

pub use aspect::{
    AdditionalMethod, Aspect, AspectConfig, AspectDescriptor, AspectError, AssembleContentHook,
    AssembleResourcesHook, ExpandContentHook, GenesisHook, RootElmHook, ValidateContentHook,
};
pub use content::{AspectContent, ContentThunk, ContentValue};
pub use contract::{Feature, FeatureKeywordGuard, ResourceHub, RootElm, StaticKeywordSet};
pub use launch_contract::{ContractViolation, LaunchPhase, verify_additional_methods};
pub use property_registry::{
    BUILTIN_ASPECT_PROPERTIES, BUILTIN_OWNER, DiagnosticSink, EventOutcome, PropertyError,
    PropertyEvent, PropertyEventType, PropertyRegistry, SinkError,
};
