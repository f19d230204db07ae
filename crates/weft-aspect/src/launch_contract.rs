//! The ordering contract between constructed aspects and the launch
//! orchestrator.
//!
//! The orchestrator itself lives outside this crate; this module pins down
//! the two things it must honor: the fixed phase order in which every
//! aspect's hooks are driven, and the extension-surface reconciliation that
//! refuses to launch while any aspect exposes a property name the governance
//! registry has never heard of.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aspect::Aspect;
use crate::property_registry::PropertyRegistry;

// ---------------------------------------------------------------------------
// LaunchPhase
// ---------------------------------------------------------------------------

/// The launch phases, in execution order.
///
/// The orchestrator runs each phase to completion across the whole aspect
/// set (registration order within a phase) before starting the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchPhase {
    /// Each aspect's one-time `genesis` hook; a returned error string is a
    /// fatal configuration error.
    Genesis,
    /// `validate_feature_content` for every active feature declaring content
    /// under the aspect's name.
    ValidateContent,
    /// `expand_feature_content` (or the orchestrator's default expansion)
    /// for content declared as deferred.
    ExpandContent,
    /// `assemble_feature_content` once per aspect over the full active
    /// feature set.
    AssembleFeatureContent,
    /// `assemble_aspect_resources` once per aspect over the full aspect set,
    /// strictly after all feature content is assembled.
    AssembleAspectResources,
    /// `initial_root_app_elm` folded over the root rendering-tree node.
    InitialRootElm,
    /// `inject_root_app_elm` folded over the node produced so far.
    InjectRootElm,
    /// Extension-surface reconciliation via the property registry.
    ReconcileExtensions,
}

impl LaunchPhase {
    /// All phases, in execution order.
    pub const ALL: [LaunchPhase; 8] = [
        Self::Genesis,
        Self::ValidateContent,
        Self::ExpandContent,
        Self::AssembleFeatureContent,
        Self::AssembleAspectResources,
        Self::InitialRootElm,
        Self::InjectRootElm,
        Self::ReconcileExtensions,
    ];

    /// Position of this phase in the execution order.
    pub fn ordinal(self) -> usize {
        Self::ALL
            .iter()
            .position(|phase| *phase == self)
            .unwrap_or(Self::ALL.len())
    }

    /// Stable string tag for structured logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Genesis => "genesis",
            Self::ValidateContent => "validate_content",
            Self::ExpandContent => "expand_content",
            Self::AssembleFeatureContent => "assemble_feature_content",
            Self::AssembleAspectResources => "assemble_aspect_resources",
            Self::InitialRootElm => "initial_root_elm",
            Self::InjectRootElm => "inject_root_elm",
            Self::ReconcileExtensions => "reconcile_extensions",
        }
    }
}

impl fmt::Display for LaunchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Extension-surface reconciliation
// ---------------------------------------------------------------------------

/// Violations detected while reconciling aspect extension surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ContractViolation {
    #[error(
        "aspect `{aspect}` exposes extension property `{property}` that no plugin has reserved"
    )]
    UnreservedExtensionProperty { aspect: String, property: String },
}

/// Verify every additional-method name across `aspects` against `registry`.
///
/// Plugins reserve their extension names (typically during `genesis`), so by
/// the time this check runs a name appearing on more than one aspect either
/// resolves to the single owner that reserved it, or the conflicting
/// reservation already failed. A name with no owner at all is a typo or a
/// missing reservation and blocks the launch.
pub fn verify_additional_methods(
    aspects: &[Aspect],
    registry: &PropertyRegistry,
) -> Result<(), ContractViolation> {
    for aspect in aspects {
        for property in aspect.additional_method_names() {
            if !registry.is_reserved_name(property) {
                return Err(ContractViolation::UnreservedExtensionProperty {
                    aspect: aspect.name().to_string(),
                    property: property.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::{AdditionalMethod, AspectDescriptor};
    use crate::contract::StaticKeywordSet;

    const NO_KEYWORDS: StaticKeywordSet = StaticKeywordSet(&[]);

    fn aspect_with_method(name: &str, method: &str) -> Aspect {
        AspectDescriptor::new()
            .name(name)
            .validate_feature_content(|_feature| Ok(()))
            .assemble_feature_content(|_hub, _features| {})
            .additional_method(method, AdditionalMethod::new(()))
            .build(&NO_KEYWORDS)
            .unwrap()
    }

    #[test]
    fn phases_are_strictly_ordered() {
        for window in LaunchPhase::ALL.windows(2) {
            assert!(window[0] < window[1]);
            assert!(window[0].ordinal() < window[1].ordinal());
        }
        assert_eq!(LaunchPhase::Genesis.ordinal(), 0);
        assert_eq!(LaunchPhase::ReconcileExtensions.ordinal(), 7);
    }

    #[test]
    fn resource_assembly_follows_content_assembly() {
        assert!(LaunchPhase::AssembleFeatureContent < LaunchPhase::AssembleAspectResources);
    }

    #[test]
    fn phase_tags_are_stable() {
        assert_eq!(LaunchPhase::Genesis.as_str(), "genesis");
        assert_eq!(
            LaunchPhase::AssembleAspectResources.to_string(),
            "assemble_aspect_resources"
        );
    }

    #[test]
    fn reserved_extension_surface_reconciles() {
        let mut registry = PropertyRegistry::aspect_builtins();
        registry.reserve_name("get_xyz", "plugin-a").unwrap();

        let aspects = vec![
            aspect_with_method("route-a", "get_xyz"),
            aspect_with_method("route-b", "get_xyz"),
        ];
        assert!(verify_additional_methods(&aspects, &registry).is_ok());
    }

    #[test]
    fn unreserved_extension_surface_blocks_launch() {
        let registry = PropertyRegistry::aspect_builtins();
        let aspects = vec![aspect_with_method("route-a", "get_xyz")];

        let err = verify_additional_methods(&aspects, &registry).unwrap_err();
        assert_eq!(
            err,
            ContractViolation::UnreservedExtensionProperty {
                aspect: "route-a".to_string(),
                property: "get_xyz".to_string(),
            }
        );
        assert!(err.to_string().contains("get_xyz"));
    }
}
