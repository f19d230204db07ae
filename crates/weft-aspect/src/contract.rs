//! Seams to the collaborators that live outside this crate.
//!
//! The launch orchestrator, the per-feature declaration object, and the root
//! rendering tree are external by design. Aspects only ever see them through
//! the narrow interfaces defined here, so none of those collaborators leak
//! implementation details into the contract layer.

use std::any::Any;
use std::fmt;

use crate::content::AspectContent;

/// Read-only view of one feature declaration.
///
/// The concrete declaration object (and its own validation) belongs to the
/// feature-declaration collaborator; hooks receive features only through
/// this view.
pub trait Feature {
    /// Feature identifier, unique among the active features of an
    /// application.
    fn name(&self) -> &str;

    /// Content this feature declares under the given aspect name, if any.
    fn content(&self, aspect_name: &str) -> Option<&AspectContent>;
}

/// Cross-feature resource hub handed to expansion and assembly hooks.
///
/// Populated by the orchestrator once all features are known; the payload
/// behind each key is aspect-specific and opaque to this crate.
pub trait ResourceHub {
    /// Look up a published resource by key.
    fn resource(&self, key: &str) -> Option<&dyn Any>;
}

/// Opaque root rendering-tree node threaded through the root-element fold.
///
/// Root-element hooks receive the current node by value and must return a
/// node that still contains it; the orchestrator enforces that containment.
/// The concrete node type belongs to the application's UI stack and is never
/// inspected here.
pub struct RootElm(Box<dyn Any>);

impl RootElm {
    /// Wrap a concrete node.
    pub fn new<T: 'static>(node: T) -> Self {
        Self(Box::new(node))
    }

    /// Recover the concrete node, returning `self` unchanged on a type
    /// mismatch.
    pub fn downcast<T: 'static>(self) -> Result<Box<T>, RootElm> {
        self.0.downcast::<T>().map_err(RootElm)
    }

    /// Borrow the concrete node if it has the expected type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for RootElm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RootElm(..)")
    }
}

/// Predicate over the feature-level reserved keywords.
///
/// The feature-declaration collaborator owns the keyword list (things like
/// an `enabled` flag); the aspect factory consults it so no aspect can
/// shadow a built-in feature concept with its content key.
pub trait FeatureKeywordGuard {
    /// Whether `name` is reserved as a feature-level keyword.
    fn is_reserved_feature_keyword(&self, name: &str) -> bool;
}

/// Fixed keyword list backing [`FeatureKeywordGuard`] for hosts whose
/// feature keywords are known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticKeywordSet(pub &'static [&'static str]);

impl FeatureKeywordGuard for StaticKeywordSet {
    fn is_reserved_feature_keyword(&self, name: &str) -> bool {
        self.0.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_keyword_set_matches_exactly() {
        let guard = StaticKeywordSet(&["enabled", "app_will_start"]);
        assert!(guard.is_reserved_feature_keyword("enabled"));
        assert!(!guard.is_reserved_feature_keyword("enable"));
        assert!(!guard.is_reserved_feature_keyword(""));
    }

    #[test]
    fn root_elm_round_trips_concrete_node() {
        let elm = RootElm::new(vec!["app".to_string()]);
        assert!(elm.downcast_ref::<Vec<String>>().is_some());
        assert!(elm.downcast_ref::<u32>().is_none());

        let node = elm.downcast::<Vec<String>>().expect("concrete node");
        assert_eq!(*node, vec!["app".to_string()]);
    }

    #[test]
    fn root_elm_downcast_mismatch_preserves_node() {
        let elm = RootElm::new(7u32);
        let elm = elm.downcast::<String>().expect_err("type mismatch");
        assert_eq!(elm.downcast_ref::<u32>(), Some(&7));
    }
}
