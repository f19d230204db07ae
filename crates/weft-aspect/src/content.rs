//! Feature-declared aspect content: immediate values and deferred thunks.
//!
//! Content for an aspect is whatever that aspect's contract says it is (a
//! reducer, a route table, a logic module list), so the payload is opaque
//! here. What this crate does fix is the two-phase shape: content is either
//! available at declaration time, or it is a thunk needing the cross-feature
//! resource hub that only exists later in the launch. Expansion hooks
//! pattern-match on the tag; the default expansion algorithm itself belongs
//! to the orchestrator.

use std::any::Any;
use std::fmt;

use crate::contract::ResourceHub;

/// Opaque content payload; the concrete type is aspect-specific.
pub type ContentValue = Box<dyn Any>;

/// Thunk producing content once the cross-feature resource hub exists.
pub type ContentThunk = Box<dyn Fn(&dyn ResourceHub) -> ContentValue>;

/// Content a feature declares under an aspect name.
pub enum AspectContent {
    /// Content available at declaration time.
    Immediate(ContentValue),
    /// Content resolved against the resource hub by the expansion phase.
    Deferred(ContentThunk),
}

impl AspectContent {
    /// Wrap an immediately available value.
    pub fn immediate<T: 'static>(value: T) -> Self {
        Self::Immediate(Box::new(value))
    }

    /// Wrap a deferred thunk.
    pub fn deferred<F>(thunk: F) -> Self
    where
        F: Fn(&dyn ResourceHub) -> ContentValue + 'static,
    {
        Self::Deferred(Box::new(thunk))
    }

    /// Whether this content still needs the resource hub.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Resolve to a concrete value: deferred content is invoked against the
    /// hub, immediate content is returned as-is.
    pub fn resolve(self, hub: &dyn ResourceHub) -> ContentValue {
        match self {
            Self::Immediate(value) => value,
            Self::Deferred(thunk) => thunk(hub),
        }
    }
}

impl fmt::Debug for AspectContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("AspectContent::Immediate(..)"),
            Self::Deferred(_) => f.write_str("AspectContent::Deferred(..)"),
        }
    }
}
