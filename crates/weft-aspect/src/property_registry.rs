//! Owner-scoped governance of the aspect property namespace.
//!
//! Every aspect (and, through the feature-declaration collaborator, every
//! feature) exposes a fixed set of well-known top-level property names plus
//! extension names claimed at runtime by aspect plugins. This registry is
//! the single source of truth for which names are legal: it prevents
//! accidental key collisions and silent typos across independently developed
//! packages.
//!
//! Reservation is owner-scoped and idempotent. One aspect type may be
//! instantiated several times, and a plugin's initialization path may run
//! more than once (test harnesses included), so a same-owner re-claim
//! succeeds silently; only a claim on a name held by a *different* owner is
//! rejected, with both owners named in the error.
//!
//! The registry is an explicit value, never module-level global state: an
//! application holds one instance for its process lifetime, tests construct
//! fresh instances, and nothing here is ever reset or rolled back.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::FeatureKeywordGuard;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Sentinel owner id for the built-in property names.
pub const BUILTIN_OWNER: &str = "builtin";

/// The built-in aspect property names, in life-cycle order.
pub const BUILTIN_ASPECT_PROPERTIES: &[&str] = &[
    "name",
    "genesis",
    "validate_feature_content",
    "expand_feature_content",
    "assemble_feature_content",
    "assemble_aspect_resources",
    "initial_root_app_elm",
    "inject_root_app_elm",
    "config",
];

/// Namespace tag for the aspect-side registry.
const ASPECT_NAMESPACE: &str = "aspect";

// ---------------------------------------------------------------------------
// PropertyError
// ---------------------------------------------------------------------------

/// Errors from registry reservation attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PropertyError {
    /// Reservation requested for an empty property name.
    EmptyName,
    /// Reservation requested with an empty owner id.
    EmptyOwner { name: String },
    /// Property already reserved by a different owner. The registry state is
    /// left unchanged.
    Conflict {
        name: String,
        requested_owner: String,
        current_owner: String,
    },
}

impl PropertyError {
    /// Stable error code for structured logging.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "WEFT-PROP-0001",
            Self::EmptyOwner { .. } => "WEFT-PROP-0002",
            Self::Conflict { .. } => "WEFT-PROP-0003",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::EmptyName => "property name must not be empty".to_string(),
            Self::EmptyOwner { name } => {
                format!("owner id for property `{name}` must not be empty")
            }
            Self::Conflict {
                name,
                requested_owner,
                current_owner,
            } => format!(
                "property `{name}` requested by `{requested_owner}` is already \
                 reserved by `{current_owner}`"
            ),
        }
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property reservation violation [{}]: {}",
            self.error_code(),
            self.message()
        )
    }
}

impl std::error::Error for PropertyError {}

// ---------------------------------------------------------------------------
// PropertyEvent — structured reservation diagnostics
// ---------------------------------------------------------------------------

/// Structured event emitted by every reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEvent {
    /// Deterministic per-registry ordering (no wall clock in this core).
    pub sequence: u64,
    /// Registry namespace the event belongs to.
    pub namespace: String,
    pub event_type: PropertyEventType,
    pub outcome: EventOutcome,
    /// Property name the attempt was about.
    pub name: String,
    /// Owner id that made the attempt.
    pub owner: String,
    /// Owner already holding the name, for idempotent repeats and conflicts.
    pub prior_owner: Option<String>,
    /// Whether a granted attempt was a same-owner repeat.
    pub idempotent: bool,
    /// Error code, if the attempt was denied.
    pub error_code: Option<String>,
}

/// Type of reservation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyEventType {
    NameReserved,
    ReservationDenied,
}

impl PropertyEventType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameReserved => "name_reserved",
            Self::ReservationDenied => "reservation_denied",
        }
    }
}

impl fmt::Display for PropertyEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Granted,
    Denied,
}

impl EventOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DiagnosticSink — best-effort observability
// ---------------------------------------------------------------------------

/// Opaque failure from a diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError(pub String);

/// Best-effort sink for reservation diagnostics.
///
/// The registry offers every event to the installed sink and swallows any
/// error it returns: a failing sink must never affect a governance decision.
pub trait DiagnosticSink {
    fn record(&mut self, event: &PropertyEvent) -> Result<(), SinkError>;
}

// ---------------------------------------------------------------------------
// PropertyRegistry
// ---------------------------------------------------------------------------

/// Owner-scoped map from reserved property name to claiming identifier.
pub struct PropertyRegistry {
    /// Which property namespace this instance governs.
    namespace: &'static str,
    /// Property name to owner id.
    owners: BTreeMap<String, String>,
    /// Append-only reservation audit log.
    events: Vec<PropertyEvent>,
    /// Optional best-effort diagnostic sink.
    sink: Option<Box<dyn DiagnosticSink>>,
    next_sequence: u64,
}

impl PropertyRegistry {
    /// Registry for the aspect property namespace, seeded with the built-in
    /// names under the [`BUILTIN_OWNER`] sentinel.
    pub fn aspect_builtins() -> Self {
        Self::with_builtins(ASPECT_NAMESPACE, BUILTIN_ASPECT_PROPERTIES)
    }

    /// Registry for an arbitrary namespace, seeded with `builtins` under the
    /// [`BUILTIN_OWNER`] sentinel. The feature-declaration collaborator uses
    /// this to govern its own keyword surface with the same mechanism.
    pub fn with_builtins(namespace: &'static str, builtins: &[&str]) -> Self {
        let owners = builtins
            .iter()
            .map(|name| ((*name).to_string(), BUILTIN_OWNER.to_string()))
            .collect();
        Self {
            namespace,
            owners,
            events: Vec::new(),
            sink: None,
            next_sequence: 0,
        }
    }

    /// Which property namespace this instance governs.
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Whether `name` currently has any owner. Pure lookup, no side effects.
    pub fn is_reserved_name(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    /// Owner currently holding `name`, if any.
    pub fn owner_of(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    /// Count of reserved names, builtins included.
    pub fn reserved_count(&self) -> usize {
        self.owners.len()
    }

    /// Access the reservation audit log.
    pub fn events(&self) -> &[PropertyEvent] {
        &self.events
    }

    /// Install the best-effort diagnostic sink, replacing any previous one.
    pub fn set_diagnostic_sink(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.sink = Some(sink);
    }

    /// Reserve `name` for `owner`.
    ///
    /// An unclaimed name is claimed. A name already held by `owner` is an
    /// idempotent success. A name held by a different owner fails with a
    /// [`PropertyError::Conflict`] naming both owners, and the registry is
    /// left unchanged. Every successful call emits exactly one diagnostic
    /// event; denied conflicts are recorded as well.
    pub fn reserve_name(&mut self, name: &str, owner: &str) -> Result<(), PropertyError> {
        if name.is_empty() {
            return Err(PropertyError::EmptyName);
        }
        if owner.is_empty() {
            return Err(PropertyError::EmptyOwner {
                name: name.to_string(),
            });
        }

        match self.owners.get(name) {
            Some(current) if current != owner => {
                let err = PropertyError::Conflict {
                    name: name.to_string(),
                    requested_owner: owner.to_string(),
                    current_owner: current.clone(),
                };
                let prior = Some(current.clone());
                self.emit_event(
                    PropertyEventType::ReservationDenied,
                    EventOutcome::Denied,
                    name,
                    owner,
                    prior,
                    false,
                    Some(err.error_code().to_string()),
                );
                Err(err)
            }
            Some(current) => {
                let prior = Some(current.clone());
                self.emit_event(
                    PropertyEventType::NameReserved,
                    EventOutcome::Granted,
                    name,
                    owner,
                    prior,
                    true,
                    None,
                );
                Ok(())
            }
            None => {
                self.owners.insert(name.to_string(), owner.to_string());
                self.emit_event(
                    PropertyEventType::NameReserved,
                    EventOutcome::Granted,
                    name,
                    owner,
                    None,
                    false,
                    None,
                );
                Ok(())
            }
        }
    }

    fn emit_event(
        &mut self,
        event_type: PropertyEventType,
        outcome: EventOutcome,
        name: &str,
        owner: &str,
        prior_owner: Option<String>,
        idempotent: bool,
        error_code: Option<String>,
    ) {
        let event = PropertyEvent {
            sequence: self.next_sequence,
            namespace: self.namespace.to_string(),
            event_type,
            outcome,
            name: name.to_string(),
            owner: owner.to_string(),
            prior_owner,
            idempotent,
            error_code,
        };
        self.next_sequence += 1;
        if let Some(sink) = self.sink.as_mut() {
            // Best effort: a failing sink never affects the reservation.
            let _ = sink.record(&event);
        }
        self.events.push(event);
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("namespace", &self.namespace)
            .field("reserved", &self.owners.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

/// A registry can back the feature-keyword predicate directly when the
/// feature-declaration collaborator governs its keywords with the same
/// mechanism.
impl FeatureKeywordGuard for PropertyRegistry {
    fn is_reserved_feature_keyword(&self, name: &str) -> bool {
        self.is_reserved_name(name)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
