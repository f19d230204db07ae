use std::cell::RefCell;
use std::rc::Rc;

use weft_aspect::{
    DiagnosticSink, EventOutcome, FeatureKeywordGuard, PropertyError, PropertyEvent,
    PropertyRegistry, SinkError, BUILTIN_ASPECT_PROPERTIES, BUILTIN_OWNER,
};

// ───────────────────────────────────────────────────────────────
// Repeated initialization paths
// ───────────────────────────────────────────────────────────────

#[test]
fn plugin_init_may_run_many_times() {
    let mut reg = PropertyRegistry::aspect_builtins();

    // Two instances of the same aspect type plus a test-harness re-entry:
    // the same owner claims its surface three times over.
    for _ in 0..3 {
        reg.reserve_name("get_route", "aspect-router").unwrap();
        reg.reserve_name("route_catalog", "aspect-router").unwrap();
    }

    assert_eq!(reg.owner_of("get_route"), Some("aspect-router"));
    assert_eq!(reg.owner_of("route_catalog"), Some("aspect-router"));
    assert_eq!(
        reg.reserved_count(),
        BUILTIN_ASPECT_PROPERTIES.len() + 2,
        "repeats must not grow the namespace"
    );
}

#[test]
fn interleaved_plugins_keep_disjoint_surfaces() {
    let mut reg = PropertyRegistry::aspect_builtins();

    reg.reserve_name("get_route", "aspect-router").unwrap();
    reg.reserve_name("get_logic", "aspect-logic").unwrap();
    reg.reserve_name("get_route", "aspect-router").unwrap();

    // Each plugin's names survive the other's activity untouched.
    assert_eq!(reg.owner_of("get_route"), Some("aspect-router"));
    assert_eq!(reg.owner_of("get_logic"), Some("aspect-logic"));

    // Neither may cross into the other's surface.
    assert!(reg.reserve_name("get_logic", "aspect-router").is_err());
    assert!(reg.reserve_name("get_route", "aspect-logic").is_err());
}

#[test]
fn rejected_claim_is_not_partially_applied() {
    let mut reg = PropertyRegistry::aspect_builtins();
    reg.reserve_name("get_route", "aspect-router").unwrap();
    let count_before = reg.reserved_count();

    let err = reg.reserve_name("get_route", "aspect-nav").unwrap_err();
    assert!(matches!(err, PropertyError::Conflict { .. }));

    assert_eq!(reg.reserved_count(), count_before);
    assert_eq!(reg.owner_of("get_route"), Some("aspect-router"));
}

// ───────────────────────────────────────────────────────────────
// Builtin surface
// ───────────────────────────────────────────────────────────────

#[test]
fn builtin_surface_is_complete_and_sentinel_owned() {
    let reg = PropertyRegistry::aspect_builtins();
    for builtin in [
        "name",
        "genesis",
        "validate_feature_content",
        "expand_feature_content",
        "assemble_feature_content",
        "assemble_aspect_resources",
        "initial_root_app_elm",
        "inject_root_app_elm",
        "config",
    ] {
        assert!(reg.is_reserved_name(builtin), "missing builtin `{builtin}`");
        assert_eq!(reg.owner_of(builtin), Some(BUILTIN_OWNER));
    }
}

#[test]
fn config_cannot_be_claimed_by_a_plugin() {
    let mut reg = PropertyRegistry::aspect_builtins();
    let err = reg.reserve_name("config", "owner-a").unwrap_err();
    assert_eq!(
        err,
        PropertyError::Conflict {
            name: "config".to_string(),
            requested_owner: "owner-a".to_string(),
            current_owner: BUILTIN_OWNER.to_string(),
        }
    );
}

// ───────────────────────────────────────────────────────────────
// Feature-side namespace reuse
// ───────────────────────────────────────────────────────────────

#[test]
fn feature_namespace_uses_the_same_mechanism() {
    let mut features = PropertyRegistry::with_builtins("feature", &["name", "enabled"]);
    features.reserve_name("fassets", "feature-hub").unwrap();

    assert!(features.is_reserved_feature_keyword("enabled"));
    assert!(features.is_reserved_feature_keyword("fassets"));
    assert!(!features.is_reserved_feature_keyword("routes"));

    // The aspect-side registry is unrelated state.
    let aspects = PropertyRegistry::aspect_builtins();
    assert!(!aspects.is_reserved_name("fassets"));
}

// ───────────────────────────────────────────────────────────────
// Observability
// ───────────────────────────────────────────────────────────────

struct CountingSink {
    granted: Rc<RefCell<u32>>,
    denied: Rc<RefCell<u32>>,
}

impl DiagnosticSink for CountingSink {
    fn record(&mut self, event: &PropertyEvent) -> Result<(), SinkError> {
        match event.outcome {
            EventOutcome::Granted => *self.granted.borrow_mut() += 1,
            EventOutcome::Denied => *self.denied.borrow_mut() += 1,
        }
        Ok(())
    }
}

#[test]
fn sink_sees_one_emission_per_call() {
    let granted = Rc::new(RefCell::new(0));
    let denied = Rc::new(RefCell::new(0));

    let mut reg = PropertyRegistry::aspect_builtins();
    reg.set_diagnostic_sink(Box::new(CountingSink {
        granted: Rc::clone(&granted),
        denied: Rc::clone(&denied),
    }));

    reg.reserve_name("get_route", "aspect-router").unwrap();
    reg.reserve_name("get_route", "aspect-router").unwrap();
    let _ = reg.reserve_name("get_route", "aspect-nav");

    assert_eq!(*granted.borrow(), 2);
    assert_eq!(*denied.borrow(), 1);
}

#[test]
fn audit_log_distinguishes_fresh_from_idempotent_grants() {
    let mut reg = PropertyRegistry::aspect_builtins();
    reg.reserve_name("get_route", "aspect-router").unwrap();
    reg.reserve_name("get_route", "aspect-router").unwrap();

    let events = reg.events();
    assert!(!events[0].idempotent);
    assert!(events[1].idempotent);
    assert_eq!(events[1].prior_owner.as_deref(), Some("aspect-router"));
    assert!(events[0].sequence < events[1].sequence);
}
