#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use weft_aspect::{PropertyError, PropertyRegistry, BUILTIN_ASPECT_PROPERTIES, BUILTIN_OWNER};

const MAX_STEPS: usize = 256;

const NAMES: &[&str] = &[
    "get_xyz",
    "get_route",
    "route_catalog",
    "config",
    "genesis",
    "validate_feature_content",
    "x",
];

const OWNERS: &[&str] = &["plugin-a", "plugin-b", "plugin-c", "builtin"];

fuzz_target!(|data: &[u8]| {
    let mut registry = PropertyRegistry::aspect_builtins();

    // Shadow model: name to owner, seeded exactly like the registry.
    let mut model: BTreeMap<&str, &str> = BUILTIN_ASPECT_PROPERTIES
        .iter()
        .map(|name| (*name, BUILTIN_OWNER))
        .collect();

    for chunk in data.chunks(2).take(MAX_STEPS) {
        let name = NAMES[chunk[0] as usize % NAMES.len()];
        let owner = OWNERS[chunk.get(1).copied().unwrap_or(0) as usize % OWNERS.len()];

        let expected: Result<(), &str> = match model.get(name) {
            None => {
                model.insert(name, owner);
                Ok(())
            }
            Some(current) if *current == owner => Ok(()),
            Some(current) => Err(current),
        };

        match (registry.reserve_name(name, owner), expected) {
            (Ok(()), Ok(())) => {}
            (Err(PropertyError::Conflict { current_owner, .. }), Err(want)) => {
                assert_eq!(current_owner, want);
            }
            (got, want) => panic!("reserve_name({name}, {owner}): got {got:?}, want {want:?}"),
        }

        // Single owner per name, matching the model after every step.
        assert_eq!(registry.owner_of(name), model.get(name).copied());
        assert_eq!(registry.is_reserved_name(name), model.contains_key(name));
    }

    // Builtins never change hands.
    for builtin in BUILTIN_ASPECT_PROPERTIES {
        assert_eq!(registry.owner_of(builtin), Some(BUILTIN_OWNER));
    }

    // The audit log is strictly ordered.
    for window in registry.events().windows(2) {
        assert!(window[0].sequence < window[1].sequence);
    }
});
