//! Property tests pinning the removal precedence order

use macdev_core::reconcile::{Classification, classify};
use macdev_core::{GlobalManifest, LocalManifest, PackageSpec};
use proptest::prelude::*;

const NAMES: &[&str] = &["python", "node", "git"];
const VERSIONS: &[&str] = &["*", "3.11", "20"];

fn spec_strategy() -> impl Strategy<Value = PackageSpec> {
    (prop::sample::select(NAMES), prop::sample::select(VERSIONS))
        .prop_map(|(name, version)| PackageSpec::new(name, Some(version)))
}

#[derive(Debug, Clone, Copy)]
enum Class {
    Pure,
    Impure,
    Cask,
}

fn class_strategy() -> impl Strategy<Value = Class> {
    prop_oneof![Just(Class::Pure), Just(Class::Impure), Just(Class::Cask)]
}

fn world() -> impl Strategy<Value = (LocalManifest, GlobalManifest)> {
    (
        prop::collection::vec(spec_strategy(), 0..4),
        prop::collection::vec((spec_strategy(), class_strategy()), 0..6),
    )
        .prop_map(|(local_specs, tracked)| {
            let mut local = LocalManifest::default();
            for spec in &local_specs {
                local.insert(spec);
            }
            let mut global = GlobalManifest::default();
            for (spec, class) in tracked {
                match class {
                    Class::Pure => global.insert_pure(&spec),
                    Class::Impure => global.insert_impure(spec.to_string()),
                    Class::Cask => global.insert_cask(spec.to_string()),
                }
            }
            (local, global)
        })
}

proptest! {
    #[test]
    fn exact_cask_always_wins((local, global) in world(), spec in spec_strategy()) {
        let result = classify(&spec, Some(&local), &global);
        if global.is_cask(&spec.to_string()) {
            prop_assert_eq!(result, Some(Classification::Cask { key: spec.to_string() }));
        }
    }

    #[test]
    fn classified_keys_exist_in_their_manifest((local, global) in world(), spec in spec_strategy()) {
        match classify(&spec, Some(&local), &global) {
            Some(Classification::Cask { key }) => prop_assert!(global.is_cask(&key)),
            Some(Classification::Impure { key }) => prop_assert!(global.is_impure(&key)),
            Some(Classification::Pure { local_key, global_key }) => {
                prop_assert!(local_key.is_some() || global_key.is_some());
                if let Some(key) = local_key {
                    prop_assert!(local.contains_key(&key));
                }
                if let Some(key) = global_key {
                    prop_assert!(global.is_pure(&key));
                }
            }
            None => {}
        }
    }

    #[test]
    fn bare_request_prefers_pure_over_impure((local, global) in world(), name in prop::sample::select(NAMES)) {
        let spec = PackageSpec::parse(name);
        let pure_somewhere = local.contains_key(name) || global.is_pure(name);
        if pure_somewhere && !global.is_cask(name) {
            prop_assert!(classify(&spec, Some(&local), &global).is_some_and(|c| c.is_pure()));
        }
    }

    #[test]
    fn exact_impure_beats_bare_pure((local, global) in world(), spec in spec_strategy()) {
        let canonical = spec.to_string();
        let exact_pure = global.find_pure(&spec).is_some()
            || local.get(spec.name()) == Some(spec.version_or_wildcard());
        if spec.is_versioned()
            && global.is_impure(&canonical)
            && !exact_pure
        {
            prop_assert_eq!(
                classify(&spec, Some(&local), &global),
                Some(Classification::Impure { key: canonical })
            );
        }
    }

    #[test]
    fn pin_for_other_version_never_touches_local((local, global) in world(), spec in spec_strategy()) {
        if let Some(stored) = local.get(spec.name())
            && spec.is_versioned()
            && stored != "*"
            && Some(stored) != spec.version()
            && let Some(Classification::Pure { local_key, .. }) = classify(&spec, Some(&local), &global)
        {
            prop_assert_eq!(local_key, None);
        }
    }
}
