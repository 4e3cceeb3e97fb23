// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Deployment Resolution
//!
//! Generates arbitrary acyclic unit graphs (each unit may depend only on
//! units declared before it, so cycles are impossible by construction) and
//! verifies the resolution invariants hold for every one of them.

use proptest::prelude::*;

use stack_compose::compose::Deployment;
use stack_compose::domain::{CapabilityHandle, ExportName, UnitName};
use stack_compose::errors::CompositionError;
use stack_compose::unit::UnitDefinition;

fn unit_name(i: usize) -> UnitName {
    UnitName::new(format!("Unit{:02}", i)).unwrap()
}

fn export_name(i: usize) -> ExportName {
    ExportName::new(format!("Cap{:02}", i)).unwrap()
}

/// Dependency indices of unit `i`, taken from the low bits of its mask
fn deps_of(masks: &[u16], i: usize) -> Vec<usize> {
    (0..i.min(16))
        .filter(|&j| masks[i] & (1 << j) != 0)
        .collect()
}

/// Build a deployment where every unit exports one capability and imports
/// the capability of each of its dependencies
fn build_deployment(masks: &[u16]) -> Deployment {
    let mut deployment = Deployment::new();

    for i in 0..masks.len() {
        let deps = deps_of(masks, i);
        let mut definition = UnitDefinition::new(unit_name(i), move |unit| {
            for &j in &deps {
                let imported = unit.import(export_name(j).as_str())?;
                assert_eq!(imported.id(), format!("cap-{:02}", j));
            }
            unit.export(
                export_name(i).as_str(),
                CapabilityHandle::new(format!("cap-{:02}", i)),
            )
        });
        for j in deps_of(masks, i) {
            definition = definition.depends_on(unit_name(j));
        }
        deployment.add_unit(definition);
    }

    deployment
}

proptest! {
    /// Any declaration-ordered dependency graph resolves, and every
    /// dependency is constructed before its dependent
    #[test]
    fn resolution_respects_dependencies(masks in prop::collection::vec(any::<u16>(), 1..10)) {
        let resolved = build_deployment(&masks).resolve().unwrap();
        let order = resolved.order();
        prop_assert_eq!(order.len(), masks.len());

        let position = |name: &UnitName| order.iter().position(|u| u == name).unwrap();
        for i in 0..masks.len() {
            for j in deps_of(&masks, i) {
                prop_assert!(position(&unit_name(j)) < position(&unit_name(i)));
            }
        }
    }

    /// The same definition always produces the same construction order
    #[test]
    fn resolution_order_is_deterministic(masks in prop::collection::vec(any::<u16>(), 1..10)) {
        let first = build_deployment(&masks).resolve().unwrap();
        let second = build_deployment(&masks).resolve().unwrap();
        prop_assert_eq!(first.order(), second.order());
    }

    /// Every unit's export lands in the registry exactly once
    #[test]
    fn registry_holds_one_export_per_unit(masks in prop::collection::vec(any::<u16>(), 1..10)) {
        let resolved = build_deployment(&masks).resolve().unwrap();
        prop_assert_eq!(resolved.registry().len(), masks.len());
        for i in 0..masks.len() {
            let handle = resolved.registry().get(&export_name(i)).unwrap();
            let expected = format!("cap-{:02}", i);
            prop_assert_eq!(handle.id(), expected.as_str());
        }
    }

    /// Re-publishing any existing export name fails with DuplicateExport
    #[test]
    fn duplicate_export_always_detected(
        masks in prop::collection::vec(any::<u16>(), 1..10),
        pick in any::<prop::sample::Index>(),
    ) {
        let duplicated = pick.index(masks.len());
        let mut deployment = build_deployment(&masks);

        deployment.add_unit(
            UnitDefinition::new(UnitName::new("Interloper").unwrap(), move |unit| {
                unit.export(
                    export_name(duplicated).as_str(),
                    CapabilityHandle::new("dup"),
                )
            })
            .depends_on(unit_name(duplicated)),
        );

        let err = deployment.resolve().unwrap_err();
        let is_duplicate_export = matches!(err, CompositionError::DuplicateExport { .. });
        prop_assert!(is_duplicate_export);
    }
}
