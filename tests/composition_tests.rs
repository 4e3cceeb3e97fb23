// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for deployment resolution
//!
//! These tests verify the complete flow:
//! 1. Define units with exports, imports and dependency edges
//! 2. Resolve the deployment in one synchronous pass
//! 3. Synthesize the resolved graph against a recording engine
//!
//! Structural errors (unresolved imports, duplicate exports, cycles) must
//! surface during resolution, before anything reaches an engine.

use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use stack_compose::compose::Deployment;
use stack_compose::domain::{CapabilityHandle, ExportName, ResourceKind, UnitName};
use stack_compose::engine::RecordingEngine;
use stack_compose::errors::CompositionError;
use stack_compose::unit::UnitDefinition;

// Test fixtures
fn unit_name(s: &str) -> UnitName {
    UnitName::new(s).unwrap()
}

fn export_name(s: &str) -> ExportName {
    ExportName::new(s).unwrap()
}

/// Scenario: a published capability resolves to the exact exported value
#[test]
fn test_export_resolves_across_units() {
    let mut deployment = Deployment::new();

    deployment.add_unit(UnitDefinition::new(unit_name("Network"), |unit| {
        unit.export("NetId", CapabilityHandle::new("vpc-1"))
    }));

    deployment.add_unit(
        UnitDefinition::new(unit_name("Database"), |unit| {
            let net = unit.import("NetId")?;
            unit.declare(
                "Db",
                ResourceKind::Database,
                json!({ "network": net.id() }),
            )?;
            Ok(())
        })
        .depends_on(unit_name("Network")),
    );

    let resolved = deployment.resolve().unwrap();

    let database = resolved.unit(&unit_name("Database")).unwrap();
    assert_eq!(database.resources[0].config["network"], "vpc-1");
    assert_eq!(
        resolved.registry().get(&export_name("NetId")).unwrap().id(),
        "vpc-1"
    );
}

/// Scenario: importing a name nobody published fails, naming the export
#[test]
fn test_unresolved_capability() {
    let mut deployment = Deployment::new();

    deployment.add_unit(UnitDefinition::new(unit_name("Service"), |unit| {
        unit.import("AlbArn").map(|_| ())
    }));

    let err = deployment.resolve().unwrap_err();
    match err {
        CompositionError::UnresolvedCapability { export, importer } => {
            assert_eq!(export.as_str(), "AlbArn");
            assert_eq!(importer.as_str(), "Service");
        }
        other => panic!("expected UnresolvedCapability, got {:?}", other),
    }
}

/// Scenario: two publishers of the same export name fail, naming the export
#[test]
fn test_duplicate_export() {
    let mut deployment = Deployment::new();

    for unit in ["AlbStackA", "AlbStackB"] {
        deployment.add_unit(UnitDefinition::new(unit_name(unit), move |ctx| {
            ctx.declare("Alb", ResourceKind::LoadBalancer, json!({}))?;
            ctx.export("AlbArn", CapabilityHandle::new(format!("arn:{unit}")))
        }));
    }

    let err = deployment.resolve().unwrap_err();
    match err {
        CompositionError::DuplicateExport { export, second, .. } => {
            assert_eq!(export.as_str(), "AlbArn");
            assert_eq!(second.as_str(), "AlbStackB");
        }
        other => panic!("expected DuplicateExport, got {:?}", other),
    }
}

/// Scenario: mutual imports between two units are a cycle, nothing constructs
#[test]
fn test_cyclic_dependency() {
    let mut deployment = Deployment::new();

    deployment.add_unit(
        UnitDefinition::new(unit_name("A"), |unit| {
            unit.export("AOut", CapabilityHandle::new("a"))?;
            unit.import("BOut").map(|_| ())
        })
        .depends_on(unit_name("B")),
    );
    deployment.add_unit(
        UnitDefinition::new(unit_name("B"), |unit| {
            unit.export("BOut", CapabilityHandle::new("b"))?;
            unit.import("AOut").map(|_| ())
        })
        .depends_on(unit_name("A")),
    );

    let err = deployment.resolve().unwrap_err();
    assert!(matches!(err, CompositionError::CyclicDependency { .. }));
}

/// Resolution order is stable across repeated runs of the same definition
#[test]
fn test_resolution_order_is_deterministic() {
    fn build() -> Deployment {
        let mut deployment = Deployment::new();
        deployment.add_unit(UnitDefinition::new(unit_name("Network"), |unit| {
            unit.export("NetId", CapabilityHandle::new("vpc-1"))
        }));
        for service in ["Gamma", "Alpha", "Beta"] {
            deployment.add_unit(
                UnitDefinition::new(unit_name(service), |unit| {
                    unit.import("NetId").map(|_| ())
                })
                .depends_on(unit_name("Network")),
            );
        }
        deployment
    }

    let first: Vec<String> = build()
        .resolve()
        .unwrap()
        .order()
        .iter()
        .map(|u| u.as_str().to_string())
        .collect();

    for _ in 0..5 {
        let again: Vec<String> = build()
            .resolve()
            .unwrap()
            .order()
            .iter()
            .map(|u| u.as_str().to_string())
            .collect();
        assert_eq!(again, first);
    }

    // Independent services keep declaration order behind their dependency.
    assert_eq!(first, vec!["Network", "Gamma", "Alpha", "Beta"]);
}

/// Synthesis hands resources to the engine in construction order
#[test]
fn test_synthesis_follows_construction_order() {
    let mut deployment = Deployment::new();

    deployment.add_unit(
        UnitDefinition::new(unit_name("Alb"), |unit| {
            let alb = unit.declare("Alb", ResourceKind::LoadBalancer, json!({}))?;
            unit.export("AlbArn", alb)
        })
        .depends_on(unit_name("Network")),
    );
    deployment.add_unit(UnitDefinition::new(unit_name("Network"), |unit| {
        unit.declare("Vpc", ResourceKind::Network, json!({}))?;
        Ok(())
    }));

    let resolved = deployment.resolve().unwrap();
    let mut engine = RecordingEngine::new();
    resolved.synthesize(&mut engine).unwrap();

    let declared: Vec<(&str, &str)> = engine
        .declared()
        .iter()
        .map(|d| (d.unit.as_str(), d.logical_id.as_str()))
        .collect();
    assert_eq!(declared, vec![("Network", "Vpc"), ("Alb", "Alb")]);
    assert_eq!(
        engine.outputs().get(&export_name("AlbArn")).unwrap().id(),
        "Alb/Alb"
    );
}

/// A structural failure keeps every resource away from the engine
#[test]
fn test_no_declarations_on_failure() {
    let mut deployment = Deployment::new();

    deployment.add_unit(UnitDefinition::new(unit_name("AlbStackA"), |unit| {
        unit.declare("Alb", ResourceKind::LoadBalancer, json!({}))?;
        unit.export("AlbArn", CapabilityHandle::new("arn:a"))
    }));
    deployment.add_unit(UnitDefinition::new(unit_name("AlbStackB"), |unit| {
        unit.declare("Alb", ResourceKind::LoadBalancer, json!({}))?;
        unit.export("AlbArn", CapabilityHandle::new("arn:b"))
    }));

    // Resolution fails, so there is no resolved deployment to synthesize:
    // the engine can never observe a partially-wired topology.
    assert!(deployment.resolve().is_err());
}

/// Cross-deployment imports resolve against seeded prior state
#[test]
fn test_seeded_state_from_engine() {
    let engine = RecordingEngine::new().with_state(
        export_name("CommonAlbArn"),
        CapabilityHandle::new("arn:alb/prior"),
    );

    let mut deployment = Deployment::new();
    let seeded = deployment.seed_from(
        &engine,
        &[export_name("CommonAlbArn"), export_name("NeverExported")],
    );
    assert_eq!(seeded, 1);

    deployment.add_unit(UnitDefinition::new(unit_name("Service"), |unit| {
        let alb = unit.import("CommonAlbArn")?;
        assert_eq!(alb.id(), "arn:alb/prior");
        Ok(())
    }));

    deployment.resolve().unwrap();
}

/// Full topology: network hand-off, shared balancer exports, service imports
#[test]
fn test_shared_service_topology() {
    let network = unit_name("CommonNetworkStack");
    let alb = unit_name("CommonAlbStack");

    let mut deployment = Deployment::new();

    deployment.add_unit(UnitDefinition::new(network.clone(), |unit| {
        let vpc = unit.declare("Vpc", ResourceKind::Network, json!({"cidr": "172.16.0.0/16"}))?;
        unit.output("vpc", vpc)
    }));

    {
        let edge = network.clone();
        let network = network.clone();
        deployment.add_unit(
            UnitDefinition::new(alb.clone(), move |unit| {
                let vpc = unit.output_of(&network, "vpc")?;
                let alb = unit.declare(
                    "Alb",
                    ResourceKind::LoadBalancer,
                    json!({ "network": vpc.id() }),
                )?;
                unit.export("CommonAlbArn", alb.clone())?;
                unit.export("CommonAlbDnsName", alb.attribute_ref("dns-name"))
            })
            .depends_on(edge),
        );
    }

    {
        let edge = network.clone();
        let network = network.clone();
        deployment.add_unit(
            UnitDefinition::new(unit_name("AppServiceStack"), move |unit| {
                let vpc = unit.output_of(&network, "vpc")?;
                let alb = unit.import("CommonAlbArn")?;
                let dns = unit.import("CommonAlbDnsName")?;
                unit.declare(
                    "Service",
                    ResourceKind::ContainerService,
                    json!({ "network": vpc.id(), "load_balancer": alb.id() }),
                )?;
                unit.declare(
                    "DnsRecord",
                    ResourceKind::DnsRecord,
                    json!({ "alias_target": dns.id() }),
                )?;
                Ok(())
            })
            .depends_on(edge)
            .depends_on(alb.clone()),
        );
    }

    let resolved = deployment.resolve().unwrap();
    assert_eq!(
        resolved
            .order()
            .iter()
            .map(|u| u.as_str())
            .collect::<Vec<_>>(),
        vec!["CommonNetworkStack", "CommonAlbStack", "AppServiceStack"]
    );

    let service = resolved.unit(&unit_name("AppServiceStack")).unwrap();
    assert_eq!(
        service.resources[0].config["load_balancer"],
        "CommonAlbStack/Alb"
    );
    assert_eq!(
        service.resources[1].config["alias_target"],
        "CommonAlbStack/Alb#dns-name"
    );

    let mut engine = RecordingEngine::new();
    resolved.synthesize(&mut engine).unwrap();
    assert_eq!(engine.declared().len(), 3);
    assert_eq!(engine.outputs().len(), 2);
}

#[test_case("" ; "empty name")]
#[test_case("has space" ; "whitespace")]
#[test_case("_underscore" ; "leading underscore")]
#[test_case(":leading-colon" ; "leading colon")]
fn test_invalid_export_names_fail_resolution(name: &'static str) {
    let mut deployment = Deployment::new();
    deployment.add_unit(UnitDefinition::new(unit_name("Network"), move |unit| {
        unit.export(name, CapabilityHandle::new("vpc-1"))
    }));

    assert!(matches!(
        deployment.resolve().unwrap_err(),
        CompositionError::InvalidExportName(_)
    ));
}
