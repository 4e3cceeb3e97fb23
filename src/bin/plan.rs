// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Plan Preview
//!
//! Builds the full unit graph for a small set of web services (shared
//! network, shared persistence, shared load balancer, one application
//! service), resolves it, and synthesizes against an in-memory recording
//! engine so the whole plan can be inspected without touching any cloud.
//!
//! Run with: cargo run --bin plan

use anyhow::Result;
use serde_json::json;
use tracing::info;

use stack_compose::compose::Deployment;
use stack_compose::domain::{ResourceKind, UnitName};
use stack_compose::engine::RecordingEngine;
use stack_compose::unit::UnitDefinition;

fn network_stack(name: &UnitName) -> UnitDefinition {
    UnitDefinition::new(name.clone(), |unit| {
        let vpc = unit.declare(
            "Vpc",
            ResourceKind::Network,
            json!({ "cidr": "172.16.0.0/16", "max_zones": 1, "nat_gateways": 0 }),
        )?;
        let public = unit.declare(
            "PublicSegment",
            ResourceKind::NetworkSegment,
            json!({ "network": vpc.id(), "cidr_mask": 24, "kind": "public" }),
        )?;
        let private = unit.declare(
            "PrivateSegment",
            ResourceKind::NetworkSegment,
            json!({ "network": vpc.id(), "cidr_mask": 24, "kind": "private_isolated" }),
        )?;

        // Same-run consumers take the network handle directly.
        unit.output(
            "vpc",
            vpc.with_attribute("public-segment", public.id())
                .with_attribute("private-segment", private.id()),
        )
    })
}

fn persistent_stack(name: &UnitName, network: &UnitName) -> UnitDefinition {
    let edge = network.clone();
    let network = network.clone();
    UnitDefinition::new(name.clone(), move |unit| {
        let vpc = unit.output_of(&network, "vpc")?;

        let boundary = unit.declare(
            "DbSecurityBoundary",
            ResourceKind::SecurityBoundary,
            json!({
                "network": vpc.id(),
                "ingress": [{ "from": "network-cidr", "port": 5432 }],
                "allow_all_outbound": false,
            }),
        )?;
        unit.declare(
            "Database",
            ResourceKind::Database,
            json!({
                "engine": "postgres",
                "version": "16.2",
                "network": vpc.id(),
                "segment": vpc.attribute("private-segment"),
                "security_boundaries": [boundary.id()],
                "storage_gib": 20,
                "max_storage_gib": 100,
            }),
        )?;
        unit.declare(
            "Bastion",
            ResourceKind::GatewayInstance,
            json!({ "network": vpc.id(), "size": "nano" }),
        )?;
        Ok(())
    })
    .depends_on(edge)
}

fn alb_stack(name: &UnitName, network: &UnitName) -> UnitDefinition {
    let edge = network.clone();
    let network = network.clone();
    UnitDefinition::new(name.clone(), move |unit| {
        let vpc = unit.output_of(&network, "vpc")?;

        let boundary = unit.declare(
            "SecurityBoundary",
            ResourceKind::SecurityBoundary,
            json!({
                "network": vpc.id(),
                "ingress": [{ "from": "anywhere", "port": 80 }],
                "allow_all_outbound": true,
            }),
        )?;
        let alb = unit.declare(
            "Alb",
            ResourceKind::LoadBalancer,
            json!({
                "network": vpc.id(),
                "internet_facing": true,
                "security_boundaries": [boundary.id()],
            }),
        )?;
        let listener = unit.declare(
            "HttpListener",
            ResourceKind::Listener,
            json!({
                "load_balancer": alb.id(),
                "port": 80,
                "default_action": { "fixed_response": 404, "body": "Not Found" },
            }),
        )?;

        // Published for services deployed as separate lifecycle units.
        unit.export("CommonAlbArn", alb.clone())?;
        unit.export("CommonAlbSecurityBoundaryId", boundary)?;
        unit.export("CommonAlbHttpListenerArn", listener)?;
        unit.export("CommonAlbDnsName", alb.attribute_ref("dns-name"))?;
        unit.export("CommonAlbZoneId", alb.attribute_ref("zone-id"))?;
        Ok(())
    })
    .depends_on(edge)
}

fn app_service_stack(name: &UnitName, network: &UnitName, alb: &UnitName) -> UnitDefinition {
    let network_edge = network.clone();
    let alb_edge = alb.clone();
    let network = network.clone();
    UnitDefinition::new(name.clone(), move |unit| {
        let vpc = unit.output_of(&network, "vpc")?;

        // The balancer belongs to another lifecycle unit; reconstruct local
        // handles from its exports rather than holding its live objects.
        let alb_arn = unit.import("CommonAlbArn")?;
        let alb_boundary = unit.import("CommonAlbSecurityBoundaryId")?;
        let listener = unit.import("CommonAlbHttpListenerArn")?;
        let alb_dns = unit.import("CommonAlbDnsName")?;
        let alb_zone = unit.import("CommonAlbZoneId")?;

        let registry = unit.declare(
            "Registry",
            ResourceKind::ContainerRegistry,
            json!({ "name": "webapp", "empty_on_delete": true }),
        )?;
        let cluster = unit.declare(
            "Cluster",
            ResourceKind::ComputeCluster,
            json!({ "network": vpc.id() }),
        )?;
        let logs = unit.declare(
            "ServiceLogGroup",
            ResourceKind::LogGroup,
            json!({ "name": "/services/webapp", "retention_days": 7 }),
        )?;
        unit.declare(
            "RegistryPullPolicy",
            ResourceKind::AccessPolicy,
            json!({ "actions": ["registry:pull", "registry:auth"], "resources": ["*"] }),
        )?;
        let task = unit.declare(
            "TaskDefinition",
            ResourceKind::TaskDefinition,
            json!({
                "cpu": 256,
                "memory_mib": 512,
                "image": registry.id(),
                "log_group": logs.id(),
                "secrets": ["webapp/prod"],
            }),
        )?;
        unit.declare(
            "Service",
            ResourceKind::ContainerService,
            json!({
                "cluster": cluster.id(),
                "task": task.id(),
                "listener": listener.id(),
                "load_balancer": alb_arn.id(),
                "security_boundaries": [alb_boundary.id()],
                "port": 3000,
            }),
        )?;
        unit.declare(
            "DnsRecord",
            ResourceKind::DnsRecord,
            json!({
                "name": "app.example.com",
                "alias_target": alb_dns.id(),
                "alias_zone": alb_zone.id(),
            }),
        )?;
        unit.declare(
            "DeliveryPipeline",
            ResourceKind::Pipeline,
            json!({
                "source": registry.id(),
                "deploy_to": cluster.id(),
                "stages": ["source", "deploy"],
            }),
        )?;
        Ok(())
    })
    .depends_on(network_edge)
    .depends_on(alb_edge)
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Building deployment plan");

    let network = UnitName::new("CommonNetworkStack")?;
    let persistent = UnitName::new("CommonPersistentStack")?;
    let alb = UnitName::new("CommonAlbStack")?;
    let service = UnitName::new("AppServiceStack")?;

    let mut deployment = Deployment::new();
    deployment
        .add_unit(network_stack(&network))
        .add_unit(persistent_stack(&persistent, &network))
        .add_unit(alb_stack(&alb, &network))
        .add_unit(app_service_stack(&service, &network, &alb));

    let resolved = deployment.resolve()?;
    info!(
        "✅ Resolved {} units: {}",
        resolved.order().len(),
        resolved
            .order()
            .iter()
            .map(|u| u.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let mut engine = RecordingEngine::new();
    resolved.synthesize(&mut engine)?;

    info!("📋 Plan summary:");
    for unit in resolved.units() {
        info!(
            "  - {}: {} resources, {} exports",
            unit.name,
            unit.resources.len(),
            unit.exports.len()
        );
    }
    for declared in engine.declared() {
        info!(
            "  declare {} {}/{} -> {}",
            declared.kind, declared.unit, declared.logical_id, declared.physical_id
        );
    }
    for (name, handle) in engine.outputs() {
        info!("  export {} = {}", name, handle);
    }

    Ok(())
}
