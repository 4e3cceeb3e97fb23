// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Declaration Domain Model
//!
//! Defines the taxonomy of leaf resources a deployable unit can declare and
//! the opaque configuration attached to each. The provisioning engine owns
//! the semantics of each kind; this layer treats the configuration as an
//! opaque value and never validates provider-specific properties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad grouping of resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    /// Networks, segments, boundaries, traffic routing
    Network,
    /// Clusters, services, task definitions, instances
    Compute,
    /// Databases and secrets
    Persistence,
    /// Registries, pipelines, build projects
    Delivery,
    /// DNS zones, records, certificates
    Naming,
    /// Policies and log groups
    Operations,
}

/// Taxonomy of declarable infrastructure resources
///
/// Provider-neutral vocabulary for the leaf configuration a unit hands to
/// the provisioning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    // Network
    /// Virtual network
    Network,
    /// Addressable segment of a network (subnet)
    NetworkSegment,
    /// Ingress/egress rule set (security group)
    SecurityBoundary,
    /// Traffic-distributing load balancer
    LoadBalancer,
    /// Load balancer listener
    Listener,

    // Compute
    /// Container cluster
    ComputeCluster,
    /// Long-running container service
    ContainerService,
    /// Container task definition
    TaskDefinition,
    /// Standalone gateway/bastion instance
    GatewayInstance,

    // Persistence
    /// Managed relational database
    Database,
    /// Managed secret
    Secret,

    // Delivery
    /// Container image registry
    ContainerRegistry,
    /// Continuous-delivery pipeline
    Pipeline,
    /// Build project invoked by a pipeline
    BuildProject,

    // Naming
    /// DNS hosted zone
    DnsZone,
    /// DNS record
    DnsRecord,
    /// TLS certificate
    Certificate,

    // Operations
    /// Access policy attached to a role or task
    AccessPolicy,
    /// Log group
    LogGroup,

    /// Other/uncategorized resource
    Other,
}

impl ResourceKind {
    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::NetworkSegment => "network_segment",
            Self::SecurityBoundary => "security_boundary",
            Self::LoadBalancer => "load_balancer",
            Self::Listener => "listener",
            Self::ComputeCluster => "compute_cluster",
            Self::ContainerService => "container_service",
            Self::TaskDefinition => "task_definition",
            Self::GatewayInstance => "gateway_instance",
            Self::Database => "database",
            Self::Secret => "secret",
            Self::ContainerRegistry => "container_registry",
            Self::Pipeline => "pipeline",
            Self::BuildProject => "build_project",
            Self::DnsZone => "dns_zone",
            Self::DnsRecord => "dns_record",
            Self::Certificate => "certificate",
            Self::AccessPolicy => "access_policy",
            Self::LogGroup => "log_group",
            Self::Other => "other",
        }
    }

    /// Get the broad category this kind belongs to
    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::Network
            | Self::NetworkSegment
            | Self::SecurityBoundary
            | Self::LoadBalancer
            | Self::Listener => ResourceCategory::Network,
            Self::ComputeCluster
            | Self::ContainerService
            | Self::TaskDefinition
            | Self::GatewayInstance => ResourceCategory::Compute,
            Self::Database | Self::Secret => ResourceCategory::Persistence,
            Self::ContainerRegistry | Self::Pipeline | Self::BuildProject => {
                ResourceCategory::Delivery
            }
            Self::DnsZone | Self::DnsRecord | Self::Certificate => ResourceCategory::Naming,
            Self::AccessPolicy | Self::LogGroup | Self::Other => ResourceCategory::Operations,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque leaf resource declaration
///
/// Pairs a unit-local logical id and a [`ResourceKind`] with the structured
/// configuration the provisioning engine consumes. The configuration is
/// never inspected by the composition layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    /// Unit-local logical id, unique within the declaring unit
    pub logical_id: String,

    /// Kind of resource being declared
    pub kind: ResourceKind,

    /// Opaque engine-facing configuration
    pub config: serde_json::Value,
}

impl ResourceDeclaration {
    /// Create a new resource declaration
    pub fn new(logical_id: impl Into<String>, kind: ResourceKind, config: serde_json::Value) -> Self {
        Self {
            logical_id: logical_id.into(),
            kind,
            config,
        }
    }
}
