// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Engine Boundary
//!
//! The composition layer consumes exactly three operations from the
//! external provisioning engine: `declare` a resource and get a physical
//! handle back, record an `output` under its export name, and `lookup` a
//! name in the engine's persisted state store. Apply, diff, drift detection
//! and rollback all live on the far side of this trait and are never
//! modeled here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::{CapabilityHandle, ExportName, ResourceDeclaration, ResourceKind, UnitName};
use crate::errors::CompositionResult;

/// External provisioning engine contract
///
/// Implementations may be asynchronous internally; this layer only ever
/// hands them a fully-resolved graph, one synchronous call at a time.
/// Engine failures surface as [`crate::errors::CompositionError::Engine`]
/// and retry policy stays on the engine side.
pub trait ProvisioningEngine {
    /// Declare a resource; returns the engine's physical handle for it
    fn declare(
        &mut self,
        unit: &UnitName,
        resource: &ResourceDeclaration,
    ) -> CompositionResult<CapabilityHandle>;

    /// Record an exported capability under its deployment-unique name
    fn output(&mut self, name: &ExportName, handle: &CapabilityHandle) -> CompositionResult<()>;

    /// Look up a name in the engine's persisted state store
    fn lookup(&self, name: &ExportName) -> Option<CapabilityHandle>;
}

/// One resource declaration as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredResource {
    /// Unit that declared the resource
    pub unit: UnitName,
    /// Unit-local logical id
    pub logical_id: String,
    /// Resource kind
    pub kind: ResourceKind,
    /// Synthetic physical id assigned by the engine
    pub physical_id: String,
}

/// In-memory engine for tests and plan previews
///
/// Records every declaration and output, assigns synthetic physical ids,
/// and answers lookups from a seedable state map. Stands in for the real
/// engine wherever no infrastructure should actually change.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    declared: Vec<DeclaredResource>,
    outputs: BTreeMap<ExportName, CapabilityHandle>,
    state: BTreeMap<ExportName, CapabilityHandle>,
    sequence: u64,
}

impl RecordingEngine {
    /// Create an empty recording engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the engine's state store (prior deployment outputs)
    pub fn with_state(mut self, name: ExportName, handle: CapabilityHandle) -> Self {
        self.state.insert(name, handle);
        self
    }

    /// Everything declared so far, in declaration order
    pub fn declared(&self) -> &[DeclaredResource] {
        &self.declared
    }

    /// Everything exported so far
    pub fn outputs(&self) -> &BTreeMap<ExportName, CapabilityHandle> {
        &self.outputs
    }
}

impl ProvisioningEngine for RecordingEngine {
    fn declare(
        &mut self,
        unit: &UnitName,
        resource: &ResourceDeclaration,
    ) -> CompositionResult<CapabilityHandle> {
        self.sequence += 1;
        let physical_id = format!(
            "{}-{:04}",
            resource.kind.as_str().replace('_', "-"),
            self.sequence
        );

        debug!(unit = %unit, resource = %resource.logical_id, physical = %physical_id, "Recorded declaration");

        self.declared.push(DeclaredResource {
            unit: unit.clone(),
            logical_id: resource.logical_id.clone(),
            kind: resource.kind,
            physical_id: physical_id.clone(),
        });

        Ok(CapabilityHandle::new(physical_id))
    }

    fn output(&mut self, name: &ExportName, handle: &CapabilityHandle) -> CompositionResult<()> {
        self.outputs.insert(name.clone(), handle.clone());
        Ok(())
    }

    fn lookup(&self, name: &ExportName) -> Option<CapabilityHandle> {
        self.state.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unit(s: &str) -> UnitName {
        UnitName::new(s).unwrap()
    }

    fn export(s: &str) -> ExportName {
        ExportName::new(s).unwrap()
    }

    #[test]
    fn test_declare_assigns_sequential_physical_ids() {
        let mut engine = RecordingEngine::new();
        let network = unit("Network");

        let first = engine
            .declare(
                &network,
                &ResourceDeclaration::new("Vpc", ResourceKind::Network, json!({})),
            )
            .unwrap();
        let second = engine
            .declare(
                &network,
                &ResourceDeclaration::new("Public", ResourceKind::NetworkSegment, json!({})),
            )
            .unwrap();

        assert_eq!(first.id(), "network-0001");
        assert_eq!(second.id(), "network-segment-0002");
        assert_eq!(engine.declared().len(), 2);
    }

    #[test]
    fn test_lookup_answers_from_seeded_state() {
        let engine = RecordingEngine::new()
            .with_state(export("NetId"), CapabilityHandle::new("vpc-prior"));

        assert_eq!(engine.lookup(&export("NetId")).unwrap().id(), "vpc-prior");
        assert!(engine.lookup(&export("Missing")).is_none());
    }

    #[test]
    fn test_outputs_are_recorded() {
        let mut engine = RecordingEngine::new();
        engine
            .output(&export("AlbArn"), &CapabilityHandle::new("arn:alb/common"))
            .unwrap();
        assert_eq!(
            engine.outputs().get(&export("AlbArn")).unwrap().id(),
            "arn:alb/common"
        );
    }
}
