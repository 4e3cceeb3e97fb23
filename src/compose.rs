// Copyright (c) 2025 - Cowboy AI, Inc.
//! Composition Root
//!
//! [`Deployment`] owns the unit definitions and runs the single synchronous
//! resolution pass: duplicate checks, cycle detection, deterministic
//! ordering, then one build call per unit with imports and outputs resolved
//! eagerly. Any structural error aborts the whole pass: nothing partial
//! escapes, and no external call has been made by the time an error
//! surfaces.
//!
//! A successfully resolved deployment is immutable; [`ResolvedDeployment::synthesize`]
//! is the only path that hands the graph to the provisioning engine.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{CapabilityHandle, ExportName, UnitName};
use crate::engine::ProvisioningEngine;
use crate::errors::CompositionResult;
use crate::graph::DependencyGraph;
use crate::registry::ExportRegistry;
use crate::unit::{ConstructedUnit, UnitContext, UnitDefinition};

/// Composition root: collects unit definitions, resolves them in one pass
///
/// # Examples
///
/// ```rust
/// use stack_compose::compose::Deployment;
/// use stack_compose::domain::{CapabilityHandle, UnitName};
/// use stack_compose::unit::UnitDefinition;
///
/// let mut deployment = Deployment::new();
///
/// deployment.add_unit(UnitDefinition::new(
///     UnitName::new("Network").unwrap(),
///     |unit| unit.export("NetId", CapabilityHandle::new("vpc-1")),
/// ));
///
/// deployment.add_unit(
///     UnitDefinition::new(UnitName::new("Database").unwrap(), |unit| {
///         let net = unit.import("NetId")?;
///         assert_eq!(net.id(), "vpc-1");
///         Ok(())
///     })
///     .depends_on(UnitName::new("Network").unwrap()),
/// );
///
/// let resolved = deployment.resolve().unwrap();
/// assert_eq!(resolved.order().len(), 2);
/// ```
#[derive(Default)]
pub struct Deployment {
    units: Vec<UnitDefinition>,
    seeds: Vec<(ExportName, CapabilityHandle)>,
}

impl Deployment {
    /// Create an empty deployment
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit definition
    ///
    /// Definitions are collected in declaration order; name uniqueness and
    /// edge validity are checked when [`Deployment::resolve`] runs.
    pub fn add_unit(&mut self, unit: UnitDefinition) -> &mut Self {
        self.units.push(unit);
        self
    }

    /// Seed an export from a previous deployment's persisted state
    pub fn seed(&mut self, name: ExportName, handle: CapabilityHandle) -> &mut Self {
        self.seeds.push((name, handle));
        self
    }

    /// Seed exports by asking the engine's state store for known names
    ///
    /// Names the engine does not know are skipped; a unit importing one of
    /// those still fails resolution with an unresolved-capability error.
    /// Returns the number of entries seeded.
    pub fn seed_from(
        &mut self,
        engine: &impl ProvisioningEngine,
        names: &[ExportName],
    ) -> usize {
        let mut seeded = 0;
        for name in names {
            if let Some(handle) = engine.lookup(name) {
                self.seeds.push((name.clone(), handle));
                seeded += 1;
            }
        }
        seeded
    }

    /// Run the resolution pass
    ///
    /// 1. Build the dependency graph (duplicate units, unknown edges).
    /// 2. Detect cycles and fix the deterministic construction order.
    /// 3. Seed the registry, then run each build closure in order.
    ///
    /// The pass is pure: no call reaches the provisioning engine, and any
    /// error aborts before a [`ResolvedDeployment`] exists.
    pub fn resolve(self) -> CompositionResult<ResolvedDeployment> {
        let run_id = Uuid::now_v7();

        let edges: Vec<(UnitName, Vec<UnitName>)> = self
            .units
            .iter()
            .map(|u| (u.name().clone(), u.dependencies().to_vec()))
            .collect();

        let graph = DependencyGraph::build(&edges)?;
        let order = graph.topological_order()?;

        let mut registry = ExportRegistry::new();
        for (name, handle) in self.seeds {
            registry.seed(name, handle)?;
        }

        let mut builders: BTreeMap<UnitName, _> = self
            .units
            .into_iter()
            .map(|u| {
                let (name, deps, build) = u.into_parts();
                (name, (deps, build))
            })
            .collect();

        let mut constructed: BTreeMap<UnitName, ConstructedUnit> = BTreeMap::new();
        for name in &order {
            let (deps, build) = builders
                .remove(name)
                .expect("ordered unit missing from builder map");

            debug!(run_id = %run_id, unit = %name, "Constructing unit");

            let built = {
                let mut ctx = UnitContext::new(name, &deps, &mut registry, &constructed);
                build(&mut ctx)?;
                ctx.finish()
            };
            constructed.insert(name.clone(), built);
        }

        info!(
            run_id = %run_id,
            units = order.len(),
            exports = registry.len(),
            "Resolved deployment graph"
        );

        Ok(ResolvedDeployment {
            run_id,
            resolved_at: Utc::now(),
            order,
            units: constructed,
            registry,
        })
    }
}

/// A fully resolved deployment: immutable, statically valid, engine-ready
#[derive(Debug, Clone)]
pub struct ResolvedDeployment {
    run_id: Uuid,
    resolved_at: DateTime<Utc>,
    order: Vec<UnitName>,
    units: BTreeMap<UnitName, ConstructedUnit>,
    registry: ExportRegistry,
}

impl ResolvedDeployment {
    /// Identifier of this resolution run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the resolution pass completed
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    /// Construction order, dependencies first
    pub fn order(&self) -> &[UnitName] {
        &self.order
    }

    /// A constructed unit by name
    pub fn unit(&self, name: &UnitName) -> Option<&ConstructedUnit> {
        self.units.get(name)
    }

    /// Constructed units in construction order
    pub fn units(&self) -> impl Iterator<Item = &ConstructedUnit> {
        self.order.iter().filter_map(|name| self.units.get(name))
    }

    /// The final export registry
    pub fn registry(&self) -> &ExportRegistry {
        &self.registry
    }

    /// Hand the resolved graph to the provisioning engine
    ///
    /// Declares every resource in construction order, then records every
    /// export. Engine failures surface as
    /// [`crate::errors::CompositionError::Engine`] and are not retried here;
    /// retry policy belongs to the engine.
    pub fn synthesize<E: ProvisioningEngine>(&self, engine: &mut E) -> CompositionResult<()> {
        for unit in self.units() {
            for resource in &unit.resources {
                let physical = engine.declare(&unit.name, resource)?;
                debug!(
                    unit = %unit.name,
                    resource = %resource.logical_id,
                    physical = %physical,
                    "Declared resource with engine"
                );
            }
            for (name, handle) in &unit.exports {
                engine.output(name, handle)?;
            }
        }

        info!(run_id = %self.run_id, "Synthesized deployment");
        Ok(())
    }
}
