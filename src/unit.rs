// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployable Units
//!
//! A deployable unit is an independently-lifecycled group of resource
//! declarations: it is created once per deployment run, immutable after
//! construction, and torn down independently of other units. That
//! independent teardown is exactly why cross-unit references go through
//! named exports rather than direct object references.
//!
//! Construction is mediated by [`UnitContext`], the only surface a unit's
//! build closure sees. The context records resource declarations, publishes
//! exports, resolves imports against the registry, and hands out direct
//! outputs of same-run dependencies, all in memory with no external call.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::{
    CapabilityHandle, ExportName, ResourceDeclaration, ResourceKind, UnitName,
};
use crate::errors::{CompositionError, CompositionResult};
use crate::registry::ExportRegistry;

/// Build closure run exactly once when the unit is constructed
pub type BuildFn = Box<dyn FnOnce(&mut UnitContext<'_>) -> CompositionResult<()>>;

/// Definition of a deployable unit: name, declared dependencies, build closure
///
/// # Examples
///
/// ```rust
/// use stack_compose::domain::{ResourceKind, UnitName};
/// use stack_compose::unit::UnitDefinition;
/// use serde_json::json;
///
/// let network = UnitDefinition::new(
///     UnitName::new("CommonNetworkStack").unwrap(),
///     |unit| {
///         let vpc = unit.declare("Vpc", ResourceKind::Network, json!({"cidr": "172.16.0.0/16"}))?;
///         unit.export("NetId", vpc.clone())?;
///         unit.output("vpc", vpc)?;
///         Ok(())
///     },
/// );
/// assert_eq!(network.name().as_str(), "CommonNetworkStack");
/// ```
pub struct UnitDefinition {
    name: UnitName,
    depends_on: Vec<UnitName>,
    build: BuildFn,
}

impl UnitDefinition {
    /// Define a unit with its build closure
    pub fn new(
        name: UnitName,
        build: impl FnOnce(&mut UnitContext<'_>) -> CompositionResult<()> + 'static,
    ) -> Self {
        Self {
            name,
            depends_on: Vec::new(),
            build: Box::new(build),
        }
    }

    /// Declare a dependency on another unit (builder style)
    ///
    /// Declared edges drive construction ordering and gate access to the
    /// dependency's direct outputs.
    pub fn depends_on(mut self, dep: UnitName) -> Self {
        if !self.depends_on.contains(&dep) {
            self.depends_on.push(dep);
        }
        self
    }

    /// The unit's name
    pub fn name(&self) -> &UnitName {
        &self.name
    }

    /// Declared dependency edges
    pub fn dependencies(&self) -> &[UnitName] {
        &self.depends_on
    }

    pub(crate) fn into_parts(self) -> (UnitName, Vec<UnitName>, BuildFn) {
        (self.name, self.depends_on, self.build)
    }
}

impl std::fmt::Debug for UnitDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitDefinition")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// Immutable result of constructing one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructedUnit {
    /// Unit name
    pub name: UnitName,
    /// Resource declarations in declaration order
    pub resources: Vec<ResourceDeclaration>,
    /// Capabilities this unit published to the registry
    pub exports: BTreeMap<ExportName, CapabilityHandle>,
    /// Direct outputs available to same-run dependents
    pub outputs: BTreeMap<String, CapabilityHandle>,
}

/// Construction surface handed to a unit's build closure
///
/// Borrows the deployment's registry and the units constructed so far; the
/// composition root owns both and passes them down for the duration of one
/// build call.
pub struct UnitContext<'a> {
    name: &'a UnitName,
    depends_on: &'a [UnitName],
    registry: &'a mut ExportRegistry,
    constructed: &'a BTreeMap<UnitName, ConstructedUnit>,
    resources: Vec<ResourceDeclaration>,
    exports: BTreeMap<ExportName, CapabilityHandle>,
    outputs: BTreeMap<String, CapabilityHandle>,
    logical_ids: BTreeSet<String>,
}

impl<'a> UnitContext<'a> {
    pub(crate) fn new(
        name: &'a UnitName,
        depends_on: &'a [UnitName],
        registry: &'a mut ExportRegistry,
        constructed: &'a BTreeMap<UnitName, ConstructedUnit>,
    ) -> Self {
        Self {
            name,
            depends_on,
            registry,
            constructed,
            resources: Vec::new(),
            exports: BTreeMap::new(),
            outputs: BTreeMap::new(),
            logical_ids: BTreeSet::new(),
        }
    }

    /// The name of the unit under construction
    pub fn name(&self) -> &UnitName {
        self.name
    }

    /// Record a resource declaration and get back a placeholder handle
    ///
    /// No external call happens here. The handle's id is the deterministic
    /// `unit/logical_id` placeholder; the provisioning engine substitutes
    /// the physical identifier during synthesis.
    ///
    /// # Errors
    /// [`CompositionError::DuplicateResourceId`] if the logical id repeats
    /// within this unit.
    pub fn declare(
        &mut self,
        logical_id: impl Into<String>,
        kind: ResourceKind,
        config: serde_json::Value,
    ) -> CompositionResult<CapabilityHandle> {
        let logical_id = logical_id.into();

        if !self.logical_ids.insert(logical_id.clone()) {
            return Err(CompositionError::DuplicateResourceId {
                unit: self.name.clone(),
                logical_id,
            });
        }

        debug!(unit = %self.name, resource = %logical_id, kind = %kind, "Declared resource");

        let handle = CapabilityHandle::new(format!("{}/{}", self.name, logical_id));
        self.resources
            .push(ResourceDeclaration::new(logical_id, kind, config));
        Ok(handle)
    }

    /// Publish a capability under a deployment-unique export name
    ///
    /// # Errors
    /// - [`CompositionError::InvalidExportName`] for a malformed name
    /// - [`CompositionError::DuplicateExport`] if the name is taken
    pub fn export(
        &mut self,
        name: &str,
        handle: impl Into<CapabilityHandle>,
    ) -> CompositionResult<()> {
        let name = ExportName::new(name)?;
        let handle = handle.into();
        self.registry.publish(self.name, name.clone(), handle.clone())?;
        self.exports.insert(name, handle);
        Ok(())
    }

    /// Resolve another unit's export by name
    ///
    /// Returns a read-only clone; the publisher keeps ownership of the
    /// underlying resource.
    ///
    /// # Errors
    /// [`CompositionError::UnresolvedCapability`] if nothing has published
    /// the name by the time this unit is constructed.
    pub fn import(&self, name: &str) -> CompositionResult<CapabilityHandle> {
        let name = ExportName::new(name)?;
        match self.registry.get(&name) {
            Some(handle) => Ok(handle.clone()),
            None => Err(CompositionError::UnresolvedCapability {
                export: name,
                importer: self.name.clone(),
            }),
        }
    }

    /// Resolve an export and check it carries the attributes this unit needs
    ///
    /// # Errors
    /// [`CompositionError::ShapeMismatch`] naming the first missing
    /// attribute, in addition to the plain import errors.
    pub fn import_expecting(
        &self,
        name: &str,
        required_attrs: &[&str],
    ) -> CompositionResult<CapabilityHandle> {
        let handle = self.import(name)?;
        if let Some(missing) = handle.missing_attribute(required_attrs) {
            return Err(CompositionError::ShapeMismatch {
                export: ExportName::new(name)?,
                missing: missing.to_string(),
            });
        }
        Ok(handle)
    }

    /// Record a direct output for same-run dependents
    ///
    /// Outputs are not exports: they never reach the registry and are only
    /// visible to units that declared a dependency edge on this one.
    pub fn output(
        &mut self,
        key: impl Into<String>,
        handle: impl Into<CapabilityHandle>,
    ) -> CompositionResult<()> {
        let key = key.into();
        if self.outputs.contains_key(&key) {
            return Err(CompositionError::DuplicateOutput {
                unit: self.name.clone(),
                key,
            });
        }
        self.outputs.insert(key, handle.into());
        Ok(())
    }

    /// Read a direct output of a unit constructed earlier in this run
    ///
    /// # Errors
    /// - [`CompositionError::UndeclaredDependency`] if this unit did not
    ///   declare the edge
    /// - [`CompositionError::UnknownOutput`] if the dependency produced no
    ///   output under that key
    pub fn output_of(&self, unit: &UnitName, key: &str) -> CompositionResult<CapabilityHandle> {
        if !self.depends_on.contains(unit) {
            return Err(CompositionError::UndeclaredDependency {
                unit: self.name.clone(),
                dependency: unit.clone(),
            });
        }

        // Topological ordering guarantees declared dependencies are built.
        let constructed = self.constructed.get(unit).ok_or_else(|| {
            CompositionError::UnknownUnit {
                unit: unit.clone(),
                declared_by: self.name.clone(),
            }
        })?;

        match constructed.outputs.get(key) {
            Some(handle) => Ok(handle.clone()),
            None => Err(CompositionError::UnknownOutput {
                unit: unit.clone(),
                key: key.to_string(),
            }),
        }
    }

    pub(crate) fn finish(self) -> ConstructedUnit {
        ConstructedUnit {
            name: self.name.clone(),
            resources: self.resources,
            exports: self.exports,
            outputs: self.outputs,
        }
    }
}
