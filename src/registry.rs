// Copyright (c) 2025 - Cowboy AI, Inc.
//! Named Export Registry
//!
//! Deployment-wide mapping from export name to published capability. One
//! writer per name: publishing a name twice is a structural error, whether
//! the first writer was a unit in this run or an entry seeded from a prior
//! deployment's state store. Readers only ever receive clones; the
//! publishing unit keeps exclusive write ownership of the underlying
//! resource.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::domain::{CapabilityHandle, ExportName, UnitName};
use crate::errors::{CompositionError, CompositionResult};

/// Where a registry entry came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportSource {
    /// Published by a unit constructed in this run
    Unit(UnitName),
    /// Seeded from a previous deployment's persisted state
    PriorDeployment,
}

impl fmt::Display for ExportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(unit) => write!(f, "unit '{}'", unit),
            Self::PriorDeployment => write!(f, "prior deployment state"),
        }
    }
}

/// A published export: provenance plus the capability value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Who published the value
    pub source: ExportSource,
    /// The published capability
    pub handle: CapabilityHandle,
}

/// Deployment-wide export name → capability mapping
///
/// # Examples
///
/// ```rust
/// use stack_compose::domain::{CapabilityHandle, ExportName, UnitName};
/// use stack_compose::registry::ExportRegistry;
///
/// let mut registry = ExportRegistry::new();
/// let unit = UnitName::new("CommonNetworkStack").unwrap();
/// let name = ExportName::new("NetId").unwrap();
///
/// registry.publish(&unit, name.clone(), CapabilityHandle::new("vpc-1")).unwrap();
/// assert_eq!(registry.get(&name).unwrap().id(), "vpc-1");
///
/// // Second publish of the same name fails
/// assert!(registry.publish(&unit, name, CapabilityHandle::new("vpc-2")).is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRegistry {
    exports: BTreeMap<ExportName, ExportEntry>,
}

impl ExportRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a capability under a deployment-unique name
    ///
    /// # Invariants
    /// - Export names are unique across the deployment, seeded entries
    ///   included
    pub fn publish(
        &mut self,
        publisher: &UnitName,
        name: ExportName,
        handle: CapabilityHandle,
    ) -> CompositionResult<()> {
        if let Some(existing) = self.exports.get(&name) {
            return Err(CompositionError::DuplicateExport {
                export: name,
                first: existing.source.clone(),
                second: publisher.clone(),
            });
        }

        debug!(export = %name, publisher = %publisher, value = %handle, "Published export");

        self.exports.insert(
            name,
            ExportEntry {
                source: ExportSource::Unit(publisher.clone()),
                handle,
            },
        );
        Ok(())
    }

    /// Seed an entry from a previous deployment's persisted state
    ///
    /// Seeding happens before any unit runs, so a collision always reports
    /// the seeded entry as the earlier publisher.
    pub fn seed(&mut self, name: ExportName, handle: CapabilityHandle) -> CompositionResult<()> {
        if self.exports.contains_key(&name) {
            // Seeding the same name twice has no meaningful first unit;
            // surface the prior entry's provenance as-is.
            let existing = &self.exports[&name];
            return Err(CompositionError::DuplicateSeed {
                export: name.clone(),
                first: existing.source.clone(),
            });
        }

        debug!(export = %name, value = %handle, "Seeded export from prior deployment state");

        self.exports.insert(
            name,
            ExportEntry {
                source: ExportSource::PriorDeployment,
                handle,
            },
        );
        Ok(())
    }

    /// Look up a published capability (read-only projection)
    pub fn get(&self, name: &ExportName) -> Option<&CapabilityHandle> {
        self.exports.get(name).map(|entry| &entry.handle)
    }

    /// Look up the full entry, provenance included
    pub fn entry(&self, name: &ExportName) -> Option<&ExportEntry> {
        self.exports.get(name)
    }

    /// Whether a name has been published
    pub fn contains(&self, name: &ExportName) -> bool {
        self.exports.contains_key(name)
    }

    /// Number of published exports
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&ExportName, &ExportEntry)> {
        self.exports.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CompositionError;

    fn unit(name: &str) -> UnitName {
        UnitName::new(name).unwrap()
    }

    fn export(name: &str) -> ExportName {
        ExportName::new(name).unwrap()
    }

    #[test]
    fn test_publish_and_lookup() {
        let mut registry = ExportRegistry::new();
        registry
            .publish(
                &unit("CommonNetworkStack"),
                export("NetId"),
                CapabilityHandle::new("vpc-1"),
            )
            .unwrap();

        assert_eq!(registry.get(&export("NetId")).unwrap().id(), "vpc-1");
        assert!(registry.get(&export("Missing")).is_none());
    }

    #[test]
    fn test_duplicate_export_names_both_publishers() {
        let mut registry = ExportRegistry::new();
        registry
            .publish(
                &unit("AlbStackA"),
                export("AlbArn"),
                CapabilityHandle::new("arn:alb/a"),
            )
            .unwrap();

        let err = registry
            .publish(
                &unit("AlbStackB"),
                export("AlbArn"),
                CapabilityHandle::new("arn:alb/b"),
            )
            .unwrap_err();

        match err {
            CompositionError::DuplicateExport {
                export: name,
                first,
                second,
            } => {
                assert_eq!(name.as_str(), "AlbArn");
                assert_eq!(first, ExportSource::Unit(unit("AlbStackA")));
                assert_eq!(second, unit("AlbStackB"));
            }
            other => panic!("expected DuplicateExport, got {:?}", other),
        }

        // First value wins; nothing was overwritten.
        assert_eq!(registry.get(&export("AlbArn")).unwrap().id(), "arn:alb/a");
    }

    #[test]
    fn test_seeded_entry_blocks_republish() {
        let mut registry = ExportRegistry::new();
        registry
            .seed(export("NetId"), CapabilityHandle::new("vpc-old"))
            .unwrap();

        let err = registry
            .publish(
                &unit("CommonNetworkStack"),
                export("NetId"),
                CapabilityHandle::new("vpc-new"),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            CompositionError::DuplicateExport {
                first: ExportSource::PriorDeployment,
                ..
            }
        ));
    }

    #[test]
    fn test_seed_twice_fails() {
        let mut registry = ExportRegistry::new();
        registry
            .seed(export("NetId"), CapabilityHandle::new("vpc-1"))
            .unwrap();
        assert!(registry
            .seed(export("NetId"), CapabilityHandle::new("vpc-2"))
            .is_err());
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut registry = ExportRegistry::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            registry
                .publish(&unit("U"), export(name), CapabilityHandle::new(name))
                .unwrap();
        }
        let names: Vec<_> = registry.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }
}
