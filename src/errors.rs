//! Error types for stack composition

use thiserror::Error;

use crate::domain::{ExportName, ExportNameError, UnitName, UnitNameError};
use crate::registry::ExportSource;

/// Errors that can occur while building and resolving a deployment graph
///
/// All variants except [`CompositionError::Engine`] are structural errors:
/// they are detected entirely in-process, before any call reaches the
/// provisioning engine, and none of them is retryable.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// An import names an export that no unit has published
    #[error("Unresolved capability: unit '{importer}' imports '{export}' but no unit exports it")]
    UnresolvedCapability {
        export: ExportName,
        importer: UnitName,
    },

    /// Two publishers registered the same export name
    #[error("Duplicate export '{export}': already published by {first}, republished by unit '{second}'")]
    DuplicateExport {
        export: ExportName,
        first: ExportSource,
        second: UnitName,
    },

    /// The same export name was seeded twice from prior state
    #[error("Duplicate seed for export '{export}': already present from {first}")]
    DuplicateSeed {
        export: ExportName,
        first: ExportSource,
    },

    /// The declared unit dependency graph contains a cycle
    #[error("Cyclic dependency among units: {}", .cycle.iter().map(|u| u.as_str()).collect::<Vec<_>>().join(" -> "))]
    CyclicDependency { cycle: Vec<UnitName> },

    /// Two units were added under the same name
    #[error("Duplicate unit name: '{0}'")]
    DuplicateUnit(UnitName),

    /// A dependency edge points at a unit that was never added
    #[error("Unit '{declared_by}' depends on unknown unit '{unit}'")]
    UnknownUnit {
        unit: UnitName,
        declared_by: UnitName,
    },

    /// A unit read a same-run output without declaring the dependency edge
    #[error("Unit '{unit}' reads output of '{dependency}' without declaring it in depends_on")]
    UndeclaredDependency {
        unit: UnitName,
        dependency: UnitName,
    },

    /// A unit asked for a direct output key its dependency never produced
    #[error("Unit '{unit}' has no output named '{key}'")]
    UnknownOutput { unit: UnitName, key: String },

    /// A unit recorded the same direct output key twice
    #[error("Unit '{unit}' already produced an output named '{key}'")]
    DuplicateOutput { unit: UnitName, key: String },

    /// A unit declared two resources under the same logical id
    #[error("Unit '{unit}' already declared a resource with logical id '{logical_id}'")]
    DuplicateResourceId { unit: UnitName, logical_id: String },

    /// An imported capability is missing an attribute the importer requires
    #[error("Capability '{export}' does not match expected shape: missing attribute '{missing}'")]
    ShapeMismatch { export: ExportName, missing: String },

    /// Unit name failed validation
    #[error("Invalid unit name: {0}")]
    InvalidUnitName(#[from] UnitNameError),

    /// Export name failed validation
    #[error("Invalid export name: {0}")]
    InvalidExportName(#[from] ExportNameError),

    /// Error surfaced by the external provisioning engine during synthesis
    #[error("Provisioning engine error: {0}")]
    Engine(String),
}

/// Result type for composition operations
pub type CompositionResult<T> = Result<T, CompositionError>;
