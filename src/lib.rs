//! Cross-stack capability wiring for declarative infrastructure deployments
//!
//! Independently-deployed units declare resources, publish capabilities as
//! uniquely-named exports, and consume each other's capabilities by name.
//! The whole wiring (unresolved imports, duplicate exports, dependency
//! cycles) is validated in a single synchronous in-process pass before any
//! call reaches the external provisioning engine.

pub mod compose;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod registry;
pub mod unit;

// Re-export commonly used types
pub use compose::{Deployment, ResolvedDeployment};
pub use domain::{CapabilityHandle, ExportName, ResourceDeclaration, ResourceKind, UnitName};
pub use engine::{ProvisioningEngine, RecordingEngine};
pub use errors::{CompositionError, CompositionResult};
pub use registry::ExportRegistry;
pub use unit::{ConstructedUnit, UnitContext, UnitDefinition};
