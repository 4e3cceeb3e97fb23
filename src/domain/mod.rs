// Copyright (c) 2025 - Cowboy AI, Inc.
//! Composition Domain Models
//!
//! Core domain concepts for multi-stack composition: validated names for
//! units and exports, opaque capability handles, and the resource taxonomy
//! units declare against the provisioning engine.
//!
//! # Value Objects with Invariants
//!
//! - [`UnitName`] - deployable unit (stack) names
//! - [`ExportName`] - deployment-wide export keys
//! - [`CapabilityHandle`] - identifier/attributes tuple for a declared resource
//! - [`ResourceKind`] - provider-neutral resource taxonomy
//!
//! # Leaf Configuration
//!
//! - [`ResourceDeclaration`] - opaque engine-facing resource config

pub mod capability;
pub mod export_name;
pub mod resource;
pub mod unit_name;

// Re-export value objects
pub use capability::CapabilityHandle;
pub use export_name::{ExportName, ExportNameError};
pub use resource::{ResourceCategory, ResourceDeclaration, ResourceKind};
pub use unit_name::{UnitName, UnitNameError};
