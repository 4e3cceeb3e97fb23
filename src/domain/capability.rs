// Copyright (c) 2025 - Cowboy AI, Inc.
//! Capability Handle Value Object
//!
//! A capability handle is the opaque reference a resource hands back once
//! declared: a primary identifier (network id, ARN, DNS name) plus named
//! attributes (segment ids, hosted-zone id, security-boundary id). The unit
//! that declared the resource owns the handle; every other unit only ever
//! sees read-only clones obtained through the export registry or through a
//! same-run output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque reference to a declared resource
///
/// # Examples
///
/// ```rust
/// use stack_compose::domain::CapabilityHandle;
///
/// let vpc = CapabilityHandle::new("vpc-1")
///     .with_attribute("cidr", "172.16.0.0/16")
///     .with_attribute("public-segment", "subnet-a");
///
/// assert_eq!(vpc.id(), "vpc-1");
/// assert_eq!(vpc.attribute("cidr"), Some("172.16.0.0/16"));
/// assert_eq!(vpc.attribute("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityHandle {
    /// Primary identifier of the underlying resource
    id: String,

    /// Named attributes, ordered for deterministic serialization
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

impl CapabilityHandle {
    /// Create a handle from a primary identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a named attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get the primary identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get a named attribute, if present
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Check whether a named attribute is present
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// All named attributes
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Derive a handle that refers to one named attribute of this resource
    ///
    /// Used when a single attribute of a resource (a DNS name, a listener
    /// ARN) is published as its own export before the engine has
    /// materialized the value. The engine substitutes the real value during
    /// synthesis.
    pub fn attribute_ref(&self, key: &str) -> CapabilityHandle {
        CapabilityHandle::new(format!("{}#{}", self.id, key))
    }

    /// First attribute key a shape requirement would miss, if any
    pub fn missing_attribute<'a>(&self, required: &[&'a str]) -> Option<&'a str> {
        required.iter().find(|key| !self.has_attribute(key)).copied()
    }
}

impl fmt::Display for CapabilityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for CapabilityHandle {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CapabilityHandle {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
