// Copyright (c) 2025 - Cowboy AI, Inc.
//! Export Name Value Object with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Export name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportNameError {
    #[error("Export name is empty")]
    Empty,

    #[error("Export name exceeds maximum length of 255 characters: {0}")]
    TooLong(usize),

    #[error("Export name must start with an alphanumeric character: {0}")]
    InvalidStart(String),

    #[error("Invalid character in export name: {0}")]
    InvalidCharacter(char),
}

/// Deployment-wide export key value object
///
/// Keys a capability published by one unit for consumption by others.
/// Uniqueness across the deployment is enforced by the export registry,
/// not here.
///
/// Invariants:
/// - Non-empty, ≤ 255 characters
/// - ASCII alphanumeric, hyphens and colons only
/// - Must start with an alphanumeric character
///
/// # Examples
///
/// ```rust
/// use stack_compose::domain::ExportName;
///
/// let name = ExportName::new("CommonAlbArn").unwrap();
/// assert_eq!(name.as_str(), "CommonAlbArn");
///
/// let scoped = ExportName::new("prod:CommonAlbArn").unwrap();
/// assert_eq!(scoped.as_str(), "prod:CommonAlbArn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportName(String);

impl ExportName {
    /// Maximum length for an export name
    pub const MAX_LENGTH: usize = 255;

    /// Create a new export name with validation
    ///
    /// # Invariants
    /// - Non-empty
    /// - Length ≤ 255 characters
    /// - ASCII alphanumeric, hyphens and colons
    /// - Starts with an alphanumeric character
    pub fn new(name: impl Into<String>) -> Result<Self, ExportNameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ExportNameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(ExportNameError::TooLong(name.len()));
        }

        let first = name.chars().next().unwrap_or(':');
        if !first.is_ascii_alphanumeric() {
            return Err(ExportNameError::InvalidStart(name));
        }

        for ch in name.chars() {
            if !ch.is_ascii_alphanumeric() && ch != '-' && ch != ':' {
                return Err(ExportNameError::InvalidCharacter(ch));
            }
        }

        Ok(Self(name))
    }

    /// Get the export name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ExportName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExportName {
    type Error = ExportNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ExportName {
    type Error = ExportNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
