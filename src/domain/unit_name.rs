// Copyright (c) 2025 - Cowboy AI, Inc.
//! Unit Name Value Object with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unit name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitNameError {
    #[error("Unit name is empty")]
    Empty,

    #[error("Unit name exceeds maximum length of 128 characters: {0}")]
    TooLong(usize),

    #[error("Unit name must start with a letter: {0}")]
    InvalidStart(String),

    #[error("Invalid character in unit name: {0}")]
    InvalidCharacter(char),
}

/// Deployable unit (stack) name value object
///
/// Names an independently-deployed group of resource declarations.
/// Invariants:
/// - Non-empty, ≤ 128 characters
/// - ASCII alphanumeric and hyphens only
/// - Must start with a letter
///
/// # Examples
///
/// ```rust
/// use stack_compose::domain::UnitName;
///
/// let name = UnitName::new("CommonNetworkStack").unwrap();
/// assert_eq!(name.as_str(), "CommonNetworkStack");
///
/// assert!(UnitName::new("").is_err());
/// assert!(UnitName::new("1stStack").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitName(String);

impl UnitName {
    /// Maximum length for a unit name
    pub const MAX_LENGTH: usize = 128;

    /// Create a new unit name with validation
    ///
    /// # Invariants
    /// - Non-empty
    /// - Length ≤ 128 characters
    /// - ASCII alphanumeric and hyphens
    /// - Starts with a letter
    pub fn new(name: impl Into<String>) -> Result<Self, UnitNameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(UnitNameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(UnitNameError::TooLong(name.len()));
        }

        // Invariant: must start with a letter
        let first = name.chars().next().unwrap_or('-');
        if !first.is_ascii_alphabetic() {
            return Err(UnitNameError::InvalidStart(name));
        }

        for ch in name.chars() {
            if !ch.is_ascii_alphanumeric() && ch != '-' {
                return Err(UnitNameError::InvalidCharacter(ch));
            }
        }

        Ok(Self(name))
    }

    /// Get the unit name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UnitName {
    type Error = UnitNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UnitName {
    type Error = UnitNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
