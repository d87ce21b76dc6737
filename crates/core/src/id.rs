//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a food record.
///
/// Also the key under which the record's photo is stored, so it must stay
/// stable for the lifetime of the record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodId(Uuid);

impl FoodId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FoodId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for FoodId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for FoodId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<FoodId> for Uuid {
    fn from(value: FoodId) -> Self {
        value.0
    }
}

impl FromStr for FoodId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid =
            Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("FoodId: {e}")))?;
        Ok(Self(uuid))
    }
}
