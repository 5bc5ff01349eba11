use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SnaplinkError;

/// Opaque per-visitor identifier used to partition history.
///
/// The nil UUID ([`OwnerId::ANONYMOUS`]) means "do not record history".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    pub const ANONYMOUS: OwnerId = OwnerId(Uuid::nil());

    /// A fresh random identity.
    pub fn generate() -> Self {
        OwnerId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        OwnerId(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for OwnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(OwnerId)
    }
}

/// A stored `short → long` mapping together with the identity that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub owner: OwnerId,
    pub short: String,
    pub long: String,
}

impl UrlMapping {
    pub fn new(owner: OwnerId, short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            owner,
            short: short.into(),
            long: long.into(),
        }
    }
}

/// Why a [`UrlStorage::set`](super::UrlStorage::set) did not insert anything.
#[derive(Debug, Clone)]
pub enum SetError {
    /// The long URL is already stored; carries the existing mapping.
    UniqueViolation(UrlMapping),
    /// The short code was claimed by another writer.
    CodeTaken(String),
    Other(SnaplinkError),
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetError::UniqueViolation(existing) => write!(
                f,
                "long URL '{}' is already shortened as '{}'",
                existing.long, existing.short
            ),
            SetError::CodeTaken(code) => write!(f, "short code '{}' is already taken", code),
            SetError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SetError {}

impl From<SnaplinkError> for SetError {
    fn from(err: SnaplinkError) -> Self {
        SetError::Other(err)
    }
}
