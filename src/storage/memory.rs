//! In-process storage backend
//!
//! 所有映射都保存在内存中，进程退出即丢失。

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{OwnerId, SetError, UrlMapping, UrlStorage};
use crate::errors::Result;

/// Lookup tables shared by the memory and file backends.
///
/// Keeps three views in sync: short code to mapping, long URL to short
/// code, and per-owner history.
#[derive(Debug, Default)]
pub struct MappingIndex {
    by_short: HashMap<String, UrlMapping>,
    by_long: HashMap<String, String>,
    history: HashMap<OwnerId, HashMap<String, String>>,
}

impl MappingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, short: &str) -> Option<&UrlMapping> {
        self.by_short.get(short)
    }

    /// Existing mapping for a long URL, if any.
    pub fn find_by_long(&self, long: &str) -> Option<&UrlMapping> {
        self.by_long.get(long).and_then(|short| self.by_short.get(short))
    }

    /// Check that `mapping` could be inserted without touching the index.
    pub fn check(&self, mapping: &UrlMapping) -> std::result::Result<(), SetError> {
        if let Some(existing) = self.find_by_long(&mapping.long) {
            return Err(SetError::UniqueViolation(existing.clone()));
        }
        if self.by_short.contains_key(&mapping.short) {
            return Err(SetError::CodeTaken(mapping.short.clone()));
        }
        Ok(())
    }

    /// Insert `mapping`, rejecting duplicate long URLs and taken short codes.
    pub fn insert(&mut self, mapping: UrlMapping) -> std::result::Result<(), SetError> {
        self.check(&mapping)?;

        if !mapping.owner.is_anonymous() {
            self.history
                .entry(mapping.owner)
                .or_default()
                .insert(mapping.short.clone(), mapping.long.clone());
        }
        self.by_long.insert(mapping.long.clone(), mapping.short.clone());
        self.by_short.insert(mapping.short.clone(), mapping);
        Ok(())
    }

    pub fn history(&self, owner: OwnerId) -> HashMap<String, String> {
        if owner.is_anonymous() {
            return HashMap::new();
        }
        self.history.get(&owner).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_short.is_empty()
    }
}

/// Volatile storage backed by a [`MappingIndex`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    index: RwLock<MappingIndex>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    pub(crate) fn index(&self) -> &RwLock<MappingIndex> {
        &self.index
    }
}

#[async_trait]
impl UrlStorage for MemoryStorage {
    async fn get(&self, short: &str) -> Option<String> {
        self.index.read().get(short).map(|m| m.long.clone())
    }

    async fn set(&self, owner: OwnerId, short: &str, long: &str) -> std::result::Result<(), SetError> {
        self.index.write().insert(UrlMapping::new(owner, short, long))
    }

    async fn get_history(&self, owner: OwnerId) -> Result<HashMap<String, String>> {
        Ok(self.index.read().history(owner))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
