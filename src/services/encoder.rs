//! Short-code encoding service
//!
//! Generates a random code, checks it against storage, and inserts the
//! mapping. Collisions are retried up to a fixed number of attempts.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{Result, SnaplinkError};
use crate::storage::{OwnerId, SetError, UrlMapping, UrlStorage};
use crate::utils::{DEFAULT_CODE_LENGTH, generate_random_code, keyspace_size};

/// 默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

#[derive(Debug, Clone)]
pub enum EncodeError {
    /// The long URL already has a code; carries the existing mapping.
    Conflict(UrlMapping),
    Failed(SnaplinkError),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Conflict(existing) => {
                write!(f, "URL already shortened as '{}'", existing.short)
            }
            EncodeError::Failed(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<SnaplinkError> for EncodeError {
    fn from(err: SnaplinkError) -> Self {
        EncodeError::Failed(err)
    }
}

#[derive(Clone)]
pub struct Encoder {
    storage: Arc<dyn UrlStorage>,
    code_length: usize,
    max_attempts: u32,
}

impl Encoder {
    pub fn new(storage: Arc<dyn UrlStorage>) -> Self {
        Self {
            storage,
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length.max(1);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn storage(&self) -> &Arc<dyn UrlStorage> {
        &self.storage
    }

    /// Shorten `long` on behalf of `owner` and return the new code.
    ///
    /// 空白 URL 返回 `Validation` 错误，其余内容原样存储。
    pub async fn encode(&self, owner: OwnerId, long: &str) -> std::result::Result<String, EncodeError> {
        if long.trim().is_empty() {
            return Err(EncodeError::Failed(SnaplinkError::validation(
                "URL must not be empty",
            )));
        }

        for attempt in 1..=self.max_attempts {
            let candidate = generate_random_code(self.code_length);

            if self.storage.get(&candidate).await.is_some() {
                debug!("Attempt {}: code {} already in use", attempt, candidate);
                continue;
            }

            match self.storage.set(owner, &candidate, long).await {
                Ok(()) => return Ok(candidate),
                Err(SetError::UniqueViolation(existing)) => {
                    return Err(EncodeError::Conflict(existing));
                }
                Err(SetError::CodeTaken(code)) => {
                    debug!("Attempt {}: code {} claimed concurrently", attempt, code);
                }
                Err(SetError::Other(e)) => return Err(EncodeError::Failed(e)),
            }
        }

        warn!(
            "Gave up after {} attempts (keyspace {} for length {})",
            self.max_attempts,
            keyspace_size(self.code_length),
            self.code_length
        );
        Err(EncodeError::Failed(SnaplinkError::keyspace_exhausted(format!(
            "No free short code found after {} attempts",
            self.max_attempts
        ))))
    }

    pub async fn decode(&self, short: &str) -> Option<String> {
        self.storage.get(short).await
    }

    pub async fn history(&self, owner: OwnerId) -> Result<HashMap<String, String>> {
        self.storage.get_history(owner).await
    }
}
