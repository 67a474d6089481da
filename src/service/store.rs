//! Collaborator seams for [`super::RecipeService`] plus in-memory implementations.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::types::UserPreferences;

/// Failures raised by preference stores and generation logs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Source of saved per-user preferences.
pub trait PreferenceStore: Send + Sync {
    fn preferences_for(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError>;
}

/// Sink for generation attempts, successful or not.
pub trait GenerationLog: Send + Sync {
    fn record(&self, attempt: GenerationAttempt) -> Result<(), StoreError>;
}

/// How a generation attempt ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptStatus {
    Succeeded { recipe: Value },
    Failed { code: String, message: String },
}

/// One recorded call to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationAttempt {
    pub id: Uuid,
    pub user_id: String,
    pub input: Value,
    pub outcome: AttemptStatus,
    pub created_at: DateTime<Utc>,
}

impl GenerationAttempt {
    pub fn new(user_id: impl Into<String>, input: Value, outcome: AttemptStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            input,
            outcome,
            created_at: Utc::now(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptStatus::Succeeded { .. })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    entries: RwLock<HashMap<String, UserPreferences>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        user_id: impl Into<String>,
        preferences: UserPreferences,
    ) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(user_id.into(), preferences);
        Ok(())
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn preferences_for(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(user_id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryGenerationLog {
    attempts: RwLock<Vec<GenerationAttempt>>,
}

impl InMemoryGenerationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded attempt, oldest first.
    pub fn attempts(&self) -> Vec<GenerationAttempt> {
        self.attempts
            .read()
            .map(|attempts| attempts.clone())
            .unwrap_or_default()
    }
}

impl GenerationLog for InMemoryGenerationLog {
    fn record(&self, attempt: GenerationAttempt) -> Result<(), StoreError> {
        self.attempts.write().map_err(|_| poisoned())?.push(attempt);
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}
