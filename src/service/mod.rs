//! Recipe service: preferences lookup, generation, attempt logging, and
//! suggestions on failure.

pub mod store;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::generation::RecipeGenerator;
use crate::suggest::generate_suggestions;
use crate::types::{GenerateRecipeInput, RecipeOutput};

pub use store::{
    AttemptStatus, GenerationAttempt, GenerationLog, InMemoryGenerationLog,
    InMemoryPreferenceStore, PreferenceStore, StoreError,
};

/// A failed generation together with hints for the user.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct GenerationFailure {
    #[source]
    pub error: ClientError,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to load preferences: {0}")]
    Preferences(#[from] StoreError),
    #[error(transparent)]
    Generation(#[from] GenerationFailure),
}

impl ServiceError {
    /// Suggestions attached to a failed generation; empty otherwise.
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Generation(failure) => &failure.suggestions,
            Self::Preferences(_) => &[],
        }
    }
}

/// Wraps a [`RecipeGenerator`] with saved preferences and an attempt log.
pub struct RecipeService<G> {
    generator: G,
    preferences: Arc<dyn PreferenceStore>,
    log: Arc<dyn GenerationLog>,
}

impl<G: RecipeGenerator> RecipeService<G> {
    pub fn new(
        generator: G,
        preferences: Arc<dyn PreferenceStore>,
        log: Arc<dyn GenerationLog>,
    ) -> Self {
        Self {
            generator,
            preferences,
            log,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate a recipe for `input`.
    ///
    /// Saved preferences fill in when the input carries none. Every attempt
    /// is logged; a logging failure is reported but does not fail the call.
    pub async fn generate(
        &self,
        mut input: GenerateRecipeInput,
    ) -> Result<RecipeOutput, ServiceError> {
        if input.preferences.is_none() {
            input.preferences = self.preferences.preferences_for(&input.user_id)?;
        }

        let result = self.generator.generate_recipe(&input).await;

        let outcome = match &result {
            Ok(recipe) => AttemptStatus::Succeeded {
                recipe: loggable(recipe, "recipe"),
            },
            Err(error) => AttemptStatus::Failed {
                code: error.code().to_string(),
                message: error.to_string(),
            },
        };
        let attempt = GenerationAttempt::new(
            input.user_id.clone(),
            loggable(&input, "input"),
            outcome,
        );
        if let Err(error) = self.log.record(attempt) {
            warn!(user_id = %input.user_id, error = %error, "Failed to record generation attempt");
        }

        match result {
            Ok(recipe) => {
                info!(user_id = %input.user_id, title = %recipe.title, "Recipe generated");
                Ok(recipe)
            }
            Err(error) => {
                warn!(
                    user_id = %input.user_id,
                    code = error.code(),
                    error = %error,
                    "Recipe generation failed"
                );
                let suggestions =
                    generate_suggestions(&input.ingredients, input.preferences.as_ref());
                Err(GenerationFailure { error, suggestions }.into())
            }
        }
    }
}

/// `value` as JSON for the attempt log; a value that cannot be serialized is
/// reported and logged as null.
fn loggable<T: Serialize>(value: &T, field: &'static str) -> serde_json::Value {
    match serde_json::to_value(value).map_err(StoreError::from) {
        Ok(json) => json,
        Err(error) => {
            warn!(field, error = %error, "Failed to serialize generation attempt field");
            serde_json::Value::Null
        }
    }
}
