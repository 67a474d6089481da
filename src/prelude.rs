//! Convenience re-exports for common use.

pub use crate::client::CompletionClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, ErrorCode, Result};
pub use crate::generation::{MockRecipeGenerator, RecipeGenerator};
pub use crate::service::{GenerationFailure, RecipeService, ServiceError};
pub use crate::suggest::generate_suggestions;
pub use crate::types::{
    ChatMessage, ChatOptions, ChatResponse, DietType, GenerateRecipeInput, ModelInfo,
    ModelParams, RecipeOutput, Role, Usage, UserPreferences,
};
