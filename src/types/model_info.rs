//! Normalized provider model listing.

use serde::{Deserialize, Serialize};

use super::usage::{Cost, Usage};

/// A model offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    /// USD per prompt token.
    pub prompt_price: Option<f64>,
    /// USD per completion token.
    pub completion_price: Option<f64>,
    pub context_length: Option<u64>,
}

impl ModelInfo {
    /// Estimate the cost of `usage` on this model, when pricing is known.
    pub fn estimate_cost(&self, usage: &Usage) -> Option<Cost> {
        Some(Cost::from_usage(
            usage,
            self.prompt_price?,
            self.completion_price?,
        ))
    }
}
