//! Token usage and cost tracking types.

use serde::{Deserialize, Serialize};

/// Token usage for a completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// Estimated cost for a completion.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Cost {
    pub prompt_cost: f64,
    pub completion_cost: f64,
    pub total_cost: f64,
    pub currency: String,
}

impl Cost {
    /// Compute cost from usage and per-token USD pricing.
    pub fn from_usage(usage: &Usage, prompt_price: f64, completion_price: f64) -> Self {
        let prompt_cost = usage.prompt_tokens as f64 * prompt_price;
        let completion_cost = usage.completion_tokens as f64 * completion_price;
        Self {
            prompt_cost,
            completion_cost,
            total_cost: prompt_cost + completion_cost,
            currency: "USD".to_string(),
        }
    }
}
