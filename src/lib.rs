//! Larder: a resilient LLM completion client for recipe generation.
//!
//! Builds recipe prompts from ingredients and dietary preferences, asks an
//! OpenAI-compatible chat-completions provider for schema-constrained JSON,
//! and retries transient failures (network errors, 5xx, and 429 with a
//! `Retry-After` hint) inside an overall deadline.
//!
//! # Quick Start
//!
//! ```no_run
//! use larder::prelude::*;
//!
//! # async fn example() -> larder::error::Result<()> {
//! let client = CompletionClient::from_env()?;
//! let input = GenerateRecipeInput::builder()
//!     .user_id("user-1")
//!     .ingredients(vec!["chickpeas".into(), "spinach".into(), "rice".into()])
//!     .build();
//! let recipe = client.generate_recipe(&input).await?;
//! println!("{}", recipe.title);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod prelude;
pub mod prompt;
pub mod provider;
pub mod service;
pub mod suggest;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
