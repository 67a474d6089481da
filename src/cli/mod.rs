//! CLI entry point for larder.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Larder recipe CLI
#[derive(Parser, Debug)]
#[command(name = "larder", version, about = "Generate recipes from what is in your pantry")]
pub struct Cli {
    /// TOML config file; defaults to OPENROUTER_* environment variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a recipe from ingredients
    Generate(GenerateArgs),
    /// Send a single chat prompt
    Chat(ChatArgs),
    /// List available models
    Models,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// User the recipe is generated for
    #[arg(short, long, default_value = "cli")]
    pub user: String,

    /// Ingredient on hand (repeatable)
    #[arg(short, long = "ingredient", required = true)]
    pub ingredients: Vec<String>,

    /// Diet (omnivore, vegetarian, vegan, keto, ...)
    #[arg(short, long)]
    pub diet: Option<String>,

    /// Allergens to avoid, free text
    #[arg(long)]
    pub allergens: Option<String>,

    /// Preferred cuisines, free text
    #[arg(long)]
    pub cuisines: Option<String>,

    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    /// Use the offline generator instead of the provider
    #[arg(long)]
    pub mock: bool,
}

/// Arguments for the `chat` subcommand.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Max tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// User prompt
    pub prompt: String,
}
