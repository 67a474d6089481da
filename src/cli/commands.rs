//! Command handlers for the larder CLI.

use std::path::Path;
use std::sync::Arc;

use crate::client::CompletionClient;
use crate::config::ClientConfig;
use crate::generation::{MockRecipeGenerator, RecipeGenerator};
use crate::service::{InMemoryGenerationLog, InMemoryPreferenceStore, RecipeService, ServiceError};
use crate::types::{
    ChatMessage, ChatOptions, DietType, GenerateRecipeInput, ModelParams, RecipeOutput,
    UserPreferences,
};

use super::{ChatArgs, GenerateArgs};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load_client(config_path: Option<&Path>) -> Result<CompletionClient, Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };
    Ok(CompletionClient::new(config)?)
}

/// Build the generation input from CLI flags.
pub fn recipe_input(args: &GenerateArgs) -> GenerateRecipeInput {
    let has_preferences = args.diet.is_some() || args.allergens.is_some() || args.cuisines.is_some();
    let preferences = has_preferences.then(|| UserPreferences {
        diet_type: args.diet.as_deref().and_then(DietType::parse_label),
        allergens: args.allergens.clone(),
        cuisines: args.cuisines.clone(),
        ..Default::default()
    });

    GenerateRecipeInput {
        user_id: args.user.clone(),
        ingredients: args.ingredients.clone(),
        preferences,
        model: args.model.clone(),
        params: None,
    }
}

pub async fn handle_generate(args: GenerateArgs, config_path: Option<&Path>) -> CliResult {
    let input = recipe_input(&args);
    if args.mock {
        run_generation(MockRecipeGenerator::new(), input).await
    } else {
        run_generation(load_client(config_path)?, input).await
    }
}

async fn run_generation<G: RecipeGenerator>(generator: G, input: GenerateRecipeInput) -> CliResult {
    let service = RecipeService::new(
        generator,
        Arc::new(InMemoryPreferenceStore::new()),
        Arc::new(InMemoryGenerationLog::new()),
    );

    match service.generate(input).await {
        Ok(recipe) => {
            print_recipe(&recipe);
            Ok(())
        }
        Err(err) => {
            if let ServiceError::Generation(failure) = &err {
                eprintln!("Suggestions:");
                for suggestion in &failure.suggestions {
                    eprintln!("  - {suggestion}");
                }
            }
            Err(err.into())
        }
    }
}

fn print_recipe(recipe: &RecipeOutput) {
    println!("# {}\n", recipe.title);
    println!("{}\n", recipe.summary);
    println!("## Ingredients\n{}\n", recipe.ingredients);
    println!("## Preparation\n{}\n", recipe.preparation);
    let n = &recipe.nutrition;
    println!(
        "Nutrition per serving: {:.0} kcal, {:.1} g protein, {:.1} g carbohydrates, {:.1} g fat",
        n.calories, n.protein, n.carbohydrates, n.fat
    );
}

pub async fn handle_chat(args: ChatArgs, config_path: Option<&Path>) -> CliResult {
    let client = load_client(config_path)?;

    let mut messages = Vec::new();
    if let Some(system) = args.system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(args.prompt));

    let params = ModelParams {
        temperature: args.temperature,
        max_tokens: args.max_tokens,
        top_p: None,
    };
    let options = ChatOptions {
        model: args.model,
        params: Some(params),
        response_format: None,
    };

    let response = client.chat_completion(&messages, options).await?;
    println!("{}", response.content);
    if let Some(usage) = response.usage {
        eprintln!(
            "[{} prompt + {} completion tokens]",
            usage.prompt_tokens, usage.completion_tokens
        );
    }
    Ok(())
}

pub async fn handle_models(config_path: Option<&Path>) -> CliResult {
    let client = load_client(config_path)?;
    let models = client.list_models().await?;
    for model in models {
        let pricing = match (model.prompt_price, model.completion_price) {
            (Some(prompt), Some(completion)) => format!(
                "${:.2}/${:.2} per 1M tokens",
                prompt * 1_000_000.0,
                completion * 1_000_000.0
            ),
            _ => "pricing unknown".to_string(),
        };
        let context = model
            .context_length
            .map(|c| format!("{c} ctx"))
            .unwrap_or_default();
        println!("{:<48} {pricing:<32} {context}", model.id);
    }
    Ok(())
}
