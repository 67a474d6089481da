//! Offline recipe generator for tests, demos, and the CLI's `--mock` flag.
//!
//! Never used as a fallback for [`crate::client::CompletionClient`]; callers
//! opt in explicitly.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::recipe::{validate_recipe_input, RecipeGenerator};
use crate::error::ClientError;
use crate::types::{GenerateRecipeInput, Nutrition, RecipeOutput};

type ErrorFactory = Arc<dyn Fn() -> ClientError + Send + Sync>;

/// Deterministic [`RecipeGenerator`] that never touches the network.
#[derive(Default)]
pub struct MockRecipeGenerator {
    failure: Option<ErrorFactory>,
    calls: AtomicUsize,
}

impl fmt::Debug for MockRecipeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRecipeGenerator")
            .field("fails", &self.failure.is_some())
            .field("calls", &self.calls.load(Ordering::SeqCst))
            .finish()
    }
}

impl MockRecipeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose every valid call fails with the error `make_error` builds.
    pub fn failing(make_error: impl Fn() -> ClientError + Send + Sync + 'static) -> Self {
        Self {
            failure: Some(Arc::new(make_error)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls that passed input validation.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeGenerator for MockRecipeGenerator {
    async fn generate_recipe(&self, input: &GenerateRecipeInput) -> Result<RecipeOutput, ClientError> {
        validate_recipe_input(input)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(make_error) = &self.failure {
            return Err(make_error());
        }
        Ok(fixture_recipe(&input.ingredients))
    }
}

fn fixture_recipe(ingredients: &[String]) -> RecipeOutput {
    let names: Vec<&str> = ingredients.iter().map(|s| s.trim()).collect();
    let count = names.len() as f64;

    RecipeOutput {
        title: format!("Simple {} skillet", names.join(" & ")),
        summary: format!(
            "A quick one-pan dish built from {} ingredient(s) you already have.",
            names.len()
        ),
        ingredients: names
            .iter()
            .map(|name| format!("- 100 g {name}"))
            .collect::<Vec<_>>()
            .join("\n"),
        preparation: names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. Add the {name} to the pan and cook for 3 minutes.", i + 1))
            .chain(std::iter::once(format!(
                "{}. Season to taste and serve warm.",
                names.len() + 1
            )))
            .collect::<Vec<_>>()
            .join("\n"),
        nutrition: Nutrition {
            calories: 150.0 + 80.0 * count,
            protein: 4.0 * count,
            carbohydrates: 9.0 * count,
            fat: 3.0 * count,
        },
    }
}
