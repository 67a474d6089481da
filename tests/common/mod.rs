//! Shared test helpers: a recording sleeper and clients pointed at wiremock.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use wiremock::MockServer;

use larder::client::CompletionClient;
use larder::config::ClientConfig;
use larder::types::GenerateRecipeInput;
use larder::util::retry::Sleeper;

pub const TEST_KEY: &str = "test-key";

/// Records requested waits instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(TEST_KEY)
        .with_base_url(server.uri())
        .with_default_model("test/model")
}

/// Client against `server` whose retries are recorded, not slept.
pub fn test_client(config: ClientConfig) -> (CompletionClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CompletionClient::new(config)
        .expect("client")
        .with_sleeper(sleeper.clone());
    (client, sleeper)
}

pub fn recipe_json() -> Value {
    json!({
        "title": "Chickpea Spinach Pilaf",
        "summary": "A fragrant one-pot rice dish.",
        "ingredients": "- 200 g rice\n- 1 can chickpeas\n- 100 g spinach",
        "preparation": "1. Toast the rice.\n2. Add chickpeas and stock.\n3. Fold in spinach.",
        "nutrition": {
            "calories": 520.0,
            "protein": 18.5,
            "carbohydrates": 88.0,
            "fat": 9.0
        }
    })
}

/// Chat-completions body whose first choice carries `content`.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "gen-1",
        "model": "test/model",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 120, "completion_tokens": 240, "total_tokens": 360}
    })
}

pub fn recipe_input(ingredients: &[&str]) -> GenerateRecipeInput {
    GenerateRecipeInput::builder()
        .user_id("user-1")
        .ingredients(ingredients.iter().map(|s| s.to_string()).collect())
        .build()
}
