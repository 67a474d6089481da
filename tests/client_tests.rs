//! Integration tests for `CompletionClient` against a mock provider.

mod common;

use std::time::Duration;

use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{completion_body, recipe_input, recipe_json, test_client, test_config};
use larder::client::CompletionClient;
use larder::config::ClientConfig;
use larder::error::ClientError;
use larder::types::{ChatMessage, ChatOptions, DietType, ModelParams, UserPreferences};

fn recipe_reply() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(completion_body(&recipe_json().to_string()))
}

#[tokio::test]
async fn generate_recipe_happy_path_sends_structured_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("x-title", "larder"))
        .and(body_partial_json(json!({
            "model": "test/model",
            "temperature": 0.7,
            "max_tokens": 1500,
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "recipe", "strict": true}
            }
        })))
        .respond_with(recipe_reply())
        .expect(1)
        .mount(&server)
        .await;

    let (client, sleeper) = test_client(test_config(&server));
    let recipe = client
        .generate_recipe(&recipe_input(&["chickpeas", "spinach", "rice"]))
        .await
        .expect("recipe should generate");

    assert_eq!(recipe.title, "Chickpea Spinach Pilaf");
    assert_eq!(recipe.nutrition.protein, 18.5);
    assert!(sleeper.waits().is_empty());
}

#[tokio::test]
async fn generate_recipe_prompt_carries_ingredients_and_preferences() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(recipe_reply())
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let mut input = recipe_input(&["tofu", "bok choy"]);
    input.preferences = Some(
        UserPreferences::builder()
            .diet_type(DietType::Vegan)
            .allergens("peanuts")
            .build(),
    );
    input.model = Some("other/model".to_string());
    client.generate_recipe(&input).await.expect("recipe");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    assert_eq!(body["model"], "other/model");
    let system = body["messages"][0]["content"].as_str().unwrap();
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(system.contains("vegan"));
    assert!(system.contains("peanuts"));
    assert!(user.contains("tofu"));
    assert!(user.contains("bok choy"));
}

#[tokio::test]
async fn generate_recipe_rejects_bad_ingredient_counts_without_calling_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(recipe_reply())
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));

    let err = client.generate_recipe(&recipe_input(&[])).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));

    let many: Vec<String> = (0..21).map(|i| format!("item {i}")).collect();
    let many: Vec<&str> = many.iter().map(String::as_str).collect();
    let err = client.generate_recipe(&recipe_input(&many)).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
}

#[tokio::test]
async fn rate_limit_is_retried_with_retry_after_hint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "2")
                .set_body_json(json!({"error": {"message": "Rate limit exceeded"}})),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(recipe_reply())
        .expect(1)
        .mount(&server)
        .await;

    let (client, sleeper) = test_client(test_config(&server));
    let recipe = client
        .generate_recipe(&recipe_input(&["chickpeas", "rice"]))
        .await
        .expect("third attempt should succeed");

    assert_eq!(recipe.title, "Chickpea Spinach Pilaf");
    assert_eq!(
        sleeper.waits(),
        vec![Duration::from_secs(2), Duration::from_secs(2)]
    );
}

#[tokio::test]
async fn exhausted_rate_limit_surfaces_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "7")
                .set_body_json(json!({"error": {"message": "Too many requests", "code": 429}})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let err = client
        .generate_recipe(&recipe_input(&["egg"]))
        .await
        .unwrap_err();

    match err {
        ClientError::RateLimit {
            retry_after_seconds,
            message,
            provider_code,
        } => {
            assert_eq!(retry_after_seconds, 7);
            assert_eq!(message, "Too many requests");
            assert_eq!(provider_code.as_deref(), Some("429"));
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_exhaust_retries_as_service_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(3)
        .mount(&server)
        .await;

    let (client, sleeper) = test_client(test_config(&server).with_max_retries(3));
    let err = client
        .generate_recipe(&recipe_input(&["egg"]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.code(), "SERVICE_UNAVAILABLE");
    assert_eq!(
        sleeper.waits(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "No auth credentials found"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, sleeper) = test_client(test_config(&server));
    let err = client
        .generate_recipe(&recipe_input(&["egg"]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.code(), "UNAUTHORIZED");
    assert!(err.to_string().contains("No auth credentials found"));
    assert!(sleeper.waits().is_empty());
}

#[tokio::test]
async fn unknown_client_error_keeps_provider_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({"error": {"message": "context too long", "code": "context_length_exceeded"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let err = client
        .generate_recipe(&recipe_input(&["egg"]))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.code(), "context_length_exceeded");
}

#[tokio::test]
async fn non_json_content_is_a_validation_error_naming_the_schema() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("Sure! Here is a lovely recipe for you.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let err = client
        .generate_recipe(&recipe_input(&["egg"]))
        .await
        .unwrap_err();

    match err {
        ClientError::Validation { message, details } => {
            assert!(message.contains("\"recipe\""));
            assert_eq!(details.unwrap()["schema"], "recipe");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn fenced_recipe_json_is_accepted() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", recipe_json());

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&fenced)))
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let recipe = client
        .generate_recipe(&recipe_input(&["chickpeas"]))
        .await
        .expect("fenced json should parse");
    assert_eq!(recipe.summary, "A fragrant one-pot rice dish.");
}

#[tokio::test]
async fn empty_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let err = client
        .chat_completion(&[ChatMessage::user("hi")], ChatOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "EMPTY_RESPONSE");
}

#[tokio::test]
async fn deadline_stops_retrying_before_budget_is_exceeded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server)
        .with_max_retries(5)
        .with_operation_timeout(Duration::from_millis(1500));
    let (client, sleeper) = test_client(config);
    let err = client
        .generate_recipe(&recipe_input(&["egg"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Timeout { .. }));
    assert_eq!(err.code(), "TIMEOUT");
    assert!(sleeper.waits().is_empty());
}

#[tokio::test]
async fn network_failures_are_retried_then_reported() {
    let config = ClientConfig::new("test-key")
        .with_base_url("http://127.0.0.1:1")
        .with_max_retries(2);
    let (client, sleeper) = test_client(config);

    let err = client
        .chat_completion(&[ChatMessage::user("hi")], ChatOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "NETWORK_ERROR");
    assert_eq!(err.status(), None);
    assert!(err.is_retryable());
    assert_eq!(sleeper.waits(), vec![Duration::from_secs(2)]);
}

#[tokio::test]
async fn chat_completion_applies_defaults_and_returns_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "test/model",
            "temperature": 0.7,
            "max_tokens": 1000,
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Name a herb."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Basil")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let response = client
        .chat_completion(
            &[ChatMessage::system("Be brief."), ChatMessage::user("Name a herb.")],
            ChatOptions::default(),
        )
        .await
        .expect("chat should succeed");

    assert_eq!(response.content, "Basil");
    assert!(response.structured.is_none());
    let usage = response.usage.expect("usage");
    assert_eq!(usage.total_tokens(), 360);
    assert_eq!(response.model.as_deref(), Some("test/model"));
}

#[tokio::test]
async fn chat_completion_honors_explicit_params() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "model": "custom/model",
            "temperature": 0.1,
            "max_tokens": 64,
            "top_p": 0.9
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let options = ChatOptions::builder()
        .model("custom/model")
        .params(
            ModelParams::builder()
                .temperature(0.1)
                .max_tokens(64)
                .top_p(0.9)
                .build(),
        )
        .build();
    client
        .chat_completion(&[ChatMessage::user("hi")], options)
        .await
        .expect("chat should succeed");
}

#[tokio::test]
async fn chat_completion_rejects_invalid_messages_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let err = client
        .chat_completion(&[ChatMessage::user("   ")], ChatOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));

    let options = ChatOptions::builder()
        .params(ModelParams::builder().temperature(3.5).build())
        .build();
    let err = client
        .chat_completion(&[ChatMessage::user("hi")], options)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
}

#[tokio::test]
async fn construction_fails_without_api_key() {
    let err = CompletionClient::new(ClientConfig::new("  ")).unwrap_err();
    assert!(matches!(err, ClientError::Configuration(_)));
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(recipe_reply())
        .expect(5)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let inputs: Vec<_> = (0..5)
        .map(|i| recipe_input(&["rice", if i % 2 == 0 { "egg" } else { "tofu" }]))
        .collect();
    let results = join_all(inputs.iter().map(|input| client.generate_recipe(input))).await;

    assert!(results.iter().all(Result::is_ok));
}
