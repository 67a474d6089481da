//! Integration tests for model listing.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{test_client, test_config};
use larder::error::ClientError;
use larder::types::{ModelInfo, Usage};

#[tokio::test]
async fn list_models_normalizes_pricing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": "openai/gpt-4o-mini",
                    "name": "GPT-4o mini",
                    "context_length": 128000,
                    "pricing": {"prompt": "0.00000015", "completion": "0.0000006"}
                },
                {
                    "id": "local/free",
                    "pricing": {"prompt": 0, "completion": 0}
                },
                {"id": "mystery/model"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let models = client.list_models().await.expect("models");

    assert_eq!(models.len(), 3);
    assert_eq!(
        models[0],
        ModelInfo {
            id: "openai/gpt-4o-mini".to_string(),
            name: "GPT-4o mini".to_string(),
            prompt_price: Some(0.000_000_15),
            completion_price: Some(0.000_000_6),
            context_length: Some(128_000),
        }
    );
    assert_eq!(models[1].name, "local/free");
    assert_eq!(models[1].prompt_price, Some(0.0));
    assert_eq!(models[2].prompt_price, None);

    let cost = models[0]
        .estimate_cost(&Usage {
            prompt_tokens: 1_000_000,
            completion_tokens: 0,
        })
        .expect("priced model");
    assert!((cost.total_cost - 0.15).abs() < 1e-9);
    assert!(models[2].estimate_cost(&Usage::default()).is_none());
}

#[tokio::test]
async fn list_models_classifies_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": {"message": "Not here"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let err = client.list_models().await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn list_models_reports_malformed_body_as_fetch_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_bytes(b"{not-json".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = test_client(test_config(&server));
    let err = client.list_models().await.unwrap_err();

    assert!(matches!(&err, ClientError::Api { status: None, .. }));
    assert_eq!(err.code(), "FETCH_MODELS_FAILED");
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn list_models_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, sleeper) = test_client(test_config(&server));
    let models = client.list_models().await.expect("second attempt succeeds");

    assert!(models.is_empty());
    assert_eq!(sleeper.waits().len(), 1);
}
