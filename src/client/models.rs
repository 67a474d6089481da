use tracing::debug;

use super::CompletionClient;
use crate::error::{ClientError, ErrorCode};
use crate::provider::wire::ModelsResponse;
use crate::provider::TransportRequest;
use crate::types::ModelInfo;
use crate::util::timeout::Deadline;

impl CompletionClient {
    /// List the provider's models with normalized pricing and context size.
    ///
    /// Non-OK responses surface as classified errors; anything else that goes
    /// wrong is reported as `FETCH_MODELS_FAILED`.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, ClientError> {
        let request = TransportRequest::get(self.config.endpoint("models"), self.headers.clone());
        let deadline = Deadline::after(self.config.operation_timeout);

        let response = match self.transport.execute(&request, deadline).await {
            Ok(response) => response,
            Err(e @ ClientError::Timeout { .. }) => return Err(e),
            Err(e) => return Err(fetch_models_failed(e)),
        };
        let response = response.error_for_status()?;

        let parsed: ModelsResponse =
            serde_json::from_str(&response.body).map_err(fetch_models_failed)?;
        let models: Vec<ModelInfo> = parsed.data.into_iter().map(ModelInfo::from).collect();

        debug!(count = models.len(), "Fetched provider models");
        Ok(models)
    }
}

fn fetch_models_failed(e: impl std::error::Error + Send + Sync + 'static) -> ClientError {
    ClientError::api_with_source(
        ErrorCode::FetchModelsFailed,
        format!("Failed to fetch models: {e}"),
        e,
    )
}
