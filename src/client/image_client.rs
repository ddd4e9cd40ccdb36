use crate::{
    client::ImageApi,
    config::ClientConfig,
    error::{IsoscapeError, Result},
    models::{ErrorBody, GenerationEnvelope, GenerationRequest, GenerationResult},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Talks to `POST {api_base_url}/generate-image`.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: String,
}

impl ImageClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| IsoscapeError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.generate_image_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn error_for_status(status: StatusCode, body: &str) -> IsoscapeError {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message());

        match detail {
            Some(detail) => IsoscapeError::RequestError(detail),
            None => IsoscapeError::RequestError(format!(
                "Request failed with status code {}",
                status.as_u16()
            )),
        }
    }
}

#[async_trait]
impl ImageApi for ImageClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        log::info!("Requesting isometric illustration from {}", self.endpoint);
        log::debug!("Prompt length: {} characters", request.prompt.chars().count());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image request failed before a response arrived: {}", e);
                IsoscapeError::RequestError(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IsoscapeError::RequestError(e.to_string()))?;

        if !status.is_success() {
            let error = Self::error_for_status(status, &body);
            log::warn!("Image service answered {}: {}", status, error.user_message());
            return Err(error);
        }

        let envelope: GenerationEnvelope = serde_json::from_str(&body).map_err(|e| {
            IsoscapeError::ResponseError(format!("Unexpected response from image service: {}", e))
        })?;

        log::info!(
            "Received image payload ({} base64 characters)",
            envelope.data.image_base64.len()
        );

        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ImageClient {
        ImageClient::new(&ClientConfig::new().with_api_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_posts_prompt_and_reads_nested_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-image"))
            .and(body_json(json!({ "prompt": "draw Recife" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": { "image_base64": "abc123", "text": "A city" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.generate(GenerationRequest::new("draw Recife")).await.unwrap();

        assert_eq!(result.image_base64, "abc123");
        assert_eq!(result.text.as_deref(), Some("A city"));
    }

    #[tokio::test]
    async fn test_structured_detail_is_preferred() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-image"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "detail": "rate limited" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .generate(GenerationRequest::new("x"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "rate limited");
    }

    #[tokio::test]
    async fn test_status_without_detail_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .generate(GenerationRequest::new("x"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Request failed with status code 502");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "text": "no image" } })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .generate(GenerationRequest::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, IsoscapeError::ResponseError(_)));
        assert!(err.user_message().starts_with("Unexpected response from image service"));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Nothing listens on port 9 of localhost in the test environment.
        let config = ClientConfig::new().with_api_base_url("http://127.0.0.1:9");
        let err = ImageClient::new(&config)
            .unwrap()
            .generate(GenerationRequest::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, IsoscapeError::RequestError(_)));
        assert!(!err.user_message().is_empty());
    }
}
