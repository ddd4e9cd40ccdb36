use crate::{
    config::GeminiConfig,
    error::{IsoscapeError, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

/// What the image model handed back for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentOutput {
    pub image_base64: Option<String>,
    pub text: Option<String>,
}

#[async_trait]
pub trait ImageAgent: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> Result<AgentOutput>;
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Deserialize)]
struct GeminiInlineData {
    data: String,
}

pub struct GeminiImageAgent {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiImageAgent {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| IsoscapeError::ConfigError("GEMINI_API_KEY is required".into()))?;

        Ok(Self {
            client: Client::new(),
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn persist(&self, image_base64: &str) {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let path = PathBuf::from(format!("generated_image_{}.png", Uuid::new_v4()));
        let written = match STANDARD.decode(image_base64) {
            Ok(bytes) => tokio::fs::write(&path, bytes).await.map_err(IsoscapeError::from),
            Err(e) => Err(IsoscapeError::from(e)),
        };
        match written {
            Ok(()) => log::info!("💾 Saved generated image to {}", path.display()),
            Err(e) => log::warn!("Could not save generated image: {}", e),
        }
    }
}

#[async_trait]
impl ImageAgent for GeminiImageAgent {
    async fn generate_content(&self, prompt: &str) -> Result<AgentOutput> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "responseModalities": ["TEXT", "IMAGE"]
            }
        });

        log::info!("Invoking Gemini model: {}", self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| IsoscapeError::RequestError(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Gemini answered {}: {}", status, error_text);
            return Err(IsoscapeError::ResponseError(format!(
                "Gemini returned {}: {}",
                status, error_text
            )));
        }

        let gemini: GeminiResponse = response
            .json()
            .await
            .map_err(|e| IsoscapeError::ResponseError(e.to_string()))?;

        let candidate = gemini
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| IsoscapeError::ResponseError("Empty response from Gemini.".into()))?;

        let mut output = AgentOutput::default();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(inline) = part.inline_data {
                output.image_base64 = Some(inline.data);
            }
            if let Some(text) = part.text.filter(|t| !t.trim().is_empty()) {
                output.text.get_or_insert(text);
            }
        }

        if self.config.save_images {
            if let Some(image) = &output.image_base64 {
                self.persist(image).await;
            }
        }

        Ok(output)
    }
}
