use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub image_base64: String, // Base64 encoded PNG
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerationResult {
    pub fn new(image_base64: impl Into<String>) -> Self {
        Self {
            image_base64: image_base64.into(),
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Caption worth showing, if any.
    pub fn caption(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Body returned by `POST /generate-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationEnvelope {
    #[serde(default = "default_status")]
    pub status: String,
    pub data: GenerationResult,
}

impl GenerationEnvelope {
    pub fn success(data: GenerationResult) -> Self {
        Self {
            status: default_status(),
            data,
        }
    }
}

fn default_status() -> String {
    "success".to_string()
}
