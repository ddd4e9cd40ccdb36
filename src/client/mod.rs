pub mod image_client;

use crate::{
    error::Result,
    models::{GenerationRequest, GenerationResult},
};
use async_trait::async_trait;

pub use image_client::ImageClient;

/// The endpoint seam. The controller only knows this trait, so views can point it at the
/// HTTP relay, and tests at an in-memory stub.
#[async_trait]
pub trait ImageApi: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult>;
}
