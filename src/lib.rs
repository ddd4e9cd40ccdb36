//! IsoScape: isometric city illustrations from a city name.
//!
//! The client side is a [`RequestController`] that sends one templated prompt to the image
//! API while a cosmetic [`ProgressEstimator`] animates the wait. The optional `server`
//! feature adds the HTTP relay that fronts the Gemini image model.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod logger;
pub mod models;
pub mod progress;
pub mod prompt;
#[cfg(feature = "server")]
pub mod server;
pub mod views;

pub use client::{ImageApi, ImageClient};
pub use config::{ClientConfig, GeminiConfig, ServerConfig};
pub use controller::{RequestController, EMPTY_CITY_MESSAGE};
pub use error::{IsoscapeError, Result};
pub use models::{GenerationRequest, GenerationResult, UiState};
pub use progress::ProgressEstimator;
pub use prompt::PromptTemplate;
pub use views::{MountedView, Route, Router};
