use super::image::GenerationResult;
use serde::Serialize;

/// Everything a view needs to draw the generator form. Lives as long as its controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiState {
    /// Raw text of the city input.
    pub city: String,
    /// Trimmed city of the cycle in flight or last completed.
    pub current_city: String,
    pub is_loading: bool,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
    pub progress: f64,
    pub estimated_remaining_secs: u64,
    /// Progress-timer ticks applied over the controller's lifetime.
    pub ticks: u64,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading
    }

    pub fn show_progress(&self) -> bool {
        self.is_loading
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.clamp(0.0, 100.0).round() as u8
    }
}
