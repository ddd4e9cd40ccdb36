//! Request lifecycle for one generator form.
//!
//! A controller owns the form's [`UiState`] and runs at most one generation at a time. While a
//! request is outstanding it also runs the progress ticker, which lives inside the `submit`
//! future itself: whichever way `submit` ends (response, error, or the caller dropping it) the
//! ticker goes away with it.

use crate::{
    client::ImageApi,
    config::ClientConfig,
    error::{IsoscapeError, Result},
    logger,
    models::{GenerationRequest, GenerationResult, UiState},
    progress::ProgressEstimator,
    prompt::PromptTemplate,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

pub const EMPTY_CITY_MESSAGE: &str = "Informe o nome de uma cidade.";

pub struct RequestController {
    api: Arc<dyn ImageApi>,
    template: PromptTemplate,
    estimator: ProgressEstimator,
    tick_interval: Duration,
    state: watch::Sender<UiState>,
}

impl RequestController {
    pub fn new(api: Arc<dyn ImageApi>, template: PromptTemplate) -> Self {
        let (state, _) = watch::channel(UiState::new());
        let defaults = ClientConfig::default();
        Self {
            api,
            template,
            estimator: defaults.estimator,
            tick_interval: defaults.tick_interval,
            state,
        }
    }

    pub fn from_config(api: Arc<dyn ImageApi>, template: PromptTemplate, config: &ClientConfig) -> Self {
        Self::new(api, template)
            .with_estimator(config.estimator)
            .with_tick_interval(config.tick_interval)
    }

    pub fn with_estimator(mut self, estimator: ProgressEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.tick_interval = interval;
        }
        self
    }

    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn set_city(&self, city: impl Into<String>) {
        let city = city.into();
        self.state.send_modify(|state| state.city = city);
    }

    /// Runs one generation cycle for `city`.
    ///
    /// Blank input is rejected locally with [`EMPTY_CITY_MESSAGE`] and never reaches the
    /// network. A call made while another cycle is loading is refused without touching state.
    pub async fn submit(&self, city: &str) -> Result<GenerationResult> {
        if self.state.borrow().is_loading {
            log::warn!("Ignoring submit for '{}': a request is already loading", city.trim());
            return Err(IsoscapeError::RequestInFlight);
        }

        let clean_city = city.trim().to_string();
        if clean_city.is_empty() {
            self.state.send_modify(|state| {
                state.city = city.to_string();
                state.error = Some(EMPTY_CITY_MESSAGE.to_string());
            });
            return Err(IsoscapeError::ValidationError(EMPTY_CITY_MESSAGE.to_string()));
        }

        let guard = match CycleGuard::begin(&self.state, city, &clean_city, &self.estimator) {
            Some(guard) => guard,
            None => return Err(IsoscapeError::RequestInFlight),
        };

        let request_id = Uuid::new_v4();
        log::info!("[req:{}] Generating illustration for '{}'", request_id, clean_city);
        let _timer = logger::timer(&format!("generate-image {}", request_id));

        let request = GenerationRequest::new(self.template.render(&clean_city));
        let outcome = {
            let call = self.api.generate(request);
            let ticker = self.tick_progress(Instant::now());
            tokio::pin!(call);
            tokio::pin!(ticker);

            tokio::select! {
                outcome = &mut call => outcome,
                never = &mut ticker => match never {},
            }
        };

        match outcome {
            Ok(result) => {
                log::info!("[req:{}] Illustration for '{}' ready", request_id, clean_city);
                guard.succeed(result.clone());
                Ok(result)
            }
            Err(error) => {
                log::error!("[req:{}] Generation failed: {}", request_id, error);
                guard.fail(error.user_message());
                Err(error)
            }
        }
    }

    async fn tick_progress(&self, started: Instant) -> Infallible {
        let mut interval = time::interval_at(started + self.tick_interval, self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let (progress, remaining) = self.estimator.sample(started.elapsed());
            self.state.send_modify(|state| {
                state.progress = progress;
                state.estimated_remaining_secs = remaining;
                state.ticks += 1;
            });
        }
    }
}

/// Marks a cycle as loading for as long as it is alive. Dropping it without an outcome (the
/// `submit` future was abandoned) still clears `is_loading`.
struct CycleGuard<'a> {
    state: &'a watch::Sender<UiState>,
    settled: bool,
}

impl<'a> CycleGuard<'a> {
    fn begin(
        state: &'a watch::Sender<UiState>,
        raw_city: &str,
        clean_city: &str,
        estimator: &ProgressEstimator,
    ) -> Option<Self> {
        let mut started = false;
        state.send_if_modified(|ui| {
            if ui.is_loading {
                return false;
            }
            ui.city = raw_city.to_string();
            ui.current_city = clean_city.to_string();
            ui.is_loading = true;
            ui.error = None;
            ui.result = None;
            ui.progress = 0.0;
            ui.estimated_remaining_secs = estimator.initial_estimate_secs();
            started = true;
            true
        });

        started.then_some(Self {
            state,
            settled: false,
        })
    }

    fn succeed(mut self, result: GenerationResult) {
        self.settle(|ui| {
            ui.result = Some(result);
            ui.error = None;
        });
    }

    fn fail(mut self, message: String) {
        self.settle(|ui| {
            ui.result = None;
            ui.error = Some(message);
        });
    }

    fn settle(&mut self, apply: impl FnOnce(&mut UiState)) {
        self.settled = true;
        self.state.send_modify(|ui| {
            apply(ui);
            ui.progress = 100.0;
            ui.estimated_remaining_secs = 0;
            ui.is_loading = false;
        });
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("Generation abandoned before a response arrived");
            self.state.send_modify(|ui| {
                ui.is_loading = false;
                ui.estimated_remaining_secs = 0;
            });
        }
    }
}
