pub mod form;
pub mod generator;
pub mod home;

use crate::{
    client::ImageApi, config::ClientConfig, controller::RequestController, prompt::PromptTemplate,
};
use std::sync::Arc;

pub use form::{FormOutcome, GeneratorForm};
pub use generator::GeneratorView;
pub use home::HomeView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Generator,
}

impl Route {
    /// Unknown paths land on the home page.
    pub fn from_path(path: &str) -> Self {
        match path.trim().trim_end_matches('/') {
            "/generator" | "generator" => Route::Generator,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Generator => "/generator",
        }
    }
}

pub enum MountedView {
    Home(HomeView),
    Generator(GeneratorView),
}

impl MountedView {
    pub fn route(&self) -> Route {
        match self {
            MountedView::Home(_) => Route::Home,
            MountedView::Generator(_) => Route::Generator,
        }
    }

    pub fn form(&self) -> &GeneratorForm {
        match self {
            MountedView::Home(view) => view.form(),
            MountedView::Generator(view) => view.form(),
        }
    }
}

/// Mounts views. Every navigation builds a fresh view, so form state never survives a page
/// change.
pub struct Router {
    api: Arc<dyn ImageApi>,
    config: ClientConfig,
}

impl Router {
    pub fn new(api: Arc<dyn ImageApi>, config: ClientConfig) -> Self {
        Self { api, config }
    }

    pub fn navigate(&self, route: Route) -> MountedView {
        log::debug!("Navigating to {}", route.path());
        match route {
            Route::Home => MountedView::Home(self.home()),
            Route::Generator => MountedView::Generator(self.generator()),
        }
    }

    /// The landing page's quick form uses the shorter skyline prompt.
    pub fn home(&self) -> HomeView {
        HomeView::new(self.form(PromptTemplate::futuristic_skyline()))
    }

    pub fn generator(&self) -> GeneratorView {
        GeneratorView::new(self.form(PromptTemplate::isometric_miniature()))
    }

    fn form(&self, template: PromptTemplate) -> GeneratorForm {
        let controller = RequestController::from_config(self.api.clone(), template, &self.config);
        GeneratorForm::new(controller, self.config.output_dir.clone())
    }
}
