use crate::{
    controller::RequestController,
    error::{IsoscapeError, Result},
    models::{GenerationResult, UiState},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use colored::*;
use futures::StreamExt;
use std::convert::Infallible;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

const BAR_WIDTH: usize = 30;
/// ANSI "erase to end of line", so a shorter frame leaves nothing of the previous one behind.
const CLEAR_TO_EOL: &str = "\x1b[K";

/// What one pass through the form produced.
#[derive(Debug)]
pub struct FormOutcome {
    pub state: UiState,
    pub saved_image: Option<PathBuf>,
}

/// The city form shared by both pages: input, submit, progress bar, error banner and result
/// panel, all backed by one [`RequestController`].
pub struct GeneratorForm {
    controller: RequestController,
    output_dir: PathBuf,
}

impl GeneratorForm {
    pub fn new(controller: RequestController, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            controller,
            output_dir: output_dir.into(),
        }
    }

    pub fn controller(&self) -> &RequestController {
        &self.controller
    }

    /// Submits `city`, redrawing the progress line on `out` until the request settles, then
    /// draws the error banner or the result panel.
    pub async fn submit<W: Write>(&self, city: &str, out: &mut W) -> Result<FormOutcome> {
        self.controller.set_city(city);
        writeln!(out, "{}", render_input(&self.controller.state()))?;

        let outcome = {
            let redraw = draw_progress(self.controller.subscribe(), &mut *out);
            tokio::pin!(redraw);
            tokio::select! {
                outcome = self.controller.submit(city) => outcome,
                never = &mut redraw => match never {},
            }
        };

        let mut state = self.controller.state();
        let drew_progress = !matches!(&outcome, Err(e) if e.is_local_rejection());
        if drew_progress {
            // Finish the progress line before anything else is printed.
            writeln!(out)?;
        }

        let mut saved_image = None;
        match outcome {
            Ok(result) => match save_image(&result, &state.current_city, &self.output_dir) {
                Ok(path) => saved_image = Some(path),
                Err(e) => {
                    log::error!("Could not save illustration: {}", e);
                    state.error = Some(e.user_message());
                }
            },
            Err(IsoscapeError::RequestInFlight) => {
                writeln!(out, "{}", "Aguarde a geração atual terminar.".yellow())?;
            }
            Err(_) => {}
        }

        if let Some(banner) = render_error(&state) {
            writeln!(out, "{}", banner)?;
        }
        if let Some(panel) = render_result(&state, saved_image.as_deref()) {
            writeln!(out, "{}", panel)?;
        }
        out.flush()?;

        Ok(FormOutcome { state, saved_image })
    }
}

async fn draw_progress<W: Write>(rx: watch::Receiver<UiState>, out: &mut W) -> Infallible {
    let mut updates = WatchStream::from_changes(rx);
    while let Some(state) = updates.next().await {
        if let Some(line) = render_progress(&state) {
            let _ = write!(out, "\r{}{}", line, CLEAR_TO_EOL);
            let _ = out.flush();
        }
    }
    std::future::pending().await
}

pub fn render_input(state: &UiState) -> String {
    let button = if state.can_submit() {
        "[ Gerar Ilustração ]".green().bold()
    } else {
        "[ Gerando... ]".bright_black()
    };
    format!("📍 Cidade: {}  {}", state.city.bold(), button)
}

/// Progress line, only while loading.
pub fn render_progress(state: &UiState) -> Option<String> {
    if !state.show_progress() {
        return None;
    }

    let percent = state.progress_percent();
    let filled = (percent as usize * BAR_WIDTH) / 100;
    let bar = format!(
        "{}{}",
        "█".repeat(filled).cyan(),
        "░".repeat(BAR_WIDTH - filled).bright_black()
    );

    let mut line = format!(
        "Criando sua ilustração isométrica de {}... [{}] {:>3}%",
        state.current_city.bold(),
        bar,
        percent
    );
    if state.estimated_remaining_secs > 0 {
        line.push_str(&format!(" ~{}s restantes", state.estimated_remaining_secs));
    }
    Some(line)
}

pub fn render_error(state: &UiState) -> Option<String> {
    state
        .error
        .as_ref()
        .map(|error| format!("{} {}", "⚠".red().bold(), error.red()))
}

pub fn render_result(state: &UiState, saved_image: Option<&Path>) -> Option<String> {
    let result = state.result.as_ref()?;
    let mut panel = format!(
        "{} {}",
        "🖼".bold(),
        format!("Ilustração de {}", state.current_city).bold()
    );
    match saved_image {
        Some(path) => panel.push_str(&format!("\n   Imagem salva em {}", path.display())),
        None => panel.push_str(&format!(
            "\n   Imagem recebida ({} caracteres base64)",
            result.image_base64.len()
        )),
    }
    if let Some(caption) = result.caption() {
        panel.push_str(&format!("\n   {}", caption.italic()));
    }
    Some(panel)
}

/// Decodes the PNG payload into `dir`. Returns the written path.
pub fn save_image(result: &GenerationResult, city: &str, dir: &Path) -> Result<PathBuf> {
    let bytes = STANDARD.decode(result.image_base64.trim())?;
    std::fs::create_dir_all(dir)?;

    let filename = format!(
        "isometric_{}_{}.png",
        slugify(city),
        chrono::Utc::now().timestamp()
    );
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    log::info!("💾 Illustration saved to {}", path.display());
    Ok(path)
}

fn slugify(city: &str) -> String {
    let mut slug = String::new();
    for c in city.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "city".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::ImageApi,
        models::GenerationRequest,
        prompt::PromptTemplate,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedApi(std::result::Result<GenerationResult, String>);

    #[async_trait]
    impl ImageApi for FixedApi {
        async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResult> {
            tokio::time::sleep(Duration::from_millis(450)).await;
            self.0.clone().map_err(IsoscapeError::RequestError)
        }
    }

    fn form(reply: std::result::Result<GenerationResult, String>, dir: &Path) -> GeneratorForm {
        let controller =
            RequestController::new(Arc::new(FixedApi(reply)), PromptTemplate::isometric_miniature());
        GeneratorForm::new(controller, dir)
    }

    fn loading_state(progress: f64, remaining: u64) -> UiState {
        UiState {
            current_city: "Salvador".to_string(),
            is_loading: true,
            progress,
            estimated_remaining_secs: remaining,
            ..UiState::default()
        }
    }

    #[test]
    fn test_progress_hidden_when_idle() {
        assert!(render_progress(&UiState::new()).is_none());
    }

    #[test]
    fn test_progress_line() {
        colored::control::set_override(false);
        let line = render_progress(&loading_state(41.6, 12)).unwrap();
        assert!(line.contains("Salvador"));
        assert!(line.contains(" 42%"));
        assert!(line.contains("~12s restantes"));

        let line = render_progress(&loading_state(94.9, 0)).unwrap();
        assert!(!line.contains("restantes"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("São Paulo"), "são-paulo");
        assert_eq!(slugify("  New York, NY "), "new-york-ny");
        assert_eq!(slugify("!!!"), "city");
    }

    #[test]
    fn test_save_image_decodes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let result = GenerationResult::new(STANDARD.encode(b"\x89PNG fake"));
        let path = save_image(&result, "Rio de Janeiro", dir.path()).unwrap();

        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("isometric_rio-de-janeiro_"));
        assert_eq!(std::fs::read(path).unwrap(), b"\x89PNG fake");
    }

    #[test]
    fn test_save_image_rejects_bad_base64() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_image(&GenerationResult::new("not base64!"), "x", dir.path()).unwrap_err();
        assert!(matches!(err, IsoscapeError::ResponseError(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_draws_progress_and_result() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let payload = GenerationResult::new(STANDARD.encode(b"png")).with_text("Vista do Pelourinho");
        let form = form(Ok(payload), dir.path());

        let mut out = Vec::new();
        let outcome = form.submit("Salvador", &mut out).await.unwrap();
        let screen = String::from_utf8(out).unwrap();

        assert!(screen.contains("Criando sua ilustração isométrica de Salvador"));
        assert!(screen.contains("Ilustração de Salvador"));
        assert!(screen.contains("Vista do Pelourinho"));
        assert!(outcome.saved_image.unwrap().exists());
        assert!(!outcome.state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_progress_frame_clears_the_line() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let form = form(Err("timeout".to_string()), dir.path());

        let mut out = Vec::new();
        form.submit("Salvador", &mut out).await.unwrap();
        let screen = String::from_utf8(out).unwrap();

        let frames: Vec<&str> = screen
            .split('\r')
            .skip(1)
            .map(|chunk| chunk.split('\n').next().unwrap_or_default())
            .collect();
        assert!(frames.len() >= 2, "expected several frames, got {:?}", frames);
        for frame in &frames {
            assert!(frame.starts_with("Criando"), "unexpected frame {:?}", frame);
            assert!(frame.ends_with(CLEAR_TO_EOL), "frame not cleared: {:?}", frame);
            assert_eq!(frame.matches(CLEAR_TO_EOL).count(), 1);
        }
        assert!(frames[0].contains("~20s restantes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_draws_error_banner() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let form = form(Err("rate limited".to_string()), dir.path());

        let mut out = Vec::new();
        let outcome = form.submit("Salvador", &mut out).await.unwrap();
        let screen = String::from_utf8(out).unwrap();

        assert!(screen.contains("rate limited"));
        assert!(outcome.saved_image.is_none());
        assert!(outcome.state.result.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_city_shows_validation_banner() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let form = form(Err("unreachable".to_string()), dir.path());

        let mut out = Vec::new();
        form.submit("  ", &mut out).await.unwrap();
        let screen = String::from_utf8(out).unwrap();

        assert!(screen.contains("Informe o nome de uma cidade."));
        assert!(!screen.contains("Criando"));
    }
}
