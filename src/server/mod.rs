//! HTTP relay between the client and the image model.
//!
//! `POST /generate-image` takes `{ "prompt": ... }`, forwards it to the configured
//! [`ImageAgent`] and answers with the nested `{ status, data: { image_base64, text } }`
//! envelope the client expects. Failures come back as `{ "detail": ... }`.

pub mod agent;

use crate::{
    config::ServerConfig,
    error::{IsoscapeError, Result},
    logger,
    models::{ErrorBody, GenerationEnvelope, GenerationRequest, GenerationResult, StatusMessage},
};
use actix_cors::Cors;
use actix_web::{error::InternalError, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;

pub use agent::{AgentOutput, GeminiImageAgent, ImageAgent};

pub struct AppState {
    agent: Arc<dyn ImageAgent>,
}

impl AppState {
    pub fn new(agent: Arc<dyn ImageAgent>) -> Self {
        Self { agent }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .route("/generate-image", web::post().to(generate_image));
}

/// Malformed bodies get the same `{ detail }` shape as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        InternalError::from_response(err, HttpResponse::UnprocessableEntity().json(ErrorBody::new(detail)))
            .into()
    })
}

async fn root() -> HttpResponse {
    HttpResponse::Ok().json(StatusMessage {
        message: Some("IsoScape API is running".to_string()),
        status: None,
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(StatusMessage {
        message: None,
        status: Some("healthy".to_string()),
    })
}

async fn generate_image(
    state: web::Data<AppState>,
    request: web::Json<GenerationRequest>,
) -> HttpResponse {
    let prompt = request.into_inner().prompt;
    if prompt.trim().is_empty() {
        return HttpResponse::UnprocessableEntity().json(ErrorBody::new("prompt must not be empty"));
    }

    let _timer = logger::timer("relay generate-image");
    match relay(state.agent.as_ref(), &prompt).await {
        Ok(result) => HttpResponse::Ok().json(GenerationEnvelope::success(result)),
        Err(e) => {
            log::error!("Image generation failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorBody::new(format!(
                "Error generating image: {}",
                e.user_message()
            )))
        }
    }
}

async fn relay(agent: &dyn ImageAgent, prompt: &str) -> Result<GenerationResult> {
    let output = agent.generate_content(prompt).await?;
    let image_base64 = output
        .image_base64
        .ok_or_else(|| IsoscapeError::ResponseError("the model returned no image".into()))?;

    Ok(GenerationResult {
        image_base64,
        text: output.text,
    })
}

/// Lets the listed browser origins call the relay; `*` opens it to any origin.
pub fn cors(origins: &[String]) -> Cors {
    if origins.iter().any(|origin| origin == "*") {
        return Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

pub async fn run(config: ServerConfig) -> Result<()> {
    let agent = GeminiImageAgent::new(config.gemini.clone())?;
    let state = web::Data::new(AppState::new(Arc::new(agent)));

    logger::log_startup_info("IsoScape API", env!("CARGO_PKG_VERSION"), &config.host, config.port);
    log::info!("   Gemini model: {}", config.gemini.model);
    log::info!("   CORS origins: {}", config.cors_origins.join(", "));

    let origins = config.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&origins))
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))
    .map_err(|e| IsoscapeError::ServerError(format!("Failed to bind: {}", e)))?
    .run()
    .await
    .map_err(|e| IsoscapeError::ServerError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{
        http::{header, Method, StatusCode},
        test,
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct StubAgent(std::result::Result<AgentOutput, String>);

    #[async_trait]
    impl ImageAgent for StubAgent {
        async fn generate_content(&self, _prompt: &str) -> Result<AgentOutput> {
            self.0.clone().map_err(IsoscapeError::ResponseError)
        }
    }

    macro_rules! app_with {
        ($agent:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::new(Arc::new($agent))))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_cors_preflight_for_allowed_origin() {
        let origins = vec!["http://localhost:3000".to_string()];
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(Arc::new(StubAgent(Ok(
                    AgentOutput::default(),
                ))))))
                .wrap(cors(&origins))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/generate-image")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn test_health_and_root() {
        let app = app_with!(StubAgent(Ok(AgentOutput::default())));

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "healthy" }));

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "message": "IsoScape API is running" }));
    }

    #[actix_web::test]
    async fn test_generate_returns_nested_envelope() {
        let app = app_with!(StubAgent(Ok(AgentOutput {
            image_base64: Some("abc123".into()),
            text: Some("A city".into()),
        })));

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(json!({ "prompt": "CITY = São Paulo" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!({ "status": "success", "data": { "image_base64": "abc123", "text": "A city" } })
        );
    }

    #[actix_web::test]
    async fn test_image_without_caption_sends_null_text() {
        let app = app_with!(StubAgent(Ok(AgentOutput {
            image_base64: Some("abc123".into()),
            text: None,
        })));

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(json!({ "prompt": "CITY = Recife" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["text"], Value::Null);
        assert!(body["data"].as_object().unwrap().contains_key("text"));
    }

    #[actix_web::test]
    async fn test_agent_failure_maps_to_detail() {
        let app = app_with!(StubAgent(Err("Empty response from Gemini.".into())));

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(json!({ "prompt": "Recife" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Error generating image: Empty response from Gemini.");
    }

    #[actix_web::test]
    async fn test_missing_image_is_a_failure() {
        let app = app_with!(StubAgent(Ok(AgentOutput {
            image_base64: None,
            text: Some("only words".into()),
        })));

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(json!({ "prompt": "Recife" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_blank_or_malformed_prompt_is_unprocessable() {
        let app = app_with!(StubAgent(Ok(AgentOutput::default())));

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(json!({ "prompt": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let req = test::TestRequest::post()
            .uri("/generate-image")
            .set_json(json!({ "city_name": "Recife" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().contains("prompt"));
    }
}
