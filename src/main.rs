use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use survey_workflow::config::AppConfig;
use survey_workflow::docs::ApiDoc;
use survey_workflow::handlers;
use survey_workflow::services::{Advisor, GeminiClient};
use survey_workflow::store::SessionStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let gemini = GeminiClient::from_config(&config)?;
    if !gemini.is_configured() {
        log::warn!("GEMINI_API_KEY is not set; format checks and insights will return a notice");
    }

    log::info!("🚀 Starting Survey Workflow API on port {} ({})", config.port, config.environment);
    log::info!("📋 Allowed frontend URLs: {:?}", config.frontend_urls);
    if config.is_development() {
        log::info!("📖 API docs at http://localhost:{}/swagger-ui/", config.port);
    }

    let port = config.port;
    let allowed_origins = config.frontend_urls.clone();
    let store = web::Data::new(SessionStore::from_config(&config));
    let advisor = web::Data::new(Advisor::new(Arc::new(gemini)));
    let config = web::Data::new(config);
    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "Authorization",
                "Content-Type",
                "Accept",
                "Origin",
                "X-Requested-With",
            ])
            .supports_credentials();

        // Add allowed origins
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .app_data(store.clone())
            .app_data(advisor.clone())
            .app_data(config.clone())
            .configure(handlers::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
            .route("/", web::get().to(|| async {
                HttpResponse::Ok().json(serde_json::json!({
                    "name": "Survey Workflow API",
                    "version": env!("CARGO_PKG_VERSION"),
                    "description": "REST API for the social survey assignment workflow"
                }))
            }))
    })
    .bind(("0.0.0.0", port))
    .with_context(|| format!("Failed to bind port {}", port))?
    .run()
    .await
    .context("Server error")?;

    Ok(())
}
