#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use survey_workflow::config::AppConfig;
use survey_workflow::services::{GenerationError, TextGenerator};

pub const BOUNDARY: &str = "----surveyboundary";

pub fn config() -> AppConfig {
    AppConfig {
        port: 0,
        environment: "test".into(),
        frontend_urls: vec!["http://localhost:3000".into()],
        session_secret: "integration-secret".into(),
        gemini_api_key: None,
        gemini_model: "gemini-3-flash-preview".into(),
        gemini_base_url: "http://127.0.0.1:9".into(),
        ai_timeout_secs: 1,
        session_idle_minutes: 120,
        max_sessions: 1000,
    }
}

/// Always answers with the same text and counts calls.
pub struct CannedGenerator {
    reply: String,
    calls: AtomicUsize,
}

impl CannedGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.reply.clone()))
    }
}

/// Sleeps inside every call and records how many calls overlapped.
pub struct SlowGenerator {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowGenerator {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Some("Tone: Pass.".to_string()))
    }
}

pub fn multipart_file(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Builds the full application with a canned text generator.
macro_rules! test_app {
    ($generator:expr) => {
        test_app!($generator, survey_workflow::store::SessionStore::new())
    };
    ($generator:expr, $store:expr) => {{
        let generator: std::sync::Arc<dyn survey_workflow::services::TextGenerator> = $generator;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($store))
                .app_data(actix_web::web::Data::new(survey_workflow::services::Advisor::new(generator)))
                .app_data(actix_web::web::Data::new($crate::common::config()))
                .configure(survey_workflow::handlers::configure),
        )
        .await
    }};
}

/// Logs in and returns the bearer token.
macro_rules! login {
    ($app:expr, $name:expr, $role:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/session/login")
            .set_json(serde_json::json!({ "name": $name, "role": $role }))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;
        body["data"]["token"]
            .as_str()
            .expect("login returns a token")
            .to_string()
    }};
}
