/// Tailoring client: the only place that talks to the remote tailoring service.
///
/// Sends a job description together with the current Document snapshot and returns the
/// leniently decoded suggestions. The Document is never touched here; merging is the
/// caller's job and only ever happens on a fully received successful payload.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::document::schema::Document;
use crate::errors::service_error_message;
use crate::tailoring::payload::TailoringPayload;

const OPTIMIZE_PATH: &str = "/api/optimize-application";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_RETRIES: u32 = 2;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum TailoringError {
    #[error("Could not reach tailoring service: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response; `message` is the service-provided reason or a generic fallback.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Tailoring service returned invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeRequest<'a> {
    job_text: &'a str,
    resume_data: &'a Document,
}

#[derive(Clone)]
pub struct TailoringClient {
    client: Client,
    base_url: String,
    retry_base_delay: Duration,
}

impl TailoringClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Requests tailoring suggestions for `job_text`.
    /// Retries on 429 and 5xx with exponential backoff; other failures surface immediately.
    pub async fn optimize(
        &self,
        job_text: &str,
        document: &Document,
    ) -> Result<TailoringPayload, TailoringError> {
        let url = format!("{}{OPTIMIZE_PATH}", self.base_url);
        let body = OptimizeRequest {
            job_text,
            resume_data: document,
        };

        let mut attempt = 0;
        loop {
            let response = self.client.post(&url).json(&body).send().await?;
            let status = response.status();

            if status.is_success() {
                let text = response.text().await?;
                let payload: TailoringPayload = serde_json::from_str(&text)?;
                info!("Tailoring suggestions received ({} bytes)", text.len());
                return Ok(payload);
            }

            let text = response.text().await.unwrap_or_default();
            let error = TailoringError::Service {
                status: status.as_u16(),
                message: service_error_message(&text)
                    .unwrap_or_else(|| format!("Request failed ({})", status.as_u16())),
            };

            if !is_retryable(status) || attempt >= MAX_RETRIES {
                return Err(error);
            }

            let delay = self.retry_base_delay * (1 << attempt);
            attempt += 1;
            warn!(
                "Tailoring service returned {status}, retrying after {}ms (attempt {attempt}/{MAX_RETRIES})",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::document::schema::default_document;
    use crate::test_support::spawn_stub;

    fn client(base_url: String) -> TailoringClient {
        TailoringClient::new(base_url)
            .unwrap()
            .with_retry_base_delay(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_optimize_sends_job_text_and_document() {
        let app = Router::new().route(
            OPTIMIZE_PATH,
            post(|Json(body): Json<Value>| async move {
                let echoed = body["resumeData"]["personal"]["data"]["name"].clone();
                Json(json!({
                    "parsedJobTitle": body["jobText"],
                    "companyName": echoed,
                }))
            }),
        );
        let base = spawn_stub(app).await;

        let payload = client(base).optimize("Rust Engineer", &default_document()).await.unwrap();
        assert_eq!(payload.parsed_job_title.as_deref(), Some("Rust Engineer"));
        assert_eq!(payload.company_name.as_deref(), Some("Your Name"));
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let app = Router::new().route(
            OPTIMIZE_PATH,
            post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "error": "Job text too short" }))) }),
        );
        let base = spawn_stub(app).await;

        let err = client(base).optimize("x", &default_document()).await.unwrap_err();
        assert!(matches!(err, TailoringError::Service { status: 400, .. }));
        assert_eq!(err.to_string(), "Job text too short");
    }

    #[tokio::test]
    async fn test_generic_message_without_error_body() {
        let app = Router::new().route(OPTIMIZE_PATH, post(|| async { (StatusCode::NOT_FOUND, "nope") }));
        let base = spawn_stub(app).await;

        let err = client(base).optimize("x", &default_document()).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed (404)");
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_then_succeed() {
        let calls = Arc::new(AtomicU32::new(0));
        let app = Router::new()
            .route(
                OPTIMIZE_PATH,
                post(|State(calls): State<Arc<AtomicU32>>| async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "warming up" })))
                    } else {
                        (StatusCode::OK, Json(json!({ "missingSkills": ["go"] })))
                    }
                }),
            )
            .with_state(calls.clone());
        let base = spawn_stub(app).await;

        let payload = client(base).optimize("x", &default_document()).await.unwrap();
        assert_eq!(payload.missing_skills, Some(vec!["go".to_string()]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = Arc::new(AtomicU32::new(0));
        let app = Router::new()
            .route(
                OPTIMIZE_PATH,
                post(|State(calls): State<Arc<AtomicU32>>| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    StatusCode::TOO_MANY_REQUESTS
                }),
            )
            .with_state(calls.clone());
        let base = spawn_stub(app).await;

        let err = client(base).optimize("x", &default_document()).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed (429)");
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let app = Router::new()
            .route(
                OPTIMIZE_PATH,
                post(|State(calls): State<Arc<AtomicU32>>| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    StatusCode::UNPROCESSABLE_ENTITY
                }),
            )
            .with_state(calls.clone());
        let base = spawn_stub(app).await;

        client(base).optimize("x", &default_document()).await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_parse_error() {
        let app = Router::new().route(OPTIMIZE_PATH, post(|| async { "not json" }));
        let base = spawn_stub(app).await;

        let err = client(base).optimize("x", &default_document()).await.unwrap_err();
        assert!(matches!(err, TailoringError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let err = client("http://127.0.0.1:1".to_string())
            .optimize("x", &default_document())
            .await
            .unwrap_err();
        assert!(matches!(err, TailoringError::Http(_)));
    }
}
