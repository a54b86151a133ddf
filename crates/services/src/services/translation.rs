//! Thai/English translation helper backed by the Anthropic messages API.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::warn;
use ts_rs::TS;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Error)]
pub enum TranslationError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("json error: {0}")]
    Serde(String),
    #[error("missing api key: ANTHROPIC_API_KEY environment variable not set")]
    MissingApiKey,
    #[error("empty translation result")]
    EmptyResult,
}

impl TranslationError {
    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout | Self::RateLimited => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

/// The two languages of the site.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Lang {
    En,
    Th,
}

impl Lang {
    fn full_name(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Th => "Thai",
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct ApiResponseBody {
    content: Vec<ContentBlock>,
}

impl ApiResponseBody {
    fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
        })
    }
}

/// Translation client for the admin's "translate the other language field" helper.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: Client,
    api_key: String,
    model: String,
}

impl TranslationClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a client using the ANTHROPIC_API_KEY environment variable.
    pub fn from_env() -> Result<Self, TranslationError> {
        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| TranslationError::MissingApiKey)?;
        Self::new(api_key, None)
    }

    pub fn new(api_key: String, model: Option<String>) -> Result<Self, TranslationError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("portfolio-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslationError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Translates `text` from `source` to `target`, retrying transient failures.
    pub async fn translate(
        &self,
        text: &str,
        source: Lang,
        target: Lang,
    ) -> Result<String, TranslationError> {
        let request = ApiRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: system_prompt(source, target),
            messages: vec![ApiMessage {
                role: "user",
                content: text.to_string(),
            }],
        };

        let translated = (|| async { self.send_request(&request).await })
            .retry(
                &ExponentialBuilder::default()
                    .with_min_delay(Duration::from_secs(1))
                    .with_max_delay(Duration::from_secs(15))
                    .with_max_times(3)
                    .with_jitter(),
            )
            .when(|e: &TranslationError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    "translation request failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .await?;

        let translated = translated.trim().to_string();
        if translated.is_empty() {
            return Err(TranslationError::EmptyResult);
        }
        Ok(translated)
    }

    async fn send_request(&self, request: &ApiRequest) -> Result<String, TranslationError> {
        let res = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => {
                let body = res
                    .json::<ApiResponseBody>()
                    .await
                    .map_err(|e| TranslationError::Serde(e.to_string()))?;
                body.text()
                    .map(|s| s.to_string())
                    .ok_or(TranslationError::EmptyResult)
            }
            StatusCode::UNAUTHORIZED => Err(TranslationError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(TranslationError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(TranslationError::Http { status, body })
            }
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TranslationError {
    if e.is_timeout() {
        TranslationError::Timeout
    } else {
        TranslationError::Transport(e.to_string())
    }
}

fn system_prompt(source: Lang, target: Lang) -> String {
    format!(
        "You are a translator for a personal portfolio website. Translate the user's text \
         from {} to {}. Preserve names, numbers and formatting. Reply with the translated \
         text only, no commentary.",
        source.full_name(),
        target.full_name()
    )
}
