//! Remote mediation service client.
//!
//! Speaks two wire contracts: the structured `/mediate` endpoint (authoritative)
//! and the older `/rewrite` endpoint that some deployments still run. The
//! remote model is slow and variable, so timeouts are generous and every
//! logical request gets exactly one retry after a fixed delay.
//!
//! Cancellation is NOT handled here. The coordinator compares request tokens
//! when a result is applied; this client only ever reports what the transport
//! actually returned, and never fabricates a success.

use crate::error::ApiError;
use crate::util::truncate;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const ENDPOINT_MEDIATE: &str = "/mediate";
pub const ENDPOINT_REWRITE: &str = "/rewrite";
pub const ENDPOINT_HEALTH: &str = "/health";

/// Connection establishment budget (handles slow mobile networks).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
/// Full-response budget (remote model latency is high and variable).
pub const READ_TIMEOUT: Duration = Duration::from_secs(12);
/// Fixed pause between the first attempt and the single retry.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Desired tone for the rewritten message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Calm,
    Friendly,
    Professional,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Calm => "calm",
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "calm" => Ok(Tone::Calm),
            "friendly" => Ok(Tone::Friendly),
            "professional" => Ok(Tone::Professional),
            other => Err(format!("unknown tone '{}'", other)),
        }
    }
}

/// Language hint forwarded to the remote detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LangHint {
    #[default]
    Auto,
    En,
    Fr,
    Ar,
    Darija,
}

impl LangHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            LangHint::Auto => "auto",
            LangHint::En => "en",
            LangHint::Fr => "fr",
            LangHint::Ar => "ar",
            LangHint::Darija => "darija",
        }
    }
}

impl std::str::FromStr for LangHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(LangHint::Auto),
            "en" => Ok(LangHint::En),
            "fr" => Ok(LangHint::Fr),
            "ar" => Ok(LangHint::Ar),
            "darija" => Ok(LangHint::Darija),
            other => Err(format!("unknown language hint '{}'", other)),
        }
    }
}

/// Coarse risk classification returned by the service.
///
/// Unknown or missing labels degrade to `Safe` rather than failing the whole
/// response: a lost label must never invent risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskLabel {
    #[default]
    Safe,
    Harmful,
    Dangerous,
}

impl RiskLabel {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "harmful" => RiskLabel::Harmful,
            "dangerous" => RiskLabel::Dangerous,
            _ => RiskLabel::Safe,
        }
    }

    /// Numeric score equivalent for hosts that only display a gauge.
    pub fn score(&self) -> f64 {
        match self {
            RiskLabel::Safe => 0.1,
            RiskLabel::Harmful => 0.6,
            RiskLabel::Dangerous => 0.9,
        }
    }
}

impl<'de> Deserialize<'de> for RiskLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(RiskLabel::parse(&raw))
    }
}

/// Request body for `POST /mediate`. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct MediateRequest {
    pub text: String,
    pub tone: Tone,
    pub lang_hint: LangHint,
}

impl MediateRequest {
    pub fn new(text: impl Into<String>, tone: Tone, lang_hint: LangHint) -> Self {
        Self {
            text: text.into(),
            tone,
            lang_hint,
        }
    }
}

/// Response body from `POST /mediate`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediateResponse {
    #[serde(default)]
    pub risk_level: RiskLabel,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub rewrite: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl MediateResponse {
    pub fn has_rewrite(&self) -> bool {
        !self.rewrite.is_empty()
    }

    pub fn needs_mediation(&self) -> bool {
        self.risk_level != RiskLabel::Safe
    }
}

/// Request body for the legacy `POST /rewrite` contract.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteRequest {
    pub text: String,
    pub lang: String,
    pub tone: Tone,
    pub risk_label: String,
    pub risk_score: f64,
}

/// One rewrite candidate from the legacy contract.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSuggestion {
    pub text: String,
    pub reason: Option<String>,
}

pub struct MediationClient {
    http: reqwest::Client,
    base_url: String,
}

impl MediationClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Classify and rewrite `request.text`. Two attempts total.
    pub async fn mediate(&self, request: &MediateRequest) -> Result<MediateResponse, ApiError> {
        debug!(
            text = %truncate(&request.text, 50),
            tone = request.tone.as_str(),
            lang_hint = request.lang_hint.as_str(),
            "requesting mediation"
        );

        match self.mediate_once(request).await {
            Ok(response) => Ok(response),
            Err(first) => {
                debug!(error = %first, "mediation attempt failed, retrying once");
                tokio::time::sleep(RETRY_DELAY).await;
                self.mediate_once(request).await.map_err(|second| {
                    warn!(error = %second, "mediation retry failed");
                    second
                })
            }
        }
    }

    async fn mediate_once(&self, request: &MediateRequest) -> Result<MediateResponse, ApiError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_MEDIATE))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Server(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Request rewrite candidates over the legacy contract. Two attempts total.
    pub async fn rewrite(&self, request: &RewriteRequest) -> Result<Vec<RemoteSuggestion>, ApiError> {
        debug!(
            text_len = request.text.len(),
            lang = %request.lang,
            tone = request.tone.as_str(),
            "requesting rewrite"
        );

        match self.rewrite_once(request).await {
            Ok(suggestions) => Ok(suggestions),
            Err(first) => {
                debug!(error = %first, "rewrite attempt failed, retrying once");
                tokio::time::sleep(RETRY_DELAY).await;
                self.rewrite_once(request).await.map_err(|second| {
                    warn!(error = %second, "rewrite retry failed");
                    second
                })
            }
        }
    }

    async fn rewrite_once(&self, request: &RewriteRequest) -> Result<Vec<RemoteSuggestion>, ApiError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_REWRITE))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Server(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_rewrite_response(&body)
    }

    /// Probe `GET /health`. Exactly 200 means available; anything else,
    /// including transport errors, means unavailable.
    pub async fn check_health(&self) -> bool {
        match self
            .http
            .get(format!("{}{}", self.base_url, ENDPOINT_HEALTH))
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }
}

/// Parse a legacy rewrite reply. Two shapes exist in the wild: a structured
/// `suggestions` array, and a flat `{calm, firm, educational}` object. The
/// structured shape wins when both are present.
pub fn parse_rewrite_response(body: &str) -> Result<Vec<RemoteSuggestion>, ApiError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;

    let mut suggestions = Vec::new();

    if let Some(items) = json.get("suggestions").and_then(|v| v.as_array()) {
        for item in items {
            let text = item.get("text").and_then(|v| v.as_str()).unwrap_or("");
            if text.is_empty() {
                continue;
            }
            let reason = item
                .get("reason")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            suggestions.push(RemoteSuggestion {
                text: text.to_string(),
                reason,
            });
        }
    } else {
        for (field, reason) in [
            ("calm", "Calm approach"),
            ("firm", "Clear boundaries"),
            ("educational", "Informative tone"),
        ] {
            if let Some(text) = json.get(field).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    suggestions.push(RemoteSuggestion {
                        text: text.to_string(),
                        reason: Some(reason.to_string()),
                    });
                }
            }
        }
    }

    if suggestions.is_empty() {
        return Err(ApiError::Malformed("no suggestions in response".into()));
    }

    Ok(suggestions)
}
