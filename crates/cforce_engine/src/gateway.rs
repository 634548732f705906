use std::time::Duration;

use cforce_logging::{cforce_debug, cforce_warn};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::GatewayError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    fn wire_name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One role-tagged message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Text,
}

impl ResponseFormat {
    fn mime_type(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::Text => "text/plain",
        }
    }
}

/// Capability flags forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolSet {
    pub web_search: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub response_format: ResponseFormat,
    pub tools: ToolSet,
    pub system_instruction: Option<String>,
    /// Zero disables model-side reasoning for the lowest latency.
    pub thinking_budget: i32,
}

impl GenerationConfig {
    pub fn new(model: impl Into<String>, response_format: ResponseFormat) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            top_p: None,
            response_format,
            tools: ToolSet::default(),
            system_instruction: None,
            thinking_budget: 0,
        }
    }
}

/// Single chokepoint to the remote model. No business logic, no retries.
///
/// A decoded response without text parts is `Ok("")`; only transport, status
/// and envelope failures are errors.
#[async_trait::async_trait]
pub trait ModelGateway: Send + Sync {
    async fn send(
        &self,
        conversation: &[Turn],
        config: &GenerationConfig,
    ) -> Result<String, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    /// Transport-level cap only; `None` leaves the request unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// Gateway speaking the Gemini `generateContent` REST contract.
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    settings: GatewaySettings,
    client: reqwest::Client,
}

impl GeminiGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::new(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait::async_trait]
impl ModelGateway for GeminiGateway {
    async fn send(
        &self,
        conversation: &[Turn],
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        let body = serde_json::to_string(&GenerateRequest::new(conversation, config))
            .map_err(|err| GatewayError::new(err.to_string()))?;
        cforce_debug!(
            "generateContent model={} turns={} body_len={}",
            config.model,
            conversation.len(),
            body.len()
        );

        let response = self
            .client
            .post(self.endpoint(&config.model))
            .header("x-goog-api-key", &self.settings.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| GatewayError::new(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| GatewayError::new(err.to_string()))?;
        if !status.is_success() {
            cforce_warn!("generateContent returned {} ({} bytes)", status, text.len());
            return Err(GatewayError::new(format!("http status {}", status.as_u16())));
        }

        let envelope: GenerateResponse = serde_json::from_str(&text)
            .map_err(|err| GatewayError::new(format!("undecodable envelope: {err}")))?;
        let reply = envelope.into_text();
        if reply.is_empty() {
            cforce_warn!("generateContent returned no text parts");
        }
        Ok(reply)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireInstruction<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    generation_config: WireGenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn new(conversation: &'a [Turn], config: &'a GenerationConfig) -> Self {
        let contents = conversation
            .iter()
            .map(|turn| WireContent {
                role: turn.role.wire_name(),
                parts: vec![WirePart { text: &turn.text }],
            })
            .collect();
        let system_instruction = config.system_instruction.as_deref().map(|text| WireInstruction {
            parts: vec![WirePart { text }],
        });
        let tools = if config.tools.web_search {
            vec![WireTool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };
        Self {
            contents,
            system_instruction,
            tools,
            generation_config: WireGenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                response_mime_type: config.response_format.mime_type(),
                thinking_config: WireThinkingConfig {
                    thinking_budget: config.thinking_budget,
                },
            },
        }
    }
}

#[derive(Serialize)]
struct WireContent<'a> {
    role: &'static str,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct WireInstruction<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
struct WireTool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    response_mime_type: &'static str,
    thinking_config: WireThinkingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireThinkingConfig {
    thinking_budget: i32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

impl GenerateResponse {
    /// Concatenated non-thought text parts of the first candidate. Blocked or
    /// empty candidates yield an empty string.
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default()
    }
}
