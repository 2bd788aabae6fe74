//! Generation endpoint client and response extraction.
//!
//! The remote service is treated as unreliable: transport problems come back as
//! [`TransportError`] values and payload inspection never assumes a shape.
use crate::util::truncate_string;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};

/// Upper bound on a single generation request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const PAYLOAD_SUMMARY_LIMIT: usize = 200;

/// Why a generation request produced no usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Timeout,
    Connection(String),
    InvalidBody(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(
                f,
                "request timed out after {}s",
                REQUEST_TIMEOUT.as_secs()
            ),
            TransportError::Connection(detail) => write!(f, "connection failed: {detail}"),
            TransportError::InvalidBody(detail) => write!(f, "response was not JSON: {detail}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Anything that can turn a prompt into a raw JSON payload.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<Value, TransportError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<GenerateContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerateContent<'a> {
    role: &'static str,
    parts: Vec<GeneratePart<'a>>,
}

#[derive(Serialize)]
struct GeneratePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Blocking client for the `generateContent` endpoint.
pub struct GeminiClient {
    agent: ureq::Agent,
    url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, model: &str, api_key: String) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        let url = format!(
            "{}/v1beta/models/{model}:generateContent",
            api_base.trim_end_matches('/')
        );
        Self {
            agent,
            url,
            api_key,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<Value, TransportError> {
        let request = GenerateRequest {
            contents: vec![GenerateContent {
                role: "user",
                parts: vec![GeneratePart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 1.0,
                max_output_tokens: 256,
            },
        };

        let start = Instant::now();
        let mut response = self
            .agent
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .send_json(&request)
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        tracing::info!(
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            prompt_bytes = prompt.len(),
            response_bytes = body.len(),
            "generation request complete"
        );

        serde_json::from_str(&body).map_err(|err| {
            TransportError::InvalidBody(format!(
                "{err} (status {status}, body {:?})",
                truncate_string(body.trim(), PAYLOAD_SUMMARY_LIMIT)
            ))
        })
    }
}

fn transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Connection(other.to_string()),
    }
}

/// Pull the joke text out of a generation payload.
///
/// Prefers `candidates[0].content.parts[0].text`, falling back to the older
/// `candidates[0].output_text`. The error string describes what was found
/// instead.
pub fn extract_candidate_text(payload: &Value) -> Result<String, String> {
    let Some(candidate) = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
    else {
        return Err(describe_payload(payload));
    };

    let text = candidate
        .pointer("/content/parts/0/text")
        .and_then(Value::as_str)
        .or_else(|| candidate.get("output_text").and_then(Value::as_str));

    match text.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        Some(_) => Err("candidate text was empty".to_string()),
        None => Err(format!(
            "candidate had no text part: {}",
            truncate_string(&candidate.to_string(), PAYLOAD_SUMMARY_LIMIT)
        )),
    }
}

fn describe_payload(payload: &Value) -> String {
    if let Some(message) = payload.pointer("/error/message").and_then(Value::as_str) {
        return format!("API error: {message}");
    }
    if let Some(reason) = payload
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return format!("prompt blocked: {reason}");
    }
    format!(
        "no candidates in response: {}",
        truncate_string(&payload.to_string(), PAYLOAD_SUMMARY_LIMIT)
    )
}
