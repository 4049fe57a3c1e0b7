//! Gemini text generation
//!
//! Calls the `generateContent` REST endpoint once per agent.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::selection::{JustificationRequest, Tone};
use crate::service::{GenerationError, JustificationService};

/// Default REST base URL
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini connection settings
#[derive(Clone)]
pub struct GeminiSettings {
    /// Base URL, without the `/models/...` suffix
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }
}

// Keep the credential out of logs
impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// HTTP client for the Gemini API
pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Build a client whose requests give up after `timeout`
    pub fn new(settings: GeminiSettings, timeout: Duration) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, settings })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl JustificationService for GeminiClient {
    async fn generate(&self, request: &JustificationRequest) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(request),
                }],
            }],
        };

        let response = self
            .http
            .post(self.url())
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.bytes().await?;
        let text = parse_response(&payload)?;
        debug!(agent = %request.agent, "Gemini justification received");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Prompt naming the selected parameters, their raw values and the tone
pub fn build_prompt(request: &JustificationRequest) -> String {
    let tone = match request.tone {
        Tone::Praising => "praising",
        Tone::Motivating => "motivating",
    };
    let subject = if request.picks.len() == 1 {
        "this performance indicator"
    } else {
        "these performance indicators"
    };

    let mut prompt = format!(
        "Generate a short {} comment for a sales agent based on {}:\n",
        tone, subject
    );
    for (i, pick) in request.picks.iter().enumerate() {
        prompt.push_str(&format!("{}. {} ({})\n", i + 1, pick.label(), pick.raw_value));
    }
    prompt.push_str(
        "\nBe concise, professional, and natural. 1-2 sentences only. \
         Don't include inverted commas or quotes.\n",
    );
    prompt
}

/// Extract `candidates[0].content.parts[0].text`, trimmed
pub fn parse_response(payload: &[u8]) -> Result<String, GenerationError> {
    let response: GenerateResponse =
        serde_json::from_slice(payload).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| GenerationError::Malformed("no candidate text".to_string()))?;

    let text = text.trim().trim_matches('"').trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ParameterScore;
    use kitty_common::Parameter;

    fn request(tone: Tone, picks: &[(Parameter, f64)]) -> JustificationRequest {
        JustificationRequest {
            agent: "A1".into(),
            tone,
            picks: picks
                .iter()
                .map(|(parameter, raw_value)| ParameterScore {
                    parameter: *parameter,
                    raw_value: *raw_value,
                    weighted_score: *raw_value,
                })
                .collect(),
        }
    }

    #[test]
    fn test_prompt_names_labels_values_and_tone() {
        let prompt = build_prompt(&request(
            Tone::Praising,
            &[(Parameter::PerformanceScore, 92.0), (Parameter::ActiveClients, 14.5)],
        ));
        assert!(prompt.contains("short praising comment"));
        assert!(prompt.contains("1. performance (92)"));
        assert!(prompt.contains("2. client engagement (14.5)"));
        assert!(prompt.contains("these performance indicators"));

        let prompt = build_prompt(&request(Tone::Motivating, &[(Parameter::SeniorityMonths, 3.0)]));
        assert!(prompt.contains("short motivating comment"));
        assert!(prompt.contains("this performance indicator"));
        assert!(!prompt.contains("2."));
    }

    #[test]
    fn test_parse_response() {
        let payload = br#"{"candidates":[{"content":{"parts":[{"text":"  \"Great client work this cycle.\"\n"}]}}]}"#;
        assert_eq!(parse_response(payload).unwrap(), "Great client work this cycle.");
    }

    #[test]
    fn test_parse_response_errors() {
        assert!(matches!(parse_response(b"not json"), Err(GenerationError::Malformed(_))));
        assert!(matches!(
            parse_response(br#"{"candidates":[]}"#),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(
            parse_response(br#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response(br#"{"promptFeedback":{"blockReason":"SAFETY"}}"#),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_url_and_redacted_settings() {
        let mut settings = GeminiSettings::new("secret-key");
        settings.endpoint = "http://localhost:8080/v1beta/".to_string();
        let client = GeminiClient::new(settings.clone(), Duration::from_secs(1)).unwrap();

        assert_eq!(
            client.url(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert!(!format!("{:?}", settings).contains("secret-key"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let mut settings = GeminiSettings::new("k");
        // Port 9 (discard) is not expected to accept HTTP
        settings.endpoint = "http://127.0.0.1:9".to_string();
        let client = GeminiClient::new(settings, Duration::from_secs(2)).unwrap();

        let result = client
            .generate(&request(Tone::Praising, &[(Parameter::PerformanceScore, 1.0)]))
            .await;
        assert!(result.is_err());
    }
}
