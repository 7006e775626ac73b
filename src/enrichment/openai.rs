//! OpenAI-compatible chat completions backend

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnalysisBackend, AnalysisRequest, EnrichmentError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat completions client speaking the OpenAI wire format
#[derive(Clone)]
pub struct OpenAiBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;
        let base_url: String = base_url.into();

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl AnalysisBackend for OpenAiBackend {
    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<String, EnrichmentError> {
        let system_prompt = system_prompt(request.language);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: request.code,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(EnrichmentError::EmptyResponse)
    }
}

fn system_prompt(language: &str) -> String {
    format!(
        r#"You are a code reviewer. Analyze the following {language} code for errors and provide a corrected version.
Respond with a single JSON object and nothing else, in exactly this shape:
{{"hasErrors": boolean, "errorCount": number, "warningCount": number, "errors": [{{"line": number, "message": string, "severity": "error"|"warning"}}], "correctedCode": string, "explanation": string}}
Line numbers start at 1. errorCount and warningCount must equal the number of entries with that severity."#
    )
}
