//! Minimal OpenAI client used as the quiz generation service.
//!
//! We only call chat.completions and hand the raw model text back to the
//! normalizer, which owns extraction and validation. Calls are instrumented and
//! log model name, latency, and response size (not contents).
//!
//! NOTE: We never log the API key and we keep payload previews short.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::Difficulty;
use crate::error::GenerationError;
use crate::normalizer::QuizGenerator;
use crate::util::{fill_template, trunc_for_log};

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub prompts: Prompts,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(prompts: Prompts) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(20);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model, prompts })
  }

  /// Chat completion in JSON-object mode. Returns the message text as-is.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json_text(
    &self,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<String, GenerationError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "quizkit/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(GenerationError::Status { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default();

    if text.trim().is_empty() {
      return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
  }
}

impl QuizGenerator for OpenAI {
  #[instrument(level = "info", skip(self, topic, difficulty), fields(%difficulty, topic_len = topic.len(), model = %self.model))]
  async fn generate(&self, topic: &str, difficulty: Difficulty) -> Result<String, GenerationError> {
    let vars = [("topic", topic), ("difficulty", difficulty.as_str())];
    let system = fill_template(&self.prompts.quiz_system, &vars);
    let user = fill_template(&self.prompts.quiz_user_template, &vars);

    let start = Instant::now();
    let result = self.chat_json_text(&system, &user, 0.9).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(text) => info!(
        ?elapsed,
        bytes = text.len(),
        preview = %trunc_for_log(text, 60),
        "Model response received"
      ),
      Err(e) => error!(?elapsed, error = %e, "Model call failed during quiz generation"),
    }
    result
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extracts_error_message() {
    let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
    assert_eq!(extract_openai_error(body), Some("Rate limit reached".into()));
    assert_eq!(extract_openai_error("<html>bad gateway</html>"), None);
  }

  #[test]
  fn request_serializes_json_mode() {
    let req = ChatCompletionRequest {
      model: "gpt-4o".into(),
      messages: vec![ChatMessageReq { role: "user".into(), content: "hi".into() }],
      temperature: 0.5,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["response_format"]["type"], "json_object");
    assert_eq!(v["messages"][0]["role"], "user");
  }

  #[test]
  fn response_tolerates_missing_usage() {
    let body: ChatCompletionResponse =
      serde_json::from_str(r#"{"choices": [{"message": {"content": "{}"}}]}"#).unwrap();
    assert!(body.usage.is_none());
    assert_eq!(body.choices[0].message.content.as_deref(), Some("{}"));
  }
}
