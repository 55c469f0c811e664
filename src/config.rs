//! Configuration: generation prompts and an optional quiz bank from TOML, plus
//! the quiz request read from the environment.
//!
//! TOML schema:
//! ```toml
//! [prompts]
//! quiz_system = "..."
//! quiz_user_template = "... {topic} ... {difficulty} ..."
//!
//! [[quizzes]]
//! quiz_id = 10
//! title = "Borrow checker basics"
//! [[quizzes.questions]]
//! question_id = 1
//! prompt = "..."
//! choices = [{ choice_id = 1, label = "...", is_correct = true }, ...]
//! ```

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{Difficulty, Id};
use crate::error::UnknownDifficulty;
use crate::store::QuizRecord;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub quizzes: Vec<QuizRecord>,
}

/// Prompts sent to the generation service. Only the output shape matters to
/// the normalizer; the wording can be tuned freely in TOML.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub quiz_system: String,
  pub quiz_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_system: "You write multiple-choice quizzes. Respond ONLY with one strict JSON object.".into(),
      quiz_user_template: r#"Write a {difficulty} quiz about {topic}.
Return JSON exactly shaped like:
{"quiz_id": "<uuid>", "title": "...", "description": "...",
 "questions": [{"question_id": "<uuid>", "prompt": "...",
   "explanation_true": "why the correct answer is right",
   "explanation_false": "why the other answers are wrong",
   "is_active": true,
   "choices": [{"choice_id": "<uuid>", "label": "...", "is_correct": true}]}]}
Rules: exactly 5 questions; exactly 3 choices per question; exactly one choice with is_correct true."#
        .into(),
    }
  }
}

pub fn parse_agent_config(s: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(s)
}

/// Attempt to load `AgentConfig` from QUIZKIT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("QUIZKIT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "quizkit", %path, bank = cfg.quizzes.len(), "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizkit", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizkit", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// What the caller asked for: a stored quiz, or a freshly generated one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizRequest {
  ById(Id),
  Generated { topic: String, difficulty: Difficulty },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
  #[error("set QUIZ_ID, or QUIZ_TOPIC together with QUIZ_DIFFICULTY")]
  Missing,

  #[error(transparent)]
  Difficulty(#[from] UnknownDifficulty),
}

impl QuizRequest {
  /// QUIZ_ID wins over QUIZ_TOPIC/QUIZ_DIFFICULTY when both are present.
  pub fn from_env() -> Result<Self, RequestError> {
    let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
    Self::from_parts(var("QUIZ_ID"), var("QUIZ_TOPIC"), var("QUIZ_DIFFICULTY"))
  }

  pub fn from_parts(
    quiz_id: Option<String>,
    topic: Option<String>,
    difficulty: Option<String>,
  ) -> Result<Self, RequestError> {
    if let Some(id) = quiz_id {
      return Ok(Self::ById(Id::from_input(&id)));
    }
    match (topic, difficulty) {
      (Some(topic), Some(difficulty)) => Ok(Self::Generated {
        topic: topic.trim().to_string(),
        difficulty: difficulty.parse()?,
      }),
      _ => Err(RequestError::Missing),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_uses_defaults() {
    let cfg = parse_agent_config("").unwrap();
    assert!(cfg.quizzes.is_empty());
    assert!(cfg.prompts.quiz_user_template.contains("{topic}"));
    assert!(cfg.prompts.quiz_user_template.contains("{difficulty}"));
  }

  #[test]
  fn partial_prompts_keep_other_defaults() {
    let cfg = parse_agent_config("[prompts]\nquiz_system = \"custom\"\n").unwrap();
    assert_eq!(cfg.prompts.quiz_system, "custom");
    assert_eq!(cfg.prompts.quiz_user_template, Prompts::default().quiz_user_template);
  }

  #[test]
  fn quiz_bank_parses_nested_records() {
    let src = r#"
[[quizzes]]
quiz_id = 10
title = "Borrow checker basics"

[[quizzes.questions]]
question_id = "q-1"
prompt = "How many mutable borrows may coexist?"
explanation_true = "Exactly one at a time."
choices = [
  { choice_id = 1, label = "One", is_correct = true },
  { choice_id = 2, label = "Unlimited" },
]
"#;
    let cfg = parse_agent_config(src).unwrap();
    let quiz = &cfg.quizzes[0];
    assert_eq!(quiz.quiz_id, Id::Int(10));
    assert!(quiz.is_published);
    assert_eq!(quiz.questions[0].question_id, Id::Text("q-1".into()));
    assert!(quiz.questions[0].is_active);
    assert!(!quiz.questions[0].choices[1].is_correct);
    assert_eq!(quiz.questions[0].explanation_false, "");
  }

  #[test]
  fn request_prefers_quiz_id() {
    let req = QuizRequest::from_parts(Some("7".into()), Some("rust".into()), Some("easy".into()));
    assert_eq!(req, Ok(QuizRequest::ById(Id::Int(7))));
  }

  #[test]
  fn request_keeps_zero_padded_id_as_text() {
    let req = QuizRequest::from_parts(Some("007".into()), None, None);
    assert_eq!(req, Ok(QuizRequest::ById(Id::Text("007".into()))));
  }

  #[test]
  fn request_for_generation() {
    let req = QuizRequest::from_parts(None, Some(" ownership ".into()), Some("HARD".into()));
    assert_eq!(
      req,
      Ok(QuizRequest::Generated { topic: "ownership".into(), difficulty: Difficulty::Hard })
    );
  }

  #[test]
  fn request_errors() {
    assert_eq!(QuizRequest::from_parts(None, Some("rust".into()), None), Err(RequestError::Missing));
    assert_eq!(
      QuizRequest::from_parts(None, Some("rust".into()), Some("insane".into())),
      Err(RequestError::Difficulty(UnknownDifficulty("insane".into())))
    );
  }
}
