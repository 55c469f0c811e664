//! Read side of the relational quiz store.
//!
//! A store returns the nested quiz → questions → choices record for a quiz
//! that is published and matches the id exactly. Turning that record into a
//! validated `Quiz` is the normalizer's job, not the store's.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::domain::{Choice, Id, Question};
use crate::error::StoreError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgQuizStore;

/// Quiz row plus its joined question and choice rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
  pub quiz_id: Id,
  pub title: String,
  #[serde(default)] pub description: String,
  #[serde(default = "default_true")] pub is_published: bool,
  #[serde(default)] pub questions: Vec<QuestionRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
  pub question_id: Id,
  pub prompt: String,
  #[serde(default)] pub explanation_true: String,
  #[serde(default)] pub explanation_false: String,
  #[serde(default = "default_true")] pub is_active: bool,
  #[serde(default)] pub choices: Vec<ChoiceRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
  pub choice_id: Id,
  pub label: String,
  #[serde(default)] pub is_correct: bool,
}

fn default_true() -> bool { true }

impl From<ChoiceRecord> for Choice {
  fn from(r: ChoiceRecord) -> Self {
    Choice { choice_id: r.choice_id, label: r.label, is_correct: r.is_correct }
  }
}

impl From<QuestionRecord> for Question {
  fn from(r: QuestionRecord) -> Self {
    Question {
      question_id: r.question_id,
      prompt: r.prompt,
      explanation_if_correct: r.explanation_true,
      explanation_if_incorrect: r.explanation_false,
      is_active: r.is_active,
      choices: r.choices.into_iter().map(Choice::from).collect(),
    }
  }
}

/// Read access to published quizzes.
pub trait QuizStore {
  /// `Ok(None)` when no published quiz has this id.
  fn fetch_published(
    &self,
    quiz_id: &Id,
  ) -> impl Future<Output = Result<Option<QuizRecord>, StoreError>> + Send;
}
