//! PostgreSQL quiz store (read-only).
//!
//! Expected tables, keyed by BIGINT ids:
//!   quizzes(quiz_id, title, description, is_published)
//!   questions(question_id, quiz_id, prompt, explanation_true, explanation_false, is_active)
//!   choices(choice_id, question_id, label, is_correct)

use sqlx::{
  postgres::{PgPoolOptions, PgRow},
  PgPool, Row,
};
use tracing::{debug, instrument};

use crate::domain::Id;
use crate::error::StoreError;
use crate::store::{ChoiceRecord, QuestionRecord, QuizRecord, QuizStore};

const PUBLISHED_QUIZ_SQL: &str = r#"
SELECT q.quiz_id, q.title, q.description,
       qs.question_id, qs.prompt, qs.explanation_true, qs.explanation_false, qs.is_active,
       c.choice_id, c.label, c.is_correct
FROM quizzes q
LEFT JOIN questions qs ON qs.quiz_id = q.quiz_id
LEFT JOIN choices c ON c.question_id = qs.question_id
WHERE q.quiz_id = $1 AND q.is_published = TRUE
ORDER BY qs.question_id, c.choice_id
"#;

#[derive(Clone)]
pub struct PgQuizStore {
  pool: PgPool,
}

impl PgQuizStore {
  pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(database_url)
      .await?;
    Ok(Self { pool })
  }
}

impl QuizStore for PgQuizStore {
  #[instrument(level = "debug", skip(self), fields(%quiz_id))]
  async fn fetch_published(&self, quiz_id: &Id) -> Result<Option<QuizRecord>, StoreError> {
    let Id::Int(key) = quiz_id else {
      debug!(target: "quiz", %quiz_id, "Non-integer id cannot match a BIGINT key");
      return Ok(None);
    };

    let rows = sqlx::query(PUBLISHED_QUIZ_SQL)
      .bind(*key)
      .fetch_all(&self.pool)
      .await?;
    let joined = rows
      .iter()
      .map(JoinedRow::from_row)
      .collect::<Result<Vec<_>, sqlx::Error>>()?;

    debug!(target: "quiz", %quiz_id, rows = joined.len(), "Fetched joined quiz rows");
    Ok(fold_joined_rows(joined))
  }
}

/// One row of the quiz/question/choice join. Question and choice columns are
/// NULL when the LEFT JOIN finds nothing.
#[derive(Debug)]
struct JoinedRow {
  quiz_id: i64,
  title: String,
  description: Option<String>,
  question_id: Option<i64>,
  prompt: Option<String>,
  explanation_true: Option<String>,
  explanation_false: Option<String>,
  is_active: Option<bool>,
  choice_id: Option<i64>,
  label: Option<String>,
  is_correct: Option<bool>,
}

impl JoinedRow {
  fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
    Ok(Self {
      quiz_id: row.try_get("quiz_id")?,
      title: row.try_get("title")?,
      description: row.try_get("description")?,
      question_id: row.try_get("question_id")?,
      prompt: row.try_get("prompt")?,
      explanation_true: row.try_get("explanation_true")?,
      explanation_false: row.try_get("explanation_false")?,
      is_active: row.try_get("is_active")?,
      choice_id: row.try_get("choice_id")?,
      label: row.try_get("label")?,
      is_correct: row.try_get("is_correct")?,
    })
  }
}

/// Rows arrive ordered by question id, so a question's rows are contiguous.
fn fold_joined_rows(rows: Vec<JoinedRow>) -> Option<QuizRecord> {
  let mut rows = rows.into_iter().peekable();
  let first = rows.peek()?;
  let mut record = QuizRecord {
    quiz_id: Id::Int(first.quiz_id),
    title: first.title.clone(),
    description: first.description.clone().unwrap_or_default(),
    is_published: true,
    questions: Vec::new(),
  };

  for row in rows {
    let Some(question_id) = row.question_id else { continue };
    let question_id = Id::Int(question_id);

    let is_new = record.questions.last().map_or(true, |q| q.question_id != question_id);
    if is_new {
      record.questions.push(QuestionRecord {
        question_id,
        prompt: row.prompt.unwrap_or_default(),
        explanation_true: row.explanation_true.unwrap_or_default(),
        explanation_false: row.explanation_false.unwrap_or_default(),
        is_active: row.is_active.unwrap_or(false),
        choices: Vec::new(),
      });
    }

    if let (Some(choice_id), Some(question)) = (row.choice_id, record.questions.last_mut()) {
      question.choices.push(ChoiceRecord {
        choice_id: Id::Int(choice_id),
        label: row.label.unwrap_or_default(),
        is_correct: row.is_correct.unwrap_or(false),
      });
    }
  }

  Some(record)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn row(question: Option<i64>, choice: Option<i64>, correct: bool) -> JoinedRow {
    JoinedRow {
      quiz_id: 1,
      title: "Elden Theory".into(),
      description: None,
      question_id: question,
      prompt: question.map(|q| format!("Q{q}")),
      explanation_true: Some("right".into()),
      explanation_false: None,
      is_active: question.map(|_| true),
      choice_id: choice,
      label: choice.map(|c| format!("C{c}")),
      is_correct: choice.map(|_| correct),
    }
  }

  #[test]
  fn no_rows_means_no_quiz() {
    assert!(fold_joined_rows(Vec::new()).is_none());
  }

  #[test]
  fn folds_rows_into_nested_record() {
    let rec = fold_joined_rows(vec![
      row(Some(10), Some(100), true),
      row(Some(10), Some(101), false),
      row(Some(11), Some(110), false),
      row(Some(11), Some(111), true),
      row(Some(11), Some(112), false),
    ])
    .unwrap();

    assert_eq!(rec.quiz_id, Id::Int(1));
    assert_eq!(rec.description, "");
    assert_eq!(rec.questions.len(), 2);
    assert_eq!(rec.questions[0].choices.len(), 2);
    assert_eq!(rec.questions[1].choices.len(), 3);
    assert_eq!(rec.questions[1].choices[1].choice_id, Id::Int(111));
    assert!(rec.questions[1].choices[1].is_correct);
    assert_eq!(rec.questions[0].explanation_true, "right");
    assert_eq!(rec.questions[0].explanation_false, "");
  }

  #[test]
  fn quiz_without_questions_folds_to_empty_record() {
    let rec = fold_joined_rows(vec![row(None, None, false)]).unwrap();
    assert!(rec.questions.is_empty());
  }

  #[test]
  fn question_without_choices_is_kept() {
    let rec = fold_joined_rows(vec![row(Some(10), None, false)]).unwrap();
    assert_eq!(rec.questions.len(), 1);
    assert!(rec.questions[0].choices.is_empty());
  }

  #[tokio::test]
  #[ignore = "requires database"]
  async fn fetch_from_database() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let store = PgQuizStore::connect(&url).await.unwrap();
    let missing = store.fetch_published(&Id::Text("not-a-number".into())).await.unwrap();
    assert!(missing.is_none());
  }
}
