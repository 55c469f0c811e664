//! Normalization of raw quiz sources into a validated `Quiz`.
//!
//! Two inputs are accepted:
//! 1) A published-quiz record from a `QuizStore` (relational rows, already nested).
//! 2) Free-form model text that should contain one JSON quiz object.
//!
//! Both paths end in `Quiz::new`, and both shuffle every question's choices with
//! a fresh Fisher–Yates permutation. Failures are all-or-nothing: no partial quiz.

use std::future::Future;

use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Choice, Difficulty, Id, Question, Quiz};
use crate::error::{GenerationError, QuizError, Result, ShapeViolation};
use crate::store::{QuizRecord, QuizStore};
use crate::util::{extract_json_object, trunc_for_log};

/// Generated quizzes must have exactly this many questions.
pub const GENERATED_QUESTION_COUNT: usize = 5;
/// Each generated question must have exactly this many choices.
pub const GENERATED_CHOICE_COUNT: usize = 3;

/// External text-generation service.
pub trait QuizGenerator {
  /// Raw model output for a quiz on `topic`. No parsing happens here.
  fn generate(
    &self,
    topic: &str,
    difficulty: Difficulty,
  ) -> impl Future<Output = std::result::Result<String, GenerationError>> + Send;
}

/// Loads quizzes from a store or a generator and hands back validated values.
pub struct Normalizer<S, G> {
  store: S,
  generator: Option<G>,
}

impl<S, G> Normalizer<S, G>
where
  S: QuizStore + Sync,
  G: QuizGenerator + Sync,
{
  pub fn new(store: S, generator: Option<G>) -> Self {
    Self { store, generator }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn has_generator(&self) -> bool { self.generator.is_some() }

  /// Published quiz by exact id, active questions only, choices shuffled.
  #[instrument(level = "info", skip(self, quiz_id), fields(%quiz_id))]
  pub async fn load_published_quiz(&self, quiz_id: &Id) -> Result<Quiz> {
    let record = self
      .store
      .fetch_published(quiz_id)
      .await?
      .ok_or_else(|| QuizError::NotFound(quiz_id.clone()))?;

    let quiz = quiz_from_record(record).map_err(|e| {
      warn!(target: "quiz", %quiz_id, error = %e, "Stored quiz rejected");
      e
    })?;
    info!(target: "quiz", %quiz_id, questions = quiz.question_count(), "Loaded published quiz");
    Ok(quiz)
  }

  /// Ask the generator for a quiz, then parse and validate its text.
  #[instrument(level = "info", skip(self, topic, difficulty), fields(%difficulty, topic = %trunc_for_log(topic, 40)))]
  pub async fn generate_quiz(&self, topic: &str, difficulty: Difficulty) -> Result<Quiz> {
    let generator = self.generator.as_ref().ok_or(QuizError::GeneratorUnavailable)?;
    let raw = generator.generate(topic, difficulty).await?;

    let quiz = parse_generated_quiz(&raw).map_err(|e| {
      warn!(target: "quiz", %difficulty, error = %e, bytes = raw.len(), "Generated quiz rejected");
      e
    })?;
    info!(target: "quiz", quiz_id = %quiz.quiz_id(), %difficulty, "Generated quiz accepted");
    Ok(quiz)
  }
}

/// Uniform in-place permutation of each question's choices.
/// `SliceRandom::shuffle` is Fisher–Yates; ids, labels and flags travel together.
pub fn shuffle_choices<R: Rng + ?Sized>(questions: &mut [Question], rng: &mut R) {
  for q in questions.iter_mut() {
    q.choices.shuffle(rng);
  }
}

pub fn quiz_from_record(record: QuizRecord) -> Result<Quiz> {
  quiz_from_record_with_rng(record, &mut rand::thread_rng())
}

pub fn quiz_from_record_with_rng<R: Rng + ?Sized>(record: QuizRecord, rng: &mut R) -> Result<Quiz> {
  let mut questions: Vec<Question> = record.questions.into_iter().map(Question::from).collect();
  shuffle_choices(&mut questions, rng);
  Quiz::new(record.quiz_id, record.title, record.description, questions)
}

pub fn parse_generated_quiz(raw: &str) -> Result<Quiz> {
  parse_generated_quiz_with_rng(raw, &mut rand::thread_rng())
}

/// Extract, parse, validate, shuffle. JSON syntax problems are
/// `MalformedGeneration`; anything structurally off is `InvalidQuizShape`.
pub fn parse_generated_quiz_with_rng<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> Result<Quiz> {
  let json = extract_json_object(raw)
    .ok_or_else(|| QuizError::MalformedGeneration("no JSON object found".into()))?;
  let value: serde_json::Value =
    serde_json::from_str(json).map_err(|e| QuizError::MalformedGeneration(e.to_string()))?;
  let generated: GeneratedQuiz =
    serde_json::from_value(value).map_err(|e| ShapeViolation::Schema(e.to_string()))?;

  let quiz_id = generated
    .quiz_id
    .filter(|id| !id.is_blank())
    .ok_or(ShapeViolation::MissingQuizId)?;

  if generated.questions.len() != GENERATED_QUESTION_COUNT {
    return Err(ShapeViolation::QuestionCount {
      expected: GENERATED_QUESTION_COUNT,
      found: generated.questions.len(),
    }
    .into());
  }

  let mut questions: Vec<Question> =
    generated.questions.into_iter().map(GeneratedQuestion::into_question).collect();

  for q in &questions {
    if q.choices.len() != GENERATED_CHOICE_COUNT {
      return Err(ShapeViolation::ChoiceCount {
        question: q.question_id.clone(),
        expected: GENERATED_CHOICE_COUNT,
        found: q.choices.len(),
      }
      .into());
    }
    let correct = q.choices.iter().filter(|c| c.is_correct).count();
    if correct != 1 {
      return Err(ShapeViolation::CorrectCount { question: q.question_id.clone(), found: correct }.into());
    }
  }

  shuffle_choices(&mut questions, rng);
  debug!(target: "quiz", %quiz_id, "Generated quiz passed shape checks");
  Quiz::new(
    quiz_id,
    generated.title.unwrap_or_default(),
    generated.description.unwrap_or_default(),
    questions,
  )
}

// --- Generated payload, loosely typed on purpose: nulls and gaps are tolerated
// here and judged by the shape checks above. ---

#[derive(Deserialize)]
struct GeneratedQuiz {
  #[serde(default)] quiz_id: Option<Id>,
  #[serde(default)] title: Option<String>,
  #[serde(default)] description: Option<String>,
  #[serde(default)] questions: Vec<GeneratedQuestion>,
}

#[derive(Deserialize)]
struct GeneratedQuestion {
  #[serde(default)] question_id: Option<Id>,
  #[serde(default)] prompt: Option<String>,
  #[serde(default)] explanation_true: Option<String>,
  #[serde(default)] explanation_false: Option<String>,
  #[serde(default)] is_active: Option<bool>,
  #[serde(default)] choices: Vec<GeneratedChoice>,
}

#[derive(Deserialize)]
struct GeneratedChoice {
  #[serde(default)] choice_id: Option<Id>,
  #[serde(default)] label: Option<String>,
  #[serde(default)] is_correct: Option<bool>,
}

/// Missing or blank ids are replaced with fresh UUIDs so they stay unique.
fn id_or_fresh(id: Option<Id>) -> Id {
  id.filter(|id| !id.is_blank()).unwrap_or_else(|| Id::Text(Uuid::new_v4().to_string()))
}

impl GeneratedQuestion {
  fn into_question(self) -> Question {
    Question {
      question_id: id_or_fresh(self.question_id),
      prompt: self.prompt.unwrap_or_default(),
      explanation_if_correct: self.explanation_true.unwrap_or_default(),
      explanation_if_incorrect: self.explanation_false.unwrap_or_default(),
      is_active: self.is_active.unwrap_or(true),
      choices: self
        .choices
        .into_iter()
        .map(|c| Choice {
          choice_id: id_or_fresh(c.choice_id),
          label: c.label.unwrap_or_default(),
          is_correct: c.is_correct.unwrap_or(false),
        })
        .collect(),
    }
  }
}
