//! Error types for quiz loading and generation.

use thiserror::Error;

use crate::domain::Id;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Everything that can go wrong while turning a raw source into a `Quiz`.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("quiz has no active questions")]
    EmptyQuiz,

    #[error("malformed generation: {0}")]
    MalformedGeneration(String),

    #[error("invalid quiz shape: {0}")]
    InvalidQuizShape(#[from] ShapeViolation),

    #[error("quiz {0} not found or not published")]
    NotFound(Id),

    #[error("quiz generation is not configured")]
    GeneratorUnavailable,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Structural defects found while validating a quiz payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeViolation {
    #[error("missing quiz id")]
    MissingQuizId,

    #[error("missing quiz title")]
    MissingTitle,

    #[error("expected {expected} questions, found {found}")]
    QuestionCount { expected: usize, found: usize },

    #[error("question {question}: expected {expected} choices, found {found}")]
    ChoiceCount { question: Id, expected: usize, found: usize },

    #[error("question {question}: needs at least 2 choices, found {found}")]
    TooFewChoices { question: Id, found: usize },

    #[error("question {question}: expected exactly one correct choice, found {found}")]
    CorrectCount { question: Id, found: usize },

    #[error("question {question}: duplicate choice id {choice}")]
    DuplicateChoiceId { question: Id, choice: Id },

    #[error("question {question}: empty prompt")]
    EmptyPrompt { question: Id },

    #[error("question {question}: choice {choice} has an empty label")]
    EmptyLabel { question: Id, choice: Id },

    #[error("unexpected field types: {0}")]
    Schema(String),
}

/// Failures from the relational store, passed through untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Failures from the text-generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("model returned no content")]
    EmptyResponse,
}

/// Rejected difficulty string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
pub struct UnknownDifficulty(pub String);
