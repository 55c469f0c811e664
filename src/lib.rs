//! quizkit · multiple-choice quiz core
//!
//! - Normalizer: stored quiz records or generated model text -> validated `Quiz`
//! - Session engine: select / submit / advance with deterministic scoring
//! - Sources: in-memory or PostgreSQL store, OpenAI chat completions for generation

pub mod config;
pub mod domain;
pub mod error;
pub mod normalizer;
pub mod openai;
pub mod protocol;
pub mod seeds;
pub mod session;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod util;

pub use domain::{Choice, Difficulty, Id, Question, Quiz};
pub use error::{GenerationError, QuizError, Result, ShapeViolation, StoreError};
pub use normalizer::{parse_generated_quiz, Normalizer, QuizGenerator};
pub use protocol::{SessionCommand, SessionSummary, SessionView};
pub use session::{SessionEngine, SessionState, Verdict};
pub use store::{MemoryStore, PgQuizStore, QuizStore};
