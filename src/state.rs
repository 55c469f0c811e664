//! Application state: the chosen quiz store, optional generator, and normalizer.
//!
//! Store selection:
//!   - DATABASE_URL set  -> PostgreSQL (read-only)
//!   - otherwise         -> in-memory store (TOML bank first, then built-in seeds)
//!
//! Generation is available only when OPENAI_API_KEY is present.

use tracing::{info, instrument};

use crate::config::{load_agent_config_from_env, QuizRequest};
use crate::domain::{Id, Quiz};
use crate::error::{Result, StoreError};
use crate::normalizer::Normalizer;
use crate::openai::OpenAI;
use crate::seeds::seed_quizzes;
use crate::store::{MemoryStore, PgQuizStore, QuizRecord, QuizStore};

/// Either store, picked once at startup.
#[derive(Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    Postgres(PgQuizStore),
}

impl QuizStore for AnyStore {
    async fn fetch_published(&self, quiz_id: &Id) -> std::result::Result<Option<QuizRecord>, StoreError> {
        match self {
            AnyStore::Memory(s) => s.fetch_published(quiz_id).await,
            AnyStore::Postgres(s) => s.fetch_published(quiz_id).await,
        }
    }
}

pub struct AppState {
    pub normalizer: Normalizer<AnyStore, OpenAI>,
}

impl AppState {
    /// Build state from env: load config, pick a store, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub async fn from_env() -> Result<Self> {
        let cfg = load_agent_config_from_env().unwrap_or_default();

        let store = match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let pg = PgQuizStore::connect(&url).await?;
                info!(target: "quizkit", "Using PostgreSQL quiz store");
                AnyStore::Postgres(pg)
            }
            Err(_) => {
                // Bank entries come first so they win over seeds with the same id.
                let mem = MemoryStore::from_records(cfg.quizzes.into_iter().chain(seed_quizzes()));
                let (published, unpublished) = mem.inventory().await;
                info!(target: "quizkit", published, unpublished, "Using in-memory quiz store");
                AnyStore::Memory(mem)
            }
        };

        let openai = OpenAI::from_env(cfg.prompts);
        if let Some(oa) = &openai {
            info!(target: "quizkit", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "quizkit", "OpenAI disabled (no OPENAI_API_KEY). Only stored quizzes are available.");
        }

        Ok(Self { normalizer: Normalizer::new(store, openai) })
    }

    /// Resolve a request through the matching normalizer path.
    #[instrument(level = "info", skip(self))]
    pub async fn request_quiz(&self, request: &QuizRequest) -> Result<Quiz> {
        match request {
            QuizRequest::ById(id) => self.normalizer.load_published_quiz(id).await,
            QuizRequest::Generated { topic, difficulty } => {
                self.normalizer.generate_quiz(topic, *difficulty).await
            }
        }
    }
}
