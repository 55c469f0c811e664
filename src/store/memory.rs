//! In-process quiz store backed by a map, seeded from built-ins and the TOML bank.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::domain::Id;
use crate::error::StoreError;
use crate::store::{QuizRecord, QuizStore};

#[derive(Clone, Default)]
pub struct MemoryStore {
  by_id: Arc<RwLock<HashMap<Id, QuizRecord>>>,
}

impl MemoryStore {
  /// Later records with a repeated id are ignored; the first one wins.
  pub fn from_records(records: impl IntoIterator<Item = QuizRecord>) -> Self {
    let mut map = HashMap::new();
    for r in records {
      map.entry(r.quiz_id.clone()).or_insert(r);
    }
    Self { by_id: Arc::new(RwLock::new(map)) }
  }

  /// Insert or replace a record.
  #[instrument(level = "debug", skip(self, record), fields(quiz_id = %record.quiz_id))]
  pub async fn insert(&self, record: QuizRecord) {
    self.by_id.write().await.insert(record.quiz_id.clone(), record);
  }

  /// (published, unpublished) counts, for the startup inventory log.
  pub async fn inventory(&self) -> (usize, usize) {
    let by_id = self.by_id.read().await;
    let published = by_id.values().filter(|r| r.is_published).count();
    (published, by_id.len() - published)
  }
}

impl QuizStore for MemoryStore {
  async fn fetch_published(&self, quiz_id: &Id) -> Result<Option<QuizRecord>, StoreError> {
    let by_id = self.by_id.read().await;
    let found = by_id.get(quiz_id).filter(|r| r.is_published).cloned();
    debug!(target: "quiz", %quiz_id, found = found.is_some(), "Memory store lookup");
    Ok(found)
  }
}
