//! Valuation record storage.

use async_trait::async_trait;
use bizval_common::{Error, Result};
use bizval_valuation::ValuationRecord;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence for completed valuations.
#[async_trait]
pub trait ValuationStore: Send + Sync {
    /// Store a record, returning its id.
    async fn save(&self, record: ValuationRecord) -> Result<Uuid>;

    /// Look up a record by id.
    async fn get(&self, id: Uuid) -> Result<Option<ValuationRecord>>;

    /// Number of records currently held.
    async fn count(&self) -> Result<usize>;
}

#[derive(Default)]
struct Inner {
    records: HashMap<Uuid, ValuationRecord>,
    /// Insertion order, oldest first
    order: VecDeque<Uuid>,
}

/// Bounded in-process store. Evicts the oldest record once `max_records` is reached.
pub struct InMemoryStore {
    max_records: usize,
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records,
            inner: RwLock::new(Inner::default()),
        }
    }
}

#[async_trait]
impl ValuationStore for InMemoryStore {
    async fn save(&self, record: ValuationRecord) -> Result<Uuid> {
        if self.max_records == 0 {
            return Err(Error::Storage("store has no capacity".into()));
        }

        let id = record.id;
        let mut inner = self.inner.write().await;

        if inner.records.contains_key(&id) {
            return Err(Error::Storage(format!("duplicate record id {id}")));
        }
        inner.records.insert(id, record);
        inner.order.push_back(id);

        while inner.order.len() > self.max_records {
            if let Some(oldest) = inner.order.pop_front() {
                inner.records.remove(&oldest);
                tracing::debug!(record_id = %oldest, "Evicted oldest valuation record");
            }
        }

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ValuationRecord>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.records.len())
    }
}
