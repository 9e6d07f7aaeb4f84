//! In-process session store with a size cap and expiry cleanup.
//!
//! Every visitor who reaches `/login` gets a stored record, most of which are abandoned
//! before the callback. Expired records are dropped whenever a new one is stored and by the
//! periodic task started at boot; once `max_sessions` active records exist, the one closest
//! to expiry (the least recently active under inactivity expiry) is evicted.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_sessions::{
    session::{Id, Record},
    session_store::{self, ExpiredDeletion, SessionStore},
};

/// Upper bound on stored sessions used by the server.
pub const MAX_SESSIONS: usize = 10_000;

/// How often the background task sweeps expired sessions.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Memory-backed session store that never holds more than `max_sessions` records.
#[derive(Clone, Debug)]
pub struct BoundedMemoryStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
    max_sessions: usize,
}

impl BoundedMemoryStore {
    /// Creates an empty store holding at most `max_sessions` records (at least one).
    pub fn new(max_sessions: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Sweeps expired records every `period`, forever. Spawn it as a task.
    pub async fn delete_expired_every(self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        // First tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;

            let removed = purge_expired(&mut *self.records.lock().await);
            if removed > 0 {
                tracing::debug!(removed, "Deleted expired sessions");
            }
        }
    }

    fn make_room(&self, records: &mut HashMap<Id, Record>) {
        purge_expired(records);

        while records.len() >= self.max_sessions {
            let Some(oldest) = records
                .values()
                .min_by_key(|record| record.expiry_date)
                .map(|record| record.id)
            else {
                break;
            };

            records.remove(&oldest);
            tracing::debug!("Session store full, evicted the least recently active session");
        }
    }
}

impl Default for BoundedMemoryStore {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

#[async_trait]
impl SessionStore for BoundedMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        while records.contains_key(&record.id) {
            // Id collision
            record.id = Id::default();
        }

        self.make_room(&mut records);
        records.insert(record.id, record.clone());

        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        if !records.contains_key(&record.id) {
            self.make_room(&mut records);
        }

        records.insert(record.id, record.clone());

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let mut records = self.records.lock().await;

        match records.get(session_id) {
            Some(record) if is_active(record) => Ok(Some(record.clone())),
            Some(_) => {
                records.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.lock().await.remove(session_id);

        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for BoundedMemoryStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        purge_expired(&mut *self.records.lock().await);

        Ok(())
    }
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

/// Drops expired records, returning how many were removed.
fn purge_expired(records: &mut HashMap<Id, Record>) -> usize {
    let before = records.len();
    records.retain(|_, record| is_active(record));

    before - records.len()
}
