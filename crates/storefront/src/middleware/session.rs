//! Session middleware configuration.
//!
//! Session records live in process memory: they only need to survive between
//! HTMX requests from one loaded page, and a page load starts a new one.
//! Records are evicted once their expiry date passes.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tower_sessions::cookie::time::{self, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry as SessionExpiry, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "emporium_session";

/// Idle time after which an abandoned page session is evicted (2 hours).
pub const SESSION_EXPIRY_SECONDS: i64 = 2 * 60 * 60;

/// Upper bound on session records held at once.
const MAX_SESSIONS: u64 = 100_000;

/// Idle lifetime of a session as a std duration.
#[must_use]
pub const fn session_idle_timeout() -> Duration {
    Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs())
}

/// In-memory session store backed by a `moka` cache.
///
/// Each record is evicted at its own expiry date, which tower-sessions
/// pushes forward on every save.
#[derive(Clone)]
pub struct MokaSessionStore {
    records: Cache<Id, Record>,
}

impl MokaSessionStore {
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(RecordExpiry)
            .build();
        Self { records }
    }
}

impl Default for MokaSessionStore {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

impl fmt::Debug for MokaSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MokaSessionStore")
            .field("records", &self.records.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            let entry = self
                .records
                .entry(record.id)
                .or_insert(record.clone())
                .await;
            if entry.is_fresh() {
                return Ok(());
            }
            tracing::debug!("Session id collision, regenerating");
            record.id = Id::default();
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .records
            .get(id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.records.invalidate(id).await;
        Ok(())
    }
}

/// Evicts each record when its expiry date passes.
struct RecordExpiry;

impl RecordExpiry {
    fn time_left(record: &Record) -> Duration {
        let left = record.expiry_date - OffsetDateTime::now_utc();
        Duration::try_from(left).unwrap_or(Duration::ZERO)
    }
}

impl Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Self::time_left(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::time_left(record))
    }
}

/// Create the session layer with an in-memory store.
///
/// Every request re-saves the record so the inactivity expiry keeps moving
/// while the page is in use.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaSessionStore> {
    SessionManagerLayer::new(MokaSessionStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(SessionExpiry::OnInactivity(time::Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_always_save(true)
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_expiring_in(after: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: std::collections::HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + after,
        }
    }

    #[tokio::test]
    async fn test_saved_record_loads() {
        let store = MokaSessionStore::default();
        let mut record = record_expiring_in(time::Duration::hours(1));
        record
            .data
            .insert("page".to_string(), serde_json::json!("abc"));

        store.create(&mut record).await.expect("create");
        let loaded = store.load(&record.id).await.expect("load");
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_expired_records_are_evicted() {
        let store = MokaSessionStore::default();
        let mut record = record_expiring_in(time::Duration::milliseconds(50));
        store.create(&mut record).await.expect("create");
        assert!(store.load(&record.id).await.expect("load").is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        store.records.run_pending_tasks().await;

        assert!(store.load(&record.id).await.expect("load").is_none());
        assert_eq!(store.records.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_create_regenerates_taken_id() {
        let store = MokaSessionStore::default();
        let mut first = record_expiring_in(time::Duration::hours(1));
        store.create(&mut first).await.expect("create");

        let mut second = record_expiring_in(time::Duration::hours(1));
        second.id = first.id;
        store.create(&mut second).await.expect("create");

        assert_ne!(second.id, first.id);
        let kept = store.load(&first.id).await.expect("load");
        assert_eq!(kept, Some(first));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MokaSessionStore::default();
        let mut record = record_expiring_in(time::Duration::hours(1));
        store.create(&mut record).await.expect("create");

        store.delete(&record.id).await.expect("delete");
        assert!(store.load(&record.id).await.expect("load").is_none());
    }
}
