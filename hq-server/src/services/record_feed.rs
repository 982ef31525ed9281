//! Live record feed
//!
//! UI consumers subscribe to a franchise's record list and receive the
//! full, date-descending list after every relevant mutation. The feed
//! degrades gracefully: a failed re-query delivers an empty list instead
//! of tearing down the subscriber.
//!
//! Dropping the returned [`FeedGuard`] cancels the subscription; consumers
//! MUST drop it on teardown or the listener task leaks.

use std::sync::Arc;

use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use shared::message::{EventType, SyncPayload};

use crate::db::models::FinancialRecord;
use crate::db::repository::FinancialRecordRepository;
use crate::services::MessageBus;

/// Subscription handle; dropping it unsubscribes
pub struct FeedGuard {
    handle: Option<JoinHandle<()>>,
}

impl FeedGuard {
    fn noop() -> Self {
        Self { handle: None }
    }
}

impl Drop for FeedGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[derive(Clone)]
pub struct RecordFeed {
    db: Surreal<Db>,
    bus: Arc<MessageBus>,
    tz: Tz,
}

impl RecordFeed {
    pub fn new(db: Surreal<Db>, bus: Arc<MessageBus>, tz: Tz) -> Self {
        Self { db, bus, tz }
    }

    /// Stream the full record list of a franchise to `callback`
    ///
    /// The callback fires once immediately and again after every
    /// financial-record sync event. An empty franchise id yields an inert
    /// guard (nothing to watch, nothing to leak).
    pub fn subscribe<F>(&self, franchise_id: &str, callback: F) -> FeedGuard
    where
        F: Fn(Vec<FinancialRecord>) + Send + Sync + 'static,
    {
        if franchise_id.is_empty() {
            return FeedGuard::noop();
        }

        let franchise_id = franchise_id.to_string();
        let repo = FinancialRecordRepository::new(self.db.clone(), self.tz);
        let mut rx = self.bus.subscribe();

        let handle = tokio::spawn(async move {
            push_snapshot(&repo, &franchise_id, &callback).await;

            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if msg.event_type != EventType::Sync {
                            continue;
                        }
                        let Some(payload) = msg.decode::<SyncPayload>() else {
                            continue;
                        };
                        if payload.resource != "financial_record" {
                            continue;
                        }
                        push_snapshot(&repo, &franchise_id, &callback).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Record feed lagged; refreshing snapshot");
                        push_snapshot(&repo, &franchise_id, &callback).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        FeedGuard {
            handle: Some(handle),
        }
    }
}

/// Query and deliver the current list; errors deliver an empty list so a
/// dashboard render never breaks on a transient storage failure.
async fn push_snapshot<F>(repo: &FinancialRecordRepository, franchise_id: &str, callback: &F)
where
    F: Fn(Vec<FinancialRecord>) + Send + Sync,
{
    match repo.find_by_franchise(franchise_id).await {
        Ok(records) => callback(records),
        Err(e) => {
            tracing::warn!(
                franchise_id = %franchise_id,
                error = %e,
                "Record feed query failed; delivering empty list"
            );
            callback(Vec::new());
        }
    }
}
