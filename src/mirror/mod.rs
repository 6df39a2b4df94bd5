//! Best-effort cloud mirroring of the local store.
//!
//! The remote document store holds one document per (user, collection),
//! replaced wholesale on push. Everything here is bounded and silent:
//! pushes and pulls carry their own timeouts, and a timeout or transport
//! failure degrades to a no-op (push) or absent (pull) with a log line —
//! never an error at the store's boundary, because local data must stay
//! fully usable offline.
//!
//! Push is fire-and-forget: the store enqueues a collection tag after
//! every write and a single background worker drains the queue, reading
//! the freshest local snapshot at drain time. Pending jobs for the same
//! collection coalesce, and the single worker serializes same-collection
//! pushes, so the remote always observes snapshots in program order.
//! There are no retries — the next local write re-pushes a fresher
//! snapshot anyway.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::error::{MirrorError, StoreError};
use crate::store::LocalStore;
use crate::types::{
    Collection, FocusSession, LocalEvent, Objective, StreakState, Task, UserPrefs,
};

pub mod http;
pub use http::HttpRemote;

/// Bound on one push. Writes get the longer leash.
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound on one pull. Login latency is the per-call bound, not the sum —
/// pull-all runs the collections in parallel.
pub const PULL_TIMEOUT: Duration = Duration::from_secs(5);

/// The wholesale replacement envelope at the remote boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    pub content: serde_json::Value,
    pub updated_at: String,
}

/// Port to the remote per-user document store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn push(
        &self,
        user: &str,
        collection: Collection,
        doc: RemoteDocument,
    ) -> Result<(), MirrorError>;

    async fn pull(
        &self,
        user: &str,
        collection: Collection,
    ) -> Result<Option<RemoteDocument>, MirrorError>;
}

/// Asynchronous, timeout-bounded replication of local collections.
pub struct CloudMirror {
    store: Arc<LocalStore>,
    remote: Arc<dyn RemoteStore>,
}

impl CloudMirror {
    pub fn new(store: Arc<LocalStore>, remote: Arc<dyn RemoteStore>) -> Self {
        Self { store, remote }
    }

    /// Push the current local snapshot of one collection. Failures and
    /// timeouts are logged and swallowed.
    pub async fn push_snapshot(&self, collection: Collection) {
        let Some(user) = self.store.active_user() else {
            return;
        };
        let content = match self.store.raw_snapshot(collection) {
            Ok(Some(value)) => value,
            Ok(None) => return,
            Err(e) => {
                log::warn!("mirror: cannot snapshot {}: {e}", collection.remote_name());
                return;
            }
        };
        let doc = RemoteDocument {
            content,
            updated_at: chrono::Utc::now().to_rfc3339(),
        };
        match timeout(PUSH_TIMEOUT, self.remote.push(&user, collection, doc)).await {
            Ok(Ok(())) => log::debug!("mirror: pushed {}", collection.remote_name()),
            Ok(Err(e)) => log::warn!("mirror: push {} failed: {e}", collection.remote_name()),
            Err(_) => log::warn!(
                "mirror: push {} timed out after {:?}",
                collection.remote_name(),
                PUSH_TIMEOUT
            ),
        }
    }

    /// Pull one collection's remote content, or `None` on absence,
    /// timeout, transport failure, or content that does not parse as the
    /// collection's record type.
    async fn pull_collection(&self, user: &str, collection: Collection) -> Option<serde_json::Value> {
        let doc = match timeout(PULL_TIMEOUT, self.remote.pull(user, collection)).await {
            Ok(Ok(Some(doc))) => doc,
            Ok(Ok(None)) => return None,
            Ok(Err(e)) => {
                log::warn!("mirror: pull {} failed: {e}", collection.remote_name());
                return None;
            }
            Err(_) => {
                log::warn!(
                    "mirror: pull {} timed out after {:?}",
                    collection.remote_name(),
                    PULL_TIMEOUT
                );
                return None;
            }
        };
        if !content_is_valid(collection, &doc.content) {
            log::warn!(
                "mirror: malformed remote content for {}; treating as absent",
                collection.remote_name()
            );
            return None;
        }
        Some(doc.content)
    }

    /// One-time login reconciliation: fetch every collection concurrently
    /// and overwrite the local copy for each that returned content. A
    /// collection that times out or fails leaves its local copy untouched
    /// and does not block the others.
    pub async fn pull_all(&self) {
        let Some(user) = self.store.active_user() else {
            return;
        };

        let (objectives, tasks, events, sessions, streak, prefs, goal) = tokio::join!(
            self.pull_collection(&user, Collection::Objectives),
            self.pull_collection(&user, Collection::Tasks),
            self.pull_collection(&user, Collection::Events),
            self.pull_collection(&user, Collection::FocusSessions),
            self.pull_collection(&user, Collection::Streak),
            self.pull_collection(&user, Collection::Prefs),
            self.pull_collection(&user, Collection::Goal),
        );

        let fetched = [
            (Collection::Objectives, objectives),
            (Collection::Tasks, tasks),
            (Collection::Events, events),
            (Collection::FocusSessions, sessions),
            (Collection::Streak, streak),
            (Collection::Prefs, prefs),
            (Collection::Goal, goal),
        ];
        for (collection, content) in fetched {
            let Some(content) = content else { continue };
            if let Err(e) = self.store.apply_remote(collection, &content) {
                log::warn!(
                    "mirror: failed to apply remote {}: {e}",
                    collection.remote_name()
                );
            }
        }
    }

    /// Complete login flow: activate the user, reconcile every collection
    /// from the remote before the caller's first read, then count the
    /// login toward the streak. Total added latency is bounded by one
    /// pull timeout, not seven — the fetches run in parallel.
    pub async fn login(&self, user: &str) -> Result<(), StoreError> {
        self.store.set_active_user(user)?;
        self.pull_all().await;
        self.store.record_login(&crate::dates::today_string())?;
        Ok(())
    }

    /// Start the background push worker and wire it to the store. One
    /// worker drains all writes; duplicate pending tags coalesce so a
    /// burst of writes to one collection pushes a single, freshest
    /// snapshot.
    pub fn spawn_push_worker(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.store.set_push_notifier(tx);
        let mirror = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut batch = vec![first];
                while let Ok(next) = rx.try_recv() {
                    if !batch.contains(&next) {
                        batch.push(next);
                    }
                }
                for collection in batch {
                    mirror.push_snapshot(collection).await;
                }
            }
        })
    }
}

/// Typed validation of remote content before it overwrites local data.
fn content_is_valid(collection: Collection, content: &serde_json::Value) -> bool {
    let value = content.clone();
    match collection {
        Collection::Objectives => serde_json::from_value::<Vec<Objective>>(value).is_ok(),
        Collection::Tasks => serde_json::from_value::<Vec<Task>>(value).is_ok(),
        Collection::Events => serde_json::from_value::<Vec<LocalEvent>>(value).is_ok(),
        Collection::FocusSessions => serde_json::from_value::<Vec<FocusSession>>(value).is_ok(),
        Collection::Streak => serde_json::from_value::<StreakState>(value).is_ok(),
        Collection::Prefs => serde_json::from_value::<UserPrefs>(value).is_ok(),
        Collection::Goal => serde_json::from_value::<u32>(value).is_ok(),
    }
}

// =============================================================================
// Tests
// =============================================================================
