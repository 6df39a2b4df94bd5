//! SQLite-backed namespaced local store.
//!
//! The store is the system of record for the UI: reads are synchronous and
//! always served locally, writes apply before returning. Every persisted
//! key is namespaced as `<userId>:<domain>:<name>`; a single un-namespaced
//! `session:currentUser` key records which identifier is active across
//! restarts. No active user means no data — every read resolves to an
//! empty/default value and every write is a no-op, never an error.
//!
//! The database lives at `~/.daykeeper/daykeeper.db`. Collections are
//! whole JSON documents in one `kv` table; typed helpers in the
//! submodules read-modify-write them and keep cross-collection
//! derivations (deadline-derived calendar entries) in step.

use std::path::PathBuf;

use parking_lot::{Mutex, RwLock};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::StoreError;
use crate::types::Collection;

pub mod events;
pub mod focus;
pub mod objectives;
pub mod settings;
pub mod tasks;

/// Key recording the active user id. Deliberately outside the per-user
/// namespace: it selects the namespace.
const CURRENT_USER_KEY: &str = "session:currentUser";

pub struct LocalStore {
    conn: Mutex<Connection>,
    session: RwLock<Option<String>>,
    push_tx: RwLock<Option<UnboundedSender<Collection>>>,
}

impl LocalStore {
    /// Open (or create) the database at `~/.daykeeper/daykeeper.db`.
    pub fn open() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::HomeDirNotFound)?;
        Self::open_at(home.join(".daykeeper").join("daykeeper.db"))
    }

    /// Open a database at an explicit path. Useful for testing and for
    /// embedding apps that manage their own data directory.
    pub fn open_at(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;

        let session = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![CURRENT_USER_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(Self {
            conn: Mutex::new(conn),
            session: RwLock::new(session),
            push_tx: RwLock::new(None),
        })
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// The active user id, if a session is present.
    pub fn active_user(&self) -> Option<String> {
        self.session.read().clone()
    }

    /// Activate a user. Swaps the entire key namespace; data written under
    /// another identifier is never visible, let alone merged.
    pub fn set_active_user(&self, user_id: &str) -> Result<(), StoreError> {
        self.put_raw(CURRENT_USER_KEY, user_id)?;
        *self.session.write() = Some(user_id.to_string());
        Ok(())
    }

    /// Drop the session. Subsequent reads are empty and writes no-ops.
    pub fn clear_active_user(&self) -> Result<(), StoreError> {
        self.conn
            .lock()
            .execute("DELETE FROM kv WHERE key = ?1", params![CURRENT_USER_KEY])?;
        *self.session.write() = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Namespaced document access
    // ------------------------------------------------------------------

    fn collection_key(user: &str, collection: Collection) -> String {
        format!("{user}:{}:{}", collection.domain(), collection.name())
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .lock()
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.lock().execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Read a collection document, or its default when absent or when no
    /// user is active.
    pub fn read_doc<T: DeserializeOwned + Default>(
        &self,
        collection: Collection,
    ) -> Result<T, StoreError> {
        match self.read_doc_opt(collection)? {
            Some(value) => Ok(value),
            None => Ok(T::default()),
        }
    }

    /// Read a collection document, distinguishing absence from a stored
    /// default.
    pub fn read_doc_opt<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Option<T>, StoreError> {
        let Some(user) = self.active_user() else {
            return Ok(None);
        };
        match self.get_raw(&Self::collection_key(&user, collection))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Overwrite a collection document. Synchronous and authoritative;
    /// enqueues a best-effort mirror push once committed. A no-op without
    /// an active user.
    pub fn write_doc<T: Serialize>(
        &self,
        collection: Collection,
        value: &T,
    ) -> Result<(), StoreError> {
        let Some(user) = self.active_user() else {
            return Ok(());
        };
        let raw = serde_json::to_string(value)?;
        self.put_raw(&Self::collection_key(&user, collection), &raw)?;
        self.notify_push(collection);
        Ok(())
    }

    /// Read all records of a collection (empty when absent or signed out).
    pub fn read_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        self.read_doc(collection)
    }

    /// Overwrite all records of a collection.
    pub fn write_collection<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        self.write_doc(collection, &records)
    }

    // ------------------------------------------------------------------
    // Mirror integration
    // ------------------------------------------------------------------

    /// Register the channel that receives a collection tag after every
    /// local write. The mirror's push worker drains it.
    pub fn set_push_notifier(&self, tx: UnboundedSender<Collection>) {
        *self.push_tx.write() = Some(tx);
    }

    fn notify_push(&self, collection: Collection) {
        if let Some(tx) = self.push_tx.read().as_ref() {
            // A dropped worker just means nobody is mirroring.
            let _ = tx.send(collection);
        }
    }

    /// Raw JSON snapshot of a collection for the push path.
    pub(crate) fn raw_snapshot(
        &self,
        collection: Collection,
    ) -> Result<Option<serde_json::Value>, StoreError> {
        let Some(user) = self.active_user() else {
            return Ok(None);
        };
        match self.get_raw(&Self::collection_key(&user, collection))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Overwrite a collection with remote content during pull
    /// reconciliation. Does not re-enqueue a push.
    pub(crate) fn apply_remote(
        &self,
        collection: Collection,
        content: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let Some(user) = self.active_user() else {
            return Ok(());
        };
        let raw = serde_json::to_string(content)?;
        self.put_raw(&Self::collection_key(&user, collection), &raw)
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================


// =============================================================================
// Tests
// =============================================================================
