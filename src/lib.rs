//! Local-first data core for a single-user productivity client.
//!
//! The local store is the system of record: reads are synchronous and
//! always answered locally, writes apply before returning, and every
//! persisted key is namespaced by the active user id. The cloud mirror
//! replicates collections to a remote document store on a best-effort,
//! timeout-bounded basis — pull once at login, push after every write —
//! and never lets a remote failure reach the store's callers. On top of
//! the stored data, the agenda module computes a pure, day-bucketed
//! projection merging events, tasks, objective deadlines and generated
//! holidays.

pub mod agenda;
pub mod colors;
pub mod dates;
pub mod error;
pub mod holidays;
pub mod mirror;
pub mod recurrence;
pub mod store;
pub mod types;

pub use error::{DateError, MirrorError, StoreError};
pub use mirror::{CloudMirror, HttpRemote, RemoteDocument, RemoteStore};
pub use store::LocalStore;
