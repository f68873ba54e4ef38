//! A local store for personal expenses.
//!
//! All data lives in one JSON document on disk. A `Store` owns that document: it creates it on
//! first run, migrates older documents when they are read, and serializes every
//! read-modify-write so concurrent callers never lose each other's changes. Backups are
//! pretty-printed copies of the document that can be imported again later.

pub mod args;
mod backup;
mod clock;
pub mod commands;
mod config;
mod error;
mod events;
pub mod model;
mod store;
mod utils;
pub mod views;

pub use backup::{Backup, BACKUP_PREFIX};
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{Error, Result, StoreError};
pub use events::{Events, StoreEvent, Subscription};
pub use store::{LoadOutcome, Loaded, Store};
