//! External per-item flag store seam.
//!
//! The authoritative copy of item flags lives in an external document
//! store; the pipeline only reads and patches them.

mod firestore;
mod types;

pub use firestore::FirestoreStateStore;
pub use types::{FlagPatch, ItemFlags, StateStore, StateStoreError};
