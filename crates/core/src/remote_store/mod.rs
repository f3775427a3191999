//! Remote object store seam.
//!
//! The pipeline never talks to the drive API directly; everything goes
//! through the `RemoteStore` trait so the store can be mocked in tests
//! and swapped for a different backend later.

mod drive;
mod types;

pub use drive::DriveStore;
pub use types::{
    ByteStream, ListOrder, ListQuery, RemoteItem, RemoteStore, RemoteStoreError,
};
