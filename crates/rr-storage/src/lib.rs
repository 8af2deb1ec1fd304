//! # rr-storage
//!
//! Uniform existence/size/read/list access over the two storage backends a
//! pipeline run can write to: the local filesystem and `s3://` object
//! storage. Callers never branch on path shape — [`Store`] dispatches on the
//! URI scheme prefix and hides the backend behind one interface.
//!
//! "Not found" is a normal result (`false` / `0` / `None`), never an error.
//! Only transport and credential failures surface as [`StorageError`]; those
//! mean the environment itself is misconfigured and abort the pipeline.

mod error;
mod store;

pub use error::StorageError;
pub use store::{Store, StorageEntry, OBJECT_SCHEME};
