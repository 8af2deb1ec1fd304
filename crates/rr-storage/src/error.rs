// error.rs — Error types for the path accessor.

use thiserror::Error;

/// Errors that can occur during storage access.
///
/// Absence of a path is not represented here — accessors report that as a
/// normal `false`/`0`/`None` result. These variants cover the failures that
/// indicate a broken environment rather than a late manifest.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A local filesystem operation failed for a reason other than absence.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The object-storage backend rejected the request — access denied,
    /// invalid credentials, or the endpoint was unreachable.
    #[error("object storage error for {path}: {detail}")]
    Backend { path: String, detail: String },

    /// The storage command itself could not be invoked.
    #[error(transparent)]
    Exec(#[from] rr_exec::ExecError),
}
