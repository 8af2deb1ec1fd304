// error.rs — Dispatch error taxonomy.

use std::fmt;

use thiserror::Error;

/// Classified cause of a rejected delivery, derived by matching the queue
/// client's diagnostic text against known substrings. Drives the
/// remediation text shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The queue endpoint does not exist.
    QueueNotFound,

    /// The caller is not allowed to send to this queue.
    AccessDenied,

    /// Ambient credentials are missing, expired, or unrecognized.
    InvalidCredentials,

    /// Anything the classifier does not recognize.
    Unclassified,
}

impl DispatchFailure {
    /// Classify a queue-client diagnostic.
    pub fn classify(diagnostic: &str) -> Self {
        if diagnostic.contains("NonExistentQueue") || diagnostic.contains("QueueDoesNotExist") {
            DispatchFailure::QueueNotFound
        } else if diagnostic.contains("AccessDenied") {
            DispatchFailure::AccessDenied
        } else if ["InvalidClientTokenId", "UnrecognizedClientException", "ExpiredToken", "Unable to locate credentials"]
            .iter()
            .any(|m| diagnostic.contains(m))
        {
            DispatchFailure::InvalidCredentials
        } else {
            DispatchFailure::Unclassified
        }
    }

    /// Stable slug used in diagnostics and exit status reporting.
    pub fn slug(&self) -> &'static str {
        match self {
            DispatchFailure::QueueNotFound => "queue-not-found",
            DispatchFailure::AccessDenied => "access-denied",
            DispatchFailure::InvalidCredentials => "invalid-credentials",
            DispatchFailure::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Errors that can occur during delivery.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The queue client could not be invoked at all.
    #[error(transparent)]
    Exec(#[from] rr_exec::ExecError),

    /// The payload could not be serialized.
    #[error("failed to serialize notification payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The delivery call ran and was rejected by the queue endpoint.
    #[error("dispatch rejected ({classification}): {diagnostic}")]
    Rejected {
        classification: DispatchFailure,
        diagnostic: String,
    },
}
