//! # rr-provenance
//!
//! Everything runrelay knows about the provenance manifest an external
//! plugin writes after a workflow run: waiting for it to appear (the plugin
//! finalizes its output *after* the completion hook starts, so the wait is
//! bounded and a miss is a warning, not a failure), modeling its linked-data
//! graph, and extracting the `wrroc_*` metadata fields that enrich the
//! outgoing notification.

mod extract;
mod model;
mod watcher;

pub use extract::{extract, ExtractedMetadata};
pub use model::{Entity, Manifest};
pub use watcher::{wait_for_manifest, WaitOutcome};

/// File name the provenance plugin writes under the run's output location.
pub const MANIFEST_FILENAME: &str = "ro-crate-metadata.json";
