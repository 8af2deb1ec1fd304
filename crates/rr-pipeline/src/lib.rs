//! # rr-pipeline
//!
//! The pipeline controller: sequences prerequisite checks, the manifest
//! wait, metadata extraction, payload composition, and the single dispatch
//! attempt, owning the fail-fast contract between them.
//!
//! The controller is the only entry point the surrounding job-completion
//! hook calls. Its central invariant: a successful run must either be
//! reported downstream or the operator must be loudly told it was not.

mod controller;
mod error;
mod prereqs;

pub use controller::{Controller, PipelineOptions, PipelineReport, PipelineState};
pub use error::PipelineError;
pub use prereqs::{check_credentials, check_queue_client, CallerIdentity};

// The run description is composed at the CLI boundary and consumed by the
// notify layer; re-exported here so hook-side code needs only this crate.
pub use rr_notify::RunContext;
