//! # rr-notify
//!
//! The delivery half of runrelay: compose the notification payload that
//! describes a completed run (static run fields plus extracted provenance
//! metadata) and deliver it to the SQS queue endpoint in exactly one
//! attempt.
//!
//! The builder is a pure function — the caller supplies the instant, so a
//! frozen clock yields byte-identical payloads. The dispatcher never
//! retries: a run that completed must either be reported or fail loudly.

mod context;
mod dispatch;
mod error;
mod payload;

pub use context::RunContext;
pub use dispatch::{send, DispatchReceipt};
pub use error::{DispatchError, DispatchFailure};
pub use payload::{build, NotificationPayload};
